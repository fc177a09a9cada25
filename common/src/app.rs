//! Window, event loop and frame plumbing shared by every lab
//!
//! A lab implements [`Lab`]; [`run`] owns the window, the GPU, the camera
//! and egui, and routes pointer input: a press the lab claims becomes a lab
//! drag, anything else orbits the camera.

use anyhow::{Context, Result};
use glam::Vec2;
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

use crate::camera::Camera3D;
use crate::config::LabArgs;
use crate::graphics::GraphicsContext;
use crate::picking::{Picker, Viewport};
use crate::renderer::{FrameBuilder, SceneRenderer};

/// What a lab sees while building its UI
pub struct LabUi<'a> {
    pub egui: &'a egui::Context,
    pub picker: Picker<'a>,
    /// False when the lesson panel was turned off with `--no-ui`
    pub show_panel: bool,
}

pub trait Lab {
    fn title(&self) -> &str;

    /// Place the camera before the first frame
    fn setup_camera(&self, _camera: &mut Camera3D) {}

    /// Pointer pressed over the scene. Return true to claim the press; an
    /// unclaimed press orbits the camera.
    fn pointer_down(&mut self, _pointer: Vec2, _picker: &Picker) -> bool {
        false
    }

    /// Pointer moved while a claimed press is held
    fn pointer_move(&mut self, _pointer: Vec2, _picker: &Picker) {}

    fn pointer_up(&mut self) {}

    fn key(&mut self, _key: KeyCode) {}

    /// Advance timers and animations; may move the camera
    fn update(&mut self, dt: f32, camera: &mut Camera3D);

    fn build_frame(&self, frame: &mut FrameBuilder);

    fn ui(&mut self, _ui: &LabUi) {}
}

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerMode {
    Idle,
    Lab,
    Orbit,
}

struct App<L: Lab> {
    ctx: GraphicsContext,
    renderer: SceneRenderer,
    camera: Camera3D,
    lab: L,
    show_panel: bool,
    cursor: Vec2,
    last_orbit: Option<Vec2>,
    pointer: PointerMode,
    egui: EguiState,
}

impl<L: Lab> App<L> {
    fn new(ctx: GraphicsContext, lab: L, show_panel: bool) -> Self {
        let renderer = SceneRenderer::new(&ctx);
        let mut camera = Camera3D::new(ctx.aspect_ratio());
        lab.setup_camera(&mut camera);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            camera,
            lab,
            show_panel,
            cursor: Vec2::ZERO,
            last_orbit: None,
            pointer: PointerMode::Idle,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::from_size(self.ctx.size.width, self.ctx.size.height)
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.renderer.resize(&self.ctx.device, self.ctx.size.width, self.ctx.size.height);
    }

    fn handle_button(&mut self, pressed: bool) {
        if pressed {
            let picker = Picker::new(&self.camera, self.viewport());
            self.pointer = if self.lab.pointer_down(self.cursor, &picker) {
                PointerMode::Lab
            } else {
                self.last_orbit = Some(self.cursor);
                PointerMode::Orbit
            };
        } else {
            if self.pointer == PointerMode::Lab {
                self.lab.pointer_up();
            }
            self.pointer = PointerMode::Idle;
            self.last_orbit = None;
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor = Vec2::new(x as f32, y as f32);
        match self.pointer {
            PointerMode::Lab => {
                let picker = Picker::new(&self.camera, self.viewport());
                self.lab.pointer_move(self.cursor, &picker);
            }
            PointerMode::Orbit => {
                if let Some(last) = self.last_orbit {
                    let delta = (self.cursor - last) * 0.01;
                    self.camera.orbit(delta.x, delta.y);
                }
                self.last_orbit = Some(self.cursor);
            }
            PointerMode::Idle => {}
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.camera.zoom(delta * 0.5);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let mut frame = FrameBuilder::new();
        self.lab.build_frame(&mut frame);
        let prepared = self.renderer.prepare(&self.ctx.device, &self.ctx.queue, &frame);

        let viewport = self.viewport();
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            let ui = LabUi {
                egui: ctx,
                picker: Picker::new(&self.camera, viewport),
                show_panel: self.show_panel,
            };
            self.lab.ui(&ui);
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        self.renderer.render(&mut encoder, &view, &prepared);

        self.egui
            .renderer
            .update_buffers(&self.ctx.device, &self.ctx.queue, &mut encoder, &tris, &screen_descriptor);
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Open a window and drive `lab` until it is closed
pub fn run<L: Lab + 'static>(lab: L, args: &LabArgs) -> Result<()> {
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(lab.title(), args.width, args.height))?;
    log::info!("{} started ({}x{})", lab.title(), args.width, args.height);

    let mut app = App::new(ctx, lab, !args.no_ui);
    let mut last_time = std::time::Instant::now();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { ref event, .. } => {
                    let consumed = app.handle_window_event(event);

                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        // A release always reaches the lab so a drag never sticks
                        WindowEvent::MouseInput {
                            state: ElementState::Released,
                            button: MouseButton::Left,
                            ..
                        } => app.handle_button(false),
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Left,
                            ..
                        } if !consumed => app.handle_button(true),
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state: ElementState::Pressed,
                                    ..
                                },
                            ..
                        } if !consumed => app.lab.key(*key),
                        WindowEvent::MouseWheel { delta, .. } if !consumed => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - last_time).as_secs_f32().min(0.1);
                            last_time = now;

                            app.lab.update(dt, &mut app.camera);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => log::error!("Render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    app.ctx.window.request_redraw();
                }
                Event::LoopExiting => {
                    log::info!("{} closed", app.lab.title());
                }
                _ => {}
            }
        })
        .context("Event loop error")
}
