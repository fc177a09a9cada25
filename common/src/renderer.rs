//! Scene renderer for lab benches
//!
//! Labs describe each frame with a [`FrameBuilder`] (boxes, spheres, lines)
//! and the [`SceneRenderer`] uploads and draws it. Opaque boxes are drawn
//! before translucent ones so glassware does not hide what is behind it.

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::camera::{Camera3D, CameraUniform};
use crate::graphics::{create_uniform_buffer, GraphicsContext};
use crate::scene_graph::SceneGraph;

/// Instance data for an axis-aligned box
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BoxInstance {
    pub center: [f32; 4],
    pub half_extents: [f32; 4],
    pub color: [f32; 4],
}

impl BoxInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
    ];

    pub fn new(center: Vec3, half_extents: Vec3, color: [f32; 4]) -> Self {
        Self {
            center: center.extend(1.0).to_array(),
            half_extents: half_extents.extend(0.0).to_array(),
            color,
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.color[3] < 1.0
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BoxInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Unit cube corner with face normal
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl CubeVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Instance data for billboard spheres
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

impl ParticleInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        2 => Float32x3,
        3 => Float32,
        4 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Quad vertex for billboards
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Grid vertex count: 21 lines per axis, two axes, two vertices each
const GRID_VERTICES: u32 = 84;

/// 36 vertices of the [-1, 1] cube, two triangles per face
pub fn cube_vertices() -> Vec<CubeVertex> {
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, up, right) in faces {
        let corner = |u: f32, v: f32| CubeVertex {
            position: (normal + right * u + up * v).to_array(),
            normal: normal.to_array(),
        };
        vertices.extend([
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ]);
    }
    vertices
}

/// Convert hue (degrees), saturation and lightness (0..1) to linear RGBA
pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Everything a lab wants drawn this frame
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    boxes: Vec<BoxInstance>,
    spheres: Vec<ParticleInstance>,
    lines: Vec<LineVertex>,
    pub show_grid: bool,
    /// Background color, linear RGB
    pub clear_color: [f32; 3],
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            spheres: Vec::new(),
            lines: Vec::new(),
            show_grid: true,
            clear_color: [0.92, 0.93, 0.95],
        }
    }

    pub fn push_box(&mut self, center: Vec3, half_extents: Vec3, color: [f32; 4]) {
        if color[3] <= 0.0 {
            return;
        }
        self.boxes.push(BoxInstance::new(center, half_extents, color));
    }

    pub fn push_sphere(&mut self, center: Vec3, radius: f32, color: [f32; 4]) {
        if color[3] <= 0.0 {
            return;
        }
        self.spheres.push(ParticleInstance {
            position: center.to_array(),
            radius,
            color,
        });
    }

    pub fn push_line(&mut self, from: Vec3, to: Vec3, color: [f32; 4]) {
        self.lines.push(LineVertex {
            position: from.to_array(),
            color,
        });
        self.lines.push(LineVertex {
            position: to.to_array(),
            color,
        });
    }

    /// Consecutive segments through `points`
    pub fn push_polyline(&mut self, points: &[Vec3], color: [f32; 4]) {
        for pair in points.windows(2) {
            self.push_line(pair[0], pair[1], color);
        }
    }

    /// Every visible node of the graph that carries geometry, as boxes
    pub fn push_scene(&mut self, graph: &SceneGraph) {
        for (_, bounds, color) in graph.visible_geometry() {
            self.push_box(bounds.center(), bounds.half_extents(), color);
        }
    }

    /// Boxes with opaque ones first, and how many of them are opaque
    pub fn sorted_boxes(&self) -> (Vec<BoxInstance>, usize) {
        let (mut opaque, translucent): (Vec<_>, Vec<_>) = self.boxes.iter().partition(|b| !b.is_translucent());
        let opaque_count = opaque.len();
        opaque.extend(translucent);
        (opaque, opaque_count)
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn line_vertex_count(&self) -> usize {
        self.lines.len()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.spheres.clear();
        self.lines.clear();
    }
}

/// Draw counts for a frame uploaded by [`SceneRenderer::prepare`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PreparedFrame {
    opaque_boxes: u32,
    translucent_boxes: u32,
    spheres: u32,
    line_vertices: u32,
    show_grid: bool,
    clear_color: wgpu::Color,
}

/// GPU buffer that grows to fit whatever is written into it
struct GrowableBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, usage: wgpu::BufferUsages, capacity: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            label,
            usage,
            buffer,
            capacity,
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("{}: growing to {} bytes", self.label, capacity);
            *self = Self::new(device, self.label, self.usage, capacity);
        }
        queue.write_buffer(&self.buffer, 0, bytes);
    }
}

pub struct SceneRenderer {
    box_pipeline: wgpu::RenderPipeline,
    translucent_box_pipeline: wgpu::RenderPipeline,
    sphere_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    cube_buffer: wgpu::Buffer,
    cube_vertex_count: u32,
    quad_buffer: wgpu::Buffer,
    box_buffer: GrowableBuffer,
    sphere_buffer: GrowableBuffer,
    line_buffer: GrowableBuffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
}

struct PipelineSpec<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    depth_write: bool,
}

impl SceneRenderer {
    pub fn new(ctx: &GraphicsContext) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let camera_buffer = create_uniform_buffer(device, "Camera Buffer", &CameraUniform::from_camera(&Camera3D::new(ctx.aspect_ratio())));

        let camera_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = Self::create_depth_texture(device, ctx.size.width, ctx.size.height);

        let build = |spec: PipelineSpec| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(spec.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: spec.vs,
                    buffers: spec.buffers,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: spec.fs,
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: spec.topology,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: spec.depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let box_buffers = [CubeVertex::layout(), BoxInstance::layout()];
        let box_pipeline = build(PipelineSpec {
            label: "Box Pipeline",
            vs: "vs_box",
            fs: "fs_box",
            buffers: &box_buffers,
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_write: true,
        });
        let translucent_box_pipeline = build(PipelineSpec {
            label: "Translucent Box Pipeline",
            vs: "vs_box",
            fs: "fs_box",
            buffers: &box_buffers,
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_write: false,
        });
        let sphere_pipeline = build(PipelineSpec {
            label: "Sphere Pipeline",
            vs: "vs_sphere",
            fs: "fs_sphere",
            buffers: &[QuadVertex::layout(), ParticleInstance::layout()],
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_write: true,
        });
        let line_pipeline = build(PipelineSpec {
            label: "Line Pipeline",
            vs: "vs_line",
            fs: "fs_line",
            buffers: &[LineVertex::layout()],
            topology: wgpu::PrimitiveTopology::LineList,
            depth_write: true,
        });
        let grid_pipeline = build(PipelineSpec {
            label: "Grid Pipeline",
            vs: "vs_grid",
            fs: "fs_line",
            buffers: &[],
            topology: wgpu::PrimitiveTopology::LineList,
            depth_write: true,
        });

        let cube = cube_vertices();
        let cube_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Buffer"),
            contents: bytemuck::cast_slice(&cube),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let box_buffer = GrowableBuffer::new(
            device,
            "Box Instance Buffer",
            wgpu::BufferUsages::VERTEX,
            (std::mem::size_of::<BoxInstance>() * 256) as u64,
        );
        let sphere_buffer = GrowableBuffer::new(
            device,
            "Sphere Instance Buffer",
            wgpu::BufferUsages::VERTEX,
            (std::mem::size_of::<ParticleInstance>() * 256) as u64,
        );
        let line_buffer = GrowableBuffer::new(
            device,
            "Line Buffer",
            wgpu::BufferUsages::VERTEX,
            (std::mem::size_of::<LineVertex>() * 1024) as u64,
        );

        Self {
            box_pipeline,
            translucent_box_pipeline,
            sphere_pipeline,
            line_pipeline,
            grid_pipeline,
            cube_buffer,
            cube_vertex_count: cube.len() as u32,
            quad_buffer,
            box_buffer,
            sphere_buffer,
            line_buffer,
            camera_buffer,
            camera_bind_group,
            depth_texture,
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera3D) {
        let uniform = CameraUniform::from_camera(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Upload a frame's geometry
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &FrameBuilder) -> PreparedFrame {
        let (boxes, opaque) = frame.sorted_boxes();
        self.box_buffer.write(device, queue, bytemuck::cast_slice(&boxes));
        self.sphere_buffer.write(device, queue, bytemuck::cast_slice(&frame.spheres));
        self.line_buffer.write(device, queue, bytemuck::cast_slice(&frame.lines));

        PreparedFrame {
            opaque_boxes: opaque as u32,
            translucent_boxes: (boxes.len() - opaque) as u32,
            spheres: frame.spheres.len() as u32,
            line_vertices: frame.lines.len() as u32,
            show_grid: frame.show_grid,
            clear_color: wgpu::Color {
                r: frame.clear_color[0] as f64,
                g: frame.clear_color[1] as f64,
                b: frame.clear_color[2] as f64,
                a: 1.0,
            },
        }
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, frame: &PreparedFrame) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(frame.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        if frame.show_grid {
            render_pass.set_pipeline(&self.grid_pipeline);
            render_pass.draw(0..GRID_VERTICES, 0..1);
        }

        if frame.opaque_boxes > 0 {
            render_pass.set_pipeline(&self.box_pipeline);
            render_pass.set_vertex_buffer(0, self.cube_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.box_buffer.buffer.slice(..));
            render_pass.draw(0..self.cube_vertex_count, 0..frame.opaque_boxes);
        }

        if frame.spheres > 0 {
            render_pass.set_pipeline(&self.sphere_pipeline);
            render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.sphere_buffer.buffer.slice(..));
            render_pass.draw(0..6, 0..frame.spheres);
        }

        if frame.line_vertices > 0 {
            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_vertex_buffer(0, self.line_buffer.buffer.slice(..));
            render_pass.draw(0..frame.line_vertices, 0..1);
        }

        if frame.translucent_boxes > 0 {
            let start = frame.opaque_boxes;
            render_pass.set_pipeline(&self.translucent_box_pipeline);
            render_pass.set_vertex_buffer(0, self.cube_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.box_buffer.buffer.slice(..));
            render_pass.draw(0..self.cube_vertex_count, start..start + frame.translucent_boxes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_outward_faces() {
        let cube = cube_vertices();
        assert_eq!(cube.len(), 36);
        for v in &cube {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            // Every corner lies on the face its normal points out of
            assert!((p.dot(n) - 1.0).abs() < 1e-6);
            assert!(p.abs().max_element() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_opaque_boxes_sort_first() {
        let mut frame = FrameBuilder::new();
        frame.push_box(Vec3::ZERO, Vec3::ONE, [1.0, 1.0, 1.0, 0.3]);
        frame.push_box(Vec3::X, Vec3::ONE, [1.0, 0.0, 0.0, 1.0]);
        frame.push_box(Vec3::Y, Vec3::ONE, [0.0, 1.0, 0.0, 0.5]);
        frame.push_box(Vec3::Z, Vec3::ONE, [0.0, 0.0, 1.0, 1.0]);

        let (boxes, opaque) = frame.sorted_boxes();
        assert_eq!(opaque, 2);
        assert!(boxes[..2].iter().all(|b| !b.is_translucent()));
        assert!(boxes[2..].iter().all(|b| b.is_translucent()));
    }

    #[test]
    fn test_invisible_items_are_skipped() {
        let mut frame = FrameBuilder::new();
        frame.push_box(Vec3::ZERO, Vec3::ONE, [1.0, 1.0, 1.0, 0.0]);
        frame.push_sphere(Vec3::ZERO, 1.0, [1.0, 0.5, 0.0, 0.0]);
        assert_eq!(frame.box_count(), 0);
        assert_eq!(frame.sphere_count(), 0);
    }

    #[test]
    fn test_polyline_segments() {
        let mut frame = FrameBuilder::new();
        frame.push_polyline(&[Vec3::ZERO, Vec3::X, Vec3::Y], [1.0; 4]);
        assert_eq!(frame.line_vertex_count(), 4);
    }

    #[test]
    fn test_hsl_primaries() {
        let close = |a: [f32; 4], b: [f32; 4]| a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5);
        assert!(close(hsl_to_rgba(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(close(hsl_to_rgba(60.0, 1.0, 0.5), [1.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl_to_rgba(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(close(hsl_to_rgba(0.0, 0.0, 0.5), [0.5, 0.5, 0.5, 1.0]));
    }
}
