//! Shared plumbing for the interactive science labs
//!
//! Windowing, rendering, camera control, picking, asset loading and the
//! step-driven interaction machinery every lab builds on.

pub mod animation;
pub mod app;
pub mod assets;
pub mod camera;
pub mod clip;
pub mod config;
pub mod graphics;
pub mod interaction;
pub mod picking;
pub mod renderer;
pub mod scene_graph;
pub mod ui;

pub use animation::*;
pub use app::{run, Lab, LabUi};
pub use camera::*;
pub use config::LabArgs;
pub use graphics::GraphicsContext;
pub use picking::{Picker, Shape, Viewport};
pub use renderer::FrameBuilder;

/// Install the logger. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}
