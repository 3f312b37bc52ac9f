//! A CPU-based wireframe scene viewer.
//!
//! This crate implements the classic viewing pipeline: camera parameters
//! become a canonical-view-volume transform, line segments are clipped in
//! 3D against the volume, and the survivors are projected and rasterized.
//! SDL2 is used only for window management and display; all rendering is
//! done on the CPU.
//!
//! # Quick Start
//!
//! ```ignore
//! use wireview::prelude::*;
//!
//! let scene = Scene::demo();
//! let mut window = Window::new("wireview", 800, 600)?;
//! let mut engine = Engine::new(scene, 800, 600);
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod clip;
pub mod engine;
pub mod math;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod scene;
pub mod window;

pub mod render;

// Re-export commonly needed types at crate root for convenience
pub use camera::{CameraSpec, ClipVolume, NavEvent, ProjectionKind};
pub use engine::{DrawSink, Engine};
pub use pipeline::CvvTransform;
pub use scene::{Scene, SceneError};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use wireview::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{CameraSpec, ClipVolume, NavEvent, ProjectionKind};

    // Engine
    pub use crate::engine::{DrawSink, Engine};

    // Scene & models
    pub use crate::model::{Animation, Axis, Model, Shape};
    pub use crate::scene::{Scene, SceneError};

    // Pipeline & clipping
    pub use crate::clip::{clip_line, Outcode};
    pub use crate::pipeline::CvvTransform;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Rendering
    pub use crate::render::Renderer;

    // Window
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}
