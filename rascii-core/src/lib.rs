//! RASCII Core Library - Software rendering of scene graphs to luminance
//!
//! This library provides the stateless core of the renderer: linear algebra,
//! transforms, meshes, the scene graph, the pixel surface and rasterizer, and
//! the render pipeline that ties them together. It performs no I/O.

pub mod error;
pub mod math;
pub mod transform;
pub mod geometry;
pub mod scene;
pub mod surface;
pub mod raster;
pub mod projection;
pub mod pipeline;

// Re-export commonly used types
pub use error::{Error, Result};
pub use math::{Mat4, Mat4Ext, Quat, QuatExt, Vec4, Vec4Ext};
pub use transform::Transform;
pub use geometry::{Mesh, Triangle, Vertex, Winding};
pub use scene::{NodeId, SceneGraph, SceneNode};
pub use surface::{Color, Surface};
pub use raster::Rasterizer;
pub use projection::{Camera, Projected, Projector, RenderSettings};
pub use pipeline::{FrameStats, RenderMode, RenderOptions, RenderPipeline};
