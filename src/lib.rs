//! # Beachside
//!
//! **A procedurally animated beach scene built from a matrix stack and keyframe windows.**
//!
//! A character on a palm-tree island catches a falling coconut, sips from it through a
//! straw and throws it away, while the camera sweeps around the scene. Everything is
//! modelled from four primitives (cube, sphere, cylinder, cone) placed by a hierarchical
//! [`MatrixStack`] and posed by [`Timeline`]s of eased animation windows.
//!
//! ## Quick Start
//!
//! ```no_run
//! use beachside::AppConfig;
//!
//! fn main() -> beachside::Result<()> {
//!     beachside::run(AppConfig::new().title("Beach").textures("assets/textures"))
//! }
//! ```
//!
//! ## Headless composition
//!
//! The scene draws through the [`Renderer`] trait, so a frame can be recorded and
//! inspected without a GPU:
//!
//! ```
//! use beachside::{BeachScene, DrawList, FrameTime, Material, Painter, ViewAngles};
//!
//! let scene = BeachScene::new()?;
//! let mut painter = Painter::new(DrawList::new());
//! scene.compose(&mut painter, FrameTime { elapsed: 0.0, cycle: 0.0 }, ViewAngles::ZERO);
//! assert_eq!(painter.renderer().count_material(Material::Water), 1);
//! # Ok::<(), beachside::TimelineError>(())
//! ```
//!
//! ## Layout
//!
//! - [`matrix_stack`](MatrixStack), [`ease`] and [`Timeline`] are the animation core.
//! - [`Painter`] wraps the stack with save/transform/draw/restore shape drawing.
//! - [`scene`] holds the beach itself; [`BeachScene::compose`] draws one frame.
//! - [`run`] opens a window and renders with wgpu through [`MeshPass`].

mod app;
mod camera;
mod clock;
mod drag_controller;
mod easing;
mod error;
mod gpu;
mod input;
mod material;
mod matrix_stack;
mod mesh;
mod mesh_pass;
mod painter;
mod primitive;
pub mod scene;
mod texture;
mod timeline;
mod view;

pub use app::{AppConfig, run};
pub use camera::Camera;
pub use clock::{CYCLE_SECONDS, FrameTime, SceneClock};
pub use drag_controller::DragController;
pub use easing::{Ease, ease};
pub use error::{Error, Result};
pub use gpu::GpuContext;
pub use input::Input;
pub use material::{Color, Material, MaterialTable, Program};
pub use matrix_stack::{MatrixStack, SavedTransform};
pub use mesh::{Mesh, PrimitiveMeshes, Vertex3d};
pub use mesh_pass::{CameraUniforms, MeshPass, ModelUniforms};
pub use painter::{DrawCommand, DrawList, Painter, Renderer};
pub use primitive::{Geometry, Primitive, TAPER_AMOUNT};
pub use scene::{BeachScene, CameraRig, keyframe};
pub use texture::{MaterialTexture, Texture};
pub use timeline::{
    AnimationWindow, Phase, Pose, Sample, Timeline, TimelineBuilder, TimelineError,
    TimelineOptions,
};
pub use view::{MAX_TILT, ViewAngles, ViewPreset};

// Re-export math types so callers don't need a direct glam dependency.
pub use glam::{Mat4, Vec2, Vec3};
