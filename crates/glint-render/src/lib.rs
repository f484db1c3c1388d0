//! Rendering backend for glint-rs.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - GPU resource management (buffers, textures, render targets)
//! - The planar-reflection pipeline: reflection matrix math, the off-screen
//!   reflection target, and the mirror compositing pass
//! - Scene and skybox passes shared by the main and reflection views
//! - Headless frame capture

pub mod buffer;
pub mod capture;
pub mod engine;
pub mod error;
pub mod mirror_pass;
pub mod reflection;
pub mod reflection_target;
pub mod scene_pass;
pub mod skybox_pass;
pub mod textured_pass;
pub mod textures;

pub use buffer::{MeshBuffers, Vertex};
pub use capture::{save_image, CaptureTarget};
pub use engine::{RenderEngine, DEPTH_FORMAT, HEADLESS_FORMAT};
pub use error::{RenderError, RenderResult};
pub use mirror_pass::{MirrorPass, MirrorUniforms};
pub use reflection::{reflect_point, reflection_matrix, surface_reflection_matrix};
pub use reflection_target::{ReflectionTarget, REFLECTION_COLOR_FORMAT};
pub use scene_pass::{SceneDraw, ScenePass, SceneUniforms, Winding};
pub use skybox_pass::{SkyboxDraw, SkyboxPass, SkyboxUniforms};
pub use textured_pass::{TexturedPass, TexturedUniforms};
pub use textures::{
    checkerboard, create_cubemap, linear_clamp_sampler, load_image, noise_map, sky_gradient,
    CubemapFaces, Texture2d,
};
