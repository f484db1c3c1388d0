//! Core abstractions for glint-rs.
//!
//! This crate provides the CPU-side types shared by the renderer and the
//! demo applications:
//! - Per-frame transform state ([`FrameTransforms`]) recomputed every tick
//! - Animation math for the orbiting camera and the spinning scene objects
//! - Ripple/distortion math mirrored by the mirror compositing shader
//! - Configuration options and procedural demo geometry

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs carry many tuning knobs
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod options;
pub mod ripple;

pub use animation::{
    gem_model_matrix, mirror_model_matrix, mirror_swing_angle, orbit_position, scene_time,
    tumble_model_matrix,
};
pub use error::{GlintError, Result};
pub use frame::FrameTransforms;
pub use geometry::MeshData;
pub use options::{LightOptions, RippleOptions, SceneOptions, TexturedOptions};
pub use ripple::{chromatic_offsets, displacement, ripple_offset};

// Re-export glam types for convenience
pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
