//! Per-frame transform state.
//!
//! One [`FrameTransforms`] value is recomputed from scratch every tick by
//! the frame driver and passed explicitly into each render pass. Nothing in
//! here survives a frame; the only cross-frame GPU state is the reflection
//! target itself.

use glam::{Mat4, Vec3};

/// The camera-dependent matrices shared by every pass in a frame.
///
/// Invariants: `view_proj == proj * view` and `view_proj_inverse` is its
/// inverse. Model-dependent products are derived on demand through
/// [`FrameTransforms::mvp`] so the multiplication order
/// (projection x view x model) is fixed in one place.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransforms {
    /// Perspective projection.
    pub proj: Mat4,
    /// World-to-camera view matrix.
    pub view: Mat4,
    /// `proj * view`.
    pub view_proj: Mat4,
    /// Inverse of `view_proj`, used by the skybox to reconstruct view rays.
    pub view_proj_inverse: Mat4,
    /// Camera position in world space.
    pub camera_pos: Vec3,
}

impl FrameTransforms {
    /// Builds frame transforms from a projection, a view matrix, and the
    /// camera's world position.
    #[must_use]
    pub fn new(proj: Mat4, view: Mat4, camera_pos: Vec3) -> Self {
        let view_proj = proj * view;
        Self {
            proj,
            view,
            view_proj,
            view_proj_inverse: view_proj.inverse(),
            camera_pos,
        }
    }

    /// Builds frame transforms for a perspective camera looking at `target`.
    #[must_use]
    pub fn perspective(
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
        camera_pos: Vec3,
        target: Vec3,
    ) -> Self {
        let proj = Mat4::perspective_rh(fov, aspect, near, far);
        let view = Mat4::look_at_rh(camera_pos, target, Vec3::Y);
        Self::new(proj, view, camera_pos)
    }

    /// Model-view-projection product for the given model matrix.
    #[must_use]
    pub fn mvp(&self, model: Mat4) -> Mat4 {
        self.view_proj * model
    }

    /// Derives the transforms seen by the mirrored camera.
    ///
    /// The reflected view is `view * reflection` and the camera position is
    /// carried through the reflection as a point, so lighting in the
    /// reflection pass is evaluated from the mirrored eye.
    #[must_use]
    pub fn reflected(&self, reflection: Mat4) -> Self {
        Self::new(
            self.proj,
            self.view * reflection,
            reflection.transform_point3(self.camera_pos),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_proj_composition_order() {
        let t = FrameTransforms::perspective(
            std::f32::consts::FRAC_PI_2,
            1.5,
            0.1,
            100.0,
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::ZERO,
        );
        let expected = t.proj * t.view;
        assert!((t.view_proj - expected).abs_diff_eq(Mat4::ZERO, 1e-6));
    }

    #[test]
    fn test_view_proj_inverse_round_trip() {
        let t = FrameTransforms::perspective(
            std::f32::consts::PI / 2.5,
            16.0 / 9.0,
            0.1,
            100.0,
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::new(0.0, -0.5, 0.0),
        );
        let round_trip = t.view_proj * t.view_proj_inverse;
        assert!(round_trip.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_mvp_uses_fixed_order() {
        let t = FrameTransforms::perspective(
            1.0,
            1.0,
            0.1,
            100.0,
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::ZERO,
        );
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let expected = t.proj * t.view * model;
        assert!((t.mvp(model) - expected).abs_diff_eq(Mat4::ZERO, 1e-6));
    }

    #[test]
    fn test_skybox_center_ray_matches_look_direction() {
        // Orbit camera at time zero: position (0,1,5) looking at (0,-0.5,0).
        // Unprojecting the skybox vertex at clip (0,0,1,1) must land on the
        // far-plane point straight ahead of the camera.
        let camera_pos = Vec3::new(0.0, 1.0, 5.0);
        let target = Vec3::new(0.0, -0.5, 0.0);
        let t = FrameTransforms::perspective(
            std::f32::consts::PI / 2.5,
            16.0 / 9.0,
            0.1,
            100.0,
            camera_pos,
            target,
        );

        let clip = glam::Vec4::new(0.0, 0.0, 1.0, 1.0);
        let world = t.view_proj_inverse * clip;
        let world_point = world.truncate() / world.w;
        let direction = (world_point - camera_pos).normalize();
        let forward = (target - camera_pos).normalize();
        assert!((direction - forward).length() < 1e-4);
    }
}
