//! Planar reflection utilities.

use glam::{Mat3, Mat4, Vec3, Vec4};

/// Computes a reflection matrix for a plane.
///
/// The plane is defined by a point on the plane and its normal.
/// The resulting matrix reflects points across this plane. The normal is
/// normalized here; a zero-length normal is the caller's error and yields
/// a matrix of NaNs.
#[must_use]
pub fn reflection_matrix(plane_point: Vec3, plane_normal: Vec3) -> Mat4 {
    let n = plane_normal.normalize();
    let d = -plane_point.dot(n);

    // Reflection matrix formula:
    // | 1-2nx²   -2nxny   -2nxnz   -2nxd |
    // | -2nxny   1-2ny²   -2nynz   -2nyd |
    // | -2nxnz   -2nynz   1-2nz²   -2nzd |
    // |    0        0        0       1   |

    Mat4::from_cols(
        Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0),
        Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0),
        Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
        Vec4::new(-2.0 * n.x * d, -2.0 * n.y * d, -2.0 * n.z * d, 1.0),
    )
}

/// Computes the reflection matrix for an animated mirror surface.
///
/// `local_normal` is the mirror's plane normal in model space; it is carried
/// to world space with the inverse-transpose of the model's linear part (so
/// non-uniform scale keeps it perpendicular), and the model's translation
/// serves as the point on the plane.
#[must_use]
pub fn surface_reflection_matrix(mirror_model: Mat4, local_normal: Vec3) -> Mat4 {
    let normal_matrix = Mat3::from_mat4(mirror_model).inverse().transpose();
    let world_normal = (normal_matrix * local_normal).normalize();
    let plane_point = mirror_model.w_axis.truncate();
    reflection_matrix(plane_point, world_normal)
}

/// Reflects a world-space point, e.g. the camera position for the
/// reflection pass's lighting.
#[must_use]
pub fn reflect_point(reflection: Mat4, point: Vec3) -> Vec3 {
    reflection.transform_point3(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reflection_matrix_identity_at_origin() {
        let mat = reflection_matrix(Vec3::ZERO, Vec3::Y);

        // Point above plane should reflect below
        let point = Vec3::new(1.0, 2.0, 3.0);
        let reflected = mat.transform_point3(point);

        assert!((reflected.x - point.x).abs() < 0.001);
        assert!((reflected.y - (-point.y)).abs() < 0.001);
        assert!((reflected.z - point.z).abs() < 0.001);
    }

    #[test]
    fn test_reflection_bottom_row_is_affine() {
        let mat = reflection_matrix(Vec3::new(0.3, -1.2, 4.0), Vec3::new(0.2, 0.9, -0.4));
        assert_eq!(mat.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_point_on_plane_is_fixed() {
        let plane_point = Vec3::new(1.0, -1.5, 0.5);
        let normal = Vec3::new(0.0, 1.0, 0.3).normalize();
        let mat = reflection_matrix(plane_point, normal);

        // Any point on the plane: the plane point itself and one offset
        // along an in-plane direction.
        let in_plane = normal.cross(Vec3::X).normalize();
        for p in [plane_point, plane_point + in_plane * 2.7] {
            let reflected = mat.transform_point3(p);
            assert!((reflected - p).length() < 1e-4);
        }
    }

    #[test]
    fn test_surface_reflection_follows_model_orientation() {
        // A mirror tilted 90 degrees about X turns its +Y local normal into
        // world +Z; reflecting across it must flip Z around the plane.
        let model = Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let mat = surface_reflection_matrix(model, Vec3::Y);
        let reflected = mat.transform_point3(Vec3::new(0.0, 0.0, 2.0));
        assert!((reflected - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-4);
    }

    #[test]
    fn test_surface_reflection_handles_nonuniform_scale() {
        // Non-uniform scale must not bend the plane normal: scaling X leaves
        // a +Y-normal mirror's plane horizontal.
        let model = Mat4::from_scale(Vec3::new(3.0, 1.0, 0.5))
            * Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
        let mat = surface_reflection_matrix(model, Vec3::Y);
        let reflected = mat.transform_point3(Vec3::new(1.0, 1.0, 1.0));
        // Plane sits at y = -1, so y = 1 lands at y = -3.
        assert!((reflected - Vec3::new(1.0, -3.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_reflected_camera_position() {
        let mirror = Mat4::from_translation(Vec3::new(0.0, -1.5, 0.0));
        let mat = surface_reflection_matrix(mirror, Vec3::Y);
        let eye = Vec3::new(0.0, 1.0, 5.0);
        let reflected = reflect_point(mat, eye);
        assert!((reflected - Vec3::new(0.0, -4.0, 5.0)).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_reflection_is_involution(
            px in -5.0f32..5.0,
            py in -5.0f32..5.0,
            pz in -5.0f32..5.0,
            nx in -1.0f32..1.0,
            ny in -1.0f32..1.0,
            nz in -1.0f32..1.0,
        ) {
            let normal = Vec3::new(nx, ny, nz);
            prop_assume!(normal.length() > 0.1);

            let mat = reflection_matrix(Vec3::new(px, py, pz), normal);
            let double = mat * mat;
            prop_assert!(double.abs_diff_eq(Mat4::IDENTITY, 1e-3));
        }

        #[test]
        fn prop_reflection_preserves_plane_points(
            px in -5.0f32..5.0,
            py in -5.0f32..5.0,
            pz in -5.0f32..5.0,
            nx in -1.0f32..1.0,
            ny in -1.0f32..1.0,
            nz in -1.0f32..1.0,
            t in -3.0f32..3.0,
        ) {
            let normal = Vec3::new(nx, ny, nz);
            prop_assume!(normal.length() > 0.1);
            let n = normal.normalize();
            let plane_point = Vec3::new(px, py, pz);

            // Walk along an in-plane direction from the plane point.
            let axis = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
            let in_plane = n.cross(axis).normalize();
            let p = plane_point + in_plane * t;

            let mat = reflection_matrix(plane_point, normal);
            prop_assert!((mat.transform_point3(p) - p).length() < 1e-3);
        }
    }
}
