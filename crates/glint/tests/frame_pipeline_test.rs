//! CPU-side integration tests for the frame pipeline.
//!
//! Everything here runs without a GPU: the pass schedule, the reflection
//! math driven by the real mirror animation, the skybox unprojection, and
//! the mirror compositing reference math.

use glint::{PassKind, Vec2, Vec3, PASS_SCHEDULE};
use glint_core::{
    mirror_model_matrix, orbit_position, ripple, FrameTransforms, RippleOptions, SceneOptions,
};
use glint_render::{reflect_point, surface_reflection_matrix, Winding};

#[test]
fn reflection_pass_runs_before_its_readers() {
    assert_eq!(PASS_SCHEDULE[0], PassKind::Reflection);
    let mirror_at = PASS_SCHEDULE
        .iter()
        .position(|p| *p == PassKind::MirrorComposite)
        .unwrap();
    let reflection_at = PASS_SCHEDULE
        .iter()
        .position(|p| *p == PassKind::Reflection)
        .unwrap();
    assert!(reflection_at < mirror_at);
}

#[test]
fn culling_is_back_outside_the_reflection_pass() {
    // Walk the schedule like the frame driver does: the cull mode a pass
    // draws with is derived from its winding, and only the reflection pass
    // flips it. Whatever passes precede or follow it draw back-culled.
    for pass in PASS_SCHEDULE {
        let expected = match pass {
            PassKind::Reflection => wgpu::Face::Front,
            _ => wgpu::Face::Back,
        };
        assert_eq!(pass.winding().cull_face(), expected);
    }
    assert_eq!(Winding::Normal.cull_face(), wgpu::Face::Back);
}

#[test]
fn animated_mirror_reflection_stays_an_involution() {
    // The reflection matrix is recomputed every frame from the animated
    // mirror transform; reflecting twice must return the original point at
    // every sampled timestamp.
    let probe = Vec3::new(1.3, 0.7, -2.1);
    for i in 0..200 {
        let time = i as f32 * 0.41;
        let mirror_model = mirror_model_matrix(time);
        let reflection = surface_reflection_matrix(mirror_model, Vec3::Y);

        let twice = reflect_point(reflection, reflect_point(reflection, probe));
        assert!(
            (twice - probe).length() < 1e-3,
            "involution broke at t={time}"
        );

        // Affine bottom row survives the animated transform.
        let bottom = reflection.row(3);
        assert_eq!(bottom, glam::Vec4::new(0.0, 0.0, 0.0, 1.0));
    }
}

#[test]
fn reflected_camera_sits_behind_the_mirror() {
    // At t=0 the mirror hangs below the scene; the reflected camera must
    // land on the other side of its plane, not on the camera's side.
    let options = SceneOptions::default();
    let camera = orbit_position(options.orbit_start, 0.0);
    let mirror_model = mirror_model_matrix(0.0);
    let reflection = surface_reflection_matrix(mirror_model, Vec3::Y);
    let reflected = reflect_point(reflection, camera);

    assert!(reflected.y < camera.y);
    // And reflecting back recovers the camera.
    assert!((reflect_point(reflection, reflected) - camera).length() < 1e-4);
}

#[test]
fn skybox_unprojection_matches_look_direction() {
    // Orbit radius 5 camera at t=0, fov pi/2.5: unprojecting the skybox
    // vertex at clip (0,0,1,1) must give the forward-look direction.
    let options = SceneOptions::default();
    let camera = orbit_position(options.orbit_start, 0.0);
    let frame = FrameTransforms::perspective(
        options.fov,
        16.0 / 9.0,
        options.near,
        options.far,
        camera,
        options.look_target,
    );

    let unprojected = frame.view_proj_inverse * glam::Vec4::new(0.0, 0.0, 1.0, 1.0);
    let world_point = unprojected.truncate() / unprojected.w;
    let direction = (world_point - camera).normalize();
    let forward = (options.look_target - camera).normalize();
    assert!((direction - forward).length() < 1e-4);
}

#[test]
fn mirror_composite_passes_uniform_color_through() {
    // With a detail-free reflection the chromatic split must reassemble
    // the input color exactly, whatever the distortion map contains.
    let ripple_options = RippleOptions::default();
    let color = Vec3::new(0.62, 0.4, 0.11);
    for i in 0..50 {
        let uv = Vec2::new((i % 10) as f32 * 0.1, (i / 10) as f32 * 0.2);
        let out = ripple::composite(
            uv,
            i as f32 * 0.9,
            &ripple_options,
            |p| Vec2::new((p.x * 7.0).sin().abs(), (p.y * 5.0).cos().abs()),
            |_| color,
        );
        assert!((out - color).length() < 1e-6);
    }
}
