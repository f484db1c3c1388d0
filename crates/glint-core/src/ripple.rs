//! Mirror surface distortion math.
//!
//! CPU reference of the mirror compositing shader: the WGSL fragment stage
//! evaluates exactly these formulas with the [`RippleOptions`] values it
//! receives as uniforms. Keeping the math here makes the compositing
//! behavior testable without a GPU.

use glam::{Vec2, Vec3};

use crate::options::RippleOptions;

/// Time-varying sinusoidal UV offset simulating surface ripple.
///
/// Independent cosine/sine terms on each axis; each axis is driven by the
/// *other* axis's coordinate so the ripple shears instead of pulsing.
#[must_use]
pub fn ripple_offset(uv: Vec2, time: f32, options: &RippleOptions) -> Vec2 {
    let phase = time * options.phase_rate;
    uv + Vec2::new(
        ((uv.y + phase) * options.frequency).cos() * options.strength,
        ((uv.x + phase) * options.frequency).sin() * options.strength,
    )
}

/// Displacement derived from a distortion-map sample.
///
/// The map's red/green channels arrive in [0,1]; remap to [-0.5,0.5] and
/// scale, yielding a small signed UV push.
#[must_use]
pub fn displacement(map_rg: Vec2, options: &RippleOptions) -> Vec2 {
    (map_rg - Vec2::splat(0.5)) * options.displacement_scale
}

/// The three chromatic-aberration sample offsets (red, green, blue).
#[must_use]
pub fn chromatic_offsets(options: &RippleOptions) -> [Vec2; 3] {
    [
        options.chroma_offset_r,
        options.chroma_offset_g,
        options.chroma_offset_b,
    ]
}

/// Full compositing path: ripple, distortion-map displacement, then three
/// chromatically offset reflection samples combined channel-wise.
///
/// `distortion_map` returns the RG channels of the distortion texture;
/// `reflection` returns the RGB of the reflection target. UVs handed to the
/// samplers may leave [0,1]; edge behavior is the sampler's concern.
pub fn composite(
    uv: Vec2,
    time: f32,
    options: &RippleOptions,
    distortion_map: impl Fn(Vec2) -> Vec2,
    reflection: impl Fn(Vec2) -> Vec3,
) -> Vec3 {
    let rippled = ripple_offset(uv, time, options);
    let displaced = uv + displacement(distortion_map(rippled), options);

    let [off_r, off_g, off_b] = chromatic_offsets(options);
    let r = reflection(displaced + off_r).x;
    let g = reflection(displaced + off_g).y;
    let b = reflection(displaced + off_b).z;
    Vec3::new(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ripple_offset_amplitude_bounded() {
        let options = RippleOptions::default();
        for i in 0..100 {
            let uv = Vec2::new(i as f32 * 0.01, (99 - i) as f32 * 0.01);
            let out = ripple_offset(uv, i as f32 * 0.3, &options);
            let delta = out - uv;
            assert!(delta.x.abs() <= options.strength + 1e-6);
            assert!(delta.y.abs() <= options.strength + 1e-6);
        }
    }

    #[test]
    fn test_displacement_remap_is_signed() {
        let options = RippleOptions::default();
        // Mid-gray maps to zero displacement.
        assert!(displacement(Vec2::splat(0.5), &options).length() < 1e-6);
        // Full white pushes positive, full black negative, symmetric.
        let white = displacement(Vec2::splat(1.0), &options);
        let black = displacement(Vec2::splat(0.0), &options);
        assert!((white + black).length() < 1e-6);
        assert!((white.x - 0.5 * options.displacement_scale).abs() < 1e-6);
    }

    #[test]
    fn test_composite_collapses_for_uniform_reflection() {
        // With no detail in the reflection, the three chromatic samples all
        // read the same color and must reassemble it exactly.
        let options = RippleOptions::default();
        let color = Vec3::new(0.3, 0.55, 0.8);
        for i in 0..25 {
            let uv = Vec2::new(i as f32 * 0.04, 1.0 - i as f32 * 0.04);
            let out = composite(
                uv,
                i as f32 * 1.7,
                &options,
                |p| Vec2::new(p.x.fract().abs(), p.y.fract().abs()),
                |_| color,
            );
            assert!((out - color).length() < 1e-6);
        }
    }

    #[test]
    fn test_composite_samples_through_distortion_map() {
        // A reflection that encodes its sample position in the red channel
        // must show the displacement applied by a non-neutral map.
        let options = RippleOptions::default();
        let uv = Vec2::new(0.5, 0.5);
        let out = composite(
            uv,
            0.0,
            &options,
            |_| Vec2::splat(1.0),
            |p| Vec3::new(p.x, p.y, 0.0),
        );
        let expected_x = uv.x + 0.5 * options.displacement_scale + options.chroma_offset_r.x;
        assert!((out.x - expected_x).abs() < 1e-6);
    }
}
