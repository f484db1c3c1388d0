//! Configuration options for the demo scenes.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Options for the mirror scene.
///
/// Defaults reproduce the shipped demo; everything here is uploaded to the
/// GPU as uniforms or consumed by the frame driver, so tweaking a value
/// changes the next frame without any re-setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneOptions {
    /// Vertical field of view in radians.
    pub fov: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Milliseconds-to-scene-time scale applied to the host timestamp.
    pub time_scale: f32,

    /// Camera orbit start position, rotated about +Y over time.
    pub orbit_start: Vec3,

    /// Orbit angular rate in radians per scene-time unit.
    pub orbit_rate: f32,

    /// Look-at target of the orbiting camera.
    pub look_target: Vec3,

    /// Off-screen reflection target resolution as a fraction of the
    /// viewport. The reflection is only ever seen through the rippled
    /// mirror surface, so it tolerates a reduced resolution.
    pub reflection_resolution_factor: f32,

    /// Positional light parameters for the primary object.
    pub light: LightOptions,

    /// Mirror ripple/distortion parameters.
    pub ripple: RippleOptions,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::PI / 2.5,
            near: 0.1,
            far: 100.0,
            time_scale: 0.004,
            orbit_start: Vec3::new(0.0, 1.0, 5.0),
            orbit_rate: 0.1,
            look_target: Vec3::new(0.0, -0.5, 0.0),
            reflection_resolution_factor: 0.6,
            light: LightOptions::default(),
            ripple: RippleOptions::default(),
        }
    }
}

/// Positional light evaluated per pixel: ambient + Lambertian diffuse +
/// specular, with the base color sampled from the environment cubemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightOptions {
    /// Light position in world space.
    pub position: Vec3,
    /// Ambient term color.
    pub ambient: Vec3,
    /// Diffuse term color.
    pub diffuse: Vec3,
    /// Specular term color.
    pub specular: Vec3,
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for LightOptions {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            ambient: Vec3::new(1.0, 0.0, 0.0),
            diffuse: Vec3::new(10.0, 1.0, 1.0),
            specular: Vec3::new(13.0, 2.0, 2.0),
            shininess: 1.0,
        }
    }
}

/// Parameters of the mirror surface distortion.
///
/// The same numbers drive both the WGSL mirror shader (via uniforms) and the
/// reference math in [`crate::ripple`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RippleOptions {
    /// Amplitude of the sinusoidal UV offset.
    pub strength: f32,
    /// Spatial frequency of the sinusoidal field.
    pub frequency: f32,
    /// Scene-time multiplier for the ripple phase.
    pub phase_rate: f32,
    /// Scale applied to the distortion-map displacement after remapping
    /// its RG channels from [0,1] to [-0.5,0.5].
    pub displacement_scale: f32,
    /// UV offset of the red chromatic-aberration sample.
    pub chroma_offset_r: Vec2,
    /// UV offset of the green chromatic-aberration sample.
    pub chroma_offset_g: Vec2,
    /// UV offset of the blue chromatic-aberration sample.
    pub chroma_offset_b: Vec2,
}

impl Default for RippleOptions {
    fn default() -> Self {
        Self {
            strength: 0.13,
            frequency: 20.0,
            phase_rate: 0.1,
            displacement_scale: 0.07,
            chroma_offset_r: Vec2::new(0.2, 0.2),
            chroma_offset_g: Vec2::ZERO,
            chroma_offset_b: Vec2::new(-0.4, -0.4),
        }
    }
}

/// Options for the texturing scene (spinning two-texture cube + skybox).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TexturedOptions {
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Milliseconds-to-scene-time scale.
    pub time_scale: f32,
    /// Camera orbit start position.
    pub orbit_start: Vec3,
    /// Orbit angular rate in radians per scene-time unit.
    pub orbit_rate: f32,
    /// Blend factor between the two textures.
    pub blend: f32,
}

impl Default for TexturedOptions {
    fn default() -> Self {
        Self {
            fov: std::f32::consts::FRAC_PI_2,
            near: 0.1,
            far: 100.0,
            time_scale: 0.003,
            orbit_start: Vec3::new(0.0, 0.5, 2.0),
            orbit_rate: 0.05,
            blend: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_options_defaults() {
        let options = SceneOptions::default();
        assert!((options.fov - std::f32::consts::PI / 2.5).abs() < 1e-6);
        assert!((options.reflection_resolution_factor - 0.6).abs() < 1e-6);
        assert_eq!(options.orbit_start, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(options.look_target, Vec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_ripple_defaults_match_shader_constants() {
        let ripple = RippleOptions::default();
        assert!((ripple.strength - 0.13).abs() < 1e-6);
        assert!((ripple.frequency - 20.0).abs() < 1e-6);
        assert!((ripple.displacement_scale - 0.07).abs() < 1e-6);
        assert_eq!(ripple.chroma_offset_g, Vec2::ZERO);
    }

    #[test]
    fn test_options_round_trip_json() {
        let options = SceneOptions::default();
        let json = serde_json::to_string(&options).unwrap();
        let back: SceneOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.light.position, options.light.position);
        assert!((back.ripple.strength - options.ripple.strength).abs() < 1e-6);
    }
}
