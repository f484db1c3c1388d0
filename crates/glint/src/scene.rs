//! Scene assembly and per-frame pass orchestration.
//!
//! A scene owns its GPU resources (meshes, textures, passes, the reflection
//! target) and re-derives every transform from the frame timestamp on each
//! tick. The mirror scene runs the fixed three-pass schedule; the textured
//! scene is a single pass with different constants.

use glam::Vec3;
use image::RgbaImage;

use glint_core::{
    gem_model_matrix, mirror_model_matrix, orbit_position, scene_time, tumble_model_matrix,
    FrameTransforms, SceneOptions, TexturedOptions,
};
use glint_render::{
    create_cubemap, linear_clamp_sampler, noise_map, sky_gradient, CubemapFaces, MeshBuffers,
    MirrorPass, MirrorUniforms, ReflectionTarget, RenderEngine, SceneDraw, ScenePass,
    SceneUniforms, SkyboxDraw, SkyboxPass, Texture2d, TexturedPass, TexturedUniforms, Winding,
};

/// The passes of one mirror-scene frame, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Mirrored scene into the off-screen reflection target.
    Reflection,
    /// Skybox + gem into the frame's target.
    Main,
    /// Mirror quad sampling the reflection target.
    MirrorComposite,
}

impl PassKind {
    /// The winding side this pass draws from.
    #[must_use]
    pub fn winding(self) -> Winding {
        match self {
            PassKind::Reflection => Winding::Reflected,
            PassKind::Main | PassKind::MirrorComposite => Winding::Normal,
        }
    }
}

/// Fixed frame schedule. The reflection pass must run first: it writes the
/// target the compositing pass samples later in the same submission.
pub const PASS_SCHEDULE: [PassKind; 3] =
    [PassKind::Reflection, PassKind::Main, PassKind::MirrorComposite];

/// A demo scene driven by the frame loop.
pub trait Scene {
    /// Renders one frame into `target`. `millis` is the host timestamp in
    /// milliseconds since the loop started.
    fn render(&mut self, engine: &RenderEngine, target: &wgpu::TextureView, millis: f32);

    /// Reacts to a viewport resize.
    fn resize(&mut self, engine: &RenderEngine);
}

/// The mirror demo: orbiting camera, spinning gem, swinging mirror with a
/// rippled, chromatically-aberrated reflection.
pub struct MirrorScene {
    options: SceneOptions,
    gem: MeshBuffers,
    quad: MeshBuffers,
    scene_pass: ScenePass,
    skybox_pass: SkyboxPass,
    mirror_pass: MirrorPass,
    reflection_target: ReflectionTarget,
    scene_draw_main: SceneDraw,
    scene_draw_reflected: SceneDraw,
    skybox_draw_main: SkyboxDraw,
    skybox_draw_reflected: SkyboxDraw,
    distortion: Texture2d,
    sampler: wgpu::Sampler,
    // Kept alive for the bind groups sampling it.
    _environment: Texture2d,
}

impl MirrorScene {
    /// Builds the scene from a decoded environment cubemap and distortion
    /// map.
    #[must_use]
    pub fn new(
        engine: &RenderEngine,
        options: SceneOptions,
        environment_faces: &CubemapFaces,
        distortion_map: &RgbaImage,
    ) -> Self {
        let device = &engine.device;
        let queue = &engine.queue;

        let gem = MeshBuffers::new(device, &glint_core::geometry::gem(8), "gem mesh");
        let quad = MeshBuffers::new(device, &glint_core::geometry::plane(), "plane mesh");

        let environment = create_cubemap(device, queue, environment_faces, "environment cubemap");
        let distortion = Texture2d::from_image(device, queue, distortion_map, "distortion map");
        let sampler = linear_clamp_sampler(device, "scene sampler");

        let scene_pass = ScenePass::new(device, engine.surface_format());
        let skybox_pass = SkyboxPass::new(device, engine.surface_format());
        let reflection_target = ReflectionTarget::new(
            device,
            engine.width(),
            engine.height(),
            options.reflection_resolution_factor,
        );
        let mirror_pass = MirrorPass::new(
            device,
            engine.surface_format(),
            &reflection_target,
            &distortion.view,
            &sampler,
        );

        // The reflection and main views draw in the same submission, so
        // each gets its own uniform slot.
        let scene_draw_main = scene_pass.create_draw(device, &environment.view, &sampler);
        let scene_draw_reflected = scene_pass.create_draw(device, &environment.view, &sampler);
        let skybox_draw_main = skybox_pass.create_draw(device, &environment.view, &sampler);
        let skybox_draw_reflected = skybox_pass.create_draw(device, &environment.view, &sampler);

        log::info!(
            "mirror scene ready: reflection target {}x{}",
            reflection_target.width(),
            reflection_target.height()
        );

        Self {
            options,
            gem,
            quad,
            scene_pass,
            skybox_pass,
            mirror_pass,
            reflection_target,
            scene_draw_main,
            scene_draw_reflected,
            skybox_draw_main,
            skybox_draw_reflected,
            distortion,
            sampler,
            _environment: environment,
        }
    }

    /// Builds the scene with generated textures: a gradient sky cubemap and
    /// a noise distortion map.
    #[must_use]
    pub fn procedural(engine: &RenderEngine, options: SceneOptions) -> Self {
        let faces = procedural_sky();
        let distortion = noise_map(256, 8);
        Self::new(engine, options, &faces, &distortion)
    }

    /// Scene options currently in effect.
    #[must_use]
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }
}

impl Scene for MirrorScene {
    fn render(&mut self, engine: &RenderEngine, target: &wgpu::TextureView, millis: f32) {
        let options = &self.options;
        let time = scene_time(millis, options.time_scale);

        // Per-frame transforms, recomputed from scratch (the projection
        // picks up viewport resizes, the rest is animation).
        let camera_pos = orbit_position(options.orbit_start, time * options.orbit_rate);
        let frame = FrameTransforms::perspective(
            options.fov,
            engine.aspect_ratio(),
            options.near,
            options.far,
            camera_pos,
            options.look_target,
        );
        let gem_model = gem_model_matrix(time);
        let mirror_model = mirror_model_matrix(time);

        let reflection = glint_render::surface_reflection_matrix(mirror_model, Vec3::Y);
        let reflected_frame = frame.reflected(reflection);

        self.scene_draw_reflected.update(
            &engine.queue,
            &SceneUniforms::new(&reflected_frame, gem_model, &options.light),
        );
        self.skybox_draw_reflected
            .update(&engine.queue, reflected_frame.view_proj_inverse);
        self.scene_draw_main.update(
            &engine.queue,
            &SceneUniforms::new(&frame, gem_model, &options.light),
        );
        self.skybox_draw_main
            .update(&engine.queue, frame.view_proj_inverse);
        self.mirror_pass.update(
            &engine.queue,
            &MirrorUniforms::new(frame.mvp(mirror_model), time, &options.ripple),
        );

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Mirror Scene Encoder"),
            });

        for pass in PASS_SCHEDULE {
            match pass {
                PassKind::Reflection => {
                    let mut render_pass = self.reflection_target.begin_pass(&mut encoder);
                    self.skybox_pass.record(
                        &mut render_pass,
                        &self.skybox_draw_reflected,
                        &self.quad,
                        pass.winding(),
                    );
                    self.scene_pass.record(
                        &mut render_pass,
                        &self.scene_draw_reflected,
                        &self.gem,
                        pass.winding(),
                    );
                }
                PassKind::Main => {
                    let mut render_pass = begin_target_pass(
                        &mut encoder,
                        target,
                        &engine.depth_view,
                        wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        "Main Pass",
                    );
                    self.skybox_pass.record(
                        &mut render_pass,
                        &self.skybox_draw_main,
                        &self.quad,
                        pass.winding(),
                    );
                    self.scene_pass.record(
                        &mut render_pass,
                        &self.scene_draw_main,
                        &self.gem,
                        pass.winding(),
                    );
                }
                PassKind::MirrorComposite => {
                    let mut render_pass = begin_target_pass(
                        &mut encoder,
                        target,
                        &engine.depth_view,
                        wgpu::LoadOp::Load,
                        "Mirror Composite Pass",
                    );
                    self.mirror_pass.record(&mut render_pass, &self.quad);
                }
            }
        }

        engine.queue.submit(std::iter::once(encoder.finish()));
    }

    fn resize(&mut self, engine: &RenderEngine) {
        let recreated =
            self.reflection_target
                .resize(&engine.device, engine.width(), engine.height());
        if recreated {
            self.mirror_pass.rebind(
                &engine.device,
                &self.reflection_target,
                &self.distortion.view,
                &self.sampler,
            );
        }
    }
}

/// The texturing demo: a tumbling cube blending two textures, in front of
/// a skybox.
pub struct TexturedScene {
    options: TexturedOptions,
    cube: MeshBuffers,
    quad: MeshBuffers,
    textured_pass: TexturedPass,
    skybox_pass: SkyboxPass,
    skybox_draw: SkyboxDraw,
    _base: Texture2d,
    _overlay: Texture2d,
    _environment: Texture2d,
}

impl TexturedScene {
    /// Builds the scene from two decoded blend textures and a cubemap.
    #[must_use]
    pub fn new(
        engine: &RenderEngine,
        options: TexturedOptions,
        base_image: &RgbaImage,
        overlay_image: &RgbaImage,
        environment_faces: &CubemapFaces,
    ) -> Self {
        let device = &engine.device;
        let queue = &engine.queue;

        let cube = MeshBuffers::new(device, &glint_core::geometry::cube(), "cube mesh");
        let quad = MeshBuffers::new(device, &glint_core::geometry::plane(), "plane mesh");

        let base = Texture2d::from_image(device, queue, base_image, "base texture");
        let overlay = Texture2d::from_image(device, queue, overlay_image, "overlay texture");
        let environment = create_cubemap(device, queue, environment_faces, "environment cubemap");
        let sampler = linear_clamp_sampler(device, "textured sampler");

        let textured_pass = TexturedPass::new(
            device,
            engine.surface_format(),
            &base.view,
            &overlay.view,
            &sampler,
        );
        let skybox_pass = SkyboxPass::new(device, engine.surface_format());
        let skybox_draw = skybox_pass.create_draw(device, &environment.view, &sampler);

        Self {
            options,
            cube,
            quad,
            textured_pass,
            skybox_pass,
            skybox_draw,
            _base: base,
            _overlay: overlay,
            _environment: environment,
        }
    }

    /// Builds the scene with generated checkerboard textures and sky.
    #[must_use]
    pub fn procedural(engine: &RenderEngine, options: TexturedOptions) -> Self {
        let base = glint_render::checkerboard(256, 8, [235, 225, 200, 255], [90, 70, 60, 255]);
        let overlay = glint_render::checkerboard(256, 32, [120, 60, 160, 255], [40, 20, 70, 255]);
        let faces = procedural_sky();
        Self::new(engine, options, &base, &overlay, &faces)
    }
}

impl Scene for TexturedScene {
    fn render(&mut self, engine: &RenderEngine, target: &wgpu::TextureView, millis: f32) {
        let options = &self.options;
        let time = scene_time(millis, options.time_scale);

        let camera_pos = orbit_position(options.orbit_start, time * options.orbit_rate);
        let frame = FrameTransforms::perspective(
            options.fov,
            engine.aspect_ratio(),
            options.near,
            options.far,
            camera_pos,
            Vec3::ZERO,
        );
        let model = tumble_model_matrix(time);

        self.skybox_draw
            .update(&engine.queue, frame.view_proj_inverse);
        self.textured_pass.update(
            &engine.queue,
            &TexturedUniforms {
                mvp: frame.mvp(model).to_cols_array_2d(),
                blend: options.blend,
                _pad: [0.0; 3],
            },
        );

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Textured Scene Encoder"),
            });
        {
            let mut render_pass = begin_target_pass(
                &mut encoder,
                target,
                &engine.depth_view,
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                "Textured Pass",
            );
            self.skybox_pass
                .record(&mut render_pass, &self.skybox_draw, &self.quad, Winding::Normal);
            self.textured_pass.record(&mut render_pass, &self.cube);
        }
        engine.queue.submit(std::iter::once(encoder.finish()));
    }

    fn resize(&mut self, _engine: &RenderEngine) {}
}

/// Gradient sky faces for scenes without cubemap assets on disk.
fn procedural_sky() -> CubemapFaces {
    let side = 256;
    let zenith = [25, 40, 95, 255];
    let horizon = [190, 150, 120, 255];
    let faces = [
        sky_gradient(side, zenith, horizon),
        sky_gradient(side, zenith, horizon),
        sky_gradient(side, zenith, zenith),
        sky_gradient(side, horizon, horizon),
        sky_gradient(side, zenith, horizon),
        sky_gradient(side, zenith, horizon),
    ];
    CubemapFaces::new(faces).expect("generated faces share one size")
}

fn begin_target_pass<'a>(
    encoder: &'a mut wgpu::CommandEncoder,
    target: &'a wgpu::TextureView,
    depth_view: &'a wgpu::TextureView,
    color_load: wgpu::LoadOp<wgpu::Color>,
    label: &str,
) -> wgpu::RenderPass<'a> {
    let depth_load = match color_load {
        wgpu::LoadOp::Clear(_) => wgpu::LoadOp::Clear(1.0),
        wgpu::LoadOp::Load => wgpu::LoadOp::Load,
    };
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: color_load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_view,
            depth_ops: Some(wgpu::Operations {
                load: depth_load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_schedule_order() {
        // The reflection target is written by the first pass and read by
        // the last; the order is load-bearing.
        assert_eq!(
            PASS_SCHEDULE,
            [PassKind::Reflection, PassKind::Main, PassKind::MirrorComposite]
        );
    }

    #[test]
    fn test_only_the_reflection_pass_flips_winding() {
        assert_eq!(PassKind::Reflection.winding(), Winding::Reflected);
        assert_eq!(PassKind::Main.winding(), Winding::Normal);
        assert_eq!(PassKind::MirrorComposite.winding(), Winding::Normal);
        // Front-face culling therefore begins and ends with the
        // reflection pass.
        assert_eq!(PassKind::Main.winding().cull_face(), wgpu::Face::Back);
        assert_eq!(
            PassKind::Reflection.winding().cull_face(),
            wgpu::Face::Front
        );
    }
}
