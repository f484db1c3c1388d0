//! The lit scene-object pass.
//!
//! One pipeline pair covers both ways the scene is drawn each frame: the
//! main pass culls back faces on the surface target, the reflection pass
//! culls front faces on the reflection target (a mirrored view inverts
//! triangle winding). The cull mode is baked into each pipeline, so neither
//! pass can leak its culling into the other.

use glam::Mat4;
use wgpu::util::DeviceExt;

use glint_core::options::LightOptions;
use glint_core::FrameTransforms;

use crate::engine::DEPTH_FORMAT;
use crate::reflection_target::REFLECTION_COLOR_FORMAT;

/// Which side of the mirror a draw happens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// The true camera: back faces culled.
    Normal,
    /// The mirrored camera: winding is inverted, so front faces are culled.
    Reflected,
}

impl Winding {
    /// The cull mode this winding requires.
    #[must_use]
    pub fn cull_face(self) -> wgpu::Face {
        match self {
            Winding::Normal => wgpu::Face::Back,
            Winding::Reflected => wgpu::Face::Front,
        }
    }
}

/// Scene uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct SceneUniforms {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub shininess: f32,
    pub light_position: [f32; 3],
    pub _pad0: f32,
    pub ambient_color: [f32; 3],
    pub _pad1: f32,
    pub diffuse_color: [f32; 3],
    pub _pad2: f32,
    pub specular_color: [f32; 3],
    pub _pad3: f32,
}

impl SceneUniforms {
    /// Assembles the uniforms for one draw of the scene object.
    #[must_use]
    pub fn new(frame: &FrameTransforms, model: Mat4, light: &LightOptions) -> Self {
        Self {
            mvp: frame.mvp(model).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            camera_pos: frame.camera_pos.to_array(),
            shininess: light.shininess,
            light_position: light.position.to_array(),
            _pad0: 0.0,
            ambient_color: light.ambient.to_array(),
            _pad1: 0.0,
            diffuse_color: light.diffuse.to_array(),
            _pad2: 0.0,
            specular_color: light.specular.to_array(),
            _pad3: 0.0,
        }
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self::new(
            &FrameTransforms::new(Mat4::IDENTITY, Mat4::IDENTITY, glam::Vec3::ZERO),
            Mat4::IDENTITY,
            &LightOptions::default(),
        )
    }
}

/// Pipelines and layout for drawing the lit scene object.
pub struct ScenePass {
    pipeline_normal: wgpu::RenderPipeline,
    pipeline_reflected: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePass {
    /// Creates the pass; `surface_format` is the main target's color format.
    #[must_use]
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |winding: Winding, format: wgpu::TextureFormat, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[crate::buffer::Vertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(winding.cull_face()),
                    ..wgpu::PrimitiveState::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let pipeline_normal = create_pipeline(Winding::Normal, surface_format, "Scene Pipeline");
        let pipeline_reflected = create_pipeline(
            Winding::Reflected,
            REFLECTION_COLOR_FORMAT,
            "Scene Pipeline (reflected)",
        );

        Self {
            pipeline_normal,
            pipeline_reflected,
            bind_group_layout,
        }
    }

    /// The pipeline matching the given winding (and with it, the matching
    /// render target format).
    #[must_use]
    pub fn pipeline(&self, winding: Winding) -> &wgpu::RenderPipeline {
        match winding {
            Winding::Normal => &self.pipeline_normal,
            Winding::Reflected => &self.pipeline_reflected,
        }
    }

    /// Creates per-view draw resources bound to the environment cubemap.
    ///
    /// The main and reflection passes run in the same submission, so each
    /// needs its own uniform buffer.
    #[must_use]
    pub fn create_draw(
        &self,
        device: &wgpu::Device,
        env_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> SceneDraw {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(env_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        SceneDraw {
            uniform_buffer,
            bind_group,
        }
    }

    /// Records the scene object into an open render pass.
    pub fn record(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        draw: &SceneDraw,
        mesh: &crate::buffer::MeshBuffers,
        winding: Winding,
    ) {
        render_pass.set_pipeline(self.pipeline(winding));
        render_pass.set_bind_group(0, &draw.bind_group, &[]);
        mesh.draw(render_pass);
    }
}

/// Per-view uniform buffer and bind group for the scene object.
pub struct SceneDraw {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SceneDraw {
    /// Updates the uniforms for this view.
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winding_to_cull_face() {
        // The reflected view is the only place front-culling may appear.
        assert_eq!(Winding::Normal.cull_face(), wgpu::Face::Back);
        assert_eq!(Winding::Reflected.cull_face(), wgpu::Face::Front);
    }

    #[test]
    fn test_scene_uniforms_size() {
        // 3 mat4 + 5 padded vec3/vec4 rows, must match the WGSL layout.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 3 * 64 + 5 * 16);
    }

    #[test]
    fn test_scene_uniforms_mvp_composition() {
        let frame = FrameTransforms::perspective(
            1.2,
            1.0,
            0.1,
            100.0,
            glam::Vec3::new(0.0, 1.0, 5.0),
            glam::Vec3::ZERO,
        );
        let model = Mat4::from_rotation_y(0.5);
        let uniforms = SceneUniforms::new(&frame, model, &LightOptions::default());
        let expected = frame.view_proj * model;
        assert_eq!(uniforms.mvp, expected.to_cols_array_2d());
    }
}
