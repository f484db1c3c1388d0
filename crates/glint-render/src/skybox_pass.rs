//! Skybox background pass.
//!
//! Drawn first in every scene view with depth writes off and the depth
//! compare forced to Always, so it sits behind everything without needing a
//! clear-to-sky. No culling: the quad is emitted directly in clip space.

use wgpu::util::DeviceExt;

use glam::Mat4;

use crate::engine::DEPTH_FORMAT;
use crate::reflection_target::REFLECTION_COLOR_FORMAT;
use crate::scene_pass::Winding;

/// Skybox uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyboxUniforms {
    pub view_proj_inverse: [[f32; 4]; 4],
}

impl Default for SkyboxUniforms {
    fn default() -> Self {
        Self {
            view_proj_inverse: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Pipelines and layout for the skybox background.
pub struct SkyboxPass {
    pipeline_surface: wgpu::RenderPipeline,
    pipeline_reflection: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl SkyboxPass {
    /// Creates the pass; `surface_format` is the main target's color format.
    #[must_use]
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/skybox.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
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
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |format: wgpu::TextureFormat, label: &str| {
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
                    cull_mode: None,
                    ..wgpu::PrimitiveState::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let pipeline_surface = create_pipeline(surface_format, "Skybox Pipeline");
        let pipeline_reflection =
            create_pipeline(REFLECTION_COLOR_FORMAT, "Skybox Pipeline (reflection)");

        Self {
            pipeline_surface,
            pipeline_reflection,
            bind_group_layout,
        }
    }

    /// Creates per-view draw resources bound to the environment cubemap.
    #[must_use]
    pub fn create_draw(
        &self,
        device: &wgpu::Device,
        env_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> SkyboxDraw {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SkyboxUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Bind Group"),
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

        SkyboxDraw {
            uniform_buffer,
            bind_group,
        }
    }

    /// Records the skybox into an open render pass.
    pub fn record(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        draw: &SkyboxDraw,
        quad: &crate::buffer::MeshBuffers,
        winding: Winding,
    ) {
        let pipeline = match winding {
            Winding::Normal => &self.pipeline_surface,
            Winding::Reflected => &self.pipeline_reflection,
        };
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &draw.bind_group, &[]);
        quad.draw(render_pass);
    }
}

/// Per-view uniform buffer and bind group for the skybox.
pub struct SkyboxDraw {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SkyboxDraw {
    /// Updates the inverse view-projection for this view.
    pub fn update(&self, queue: &wgpu::Queue, view_proj_inverse: Mat4) {
        let uniforms = SkyboxUniforms {
            view_proj_inverse: view_proj_inverse.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skybox_uniforms_size() {
        assert_eq!(std::mem::size_of::<SkyboxUniforms>(), 64);
    }
}
