//! Mirror compositing pass.
//!
//! Draws the mirror quad into the main target, sampling the reflection
//! target written earlier in the same frame. The pass takes the
//! [`ReflectionTarget`] as an explicit input when its bind group is built,
//! so the write-before-read dependency is visible in the types rather than
//! implied by call order alone.

use glam::Mat4;
use wgpu::util::DeviceExt;

use glint_core::options::RippleOptions;

use crate::engine::DEPTH_FORMAT;
use crate::reflection_target::ReflectionTarget;

/// Mirror uniforms for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct MirrorUniforms {
    pub mvp: [[f32; 4]; 4],
    pub time: f32,
    pub strength: f32,
    pub frequency: f32,
    pub phase_rate: f32,
    pub displacement_scale: f32,
    pub _pad0: f32,
    pub chroma_r: [f32; 2],
    pub chroma_g: [f32; 2],
    pub chroma_b: [f32; 2],
}

impl MirrorUniforms {
    /// Assembles the mirror uniforms for one frame.
    #[must_use]
    pub fn new(mvp: Mat4, time: f32, ripple: &RippleOptions) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            time,
            strength: ripple.strength,
            frequency: ripple.frequency,
            phase_rate: ripple.phase_rate,
            displacement_scale: ripple.displacement_scale,
            _pad0: 0.0,
            chroma_r: ripple.chroma_offset_r.to_array(),
            chroma_g: ripple.chroma_offset_g.to_array(),
            chroma_b: ripple.chroma_offset_b.to_array(),
        }
    }
}

impl Default for MirrorUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, 0.0, &RippleOptions::default())
    }
}

/// Pipeline and resources for compositing the mirror surface.
pub struct MirrorPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MirrorPass {
    /// Creates the pass against the reflection target it will sample and
    /// the distortion map that perturbs the sampling.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        reflection: &ReflectionTarget,
        distortion_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mirror Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mirror.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mirror Bind Group Layout"),
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
                // Reflection color target
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // Distortion map
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mirror Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mirror Pipeline"),
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
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
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
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mirror Uniform Buffer"),
            contents: bytemuck::cast_slice(&[MirrorUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = Self::build_bind_group(
            device,
            &bind_group_layout,
            &uniform_buffer,
            reflection,
            distortion_view,
            sampler,
        );

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            bind_group,
        }
    }

    /// Rebuilds the bind group after the reflection target was recreated
    /// (viewport resize).
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        reflection: &ReflectionTarget,
        distortion_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) {
        self.bind_group = Self::build_bind_group(
            device,
            &self.bind_group_layout,
            &self.uniform_buffer,
            reflection,
            distortion_view,
            sampler,
        );
    }

    fn build_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        reflection: &ReflectionTarget,
        distortion_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mirror Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&reflection.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(distortion_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Updates the per-frame uniforms.
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &MirrorUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Records the mirror quad into an open render pass.
    pub fn record(&self, render_pass: &mut wgpu::RenderPass<'_>, quad: &crate::buffer::MeshBuffers) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        quad.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_uniforms_size() {
        // mat4 + 6 scalars + 3 vec2, padded to the WGSL layout.
        assert_eq!(std::mem::size_of::<MirrorUniforms>(), 64 + 24 + 24);
    }

    #[test]
    fn test_mirror_uniforms_carry_ripple_options() {
        let ripple = RippleOptions::default();
        let uniforms = MirrorUniforms::new(Mat4::IDENTITY, 2.0, &ripple);
        assert!((uniforms.strength - ripple.strength).abs() < 1e-6);
        assert!((uniforms.frequency - ripple.frequency).abs() < 1e-6);
        assert_eq!(uniforms.chroma_b, ripple.chroma_offset_b.to_array());
    }
}
