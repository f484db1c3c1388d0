//! Off-screen target for the reflection pass.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use crate::engine::DEPTH_FORMAT;

/// Color format of the reflection target.
pub const REFLECTION_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Color+depth texture pair the reflection pass renders into and the mirror
/// compositing pass samples.
///
/// Sized at a fraction of the main viewport: the reflection is only ever
/// seen through the rippled mirror, so full resolution buys nothing.
pub struct ReflectionTarget {
    /// Color view, sampled by the mirror pass. Keeps its texture alive.
    pub color_view: wgpu::TextureView,
    /// Depth view, attached during the reflection pass.
    pub depth_view: wgpu::TextureView,
    resolution_factor: f32,
    width: u32,
    height: u32,
}

impl ReflectionTarget {
    /// Creates a target at `resolution_factor` times the viewport size.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        viewport_width: u32,
        viewport_height: u32,
        resolution_factor: f32,
    ) -> Self {
        let (width, height) = scaled_size(viewport_width, viewport_height, resolution_factor);
        let (color_view, depth_view) = create_views(device, width, height);
        Self {
            color_view,
            depth_view,
            resolution_factor,
            width,
            height,
        }
    }

    /// Recreates the textures when the viewport changes size.
    ///
    /// Returns true if the target was recreated; the mirror pass must then
    /// rebuild its bind group against the new color view.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        viewport_width: u32,
        viewport_height: u32,
    ) -> bool {
        let (width, height) = scaled_size(viewport_width, viewport_height, self.resolution_factor);
        if width == self.width && height == self.height {
            return false;
        }
        let (color_view, depth_view) = create_views(device, width, height);
        self.color_view = color_view;
        self.depth_view = depth_view;
        self.width = width;
        self.height = height;
        true
    }

    /// Target width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Begins the render pass that draws the mirrored scene into this
    /// target, clearing color and depth.
    pub fn begin_pass<'a>(&'a self, encoder: &'a mut wgpu::CommandEncoder) -> wgpu::RenderPass<'a> {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Reflection Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        pass.set_viewport(0.0, 0.0, self.width as f32, self.height as f32, 0.0, 1.0);
        pass
    }
}

fn scaled_size(viewport_width: u32, viewport_height: u32, factor: f32) -> (u32, u32) {
    let scale = |v: u32| ((v as f32 * factor) as u32).max(1);
    (scale(viewport_width), scale(viewport_height))
}

// The views hold their textures alive; nothing else reads the textures
// directly.
fn create_views(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::TextureView, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let color_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Reflection Color Target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: REFLECTION_COLOR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Reflection Depth Target"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

    (color_view, depth_view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_size_applies_factor() {
        assert_eq!(scaled_size(1000, 500, 0.6), (600, 300));
    }

    #[test]
    fn test_scaled_size_never_degenerates() {
        assert_eq!(scaled_size(1, 1, 0.6), (1, 1));
        assert_eq!(scaled_size(0, 0, 0.6), (1, 1));
    }
}
