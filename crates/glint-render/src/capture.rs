//! Frame capture for headless rendering.
//!
//! Renders go into a [`CaptureTarget`] texture instead of a surface; the
//! pixels are then copied into a mapped buffer and read back as RGBA8.

use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::engine::{RenderEngine, HEADLESS_FORMAT};
use crate::error::{RenderError, RenderResult};

/// Render target standing in for the window surface in headless mode.
pub struct CaptureTarget {
    /// The color texture rendered into.
    pub texture: wgpu::Texture,
    /// Default view over the texture.
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl CaptureTarget {
    /// Creates a capture target matching the engine's configured size.
    #[must_use]
    pub fn new(engine: &RenderEngine) -> Self {
        let width = engine.width();
        let height = engine.height();
        let texture = engine.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Capture Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HEADLESS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Reads the rendered pixels back as tightly packed RGBA8 rows.
    ///
    /// Blocks until the GPU finishes; copy rows are 256-byte aligned on the
    /// wire and unpadded here.
    pub fn read_pixels(&self, engine: &RenderEngine) -> RenderResult<Vec<u8>> {
        let bytes_per_row = 4 * self.width;
        let padded_bytes_per_row = bytes_per_row.div_ceil(256) * 256;

        let buffer = engine.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Readback Buffer"),
            size: u64::from(padded_bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        engine.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        engine.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| RenderError::Capture("map_async callback dropped".into()))?
            .map_err(|e| RenderError::Capture(format!("buffer map failed: {e:?}")))?;

        let mapped = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((bytes_per_row * self.height) as usize);
        for row in mapped.chunks_exact(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..bytes_per_row as usize]);
        }
        drop(mapped);
        buffer.unmap();

        Ok(pixels)
    }
}

/// Saves tightly packed RGBA8 pixel data to a PNG or JPEG file.
pub fn save_image(
    path: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
) -> RenderResult<()> {
    let path = path.as_ref();
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, data.to_vec())
            .ok_or_else(|| RenderError::Capture("pixel data does not match dimensions".into()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => img.save_with_format(path, image::ImageFormat::Png)?,
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        other => {
            return Err(RenderError::Capture(format!(
                "unsupported image format: {other}"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_image_rejects_wrong_dimensions() {
        let err = save_image("out.png", &[0u8; 8], 4, 4).unwrap_err();
        assert!(matches!(err, RenderError::Capture(_)));
    }

    #[test]
    fn test_save_image_rejects_unknown_extension() {
        let data = vec![0u8; 4 * 2 * 2];
        let err = save_image("out.bmp3", &data, 2, 2).unwrap_err();
        assert!(matches!(err, RenderError::Capture(_)));
    }
}
