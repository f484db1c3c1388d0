//! Texture and cubemap creation.
//!
//! Images come from two sources: decoded files in a local `images/`
//! directory, or the procedural generators at the bottom of this module so
//! the demos run without any assets on disk.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::path::Path;

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// A 2D texture with its default view.
pub struct Texture2d {
    /// The GPU texture.
    pub texture: wgpu::Texture,
    /// Default view over the whole texture.
    pub view: wgpu::TextureView,
}

impl Texture2d {
    /// Uploads a decoded RGBA image as a 2D texture.
    #[must_use]
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &RgbaImage,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: img.width(),
            height: img.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            img.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * img.width()),
                rows_per_image: Some(img.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// The six face images of a cubemap, all square and equally sized.
pub struct CubemapFaces {
    /// +X, -X, +Y, -Y, +Z, -Z in wgpu layer order.
    pub faces: [RgbaImage; 6],
}

impl CubemapFaces {
    /// Face file names looked up by [`CubemapFaces::load_dir`].
    pub const FILE_NAMES: [&'static str; 6] =
        ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

    /// Loads the six faces from a directory containing
    /// `px/nx/py/ny/pz/nz.png`.
    pub fn load_dir(dir: impl AsRef<Path>) -> RenderResult<Self> {
        let dir = dir.as_ref();
        let mut faces = Vec::with_capacity(6);
        for name in Self::FILE_NAMES {
            faces.push(load_image(dir.join(name))?);
        }
        let faces: [RgbaImage; 6] = faces
            .try_into()
            .map_err(|_| RenderError::TextureCreationFailed("cubemap face count".into()))?;
        Self::new(faces)
    }

    /// Wraps six face images, checking they are square and equally sized.
    pub fn new(faces: [RgbaImage; 6]) -> RenderResult<Self> {
        let side = faces[0].width();
        for face in &faces {
            if face.width() != side || face.height() != side {
                return Err(RenderError::TextureCreationFailed(format!(
                    "cubemap faces must be square and equal, got {}x{}",
                    face.width(),
                    face.height()
                )));
            }
        }
        Ok(Self { faces })
    }

    /// Edge length of each face.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.faces[0].width()
    }
}

/// Uploads six face images as a cubemap texture with a cube view.
#[must_use]
pub fn create_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    faces: &CubemapFaces,
    label: &str,
) -> Texture2d {
    let side = faces.side();
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: side,
            height: side,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, face) in faces.faces.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            face.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * side),
                rows_per_image: Some(side),
            },
            wgpu::Extent3d {
                width: side,
                height: side,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..wgpu::TextureViewDescriptor::default()
    });

    Texture2d { texture, view }
}

/// Decodes an image file to RGBA8.
pub fn load_image(path: impl AsRef<Path>) -> RenderResult<RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| RenderError::AssetLoad {
        path: path.display().to_string(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// A linear clamp-to-edge sampler; reflection and distortion sampling rely
/// on clamping for out-of-range UVs.
#[must_use]
pub fn linear_clamp_sampler(device: &wgpu::Device, label: &str) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Generates a two-color checkerboard, used by the texturing demo.
#[must_use]
pub fn checkerboard(side: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let cell = (side / cells.max(1)).max(1);
    RgbaImage::from_fn(side, side, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            image::Rgba(a)
        } else {
            image::Rgba(b)
        }
    })
}

/// Generates a vertical gradient face for a procedural sky cubemap.
#[must_use]
pub fn sky_gradient(side: u32, zenith: [u8; 4], horizon: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(side, side, |_, y| {
        let t = y as f32 / (side - 1).max(1) as f32;
        let lerp = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t) as u8;
        image::Rgba([
            lerp(zenith[0], horizon[0]),
            lerp(zenith[1], horizon[1]),
            lerp(zenith[2], horizon[2]),
            255,
        ])
    })
}

/// Generates a smooth random distortion map.
///
/// Random gradients on a coarse lattice, bilinearly interpolated so the
/// mirror displacement reads as ripples rather than static.
#[must_use]
pub fn noise_map(side: u32, lattice: u32) -> RgbaImage {
    use rand::Rng;

    let lattice = lattice.max(2);
    let mut rng = rand::thread_rng();
    let knots: Vec<(f32, f32)> = (0..lattice * lattice)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();
    let knot = |x: u32, y: u32| knots[(y % lattice * lattice + x % lattice) as usize];

    RgbaImage::from_fn(side, side, |x, y| {
        let fx = x as f32 / side as f32 * lattice as f32;
        let fy = y as f32 / side as f32 * lattice as f32;
        let (x0, y0) = (fx as u32, fy as u32);
        let (tx, ty) = (fx.fract(), fy.fract());

        let blend = |c: fn((f32, f32)) -> f32| {
            let top = c(knot(x0, y0)) * (1.0 - tx) + c(knot(x0 + 1, y0)) * tx;
            let bottom = c(knot(x0, y0 + 1)) * (1.0 - tx) + c(knot(x0 + 1, y0 + 1)) * tx;
            top * (1.0 - ty) + bottom * ty
        };

        image::Rgba([
            (blend(|k| k.0) * 255.0) as u8,
            (blend(|k| k.1) * 255.0) as u8,
            128,
            255,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_alternates() {
        let img = checkerboard(8, 4, [255, 0, 0, 255], [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(2, 0).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(2, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let img = sky_gradient(16, [10, 20, 30, 255], [200, 210, 220, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(img.get_pixel(0, 15).0, [200, 210, 220, 255]);
    }

    #[test]
    fn test_noise_map_blue_channel_is_neutral() {
        // Only RG drive the displacement; B stays at mid-gray.
        let img = noise_map(16, 4);
        assert!(img.pixels().all(|p| p.0[2] == 128));
    }

    #[test]
    fn test_cubemap_faces_rejects_mismatched_sizes() {
        let mut faces = Vec::new();
        for _ in 0..5 {
            faces.push(RgbaImage::new(4, 4));
        }
        faces.push(RgbaImage::new(8, 8));
        let faces: [RgbaImage; 6] = faces.try_into().unwrap();
        assert!(CubemapFaces::new(faces).is_err());
    }

    #[test]
    fn test_load_image_missing_file_is_asset_error() {
        let err = load_image("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, RenderError::AssetLoad { .. }));
    }
}
