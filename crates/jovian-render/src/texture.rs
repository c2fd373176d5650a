//! Image loading and RGBA texture upload.

use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

/// Errors from loading or uploading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// Decoded 8-bit RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// Wrap raw pixels, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                actual: pixels.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A 1x1 opaque white image.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }
}

/// Decode a PNG or JPEG file into RGBA8.
pub fn load_rgba_image(path: &Path) -> Result<RgbaImage, TextureError> {
    let decoded = image::open(path).map_err(|source| TextureError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Loaded image {} ({width}x{height})", path.display());
    RgbaImage::new(width, height, rgba.into_raw())
}

/// Upload `image` as a single-mip sRGB texture and return it with its view.
pub fn create_rgba_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &RgbaImage,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.pixels,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_device;

    #[test]
    fn test_size_validation() {
        assert!(RgbaImage::new(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            RgbaImage::new(2, 2, vec![0; 15]),
            Err(TextureError::DataSizeMismatch { expected: 16, .. })
        ));
        assert!(matches!(
            RgbaImage::new(0, 4, vec![]),
            Err(TextureError::ZeroDimensions { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_rgba_image(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(TextureError::Load { .. })));
    }

    #[test]
    fn test_load_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirt.png");
        let pixels: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 10) as u8).collect();
        image::save_buffer(&path, &pixels, 3, 2, image::ExtendedColorType::Rgba8).unwrap();

        let loaded = load_rgba_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels, pixels);
    }

    #[test]
    fn test_upload_white() {
        let Some((device, queue)) = create_test_device() else {
            return;
        };
        let (texture, _view) = create_rgba_texture(&device, &queue, "white", &RgbaImage::white());
        assert_eq!(texture.width(), 1);
        assert_eq!(texture.format(), wgpu::TextureFormat::Rgba8UnormSrgb);
    }
}
