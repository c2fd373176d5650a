//! Headless PNG snapshot of the surface pattern.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use jovian_shading::ShaderParams;
use jovian_shading::pattern::render_equirect;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot width must be between 2 and 8192, got {0}")]
    InvalidWidth(u32),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Widest snapshot accepted, matching the common GPU texture limit.
pub const MAX_SNAPSHOT_WIDTH: u32 = 8192;

/// Equirectangular image dimensions for a snapshot `width` pixels wide.
pub fn snapshot_size(width: u32) -> Result<(u32, u32), SnapshotError> {
    if !(2..=MAX_SNAPSHOT_WIDTH).contains(&width) {
        return Err(SnapshotError::InvalidWidth(width));
    }
    Ok((width, width / 2))
}

/// Encode RGBA8 pixels as PNG.
pub fn encode_png(
    writer: impl std::io::Write,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<(), SnapshotError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;
    Ok(())
}

/// Render the pattern at `time` and write it to `path`. Returns the size.
pub fn write_snapshot(
    path: &Path,
    params: &ShaderParams,
    time: f32,
    width: u32,
) -> Result<(u32, u32), SnapshotError> {
    let (width, height) = snapshot_size(width)?;
    let pixels = render_equirect(params, time, width, height);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    encode_png(file, width, height, &pixels)?;

    tracing::info!(path = %path.display(), width, height, "Snapshot written");
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_size() {
        assert_eq!(snapshot_size(512).unwrap(), (512, 256));
        assert_eq!(snapshot_size(MAX_SNAPSHOT_WIDTH).unwrap(), (8192, 4096));
        assert!(matches!(
            snapshot_size(1),
            Err(SnapshotError::InvalidWidth(1))
        ));
    }

    #[test]
    fn test_oversized_width_rejected_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let result = write_snapshot(&path, &ShaderParams::default(), 0.0, 50_000);
        assert!(matches!(result, Err(SnapshotError::InvalidWidth(50_000))));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_snapshot_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("planet.png");
        let size = write_snapshot(&path, &ShaderParams::default(), 0.0, 32).unwrap();
        assert_eq!(size, (32, 16));

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (32, 16));
        assert_eq!(info.color_type, png::ColorType::Rgba);
    }
}
