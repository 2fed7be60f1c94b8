//! Raster encoding and persistent storage

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;

use image::RgbaImage;

use crate::config::OutputFormat;

/// Somewhere encoded images can be written
pub trait Storage {
    /// Write `bytes` to `path`, returning the locator of the stored file
    fn write(&self, bytes: Vec<u8>, path: PathBuf) -> impl Future<Output = io::Result<PathBuf>> + Send;
}

/// Local filesystem storage
///
/// Bytes go to a temporary file next to the destination which is then
/// renamed over it, so readers see either the old file or the new one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    async fn write(&self, bytes: Vec<u8>, path: PathBuf) -> io::Result<PathBuf> {
        tokio::task::spawn_blocking(move || write_atomic(&bytes, path))
            .await
            .map_err(io::Error::other)?
    }
}

fn write_atomic(bytes: &[u8], path: PathBuf) -> io::Result<PathBuf> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut file = tempfile::Builder::new()
        .prefix(".stickerpea-")
        .suffix(".part")
        .tempfile_in(&dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(&path).map_err(|e| e.error)?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Encode an image in the configured format
pub fn encode(img: &RgbaImage, format: OutputFormat) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Png => write_png(&mut buffer, img).map_err(io::Error::other)?,
        OutputFormat::Jpeg { quality } => write_jpeg(&mut buffer, img, quality)?,
    }
    Ok(buffer)
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

fn write_jpeg<W: io::Write>(w: W, image: &RgbaImage, quality: u8) -> io::Result<()> {
    // JPEG has no alpha channel
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(w, quality.clamp(1, 100));
    encoder.encode_image(&rgb).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(8, 6, |x, y| image::Rgba([x as u8 * 30, y as u8 * 40, 90, 255]))
    }

    #[test]
    fn test_png_is_lossless() {
        let img = sample();
        let bytes = encode(&img, OutputFormat::Png).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_jpeg_encodes() {
        let bytes = encode(&sample(), OutputFormat::Jpeg { quality: 85 }).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[tokio::test]
    async fn test_fs_write_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("composition.png");

        let first = FsStorage.write(b"first".to_vec(), path.clone()).await.unwrap();
        let second = FsStorage.write(b"second".to_vec(), path.clone()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // No temporary files left behind
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_fs_write_into_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let result = FsStorage.write(b"data".to_vec(), blocker.join("out.png")).await;
        assert!(result.is_err());
    }
}
