//! Source images read from disk and prepared for upload.

use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Image formats the service accepts as inline data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// What a source image is used as in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The room photo to transform.
    Source,
    /// The room before redesign.
    Before,
    /// The room after redesign.
    After,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "input"),
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
        }
    }
}

/// An image loaded from disk, decoded once to validate it.
#[derive(Debug, Clone)]
pub struct SourceImage {
    path: PathBuf,
    data: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Reads and decodes the image at `path`.
    ///
    /// PNG, JPEG and WebP files are kept byte for byte. Any other format the
    /// `image` crate can decode is re-encoded as PNG.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StudioError::InputNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(path, data)
    }

    fn from_bytes(path: &Path, data: Vec<u8>) -> Result<Self> {
        let undecodable = |source| StudioError::UndecodableInput {
            path: path.to_path_buf(),
            source,
        };

        let decoded = image::ImageReader::new(Cursor::new(&data))
            .with_guessed_format()?
            .decode()
            .map_err(undecodable)?;
        let (width, height) = (decoded.width(), decoded.height());

        let (data, format) = match ImageFormat::from_magic_bytes(&data) {
            Some(format) => (data, format),
            None => {
                let mut png = Vec::new();
                decoded
                    .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                    .map_err(undecodable)?;
                (png, ImageFormat::Png)
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
            format,
            width,
            height,
        })
    }

    /// Path the image was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes that will be uploaded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Format of the uploaded bytes.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Decoded `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the file's modification time as fractional seconds since the
    /// Unix epoch.
    pub fn modified_timestamp(&self) -> Result<String> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        let secs = modified
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_else(|e| -e.duration().as_secs_f64());
        Ok(epoch_seconds(secs))
    }
}

/// Renders seconds the way a float literal reads: `1700000000.0`, not
/// `1700000000`.
fn epoch_seconds(secs: f64) -> String {
    let text = secs.to_string();
    if secs.is_finite() && secs.fract() == 0.0 {
        format!("{text}.0")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_load_png_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room.png");
        image::RgbImage::new(4, 3).save(&path).unwrap();

        let source = SourceImage::load(&path).unwrap();
        assert_eq!(source.dimensions(), (4, 3));
        assert_eq!(source.format(), ImageFormat::Png);
        assert_eq!(source.data(), std::fs::read(&path).unwrap().as_slice());
    }

    #[test]
    fn test_load_bmp_is_reencoded_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("room.bmp");
        image::RgbImage::new(5, 2).save(&path).unwrap();

        let source = SourceImage::load(&path).unwrap();
        assert_eq!(source.dimensions(), (5, 2));
        assert_eq!(source.format(), ImageFormat::Png);
        assert_eq!(
            ImageFormat::from_magic_bytes(source.data()),
            Some(ImageFormat::Png)
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceImage::load(dir.path().join("nope.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
    }

    #[test]
    fn test_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = SourceImage::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
    }

    #[test]
    fn test_epoch_seconds_keeps_decimal_point() {
        assert_eq!(epoch_seconds(1_700_000_000.0), "1700000000.0");
        assert_eq!(epoch_seconds(1_700_000_000.25), "1700000000.25");
    }

    #[test]
    fn test_modified_timestamp_is_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("after.png");
        image::RgbImage::new(1, 1).save(&path).unwrap();

        let stamp = SourceImage::load(&path)
            .unwrap()
            .modified_timestamp()
            .unwrap();
        assert!(!stamp.is_empty());
        assert!(stamp.parse::<f64>().unwrap() > 0.0);
    }
}
