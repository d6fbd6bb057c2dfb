//! Upload image preparation
//!
//! Materializes a caller-provided file path into bytes ready for a multipart
//! upload: decode, resize, re-encode. Profile photos become a fixed square;
//! covers keep their aspect ratio under a size cap. PNG input stays PNG,
//! everything else is re-encoded as JPEG.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};

/// Square edge for profile photo uploads
pub const PROFILE_PHOTO_SIZE: u32 = 280;

/// Covers larger than this on either edge are scaled down
const MAX_COVER_DIMENSION: u32 = 800;

const JPEG_QUALITY: u8 = 90;

/// An image materialized for upload
#[derive(Debug, Clone)]
pub struct UploadImage {
    /// File name sent in the multipart part
    pub file_name: String,
    /// MIME type of the encoded bytes
    pub mime: &'static str,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

/// Prepare a profile photo: scaled to a [`PROFILE_PHOTO_SIZE`] square
pub fn prepare_profile_photo(path: &Path) -> Result<UploadImage> {
    let (image, keep_png) = load(path, "Invalid file")?;
    let resized = image.resize_exact(PROFILE_PHOTO_SIZE, PROFILE_PHOTO_SIZE, FilterType::Triangle);
    encode(path, &resized, keep_png)
}

/// Prepare a post cover: aspect ratio preserved, capped at [`MAX_COVER_DIMENSION`]
pub fn prepare_cover(path: &Path) -> Result<UploadImage> {
    let (image, keep_png) = load(path, "Invalid cover image")?;
    let resized = resize_if_needed(image);
    encode(path, &resized, keep_png)
}

/// Read and decode the file, reporting precondition errors with the
/// operation's noun ("Invalid file" vs "Invalid cover image")
fn load(path: &Path, noun: &str) -> Result<(DynamicImage, bool)> {
    let len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if len == 0 {
        return Err(Error::precondition(format!(
            "{noun}: File is empty or does not exist"
        )));
    }

    let reader = ImageReader::open(path)
        .map_err(|e| Error::precondition(format!("{noun}: {e}")))?
        .with_guessed_format()
        .map_err(|e| Error::precondition(format!("{noun}: {e}")))?;

    let keep_png = reader.format() == Some(ImageFormat::Png);

    let image = reader
        .decode()
        .map_err(|e| Error::precondition(format!("{noun}: could not decode image ({e})")))?;

    Ok((image, keep_png))
}

fn encode(path: &Path, image: &DynamicImage, keep_png: bool) -> Result<UploadImage> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");

    let mut bytes = Vec::new();
    if keep_png {
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| Error::precondition(format!("Failed to encode image: {e}")))?;

        Ok(UploadImage {
            file_name: format!("{stem}.png"),
            mime: "image/png",
            bytes,
        })
    } else {
        // JPEG has no alpha channel
        let mut cursor = Cursor::new(&mut bytes);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        image
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| Error::precondition(format!("Failed to encode image: {e}")))?;

        Ok(UploadImage {
            file_name: format!("{stem}.jpg"),
            mime: "image/jpeg",
            bytes,
        })
    }
}

/// Resize image if it's too large (to keep uploads small).
fn resize_if_needed(image: DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());

    if width <= MAX_COVER_DIMENSION && height <= MAX_COVER_DIMENSION {
        return image;
    }

    // Calculate new dimensions maintaining aspect ratio
    let ratio = f64::from(width) / f64::from(height);
    let (new_width, new_height) = if width > height {
        (
            MAX_COVER_DIMENSION,
            (f64::from(MAX_COVER_DIMENSION) / ratio) as u32,
        )
    } else {
        (
            (f64::from(MAX_COVER_DIMENSION) * ratio) as u32,
            MAX_COVER_DIMENSION,
        )
    };

    image.resize(new_width, new_height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        DynamicImage::new_rgb8(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn profile_photo_becomes_fixed_square() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "avatar.png", 10, 30);

        let upload = prepare_profile_photo(&path).unwrap();
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.file_name, "avatar.png");

        let decoded = image::load_from_memory(&upload.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (PROFILE_PHOTO_SIZE, PROFILE_PHOTO_SIZE));
    }

    #[test]
    fn small_cover_keeps_its_dimensions() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "cover.png", 40, 20);

        let upload = prepare_cover(&path).unwrap();
        let decoded = image::load_from_memory(&upload.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn oversized_cover_is_capped_preserving_aspect() {
        let dir = tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 1600, 800);

        let upload = prepare_cover(&path).unwrap();
        let decoded = image::load_from_memory(&upload.bytes).unwrap();
        assert_eq!(decoded.width(), 800);
        assert_eq!(decoded.height(), 400);
    }

    #[test]
    fn missing_file_is_a_precondition_error() {
        let dir = tempdir().unwrap();
        let err = prepare_cover(&dir.path().join("nope.png")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid cover image: File is empty or does not exist"
        );
    }
}
