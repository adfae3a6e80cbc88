use std::path::Path;

use anyhow::Result;
use sa_core::error::{ConvertError, Stage};
use sa_core::frame::FrameBuffer;

/// Charge une image (PNG, JPEG, BMP, GIF) en RGBA.
///
/// # Errors
/// Returns [`ConvertError::Decode`] (image stage) if the file cannot be
/// opened or decoded.
///
/// # Example
/// ```no_run
/// use sa_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.jpg")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        ConvertError::decode(
            Stage::Image,
            format!("Impossible de charger {}: {e}", path.display()),
        )
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("load_image: {width}x{height} — {}", path.display());
    Ok(FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_png_as_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("px.png");
        image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();
        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(2, 1), (10, 20, 30, 255));
    }

    #[test]
    fn missing_file_is_a_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("absent.png")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::Decode { stage: Stage::Image, .. })
        ));
    }

    #[test]
    fn garbage_bytes_are_a_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(load_image(&path).is_err());
    }
}
