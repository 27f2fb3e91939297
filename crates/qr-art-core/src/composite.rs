//! Alpha compositing and output persistence.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::StyleError;

/// Source-over blend of `layer` onto `background`.
///
/// An opaque layer pixel replaces the background, a fully transparent one
/// leaves it as is.
pub fn composite(background: &RgbaImage, layer: &RgbaImage) -> Result<RgbaImage, StyleError> {
    if background.dimensions() != layer.dimensions() {
        return Err(StyleError::CanvasMismatch {
            expected: background.dimensions(),
            actual: layer.dimensions(),
        });
    }

    let mut out = background.clone();
    image::imageops::overlay(&mut out, layer, 0, 0);
    Ok(out)
}

/// Writes `img` to `path`, format taken from the extension.
///
/// The image is encoded in memory first and lands on disk through a rename,
/// so a failure leaves any existing file at `path` untouched.
pub fn save(img: &RgbaImage, path: &Path) -> Result<(), StyleError> {
    let format = ImageFormat::from_path(path)
        .ok()
        .filter(|f| f.writing_enabled())
        .ok_or_else(|| StyleError::UnsupportedFormat(path.to_path_buf()))?;

    let dynamic = match format {
        // No alpha channel in JPEG
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img.clone()).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img.clone()),
    };

    let mut encoded = Cursor::new(Vec::new());
    dynamic.write_to(&mut encoded, format)?;

    let tmp = temp_path(path);
    if let Err(source) = fs::write(&tmp, encoded.get_ref()).and_then(|_| fs::rename(&tmp, path)) {
        // Either step may leave the temporary file behind
        let _ = fs::remove_file(&tmp);
        return Err(StyleError::Save {
            path: path.to_path_buf(),
            source,
        });
    }

    log::debug!("Wrote {} bytes to {:?} as {:?}", encoded.get_ref().len(), path, format);
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}
