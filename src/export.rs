//! Optional post-processing applied after a card is rendered: uniform
//! integer upscaling and a secondary JPG export. Neither is part of the
//! compositor contract.

use std::{fs::File, io::BufWriter, path::{Path, PathBuf}};

use image::{codecs::jpeg::JpegEncoder, imageops};

use crate::error::CardError;
use crate::text::Canvas;

pub const JPG_QUALITY: u8 = 95;

/// Uniform integer upscale with high-quality resampling. Factor 0 or 1 is
/// the identity.
pub fn upscale(img: &Canvas, factor: u32) -> Canvas {
    if factor <= 1 {
        return img.clone();
    }
    imageops::resize(
        img,
        img.width() * factor,
        img.height() * factor,
        imageops::FilterType::Lanczos3,
    )
}

/// Re-encode a saved PNG as a JPG next to it (alpha dropped). Returns the
/// JPG path.
pub fn export_jpg(png_path: &Path, quality: u8) -> Result<PathBuf, CardError> {
    let img = image::open(png_path)
        .map_err(|e| CardError::Asset(format!("failed to reopen {}: {e}", png_path.display())))?
        .to_rgb8();

    let jpg_path = png_path.with_extension("jpg");
    let file = File::create(&jpg_path)?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    img.write_with_encoder(encoder)
        .map_err(|e| CardError::Io(std::io::Error::other(e)))?;
    Ok(jpg_path)
}
