//! Image normalization.
//!
//! Every imported image is reduced to the same shape: decoded, scaled to
//! fit a target canvas while preserving aspect ratio, and composited
//! centered onto a solid-fill canvas of exactly the target size. The
//! short axis gets letterbox bars in the fill color. Everything here is
//! pure Rust via the `image` crate; the canvas is re-encoded as JPEG for
//! storage.

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Default letterbox fill: black.
pub const DEFAULT_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Computes the aspect-preserving size that fits `src` into the target
/// canvas. Images wider than tall fit to the target width; everything
/// else fits to the target height. Dimensions are rounded and clamped to
/// at least one pixel so extreme aspect ratios stay encodable.
pub fn scaled_dimensions(
    src_width: u32,
    src_height: u32,
    target_width: u32,
    target_height: u32,
) -> (u32, u32) {
    let aspect = f64::from(src_width) / f64::from(src_height);
    if aspect > 1.0 {
        let height = (f64::from(target_width) / aspect).round() as u32;
        (target_width, height.max(1))
    } else {
        let width = (f64::from(target_height) * aspect).round() as u32;
        (width.max(1), target_height)
    }
}

/// Decodes `path` and returns it letterboxed onto a `width` x `height`
/// canvas filled with `fill`. The output is always exactly the requested
/// size, 3-channel RGB.
pub fn normalize(path: &Path, width: u32, height: u32, fill: Rgb<u8>) -> Result<RgbImage> {
    let source = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .to_rgb8();

    let (scaled_w, scaled_h) = scaled_dimensions(source.width(), source.height(), width, height);
    let scaled = imageops::resize(&source, scaled_w, scaled_h, FilterType::Lanczos3);

    let mut canvas = RgbImage::from_pixel(width, height, fill);
    // Centering offsets floor toward negative infinity; overlay clips any
    // overhang when the scaled image is larger than the canvas axis.
    let x = (i64::from(width) - i64::from(scaled_w)).div_euclid(2);
    let y = (i64::from(height) - i64::from(scaled_h)).div_euclid(2);
    imageops::overlay(&mut canvas, &scaled, x, y);

    Ok(canvas)
}

/// Re-encodes a normalized canvas as JPEG bytes for storage.
pub fn encode_jpeg(canvas: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    canvas
        .write_to(&mut buf, ImageFormat::Jpeg)
        .context("failed to encode normalized image as JPEG")?;
    Ok(buf.into_inner())
}
