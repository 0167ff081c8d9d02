//! PNG encoding and decoding of canvases

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::errors::EncodeError;
use crate::log::debug;
use crate::render::Canvas;
use crate::types::Color;

/// Row-major RGB8 image of the canvas.
pub fn to_image(canvas: &Canvas) -> RgbImage {
    let width = canvas.width();
    let pixels = canvas.pixels();
    RgbImage::from_fn(width, canvas.height(), |x, y| {
        Rgb(pixels[(y * width + x) as usize].to_array())
    })
}

/// Canvas holding the pixels of `image`.
pub fn from_image(image: &RgbImage) -> Result<Canvas, EncodeError> {
    let pixels = image
        .pixels()
        .map(|&Rgb([r, g, b])| Color::rgb(r, g, b))
        .collect();
    Ok(Canvas::from_pixels(image.width(), image.height(), pixels)?)
}

/// Write `canvas` to `path` as a PNG file.
pub fn save_png(canvas: &Canvas, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    debug!(path = %path.display(), width = canvas.width(), height = canvas.height(), "writing png");
    to_image(canvas)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| EncodeError::Write {
            path: path.display().to_string(),
            source,
        })
}

/// Read a PNG file into a canvas. Any alpha channel is discarded.
pub fn load_png(path: impl AsRef<Path>) -> Result<Canvas, EncodeError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| EncodeError::Read {
        path: path.display().to_string(),
        source,
    })?;
    from_image(&image.to_rgb8())
}
