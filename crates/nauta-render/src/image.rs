use std::path::Path;

use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::GrayImage;

use nauta_core::error::LtsaError;
use nauta_core::matrix::{LtsaMatrix, MatrixData};
use nauta_ltsa::resample_rows;

/// Presentation resize applied before materializing the image.
#[derive(Clone, Copy, Debug)]
pub enum ResizeSpec {
    /// Nearest-row-index vertical resampling to this many rows.
    Rows(usize),
    /// Interpolated resize to an explicit size.
    Exact {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
}

/// Materialize the matrix as a grayscale image, one pixel per cell, with
/// frequency bin 0 at the BOTTOM row (origin-lower, the spectrogram
/// convention).
///
/// A byte matrix is used directly; a single-precision matrix is mapped
/// through its min/max in a non-destructive copy (the engine's own scaling
/// state is untouched). Non-finite cells land on black.
///
/// # Example
/// ```
/// use nauta_core::matrix::LtsaMatrix;
/// use nauta_render::image::to_gray_image;
/// let img = to_gray_image(&LtsaMatrix::zeros(128, 20));
/// assert_eq!((img.width(), img.height()), (20, 128));
/// ```
#[must_use]
pub fn to_gray_image(matrix: &LtsaMatrix) -> GrayImage {
    let rows = matrix.rows();
    let cols = matrix.cols();
    let mut img = GrayImage::new(cols as u32, rows as u32);

    let byte_at: Box<dyn Fn(usize, usize) -> u8> = match matrix.data() {
        MatrixData::U8(_) => Box::new(|row, col| matrix.value(row, col) as u8),
        MatrixData::F32(_) => {
            let (lo, hi) = matrix.min_max().unwrap_or((0.0, 0.0));
            let span = hi - lo;
            Box::new(move |row, col| {
                let v = matrix.value(row, col);
                if span > 0.0 && v.is_finite() {
                    ((v - lo) * 255.0 / span) as u8
                } else {
                    0
                }
            })
        }
    };

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        // Flip vertically: row 0 is the lowest frequency.
        let row = rows - 1 - y as usize;
        *pixel = image::Luma([byte_at(row, x as usize)]);
    }
    img
}

/// Interpolated resize to an exact size via fast_image_resize.
///
/// # Errors
/// Returns [`LtsaError::Range`] for a zero target dimension, or an error if
/// the resize itself fails.
pub fn resize_exact(img: &GrayImage, width: u32, height: u32) -> Result<GrayImage> {
    if width == 0 || height == 0 {
        return Err(LtsaError::Range(format!("resize out of range: {width}×{height}")).into());
    }
    let src = Image::from_vec_u8(img.width(), img.height(), img.as_raw().clone(), PixelType::U8)
        .context("Invalid source dimensions")?;
    let mut dst = Image::new(width, height, PixelType::U8);

    Resizer::new()
        .resize(&src, &mut dst, Some(&ResizeOptions::new()))
        .context("Resize failed")?;

    GrayImage::from_raw(width, height, dst.buffer().to_vec())
        .context("Resized buffer has wrong size")
}

/// Materialize the matrix with an optional presentation resize.
///
/// # Errors
/// Returns a range error for an out-of-bounds resize target.
pub fn render_image(matrix: &LtsaMatrix, resize: Option<ResizeSpec>) -> Result<GrayImage> {
    match resize {
        None => Ok(to_gray_image(matrix)),
        Some(ResizeSpec::Rows(target)) => {
            let resampled = resample_rows(matrix, target)?;
            Ok(to_gray_image(&resampled))
        }
        Some(ResizeSpec::Exact { width, height }) => {
            resize_exact(&to_gray_image(matrix), width, height)
        }
    }
}

/// Render the matrix to a PNG file.
///
/// # Errors
/// Returns an error on an out-of-bounds resize target or a failed write.
pub fn render_png(matrix: &LtsaMatrix, resize: Option<ResizeSpec>, path: &Path) -> Result<()> {
    let img = render_image(matrix, resize)?;
    img.save(path)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    log::info!("Wrote {}×{} PNG to {}", img.width(), img.height(), path.display());
    Ok(())
}
