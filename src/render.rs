use std::path::Path;

use image::{GrayImage, ImageResult, Luma};

use crate::builder::QR;
use crate::common::error::QRResult;

// Bit matrix
//------------------------------------------------------------------------------

/// Row major pixel matrix, `true` for dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl BitMatrix {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, bits: vec![false; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height, "Pixel ({x}, {y}) out of bounds");
        self.bits[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize) {
        debug_assert!(x < self.width && y < self.height, "Pixel ({x}, {y}) out of bounds");
        self.bits[y * self.width + x] = true;
    }

    /// Sets a `w` by `h` rectangle with its top left corner at (`left`, `top`).
    pub fn set_region(&mut self, left: usize, top: usize, w: usize, h: usize) {
        for y in top..top + h {
            let row = y * self.width;
            self.bits[row + left..row + left + w].fill(true);
        }
    }

    pub fn count_dark(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            if self.get(x as usize, y as usize) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    /// Writes the image, format picked from the path's extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_image().save(path)
    }
}

// Render
//------------------------------------------------------------------------------

/// Scales a finished symbol into at least `width` x `height` pixels. The symbol and
/// its 4 module quiet zone are scaled by the largest whole factor that fits, then
/// centered.
pub fn render_result(qr: &QR, width: usize, height: usize) -> QRResult<BitMatrix> {
    let grid = qr.to_bool_grid()?;
    let input_w = qr.width();
    let qr_w = input_w + (QR::QUIET_ZONE << 1);
    let output_w = width.max(qr_w);
    let output_h = height.max(qr_w);

    let multiple = (output_w / qr_w).min(output_h / qr_w);
    let left_padding = (output_w - input_w * multiple) / 2;
    let top_padding = (output_h - input_w * multiple) / 2;

    let mut output = BitMatrix::new(output_w, output_h);
    for (r, row) in grid.iter().enumerate() {
        for (c, &dark) in row.iter().enumerate() {
            if dark {
                output.set_region(
                    left_padding + c * multiple,
                    top_padding + r * multiple,
                    multiple,
                    multiple,
                );
            }
        }
    }
    Ok(output)
}
