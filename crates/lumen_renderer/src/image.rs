//! Floating point pixel buffer and 8-bit encoding.

use std::ops::Range;
use std::path::Path;

use image::{Rgb, RgbImage};
use lumen_math::Color;

use crate::RenderError;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    color
        .to_array()
        .map(|c| (255.0 * clamp_01(linear_to_gamma(c))).round() as u8)
}

/// Row-major image of unclamped linear RGB values, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Add to the pixel at (x, y).
    pub fn add(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] += color;
    }

    /// Multiply every pixel by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for pixel in &mut self.pixels {
            *pixel *= factor;
        }
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::ZERO);
    }

    /// Mean color over the whole image.
    pub fn average(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }

    /// Split into row bands, each paired with its first row and its own
    /// mutable slice of the pixels.
    ///
    /// `bands` must be contiguous, start at row 0 and cover every row.
    pub fn split_bands(
        &mut self,
        bands: &[Range<u32>],
    ) -> Result<Vec<(u32, &mut [Color])>, RenderError> {
        let width = self.width as usize;
        let contiguous = bands.windows(2).all(|pair| pair[0].end == pair[1].start)
            && bands.iter().all(|band| band.start <= band.end);
        let first_row = bands.first().map_or(0, |band| band.start);
        let covered = bands.last().map_or(0, |band| band.end) as usize * width;

        if !contiguous || first_row != 0 || covered != self.pixels.len() {
            return Err(RenderError::BufferSize {
                expected: covered,
                actual: self.pixels.len(),
            });
        }

        let mut rest: &mut [Color] = &mut self.pixels;
        let mut out = Vec::with_capacity(bands.len());
        for band in bands {
            let len = (band.end - band.start) as usize * width;
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
            out.push((band.start, head));
            rest = tail;
        }
        Ok(out)
    }

    /// Encode as 8-bit sRGB-ish RGB (square root gamma, clamped).
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(color_to_rgb(self.get(x, y))))
    }

    /// Save the image; the format is chosen from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        self.to_rgb_image().save(path.as_ref())?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }
}
