//! Accumulated image storage and 8-bit conversion.

use ember_math::{Color, Interval};

/// Intensity range kept after gamma; 0.999 keeps `256 * c` below 256.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Convert a summed pixel color to 8-bit RGB.
///
/// Divides by the sample count, applies gamma 2 (square root), clamps to
/// [0, 0.999] and scales by 256 with truncation.
pub fn color_to_rgb8(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scale = 1.0 / f64::from(samples_per_pixel);
    let to_byte = |c: f64| (256.0 * INTENSITY.clamp((scale * c).sqrt())) as u8;
    [to_byte(sum.x), to_byte(sum.y), to_byte(sum.z)]
}

/// Row-major image of accumulated (summed) pixel colors, top scanline first.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a framebuffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    #[inline]
    fn index(&self, x: u32, row: u32) -> usize {
        row as usize * self.width as usize + x as usize
    }

    /// Get the summed color at column `x` of raster row `row` (0 = top).
    pub fn get(&self, x: u32, row: u32) -> Color {
        self.pixels[self.index(x, row)]
    }

    /// Set the summed color at column `x` of raster row `row` (0 = top).
    pub fn set(&mut self, x: u32, row: u32, color: Color) {
        let index = self.index(x, row);
        self.pixels[index] = color;
    }

    /// Store the result of pixel `(i, j)` where `j` counts from the bottom.
    pub fn set_scanline_pixel(&mut self, i: u32, j: u32, color: Color) {
        self.set(i, self.height - 1 - j, color);
    }

    /// Summed colors in raster order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Convert to 8-bit RGB pixels in raster order.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels
            .iter()
            .map(|&sum| color_to_rgb8(sum, self.samples_per_pixel))
            .collect()
    }
}
