//! Colors and the pixel surface the rasterizer writes into
use std::ops::{Add, Mul, Sub};

use nalgebra::Point2;

/// RGBA color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channels in 0..=1, clamped, truncated to bytes.
    pub fn from_float(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
            a: to_byte(a),
        }
    }

    /// Opaque grey of intensity `v` in 0..=1
    pub fn greyscale(v: f32) -> Self {
        Self::from_float(v, v, v, 1.0)
    }

    /// Perceived brightness in 0..=1 using the BT.709 luma weights. Alpha is ignored.
    pub fn luminance(&self) -> f32 {
        0.2126 * to_unit(self.r) + 0.7152 * to_unit(self.g) + 0.0722 * to_unit(self.b)
    }
}

fn to_unit(channel: u8) -> f32 {
    channel as f32 / 255.0
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
            self.a.saturating_add(rhs.a),
        )
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color::new(
            self.r.saturating_sub(rhs.r),
            self.g.saturating_sub(rhs.g),
            self.b.saturating_sub(rhs.b),
            self.a.saturating_sub(rhs.a),
        )
    }
}

/// Channel-wise product of normalized channels
impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color::from_float(
            to_unit(self.r) * to_unit(rhs.r),
            to_unit(self.g) * to_unit(rhs.g),
            to_unit(self.b) * to_unit(rhs.b),
            to_unit(self.a) * to_unit(rhs.a),
        )
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, factor: f32) -> Color {
        Color::from_float(
            to_unit(self.r) * factor,
            to_unit(self.g) * factor,
            to_unit(self.b) * factor,
            to_unit(self.a) * factor,
        )
    }
}

/// Row-major grid of colors
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Surface {
    /// Surface cleared to `Color::default()` (transparent black).
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::default())
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, `None` outside the surface.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Write one pixel. Coordinates outside the surface are ignored, which is
    /// what clips rasterizer overscan.
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // chunks_exact panics on 0
        self.pixels.chunks_exact(self.width.max(1))
    }

    pub fn top_left(&self) -> Point2<f32> {
        Point2::new(0.0, 0.0)
    }

    pub fn top_right(&self) -> Point2<f32> {
        Point2::new(self.width as f32, 0.0)
    }

    pub fn bottom_left(&self) -> Point2<f32> {
        Point2::new(0.0, self.height as f32)
    }

    pub fn bottom_right(&self) -> Point2<f32> {
        Point2::new(self.width as f32, self.height as f32)
    }
}
