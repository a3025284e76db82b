//! Scan conversion of lines, triangles and circles onto a [`Surface`]
//!
//! Every entry point takes float coordinates (projected vertices) and turns
//! them into pixels by truncation toward zero (`as i32`). All writes go
//! through [`Surface::set`], so anything off the surface is dropped.
use std::ops::RangeInclusive;

use nalgebra::Point2;

use crate::surface::{Color, Surface};

/// Pixel coordinate after truncation. Held as i64 so that offsets between
/// far-off points cannot overflow.
type Pixel = (i64, i64);

/// Circles whose radius exceeds this many times the surface's width plus
/// height are traced row by row instead of stepped around the whole arc.
const STEPPED_RADIUS_LIMIT: i64 = 4;

fn to_pixel(point: Point2<f32>) -> Pixel {
    (point.x as i32 as i64, point.y as i32 as i64)
}

/// Drawing primitives that write into a borrowed surface
pub struct Rasterizer<'a> {
    surface: &'a mut Surface,
}

impl<'a> Rasterizer<'a> {
    pub fn new(surface: &'a mut Surface) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        self.surface.fill(color);
    }

    pub fn plot(&mut self, point: Point2<f32>, color: Color) {
        let (x, y) = to_pixel(point);
        self.put(x, y, color);
    }

    /// Bresenham line, both endpoints included, any direction.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        self.line(to_pixel(Point2::new(x1, y1)), to_pixel(Point2::new(x2, y2)), color);
    }

    /// Triangle outline: p1-p2, p2-p3, p3-p1.
    pub fn draw_triangle(
        &mut self,
        p1: Point2<f32>,
        p2: Point2<f32>,
        p3: Point2<f32>,
        color: Color,
    ) {
        let (a, b, c) = (to_pixel(p1), to_pixel(p2), to_pixel(p3));
        self.line(a, b, color);
        self.line(b, c, color);
        self.line(c, a, color);
    }

    /// Scanline fill.
    ///
    /// Vertices are sorted by y (ties keep their argument order). Rows from
    /// the top vertex down to just above the middle one are bounded by the
    /// long edge and the upper short edge; rows from the middle vertex to the
    /// bottom one by the long edge and the lower short edge. A half with no
    /// height is skipped, so collinear input draws at most a line.
    pub fn fill_triangle(
        &mut self,
        p1: Point2<f32>,
        p2: Point2<f32>,
        p3: Point2<f32>,
        color: Color,
    ) {
        let mut points = [to_pixel(p1), to_pixel(p2), to_pixel(p3)];
        if points[1].1 < points[0].1 {
            points.swap(0, 1);
        }
        if points[2].1 < points[1].1 {
            points.swap(1, 2);
        }
        if points[1].1 < points[0].1 {
            points.swap(0, 1);
        }
        let [top, middle, bottom] = points;

        if top.1 == bottom.1 {
            let left = top.0.min(middle.0).min(bottom.0);
            let right = top.0.max(middle.0).max(bottom.0);
            self.span(left, right, top.1, color);
            return;
        }

        if middle.1 > top.1 {
            for y in self.rows(top.1, middle.1 - 1) {
                let long = edge_x(top, bottom, y);
                let short = edge_x(top, middle, y);
                self.span(long, short, y, color);
            }
        }

        if bottom.1 > middle.1 {
            for y in self.rows(middle.1, bottom.1) {
                let long = edge_x(top, bottom, y);
                let short = edge_x(middle, bottom, y);
                self.span(long, short, y, color);
            }
        } else {
            // flat bottom edge
            self.span(middle.0, bottom.0, bottom.1, color);
        }
    }

    /// Midpoint circle outline.
    ///
    /// Circles much larger than the surface are traced through each row and
    /// column instead, which lights the same arc up to rounding.
    pub fn draw_circle(&mut self, center: Point2<f32>, radius: f32, color: Color) {
        let Some((cx, cy, r)) = self.circle(center, radius) else {
            return;
        };

        if self.is_large(r) {
            for y in self.rows(cy - r, cy + r) {
                let half = half_chord(r, y - cy);
                self.put(cx - half, y, color);
                self.put(cx + half, y, color);
            }
            for x in self.columns(cx - r, cx + r) {
                let half = half_chord(r, x - cx);
                self.put(x, cy - half, color);
                self.put(x, cy + half, color);
            }
            return;
        }

        self.put(cx, cy + r, color);
        self.put(cx, cy - r, color);
        self.put(cx + r, cy, color);
        self.put(cx - r, cy, color);

        for (x, y) in MidpointCircle::new(r) {
            self.put(cx + x, cy + y, color);
            self.put(cx - x, cy + y, color);
            self.put(cx + x, cy - y, color);
            self.put(cx - x, cy - y, color);
            self.put(cx + y, cy + x, color);
            self.put(cx - y, cy + x, color);
            self.put(cx + y, cy - x, color);
            self.put(cx - y, cy - x, color);
        }
    }

    /// Filled disk using the same midpoint stepping as [`Rasterizer::draw_circle`].
    ///
    /// The center column and center row are drawn first (the stepping never
    /// revisits offset 0), then each step fills the four rows it reaches.
    pub fn fill_circle(&mut self, center: Point2<f32>, radius: f32, color: Color) {
        let Some((cx, cy, r)) = self.circle(center, radius) else {
            return;
        };

        if self.is_large(r) {
            for y in self.rows(cy - r, cy + r) {
                let half = half_chord(r, y - cy);
                self.span(cx - half, cx + half, y, color);
            }
            return;
        }

        self.column(cx, cy - r, cy + r, color);
        self.span(cx - r, cx + r, cy, color);

        for (x, y) in MidpointCircle::new(r) {
            self.span(cx - x, cx + x, cy + y, color);
            self.span(cx - x, cx + x, cy - y, color);
            self.span(cx - y, cx + y, cy + x, color);
            self.span(cx - y, cx + y, cy - x, color);
        }
    }

    fn line(&mut self, from: Pixel, to: Pixel, color: Color) {
        let Some((from, to)) = self.clip(from, to) else {
            return;
        };

        let (mut x, mut y) = from;
        let (x2, y2) = to;
        let dx = (x2 - x).abs();
        let dy = (y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.put(x, y, color);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip of a segment to the surface grown by one pixel on
    /// every side. Ends that get cut are rounded to the nearest pixel, so
    /// the steps drawn after a cut can sit one pixel off the unclipped line.
    fn clip(&self, from: Pixel, to: Pixel) -> Option<(Pixel, Pixel)> {
        let (width, height) = self.extent();
        let on_surface = |(x, y): Pixel| (0..width).contains(&x) && (0..height).contains(&y);
        if on_surface(from) && on_surface(to) {
            return Some((from, to));
        }

        let (x0, y0) = (from.0 as f64, from.1 as f64);
        let dx = (to.0 - from.0) as f64;
        let dy = (to.1 - from.1) as f64;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let bounds = [
            (-dx, x0 + 1.0),
            (dx, width as f64 - x0),
            (-dy, y0 + 1.0),
            (dy, height as f64 - y0),
        ];
        for (p, q) in bounds {
            if p == 0.0 {
                // parallel to this edge and outside it
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
        }
        if t0 > t1 {
            return None;
        }

        let at = |t: f64| ((x0 + dx * t).round() as i64, (y0 + dy * t).round() as i64);
        let from = if t0 > 0.0 { at(t0) } else { from };
        let to = if t1 < 1.0 { at(t1) } else { to };
        Some((from, to))
    }

    fn is_large(&self, radius: i64) -> bool {
        let (width, height) = self.extent();
        radius > STEPPED_RADIUS_LIMIT * (width + height)
    }

    /// Center and radius in pixels, `None` when nothing of the circle can
    /// land on the surface.
    fn circle(&self, center: Point2<f32>, radius: f32) -> Option<(i64, i64, i64)> {
        let (cx, cy) = to_pixel(center);
        let r = radius as i32 as i64;
        let (width, height) = self.extent();
        if r < 0 || cx + r < 0 || cy + r < 0 || cx - r >= width || cy - r >= height {
            return None;
        }
        Some((cx, cy, r))
    }

    /// Horizontal run between `x1` and `x2` (either order) on row `y`.
    fn span(&mut self, x1: i64, x2: i64, y: i64, color: Color) {
        let (width, height) = self.extent();
        if y < 0 || y >= height {
            return;
        }
        let left = x1.min(x2).max(0);
        let right = x1.max(x2).min(width - 1);
        for x in left..=right {
            self.put(x, y, color);
        }
    }

    /// Vertical run on column `x` from `y1` to `y2` inclusive.
    fn column(&mut self, x: i64, y1: i64, y2: i64, color: Color) {
        let (width, _) = self.extent();
        if x < 0 || x >= width {
            return;
        }
        for y in self.rows(y1.min(y2), y1.max(y2)) {
            self.put(x, y, color);
        }
    }

    /// Rows of `from..=to` that lie on the surface.
    fn rows(&self, from: i64, to: i64) -> RangeInclusive<i64> {
        let (_, height) = self.extent();
        from.max(0)..=to.min(height - 1)
    }

    /// Columns of `from..=to` that lie on the surface.
    fn columns(&self, from: i64, to: i64) -> RangeInclusive<i64> {
        let (width, _) = self.extent();
        from.max(0)..=to.min(width - 1)
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.surface.set(x, y, color);
        }
    }

    fn extent(&self) -> (i64, i64) {
        (self.surface.width() as i64, self.surface.height() as i64)
    }
}

/// x of the edge `a`-`b` on row `y`. Callers guarantee `a.1 != b.1`.
fn edge_x(a: Pixel, b: Pixel, y: i64) -> i64 {
    let t = (y - a.1) as f64 / (b.1 - a.1) as f64;
    (a.0 as f64 + (b.0 - a.0) as f64 * t) as i64
}

/// Half the chord of a circle of radius `r` at offset `d` from its center,
/// rounded. Callers keep `|d| <= r`.
fn half_chord(r: i64, d: i64) -> i64 {
    ((r * r - d * d) as f64).sqrt().round() as i64
}

/// Offsets `(x, y)` of the first octant of a midpoint circle, after the
/// axis-aligned extrema.
struct MidpointCircle {
    f: i64,
    ddf_x: i64,
    ddf_y: i64,
    x: i64,
    y: i64,
}

impl MidpointCircle {
    fn new(radius: i64) -> Self {
        Self {
            f: 1 - radius,
            ddf_x: 1,
            ddf_y: -2 * radius,
            x: 0,
            y: radius,
        }
    }
}

impl Iterator for MidpointCircle {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.ddf_y += 2;
            self.f += self.ddf_y;
        }
        self.x += 1;
        self.ddf_x += 2;
        self.f += self.ddf_x;
        Some((self.x, self.y))
    }
}
