//! Software drawing surface
//!
//! A `Canvas` is the drawing-surface capability every renderer call reduces
//! to. All coordinates here are screen pixels (Y-down, origin top-left).

use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use glam::DVec2;
use image::{Rgba, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

use super::font::{Font, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Shared handle to a drawing surface
pub type SurfaceHandle = Rc<RefCell<Canvas>>;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn same_rgb(&self, other: &Self) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Self::rgba(p[0], p[1], p[2], p[3])
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Pixel compositing mode for [`Canvas::blit`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over alpha blending
    #[default]
    Normal,
    /// Additive blending, weighted by source alpha
    Add,
}

/// Which quarters of a circle to draw. No quarter selected means all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quadrants {
    pub top_right: bool,
    pub top_left: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Quadrants {
    /// The whole circle
    pub const ALL: Self = Self {
        top_right: false,
        top_left: false,
        bottom_left: false,
        bottom_right: false,
    };

    fn contains(&self, dx: f64, dy: f64) -> bool {
        let any = self.top_right || self.top_left || self.bottom_left || self.bottom_right;
        if !any {
            return true;
        }
        match (dx >= 0.0, dy < 0.0) {
            (true, true) => self.top_right,
            (false, true) => self.top_left,
            (false, false) => self.bottom_left,
            (true, false) => self.bottom_right,
        }
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// CPU RGBA surface
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    alpha: bool,
    colorkey: Option<Color>,
}

impl Canvas {
    /// Create a surface. Alpha surfaces start fully transparent, opaque ones black.
    pub fn new(width: u32, height: u32, alpha: bool) -> Self {
        let fill = if alpha { Color::TRANSPARENT } else { Color::BLACK };
        Self {
            pixels: RgbaImage::from_pixel(width, height, fill.into()),
            alpha,
            colorkey: None,
        }
    }

    /// Wrap a decoded image as a per-pixel-alpha surface
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            alpha: true,
            colorkey: None,
        }
    }

    /// Move the surface behind a shared handle
    pub fn into_handle(self) -> SurfaceHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Whether the surface has zero area
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Whether the surface keeps per-pixel alpha
    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    /// Pixels of this color are skipped when the surface is blitted
    pub fn set_colorkey(&mut self, colorkey: Option<Color>) {
        self.colorkey = colorkey;
    }

    pub fn colorkey(&self) -> Option<Color> {
        self.colorkey
    }

    /// Read a pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels.get_pixel_checked(x, y).map(|p| Color::from(*p))
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Reallocate at a new size. Contents are reset.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() == (width, height) {
            return;
        }
        let fill = if self.alpha {
            Color::TRANSPARENT
        } else {
            Color::BLACK
        };
        self.pixels = RgbaImage::from_pixel(width, height, fill.into());
    }

    /// Fill the whole surface
    pub fn fill(&mut self, color: Color) {
        let color = self.storable(color);
        for p in self.pixels.pixels_mut() {
            *p = color.into();
        }
    }

    fn storable(&self, mut color: Color) -> Color {
        if !self.alpha {
            color.a = 255;
        }
        color
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let color = self.storable(color);
        self.pixels.put_pixel(x as u32, y as u32, color.into());
    }

    fn blend(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) || color.a == 0 {
            return;
        }
        let alpha = self.alpha;
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        *dst = composite(Color::from(*dst), color, BlendMode::Normal, alpha).into();
    }

    fn source_pixel(&self, x: u32, y: u32) -> Option<Color> {
        let mut color = Color::from(*self.pixels.get_pixel(x, y));
        if self.colorkey.is_some_and(|key| key.same_rgb(&color)) {
            return None;
        }
        if !self.alpha {
            color.a = 255;
        }
        Some(color)
    }

    /// Composite `src` with its top-left corner at `top_left`
    pub fn blit(&mut self, src: &Canvas, top_left: DVec2, mode: BlendMode) {
        let ox = top_left.x.round() as i64;
        let oy = top_left.y.round() as i64;
        let (dw, dh) = (i64::from(self.width()), i64::from(self.height()));

        for sy in 0..src.height() {
            let dy = oy + i64::from(sy);
            if dy < 0 || dy >= dh {
                continue;
            }
            for sx in 0..src.width() {
                let dx = ox + i64::from(sx);
                if dx < 0 || dx >= dw {
                    continue;
                }
                let Some(color) = src.source_pixel(sx, sy) else {
                    continue;
                };
                if color.a == 0 {
                    continue;
                }
                let dst = self.pixels.get_pixel_mut(dx as u32, dy as u32);
                *dst = composite(Color::from(*dst), color, mode, self.alpha).into();
            }
        }
    }

    /// Copy rotated counter-clockwise by `degrees`, grown to fit. Corners are transparent.
    pub fn rotated(&self, degrees: f64) -> Canvas {
        let normalized = degrees.rem_euclid(360.0);
        if normalized.abs() < 1e-9 || (360.0 - normalized).abs() < 1e-9 {
            return self.clone();
        }

        let (sin, cos) = normalized.to_radians().sin_cos();
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-9).ceil().max(0.0) as u32;
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-9).ceil().max(0.0) as u32;

        let mut out = Canvas::new(out_w, out_h, true);
        let half_out = DVec2::new(f64::from(out_w), f64::from(out_h)) / 2.0;
        let half_src = DVec2::new(w, h) / 2.0;

        for oy in 0..out_h {
            for ox in 0..out_w {
                let d = DVec2::new(f64::from(ox) + 0.5, f64::from(oy) + 0.5) - half_out;
                let sx = d.x * cos - d.y * sin + half_src.x;
                let sy = d.x * sin + d.y * cos + half_src.y;
                if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                    continue;
                }
                if let Some(color) = self.source_pixel(sx as u32, sy as u32) {
                    out.pixels.put_pixel(ox, oy, color.into());
                }
            }
        }
        out
    }

    /// Nearest-neighbour rescale to `width` x `height`
    pub fn scaled(&self, width: u32, height: u32) -> Canvas {
        if width == 0 || height == 0 || self.is_empty() {
            let mut out = Canvas::new(width, height, self.alpha);
            out.colorkey = self.colorkey;
            return out;
        }
        Canvas {
            pixels: imageops::resize(&self.pixels, width, height, imageops::FilterType::Nearest),
            alpha: self.alpha,
            colorkey: self.colorkey,
        }
    }

    /// Straight line. A width of zero draws nothing.
    pub fn draw_line(&mut self, start: DVec2, end: DVec2, width: u32, color: Color) {
        if width == 0 {
            return;
        }

        if width == 1 {
            let Some((start, end)) = clip_segment(start, end, self.size()) else {
                return;
            };
            let delta = end - start;
            let steps = delta.abs().max_element().ceil().max(1.0);
            for i in 0..=(steps as i64) {
                let p = start + delta * (i as f64 / steps);
                self.put(p.x.floor() as i64, p.y.floor() as i64, color);
            }
            return;
        }

        let half = f64::from(width) / 2.0;
        let min = start.min(end) - DVec2::splat(half);
        let max = start.max(end) + DVec2::splat(half);
        let segment = end - start;
        let len_sq = segment.length_squared();

        let (Some(ys), Some(xs)) = (
            clip_span(min.y, max.y, self.height()),
            clip_span(min.x, max.x, self.width()),
        ) else {
            return;
        };

        for y in ys {
            for x in xs.clone() {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = if len_sq > 0.0 {
                    ((p - start).dot(segment) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if p.distance(start + segment * t) <= half {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Circle outline of `width` pixels, or filled when `width` is zero.
    /// Radii under one pixel draw nothing.
    pub fn draw_circle(
        &mut self,
        center: DVec2,
        radius: f64,
        width: u32,
        color: Color,
        quadrants: Quadrants,
    ) {
        if !(radius >= 1.0) {
            return;
        }
        let inner = if width == 0 {
            None
        } else {
            Some(radius - f64::from(width))
        };
        let r_sq = radius * radius;
        let (Some(ys), Some(xs)) = (
            clip_span(center.y - radius, center.y + radius, self.height()),
            clip_span(center.x - radius, center.x + radius, self.width()),
        ) else {
            return;
        };

        for y in ys {
            for x in xs.clone() {
                let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - center;
                let dist_sq = d.length_squared();
                if dist_sq > r_sq || !quadrants.contains(d.x, d.y) {
                    continue;
                }
                if let Some(inner) = inner
                    && inner > 0.0
                    && dist_sq <= inner * inner
                {
                    continue;
                }
                self.put(x, y, color);
            }
        }
    }

    /// Rectangle outline of `width` pixels, or filled when `width` is zero.
    /// A positive `border_radius` rounds the corners.
    pub fn draw_rect(&mut self, rect: PixelRect, width: u32, border_radius: i32, color: Color) {
        let x0 = rect.x.round() as i64;
        let y0 = rect.y.round() as i64;
        let w = rect.width.round() as i64;
        let h = rect.height.round() as i64;
        if w <= 0 || h <= 0 {
            return;
        }

        let radius = if border_radius > 0 {
            i64::from(border_radius).min(w.min(h) / 2)
        } else {
            0
        };
        let stroke = i64::from(width);

        // local coordinates of the rect part that lies on this surface
        let xs = (-x0).max(0)..(i64::from(self.width()) - x0).min(w);
        let ys = (-y0).max(0)..(i64::from(self.height()) - y0).min(h);

        for y in ys {
            for x in xs.clone() {
                if rect_covers(x, y, w, h, radius, stroke) {
                    self.put(x0 + x, y0 + y, color);
                }
            }
        }
    }

    /// Rectangle of `size` pixels centered on `center` and rotated
    /// counter-clockwise by `degrees`, composited straight onto this surface.
    /// Outline and rounding work as in [`draw_rect`](Self::draw_rect).
    pub fn draw_rect_rotated(
        &mut self,
        center: DVec2,
        size: (u32, u32),
        degrees: f64,
        width: u32,
        border_radius: i32,
        color: Color,
    ) {
        let (w, h) = (i64::from(size.0), i64::from(size.1));
        if w == 0 || h == 0 || !center.is_finite() || !degrees.is_finite() {
            return;
        }

        let radius = if border_radius > 0 {
            i64::from(border_radius).min(w.min(h) / 2)
        } else {
            0
        };
        let stroke = i64::from(width);

        let (sin, cos) = degrees.rem_euclid(360.0).to_radians().sin_cos();
        let (fw, fh) = (f64::from(size.0), f64::from(size.1));
        let half_src = DVec2::new(fw, fh) / 2.0;
        let extent = DVec2::new(
            fw * cos.abs() + fh * sin.abs(),
            fw * sin.abs() + fh * cos.abs(),
        ) / 2.0;

        let (Some(ys), Some(xs)) = (
            clip_span(center.y - extent.y, center.y + extent.y, self.height()),
            clip_span(center.x - extent.x, center.x + extent.x, self.width()),
        ) else {
            return;
        };

        for y in ys {
            for x in xs.clone() {
                let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - center;
                let sx = d.x * cos - d.y * sin + half_src.x;
                let sy = d.x * sin + d.y * cos + half_src.y;
                if sx < 0.0 || sy < 0.0 || sx >= fw || sy >= fh {
                    continue;
                }
                if rect_covers(sx as i64, sy as i64, w, h, radius, stroke) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Rasterize a line of text into a new surface
    pub fn render_text(text: &str, font: &Font, color: Color, background: Option<Color>) -> Canvas {
        let (width, height) = font.measure(text);
        let mut out = Canvas::new(width, height, background.is_none());
        if let Some(bg) = background {
            out.fill(bg);
        }

        for (i, ch) in text.chars().enumerate() {
            let base_x = i as u32 * font.advance();
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if !Font::is_set(ch, col, row) {
                        continue;
                    }
                    for sy in 0..font.scale {
                        for sx in 0..font.scale {
                            out.put(
                                i64::from(base_x + col * font.scale + sx),
                                i64::from(row * font.scale + sy),
                                color,
                            );
                        }
                    }
                }
            }
        }
        out
    }
}

/// Integer pixel range covering `lo..=hi`, limited to `0..limit`
fn clip_span(lo: f64, hi: f64, limit: u32) -> Option<RangeInclusive<i64>> {
    if !(lo.is_finite() && hi.is_finite()) || limit == 0 {
        return None;
    }
    let max = f64::from(limit - 1);
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(max);
    (lo <= hi).then(|| (lo as i64)..=(hi as i64))
}

/// Cut a segment down to the part within one pixel of a `size` surface
/// (Liang-Barsky). `None` when nothing of it is visible.
fn clip_segment(start: DVec2, end: DVec2, size: (u32, u32)) -> Option<(DVec2, DVec2)> {
    if !(start.is_finite() && end.is_finite()) {
        return None;
    }
    let min = DVec2::splat(-1.0);
    let max = DVec2::new(f64::from(size.0), f64::from(size.1)) + 1.0;
    let delta = end - start;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [
        (-delta.x, start.x - min.x),
        (delta.x, max.x - start.x),
        (-delta.y, start.y - min.y),
        (delta.y, max.y - start.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((start + delta * t0, start + delta * t1))
}

/// Whether local pixel (x, y) is painted by a `w` x `h` rect with the given
/// corner radius, filled when `stroke` is zero
fn rect_covers(x: i64, y: i64, w: i64, h: i64, radius: i64, stroke: i64) -> bool {
    if !in_rounded_rect(x, y, w, h, radius) {
        return false;
    }
    stroke == 0
        || !in_rounded_rect(
            x - stroke,
            y - stroke,
            w - 2 * stroke,
            h - 2 * stroke,
            (radius - stroke).max(0),
        )
}

fn in_rounded_rect(x: i64, y: i64, w: i64, h: i64, radius: i64) -> bool {
    if w <= 0 || h <= 0 || x < 0 || y < 0 || x >= w || y >= h {
        return false;
    }
    if radius == 0 {
        return true;
    }
    let cx = if x < radius {
        radius
    } else if x >= w - radius {
        w - radius - 1
    } else {
        return true;
    };
    let cy = if y < radius {
        radius
    } else if y >= h - radius {
        h - radius - 1
    } else {
        return true;
    };
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= radius * radius
}

fn composite(dst: Color, src: Color, mode: BlendMode, keep_alpha: bool) -> Color {
    let a = f64::from(src.a) / 255.0;
    let mix = |s: u8, d: u8| -> u8 {
        match mode {
            BlendMode::Normal => (f64::from(s) * a + f64::from(d) * (1.0 - a)).round() as u8,
            BlendMode::Add => (f64::from(d) + f64::from(s) * a).round().min(255.0) as u8,
        }
    };
    let out_a = if keep_alpha {
        (f64::from(src.a) + f64::from(dst.a) * (1.0 - a)).round() as u8
    } else {
        255
    };
    Color::rgba(
        mix(src.r, dst.r),
        mix(src.g, dst.g),
        mix(src.b, dst.b),
        out_a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn test_new_surfaces() {
        let opaque = Canvas::new(4, 3, false);
        assert_eq!(opaque.size(), (4, 3));
        assert_eq!(opaque.pixel(0, 0), Some(Color::BLACK));

        let alpha = Canvas::new(2, 2, true);
        assert_eq!(alpha.pixel(1, 1), Some(Color::TRANSPARENT));
        assert!(Canvas::new(0, 5, true).is_empty());
    }

    #[test]
    fn test_fill_forces_opaque_without_alpha() {
        let mut canvas = Canvas::new(2, 2, false);
        canvas.fill(Color::rgba(10, 20, 30, 40));
        assert_eq!(canvas.pixel(1, 0), Some(Color::rgb(10, 20, 30)));
    }

    #[test]
    fn test_blit_skips_transparent_and_colorkey() {
        let mut dst = Canvas::new(4, 4, false);
        dst.fill(Color::WHITE);

        let mut src = Canvas::new(2, 1, true);
        src.put(0, 0, RED);
        dst.blit(&src, DVec2::new(1.0, 1.0), BlendMode::Normal);
        assert_eq!(dst.pixel(1, 1), Some(RED));
        assert_eq!(dst.pixel(2, 1), Some(Color::WHITE));

        let mut keyed = Canvas::new(1, 1, false);
        keyed.set_colorkey(Some(Color::BLACK));
        dst.blit(&keyed, DVec2::ZERO, BlendMode::Normal);
        assert_eq!(dst.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut dst = Canvas::new(2, 2, false);
        let mut src = Canvas::new(3, 3, false);
        src.fill(RED);
        dst.blit(&src, DVec2::new(-1.0, -1.0), BlendMode::Normal);
        assert_eq!(dst.pixel(0, 0), Some(RED));
        assert_eq!(dst.pixel(1, 1), Some(RED));
    }

    #[test]
    fn test_half_alpha_blend() {
        let mut dst = Canvas::new(1, 1, false);
        let mut src = Canvas::new(1, 1, true);
        src.put(0, 0, Color::rgba(255, 255, 255, 128));
        dst.blit(&src, DVec2::ZERO, BlendMode::Normal);
        let p = dst.pixel(0, 0).unwrap();
        assert!((127..=129).contains(&p.r));
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_rotate_quarter_turn_swaps_dimensions() {
        let mut src = Canvas::new(4, 2, true);
        src.put(3, 0, RED);
        let rotated = src.rotated(90.0);
        assert_eq!(rotated.size(), (2, 4));
        // Top-right pixel moves to the top-left after a counter-clockwise quarter turn
        assert_eq!(rotated.pixel(0, 0), Some(RED));
        assert_eq!(src.rotated(360.0).size(), (4, 2));
    }

    #[test]
    fn test_scaled_nearest() {
        let mut src = Canvas::new(1, 1, true);
        src.put(0, 0, RED);
        let big = src.scaled(3, 2);
        assert_eq!(big.size(), (3, 2));
        assert_eq!(big.pixel(2, 1), Some(RED));
        assert!(src.scaled(0, 2).is_empty());
    }

    #[test]
    fn test_line_endpoints() {
        let mut canvas = Canvas::new(10, 10, false);
        canvas.draw_line(DVec2::new(1.5, 1.5), DVec2::new(8.5, 1.5), 1, RED);
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(8, 1), Some(RED));
        assert_eq!(canvas.pixel(5, 2), Some(Color::BLACK));

        canvas.draw_line(DVec2::new(0.0, 5.0), DVec2::new(10.0, 5.0), 0, Color::WHITE);
        assert_eq!(canvas.pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_thick_line() {
        let mut canvas = Canvas::new(10, 10, false);
        canvas.draw_line(DVec2::new(0.0, 5.0), DVec2::new(10.0, 5.0), 4, RED);
        assert_eq!(canvas.pixel(5, 3), Some(RED));
        assert_eq!(canvas.pixel(5, 6), Some(RED));
        assert_eq!(canvas.pixel(5, 8), Some(Color::BLACK));
    }

    #[test]
    fn test_circle_fill_and_outline() {
        let mut canvas = Canvas::new(21, 21, false);
        canvas.draw_circle(DVec2::new(10.5, 10.5), 8.0, 0, RED, Quadrants::ALL);
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));

        let mut ring = Canvas::new(21, 21, false);
        ring.draw_circle(DVec2::new(10.5, 10.5), 8.0, 2, RED, Quadrants::ALL);
        assert_eq!(ring.pixel(10, 10), Some(Color::BLACK));
        assert_eq!(ring.pixel(10, 3), Some(RED));
    }

    #[test]
    fn test_circle_quadrants() {
        let mut canvas = Canvas::new(21, 21, false);
        let top_right = Quadrants {
            top_right: true,
            ..Quadrants::ALL
        };
        canvas.draw_circle(DVec2::new(10.0, 10.0), 8.0, 0, RED, top_right);
        assert_eq!(canvas.pixel(14, 6), Some(RED));
        assert_eq!(canvas.pixel(6, 6), Some(Color::BLACK));
        assert_eq!(canvas.pixel(14, 14), Some(Color::BLACK));
    }

    #[test]
    fn test_rect_fill_outline_rounded() {
        let mut canvas = Canvas::new(12, 12, false);
        canvas.draw_rect(PixelRect::new(1.0, 1.0, 10.0, 10.0), 0, 0, RED);
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(11, 11), Some(Color::BLACK));

        let mut outline = Canvas::new(12, 12, false);
        outline.draw_rect(PixelRect::new(1.0, 1.0, 10.0, 10.0), 2, 0, RED);
        assert_eq!(outline.pixel(2, 5), Some(RED));
        assert_eq!(outline.pixel(5, 5), Some(Color::BLACK));

        let mut rounded = Canvas::new(12, 12, false);
        rounded.draw_rect(PixelRect::new(0.0, 0.0, 12.0, 12.0), 0, 4, RED);
        assert_eq!(rounded.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(rounded.pixel(6, 6), Some(RED));
    }

    #[test]
    fn test_shapes_larger_than_the_surface_are_clipped() {
        let mut canvas = Canvas::new(8, 8, false);
        canvas.draw_circle(DVec2::new(4.0, 4.0), 1.0e7, 0, RED, Quadrants::ALL);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(7, 7), Some(RED));

        let mut canvas = Canvas::new(8, 8, false);
        canvas.draw_rect(PixelRect::new(-1.0e7, 2.0, 2.0e7, 3.0), 0, 0, RED);
        assert_eq!(canvas.pixel(0, 2), Some(RED));
        assert_eq!(canvas.pixel(7, 4), Some(RED));
        assert_eq!(canvas.pixel(3, 5), Some(Color::BLACK));

        let mut canvas = Canvas::new(8, 8, false);
        canvas.draw_line(DVec2::new(-1.0e9, 3.5), DVec2::new(1.0e9, 3.5), 1, RED);
        canvas.draw_line(DVec2::new(-1.0e9, 6.0), DVec2::new(1.0e9, 6.0), 2, RED);
        assert_eq!(canvas.pixel(0, 3), Some(RED));
        assert_eq!(canvas.pixel(7, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 5), Some(RED));
        assert_eq!(canvas.pixel(4, 1), Some(Color::BLACK));

        let mut canvas = Canvas::new(8, 8, false);
        canvas.draw_line(DVec2::new(-50.0, -50.0), DVec2::new(-10.0, 90.0), 1, RED);
        canvas.draw_circle(DVec2::new(-100.0, 4.0), 20.0, 0, RED, Quadrants::ALL);
        assert!((0..8).all(|y| (0..8).all(|x| canvas.pixel(x, y) == Some(Color::BLACK))));
    }

    #[test]
    fn test_rotated_rect_blends_onto_surface() {
        let mut canvas = Canvas::new(10, 10, false);
        canvas.fill(Color::WHITE);
        canvas.draw_rect_rotated(DVec2::new(5.0, 5.0), (4, 4), 45.0, 0, 0, Color::rgba(255, 0, 0, 128));
        let mixed = canvas.pixel(5, 5).unwrap();
        assert_eq!((mixed.r, mixed.a), (255, 255));
        assert!(mixed.g > 100 && mixed.g < 150);
        assert_eq!(canvas.pixel(5, 3), Some(Color::rgb(255, 127, 127)));
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn test_render_text() {
        let font = Font::new(1);
        let text = Canvas::render_text("I", &font, RED, None);
        assert_eq!(text.size(), (5, 7));
        assert!(text.has_alpha());
        assert_eq!(text.pixel(2, 0), Some(RED));
        assert_eq!(text.pixel(0, 3), Some(Color::TRANSPARENT));

        let boxed = Canvas::render_text("I", &font, RED, Some(Color::WHITE));
        assert_eq!(boxed.pixel(0, 3), Some(Color::WHITE));
    }
}
