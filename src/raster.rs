//! Software rasterizer behind the on-screen surfaces.
//!
//! Pixels are straight (non-premultiplied) RGBA8 and start out transparent. Strokes and
//! circles are anti-aliased by distance-to-shape coverage; glyphs come from `ab_glyph`
//! outlines and are placed through the current transform.

use crate::surface::{Affine, Color, DrawSurface, Rect, StrokeStyle, TextAlign, TextStyle, TransformStack};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::Context;
use std::path::Path;

const BUNDLED_FONT: &[u8] = include_bytes!("../data/fonts/DejaVuSans.ttf");

pub fn bundled_font() -> anyhow::Result<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT).context("parsing bundled font")
}

pub fn load_font(path: &Path) -> anyhow::Result<FontArc> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    FontArc::try_from_vec(bytes).with_context(|| format!("parsing font {}", path.display()))
}

/// Loads the configured font, falling back to the bundled one when none is set or it
/// cannot be read.
pub fn resolve_font(configured: Option<&Path>) -> anyhow::Result<FontArc> {
    if let Some(path) = configured {
        match load_font(path) {
            Ok(font) => {
                log::info!("using font {}", path.display());
                return Ok(font);
            }
            Err(e) => log::warn!("{e:#}; using bundled font"),
        }
    }
    bundled_font()
}

#[derive(Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
    transform: TransformStack,
    font: Option<FontArc>,
}

impl Pixmap {
    pub fn new(width: u32, height: u32, font: Option<FontArc>) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            transform: TransformStack::default(),
            font,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Color {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    /// Copies the pixmap into `dst` (an RGBA8 buffer `dst_width` pixels wide) at
    /// `origin`, compositing over whatever is already there.
    pub fn composite_onto(&self, dst: &mut [u8], dst_width: u32, origin: [u32; 2]) {
        let dst_height = (dst.len() / (dst_width as usize * 4)) as u32;
        for y in 0..self.height {
            let dy = origin[1] + y;
            if dy >= dst_height {
                break;
            }
            for x in 0..self.width {
                let dx = origin[0] + x;
                if dx >= dst_width {
                    break;
                }
                let src = self.pixel(x, y);
                if src.a == 0 {
                    continue;
                }
                let i = (dy as usize * dst_width as usize + dx as usize) * 4;
                blend_into(&mut dst[i..i + 4], src, 1.0);
            }
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 || coverage <= 0.0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        blend_into(&mut self.data[i..i + 4], color, coverage.min(1.0));
    }

    fn device_segments(&self, points: &[[f32; 2]]) -> Vec<([f32; 2], [f32; 2])> {
        let t = self.transform.current();
        points
            .windows(2)
            .map(|w| (t.apply(w[0]), t.apply(w[1])))
            .collect()
    }

    /// Rasterizes `segments` into one coverage mask, then blends it once so joints of
    /// a polyline do not double up.
    fn stroke_segments(&mut self, segments: &[([f32; 2], [f32; 2])], style: &StrokeStyle) {
        if segments.is_empty() {
            return;
        }
        let half = style.width / 2.0;
        let pad = half + 1.0;
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (a, b) in segments {
            min_x = min_x.min(a[0].min(b[0]));
            min_y = min_y.min(a[1].min(b[1]));
            max_x = max_x.max(a[0].max(b[0]));
            max_y = max_y.max(a[1].max(b[1]));
        }
        let x0 = ((min_x - pad).floor() as i32).max(0);
        let y0 = ((min_y - pad).floor() as i32).max(0);
        let x1 = ((max_x + pad).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((max_y + pad).ceil() as i32).min(self.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        let mask_w = (x1 - x0 + 1) as usize;
        let mut mask = vec![0.0f32; mask_w * (y1 - y0 + 1) as usize];
        for (a, b) in segments {
            let sx0 = ((a[0].min(b[0]) - pad).floor() as i32).max(x0);
            let sy0 = ((a[1].min(b[1]) - pad).floor() as i32).max(y0);
            let sx1 = ((a[0].max(b[0]) + pad).ceil() as i32).min(x1);
            let sy1 = ((a[1].max(b[1]) + pad).ceil() as i32).min(y1);
            for y in sy0..=sy1 {
                for x in sx0..=sx1 {
                    let d = distance_to_segment([x as f32 + 0.5, y as f32 + 0.5], *a, *b);
                    let cov = (half + 0.5 - d).clamp(0.0, 1.0).min(style.width.max(0.0));
                    let m = &mut mask[(y - y0) as usize * mask_w + (x - x0) as usize];
                    *m = m.max(cov);
                }
            }
        }

        for (i, cov) in mask.into_iter().enumerate() {
            if cov > 0.0 {
                let x = x0 + (i % mask_w) as i32;
                let y = y0 + (i / mask_w) as i32;
                self.blend(x, y, style.color, cov);
            }
        }
    }

    fn text_width(font: &FontArc, text: &str, scale: PxScale) -> f32 {
        let scaled = font.as_scaled(scale);
        let mut width = 0.0;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}

fn blend_into(dst: &mut [u8], src: Color, coverage: f32) {
    let sa = src.a as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    dst[0] = channel(src.r, dst[0]);
    dst[1] = channel(src.g, dst[1]);
    dst[2] = channel(src.b, dst[2]);
    dst[3] = (out_a * 255.0).round() as u8;
}

fn distance_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a[0] + t * dx, a[1] + t * dy);
    ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt()
}

/// Splits a polyline into its "on" dash pieces. The pattern carries across vertices.
fn dash_segments(segments: &[([f32; 2], [f32; 2])], on: f32, off: f32) -> Vec<([f32; 2], [f32; 2])> {
    let period = on + off;
    if on <= 0.0 || period <= 0.0 {
        return segments.to_vec();
    }
    let mut out = Vec::new();
    let mut phase = 0.0f32;
    for &(a, b) in segments {
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            continue;
        }
        let at = |d: f32| [a[0] + dx * d / len, a[1] + dy * d / len];
        let mut pos = 0.0f32;
        while pos < len {
            let in_period = phase % period;
            let (drawing, remaining) = if in_period < on {
                (true, on - in_period)
            } else {
                (false, period - in_period)
            };
            let step = remaining.min(len - pos);
            if drawing {
                out.push((at(pos), at(pos + step)));
            }
            pos += step;
            phase += step;
        }
    }
    out
}

impl DrawSurface for Pixmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, rect: Rect) {
        let x0 = rect.x.max(0.0).floor() as u32;
        let y0 = rect.y.max(0.0).floor() as u32;
        let x1 = ((rect.x + rect.width).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((rect.y + rect.height).ceil().max(0.0) as u32).min(self.height);
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            let start = (row + x0 as usize) * 4;
            let end = (row + x1 as usize) * 4;
            if start < end {
                self.data[start..end].fill(0);
            }
        }
    }

    fn stroke_path(&mut self, points: &[[f32; 2]], style: &StrokeStyle) {
        let segments = self.device_segments(points);
        let segments = match style.dash {
            Some([on, off]) => dash_segments(&segments, on, off),
            None => segments,
        };
        self.stroke_segments(&segments, style);
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        let c = self.transform.current().apply(center);
        let x0 = (c[0] - radius - 1.0).floor() as i32;
        let x1 = (c[0] + radius + 1.0).ceil() as i32;
        let y0 = (c[1] - radius - 1.0).floor() as i32;
        let y1 = (c[1] + radius + 1.0).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = ((x as f32 + 0.5 - c[0]).powi(2) + (y as f32 + 0.5 - c[1]).powi(2)).sqrt();
                self.blend(x, y, color, (radius + 0.5 - d).clamp(0.0, 1.0));
            }
        }
    }

    fn fill_text(&mut self, text: &str, pos: [f32; 2], align: TextAlign, style: &TextStyle) {
        let Some(font) = self.font.clone() else {
            return;
        };
        let scale = PxScale::from(style.size);
        let start_x = match align {
            TextAlign::Left => pos[0],
            TextAlign::Center => pos[0] - Self::text_width(&font, text, scale) / 2.0,
            TextAlign::Right => pos[0] - Self::text_width(&font, text, scale),
        };
        let t: Affine = self.transform.current();
        let scaled = font.as_scaled(scale);

        let mut caret = start_x;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, pos[1]));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let mut covered = Vec::new();
            outlined.draw(|gx, gy, cov| {
                if cov > 0.0 {
                    covered.push((bounds.min.x + gx as f32 + 0.5, bounds.min.y + gy as f32 + 0.5, cov));
                }
            });
            for (lx, ly, cov) in covered {
                let [dx, dy] = t.apply([lx, ly]);
                self.blend(dx.floor() as i32, dy.floor() as i32, style.color, cov);
            }
        }
    }

    fn save(&mut self) {
        self.transform.save();
    }

    fn restore(&mut self) {
        self.transform.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.transform.rotate(radians);
    }
}
