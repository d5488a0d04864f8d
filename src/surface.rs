//! Drawing-surface abstraction shared by the plot and slider renderers.
//!
//! A surface works in its own pixel space with the origin at the top-left corner.
//! Path, circle and text calls are subject to the current affine transform, which is
//! manipulated with `translate`/`rotate` and scoped with `save`/`restore`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// `[on, off]` lengths in pixels.
    pub dash: Option<[f32; 2]>,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, on: f32, off: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([on, off]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, pos: [f32; 2]) -> bool {
        pos[0] >= self.x
            && pos[0] <= self.x + self.width
            && pos[1] >= self.y
            && pos[1] <= self.y + self.height
    }

    pub fn to_local(&self, pos: [f32; 2]) -> [f32; 2] {
        [pos[0] - self.x, pos[1] - self.y]
    }
}

/// Row-major 2×3 affine matrix `[a c e; b d f]`, matching the canvas convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self {
            e: dx,
            f: dy,
            ..Self::IDENTITY
        }
    }

    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self · other`: `other` is applied to points first.
    pub fn then(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: [f32; 2]) -> [f32; 2] {
        [
            self.a * p[0] + self.c * p[1] + self.e,
            self.b * p[0] + self.d * p[1] + self.f,
        ]
    }

    pub fn is_translation_only(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Current transform plus the saved states beneath it.
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: Affine,
    saved: Vec<Affine>,
}

impl TransformStack {
    pub fn current(&self) -> Affine {
        self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.current = self.current.then(&Affine::translation(dx, dy));
    }

    pub fn rotate(&mut self, radians: f32) {
        self.current = self.current.then(&Affine::rotation(radians));
    }

    pub fn reset(&mut self) {
        self.current = Affine::IDENTITY;
        self.saved.clear();
    }
}

pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resets a region to transparent. Not subject to the current transform.
    fn clear_rect(&mut self, rect: Rect);

    fn stroke_path(&mut self, points: &[[f32; 2]], style: &StrokeStyle);
    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color);
    fn fill_text(&mut self, text: &str, pos: [f32; 2], align: TextAlign, style: &TextStyle);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);

    fn clear(&mut self) {
        let rect = Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32);
        self.clear_rect(rect);
    }

    fn line(&mut self, from: [f32; 2], to: [f32; 2], style: &StrokeStyle) {
        self.stroke_path(&[from, to], style);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Stroke {
        points: Vec<[f32; 2]>,
        style: StrokeStyle,
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        color: Color,
    },
    Text {
        content: String,
        position: [f32; 2],
        align: TextAlign,
        style: TextStyle,
        transform: Affine,
    },
}

/// Surface that records commands instead of rasterizing them. Stroke and circle
/// geometry is stored already transformed; text keeps its transform so rotated labels
/// stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    transform: TransformStack,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, [f32; 2], &Affine)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text {
                content,
                position,
                transform,
                ..
            } => Some((content.as_str(), *position, transform)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = ([f32; 2], f32, Color)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&[[f32; 2]], &StrokeStyle)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Stroke { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }
}

impl DrawSurface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, rect: Rect) {
        let full = rect.x <= 0.0
            && rect.y <= 0.0
            && rect.width >= self.width as f32
            && rect.height >= self.height as f32;
        if full {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn stroke_path(&mut self, points: &[[f32; 2]], style: &StrokeStyle) {
        let t = self.transform.current();
        self.commands.push(DrawCommand::Stroke {
            points: points.iter().map(|&p| t.apply(p)).collect(),
            style: *style,
        });
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        let center = self.transform.current().apply(center);
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: [f32; 2], align: TextAlign, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            position: pos,
            align,
            style: *style,
            transform: self.transform.current(),
        });
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn test_translate_then_rotate() {
        let mut stack = TransformStack::default();
        stack.translate(15.0, 150.0);
        stack.rotate(-FRAC_PI_2);
        // A point along the rotated x axis goes up the screen.
        let p = stack.current().apply([10.0, 0.0]);
        assert!(close(p, [15.0, 140.0]), "{p:?}");
    }

    #[test]
    fn test_save_restore() {
        let mut stack = TransformStack::default();
        stack.save();
        stack.translate(3.0, 4.0);
        stack.restore();
        assert_eq!(stack.current(), Affine::IDENTITY);
        stack.restore();
        assert_eq!(stack.current(), Affine::IDENTITY);
    }

    #[test]
    fn test_full_clear_drops_stale_commands() {
        let mut list = DisplayList::new(100, 50);
        list.fill_circle([1.0, 1.0], 2.0, Color::RED);
        list.clear();
        assert_eq!(list.commands.len(), 1);
        assert!(matches!(list.commands[0], DrawCommand::Clear(_)));
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(0.0, 324.0, 800.0, 40.0);
        assert!(rect.contains([0.0, 324.0]));
        assert!(rect.contains([800.0, 364.0]));
        assert!(!rect.contains([400.0, 300.0]));
        assert_eq!(rect.to_local([400.0, 330.0]), [400.0, 6.0]);
    }
}
