//! Drawing backend seam.
//!
//! The engine emits a small set of 2D primitives through the [`Surface`]
//! trait and leaves rasterization to the backend: the TUI maps them onto a
//! braille canvas, tests capture them with [`RecordingSurface`], and
//! high-density backends wrap themselves in [`ScaledSurface`] to apply a
//! device-pixel ratio.

/// RGBA color. Alpha is kept as a fraction because backends differ in how
/// (or whether) they blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// The dashboard palette.
pub mod palette {
    use super::Color;

    pub const SENT: Color = Color::rgb(87, 148, 242);
    pub const RECEIVED: Color = Color::rgb(92, 184, 92);
    pub const LOSS: Color = Color::rgb(217, 83, 79);
    pub const LOSS_FILL: Color = Color::rgba(217, 83, 79, 0.2);
    pub const RTT: Color = Color::rgb(240, 173, 78);
    pub const GRID: Color = Color::rgba(255, 255, 255, 0.1);
    pub const TEXT: Color = Color::rgba(255, 255, 255, 0.5);
    pub const LABEL_TEXT: Color = Color::rgba(255, 255, 255, 0.9);
    pub const BACKING: Color = Color::rgba(0, 0, 0, 0.7);
    pub const GUIDE: Color = Color::rgba(255, 255, 255, 0.35);
}

/// Horizontal text anchor relative to the given x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical text anchor relative to the given y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// A 2D drawing target in logical units.
///
/// Coordinates have the origin at the top-left with y growing downward,
/// matching the engine's layout math. Backends that disagree (terminal
/// canvases draw y-up) flip during rasterization.
pub trait Surface {
    /// Logical width and height of the drawable area.
    fn size(&self) -> (f64, f64);

    /// Erase the whole surface.
    fn clear(&mut self);

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: Color, width: f64);

    /// Fill a closed polygon. The last point is implicitly joined to the
    /// first.
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Color, align: HAlign, baseline: VAlign);

    /// Text rotated 90° counter-clockwise, centered on (x, y). Used for the
    /// y-axis title.
    fn draw_text_rotated(&mut self, text: &str, x: f64, y: f64, color: Color);

    /// Width of `text` in logical units, used to size label backing rects.
    fn measure_text(&self, text: &str) -> f64;

    /// Vertical advance between text lines, in logical units. The tooltip
    /// sizes itself from this so cell-based backends stay compact.
    fn line_height(&self) -> f64 {
        14.0
    }
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Polyline {
        points: Vec<(f64, f64)>,
        color: Color,
        width: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        color: Color,
        align: HAlign,
        baseline: VAlign,
    },
    RotatedText {
        text: String,
        x: f64,
        y: f64,
        color: Color,
    },
}

/// Surface that records every primitive instead of rasterizing.
///
/// The rendering tests assert against the recorded ops; it is also handy for
/// dumping a frame while debugging layout.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    /// Logical width of one character, for `measure_text`. Roughly a 12px
    /// proportional font.
    pub char_width: f64,
    /// Vertical advance between text lines.
    pub line_height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            char_width: 7.0,
            line_height: 14.0,
            ops: Vec::new(),
        }
    }

    /// Reconfigure for a terminal-cell backend: one logical unit per cell.
    pub fn cell_metrics(mut self) -> Self {
        self.char_width = 1.0;
        self.line_height = 1.0;
        self
    }

    /// All recorded polylines, in draw order.
    pub fn polylines(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { .. }))
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: Color, width: f64) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Color, align: HAlign, baseline: VAlign) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            color,
            align,
            baseline,
        });
    }

    fn draw_text_rotated(&mut self, text: &str, x: f64, y: f64, color: Color) {
        self.ops.push(DrawOp::RotatedText {
            text: text.to_string(),
            x,
            y,
            color,
        });
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }
}

/// Device-pixel-ratio adapter.
///
/// Wraps a backend whose buffer is in physical pixels and exposes it in
/// logical units: the reported size shrinks by the ratio and every incoming
/// coordinate is multiplied back up, so the engine always draws in logical
/// units while the buffer stays crisp on high-density outputs.
///
/// The terminal backend draws in cells and never needs this; it is the seam
/// a pixel backend (image buffer, GPU canvas) wraps itself in when its
/// buffer density exceeds its logical size:
///
/// ```
/// use bridgeview_core::{Color, RecordingSurface, ScaledSurface, Surface};
///
/// // An 800x400 physical buffer presented at a device-pixel ratio of 2
/// // exposes a 400x200 logical drawing area.
/// let buffer = RecordingSurface::new(800.0, 400.0);
/// let mut surface = ScaledSurface::new(buffer, 2.0);
/// assert_eq!(surface.size(), (400.0, 200.0));
///
/// // Logical coordinates land in the buffer in physical pixels.
/// surface.fill_rect(10.0, 10.0, 5.0, 5.0, Color::rgb(0, 0, 0));
/// let buffer = surface.into_inner();
/// assert_eq!(buffer.ops.len(), 1);
/// ```
pub struct ScaledSurface<S> {
    inner: S,
    ratio: f64,
}

impl<S: Surface> ScaledSurface<S> {
    /// A ratio of 1.0 is a transparent passthrough.
    pub fn new(inner: S, ratio: f64) -> Self {
        let ratio = if ratio > 0.0 { ratio } else { 1.0 };
        Self { inner, ratio }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn scale_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(x, y)| (x * self.ratio, y * self.ratio))
            .collect()
    }
}

impl<S: Surface> Surface for ScaledSurface<S> {
    fn size(&self) -> (f64, f64) {
        let (w, h) = self.inner.size();
        (w / self.ratio, h / self.ratio)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: Color, width: f64) {
        let scaled = self.scale_points(points);
        self.inner.stroke_polyline(&scaled, color, width * self.ratio);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
        let scaled = self.scale_points(points);
        self.inner.fill_polygon(&scaled, color);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.inner.fill_rect(
            x * self.ratio,
            y * self.ratio,
            w * self.ratio,
            h * self.ratio,
            color,
        );
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Color, align: HAlign, baseline: VAlign) {
        self.inner
            .draw_text(text, x * self.ratio, y * self.ratio, color, align, baseline);
    }

    fn draw_text_rotated(&mut self, text: &str, x: f64, y: f64, color: Color) {
        self.inner
            .draw_text_rotated(text, x * self.ratio, y * self.ratio, color);
    }

    fn measure_text(&self, text: &str) -> f64 {
        self.inner.measure_text(text) / self.ratio
    }

    fn line_height(&self) -> f64 {
        self.inner.line_height() / self.ratio
    }
}
