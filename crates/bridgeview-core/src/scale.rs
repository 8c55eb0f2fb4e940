//! Scale calculation: data window + drawing area → pixel transforms.

use crate::sample::Sample;

/// Fixed margins around the drawing area, in logical units.
///
/// The left margin holds value labels and the rotated axis title, the bottom
/// margin holds time labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    /// Canvas-style margins (pixels).
    pub const DEFAULT: Margins = Margins {
        left: 30.0,
        right: 10.0,
        top: 10.0,
        bottom: 20.0,
    };

    /// Terminal-cell margins. A cell is roughly 8×16 px, so the pixel preset
    /// would swallow most of the chart.
    pub const COMPACT: Margins = Margins {
        left: 9.0,
        right: 1.0,
        top: 1.0,
        bottom: 2.0,
    };
}

/// Drawing area after margins are subtracted, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawArea {
    pub width: f64,
    pub height: f64,
}

impl DrawArea {
    /// Inset a canvas of `width`×`height` by `margins`, clamping to zero so
    /// tiny viewports degrade to an empty (skipped) draw rather than negative
    /// geometry.
    pub fn inset(width: f64, height: f64, margins: Margins) -> Self {
        Self {
            width: (width - margins.left - margins.right).max(0.0),
            height: (height - margins.top - margins.bottom).max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Y-axis domain policy for a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YDomain {
    /// Scale against the window's observed channel maximum, with headroom so
    /// the curve never touches the top edge.
    Auto { headroom: f64 },
    /// Fixed domain, e.g. 100 for the percentage chart.
    Fixed(f64),
}

impl YDomain {
    pub const AUTO: YDomain = YDomain::Auto { headroom: 1.1 };
    pub const PERCENT: YDomain = YDomain::Fixed(100.0);
}

/// Horizontal scale: logical units per sample step.
///
/// `max(n-1, 1)` keeps a single-sample window well-defined.
pub fn x_scale(n: usize, draw_width: f64) -> f64 {
    draw_width / n.saturating_sub(1).max(1) as f64
}

/// Pixel transforms for one chart render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x_scale: f64,
    pub y_scale: f64,
    /// The value the top gridline corresponds to.
    pub max_value: f64,
}

/// Maximum of the given channels across the whole window.
///
/// Non-finite values are ignored so one bad record cannot poison the scale.
pub fn channel_max<'a, I>(window: &[Sample], extractors: I) -> f64
where
    I: IntoIterator<Item = &'a fn(&Sample) -> f64>,
{
    let mut max = f64::NEG_INFINITY;
    for extract in extractors {
        for sample in window {
            let v = extract(sample);
            if v.is_finite() && v > max {
                max = v;
            }
        }
    }
    max
}

/// Compute the transforms for one chart over the full displayed window.
///
/// All-zero (or empty) channels scale against 1.0 instead of producing a
/// degenerate division.
pub fn transform<'a, I>(window: &[Sample], extractors: I, area: DrawArea, domain: YDomain) -> Transform
where
    I: IntoIterator<Item = &'a fn(&Sample) -> f64>,
{
    let max_value = match domain {
        YDomain::Fixed(v) => v,
        YDomain::Auto { headroom } => {
            let max = channel_max(window, extractors) * headroom;
            if max > 0.0 { max } else { 1.0 }
        }
    };
    Transform {
        x_scale: x_scale(window.len(), area.width),
        y_scale: area.height / max_value,
        max_value,
    }
}
