//! Pointer hover: throttling, nearest-sample hit-testing, and the
//! guide/marker/tooltip overlay.

use std::time::{Duration, Instant};

use crate::chart::{ChartSpec, RenderState};
use crate::fmt;
use crate::scale;
use crate::surface::{HAlign, Surface, VAlign, palette};

/// Minimum interval between handled pointer-move events (~60 Hz).
pub const THROTTLE_INTERVAL: Duration = Duration::from_millis(16);

/// Tooltip offset from the pointer, in line heights.
const TOOLTIP_OFFSET_X: f64 = 1.1;

/// Marker half-size, in line heights.
const MARKER: f64 = 0.15;

/// Drop-don't-queue event throttle.
///
/// Events arriving within the interval are simply never processed; a later
/// pointer position supersedes an earlier one, so there is nothing worth
/// queueing.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Returns `true` and arms the timer if enough time has passed since the
    /// last accepted event.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Map a fractional horizontal position to the nearest sample index.
///
/// Round-to-nearest, clamped to `[0, n-1]`; monotonic in `fraction`.
pub fn index_for(fraction: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let idx = (fraction * (n - 1) as f64).round();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}

/// Last-known pointer position and the sample it maps to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    /// Pointer position in surface coordinates.
    pub pointer: (f64, f64),
    pub index: usize,
}

/// Per-chart hover controller.
///
/// Hit-testing always runs against the [`RenderState`] of the chart's most
/// recent draw, never a cached transform, so a refresh or resize can not
/// leave the overlay pointing at stale geometry.
pub struct HoverController {
    throttle: Throttle,
    state: Option<HoverState>,
}

impl Default for HoverController {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverController {
    pub fn new() -> Self {
        Self::with_interval(THROTTLE_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            throttle: Throttle::new(interval),
            state: None,
        }
    }

    pub fn state(&self) -> Option<&HoverState> {
        self.state.as_ref()
    }

    /// Handle a pointer move. Returns `false` when the event was dropped:
    /// outside the canvas, inside the throttle window, or before any draw.
    pub fn pointer_moved(&mut self, pos: (f64, f64), now: Instant, state: &RenderState) -> bool {
        let (w, h) = state.canvas;
        if pos.0 < 0.0 || pos.0 > w || pos.1 < 0.0 || pos.1 > h {
            return false;
        }
        if !self.throttle.ready(now) {
            return false;
        }
        let fraction = if w > 0.0 { pos.0 / w } else { 0.0 };
        let index = index_for(fraction, state.window.len());
        self.state = Some(HoverState { pointer: pos, index });
        true
    }

    /// Pointer left the canvas: hide everything.
    pub fn pointer_left(&mut self) {
        self.state = None;
    }

    /// Draw the hover overlay: vertical guide line, one marker per channel,
    /// and the tooltip. No-op while no pointer is inside the chart.
    pub fn draw(&self, surface: &mut dyn Surface, state: &RenderState, spec: &ChartSpec) {
        let Some(hover) = &self.state else {
            return;
        };
        let Some(sample) = state.window.get(hover.index) else {
            return;
        };
        let (px, py) = hover.pointer;

        // Vertical guide line at the pointer.
        surface.stroke_polyline(
            &[(px, state.margins.top), (px, state.baseline())],
            palette::GUIDE,
            1.0,
        );

        // Geometry scales with the backend's text metrics, so the overlay
        // stays compact on cell-based surfaces.
        let line_height = surface.line_height();
        let marker = MARKER * line_height;

        // Markers are positioned against the full window's scale, recomputed
        // here rather than read from the cached transform.
        let transform = scale::transform(
            &state.window,
            spec.channels.iter().map(|c| &c.extract),
            state.area,
            spec.y_domain,
        );
        for channel in &spec.channels {
            let value = (channel.extract)(sample);
            let y = state.margins.top + state.area.height - value * transform.y_scale;
            surface.fill_rect(
                px - marker,
                y - marker,
                marker * 2.0,
                marker * 2.0,
                channel.color,
            );
        }

        // Tooltip: formatted timestamp plus one line per channel.
        let lines = tooltip_lines(sample, spec);
        let widest = lines
            .iter()
            .map(|l| surface.measure_text(l))
            .fold(0.0, f64::max);
        let pad = surface.measure_text("m");
        let box_w = widest + pad;
        let box_h = (lines.len() as f64 + 0.4) * line_height;
        let (w, _) = state.canvas;
        let x = (px + TOOLTIP_OFFSET_X * line_height).min(w - box_w).max(0.0);
        let y = py.min(state.baseline() - box_h).max(0.0);
        surface.fill_rect(x, y, box_w, box_h, palette::BACKING);
        for (i, line) in lines.iter().enumerate() {
            surface.draw_text(
                line,
                x + pad / 2.0,
                y + (0.2 + i as f64) * line_height,
                palette::LABEL_TEXT,
                HAlign::Left,
                VAlign::Top,
            );
        }
    }
}

/// Tooltip text: `Time: HH:MM:SS` plus `<channel>: <value>` per channel.
pub fn tooltip_lines(sample: &crate::sample::Sample, spec: &ChartSpec) -> Vec<String> {
    let mut lines = Vec::with_capacity(spec.channels.len() + 1);
    lines.push(format!("Time: {}", fmt::format_time(sample.timestamp)));
    for channel in &spec.channels {
        lines.push(format!(
            "{}: {}",
            channel.name,
            spec.format.tooltip((channel.extract)(sample))
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartSpec, RenderState};
    use crate::sample::Sample;
    use crate::scale::Margins;
    use crate::surface::{DrawOp, RecordingSurface};
    use std::sync::Arc;

    fn render_state(n: usize, spec: &ChartSpec) -> RenderState {
        let window: Vec<Sample> = (0..n)
            .map(|i| Sample::synthetic(1609459200.0 + i as f64, 40 + i as u64, 40, 2.0, 9.5))
            .collect();
        RenderState::compute(Arc::from(window), (400.0, 200.0), Margins::DEFAULT, spec).unwrap()
    }

    #[test]
    fn test_index_for_right_edge_maps_to_last() {
        // The exact right edge is the last sample, never out of bounds.
        assert_eq!(index_for(1.0, 50), 49);
        assert_eq!(index_for(1.2, 50), 49);
    }

    #[test]
    fn test_index_for_left_edge_and_negatives() {
        assert_eq!(index_for(0.0, 50), 0);
        assert_eq!(index_for(-0.3, 50), 0);
        assert_eq!(index_for(0.5, 0), 0);
    }

    #[test]
    fn test_index_mapping_is_monotonic() {
        let n = 37;
        let mut last = 0;
        for step in 0..=1000 {
            let idx = index_for(step as f64 / 1000.0, n);
            assert!(idx >= last, "index decreased moving rightward");
            last = idx;
        }
        assert_eq!(last, n - 1);
    }

    #[test]
    fn test_throttle_drops_events_within_window() {
        let mut throttle = Throttle::new(Duration::from_millis(16));
        let t0 = Instant::now();
        assert!(throttle.ready(t0));
        assert!(!throttle.ready(t0 + Duration::from_millis(5)));
        assert!(!throttle.ready(t0 + Duration::from_millis(15)));
        assert!(throttle.ready(t0 + Duration::from_millis(16)));
    }

    #[test]
    fn test_pointer_moved_updates_state() {
        let spec = ChartSpec::rtt();
        let state = render_state(50, &spec);
        let mut hover = HoverController::new();
        assert!(hover.pointer_moved((400.0, 10.0), Instant::now(), &state));
        assert_eq!(hover.state().unwrap().index, 49);
    }

    #[test]
    fn test_pointer_outside_canvas_ignored() {
        let spec = ChartSpec::rtt();
        let state = render_state(50, &spec);
        let mut hover = HoverController::new();
        assert!(!hover.pointer_moved((401.0, 10.0), Instant::now(), &state));
        assert!(!hover.pointer_moved((10.0, -1.0), Instant::now(), &state));
        assert!(hover.state().is_none());
    }

    #[test]
    fn test_pointer_left_hides_overlay() {
        let spec = ChartSpec::loss();
        let state = render_state(10, &spec);
        let mut hover = HoverController::new();
        hover.pointer_moved((100.0, 50.0), Instant::now(), &state);
        assert!(hover.state().is_some());
        hover.pointer_left();
        assert!(hover.state().is_none());

        let mut surface = RecordingSurface::new(400.0, 200.0);
        hover.draw(&mut surface, &state, &spec);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_overlay_draws_guide_markers_tooltip() {
        let spec = ChartSpec::packets();
        let state = render_state(20, &spec);
        let mut hover = HoverController::new();
        hover.pointer_moved((200.0, 80.0), Instant::now(), &state);

        let mut surface = RecordingSurface::new(400.0, 200.0);
        hover.draw(&mut surface, &state, &spec);

        let guides = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { color, .. } if *color == palette::GUIDE))
            .count();
        assert_eq!(guides, 1);

        // One marker per channel (sent + received), plus the tooltip backing.
        let rects = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .count();
        assert_eq!(rects, 3);

        let texts: Vec<&String> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 3);
        assert!(texts[0].starts_with("Time: "));
        assert!(texts[1].starts_with("Sent: "));
        assert!(texts[2].starts_with("Received: "));
    }

    #[test]
    fn test_tooltip_formats_channel_values() {
        let spec = ChartSpec::loss();
        let sample = Sample::synthetic(1609459230.0, 50, 40, 20.0, 9.5);
        let lines = tooltip_lines(&sample, &spec);
        assert_eq!(lines, vec!["Time: 00:00:30", "Loss: 20.0%"]);
    }
}
