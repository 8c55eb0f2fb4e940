//! Background gridlines and axis labels.

use crate::chart::{ChartSpec, RenderState};
use crate::fmt;
use crate::surface::{HAlign, Surface, VAlign, palette};

/// Horizontal gridline count (and value-label steps).
pub const H_LINES: usize = 5;

/// Upper bound on vertical gridlines; sparse windows get one per sample.
pub const MAX_V_LINES: usize = 10;

/// Number of vertical gridlines for a window of `n` samples.
pub fn v_lines(n: usize) -> usize {
    n.min(MAX_V_LINES)
}

/// Index of the sample labeling vertical gridline `i` of `num_lines`.
pub fn tick_index(i: usize, n: usize, num_lines: usize) -> usize {
    if num_lines == 0 {
        return 0;
    }
    i * n.saturating_sub(1) / num_lines
}

/// Draw gridlines, value labels, time labels, and the axis titles.
pub fn draw(surface: &mut dyn Surface, state: &RenderState, spec: &ChartSpec) {
    let n = state.window.len();
    let m = state.margins;
    let area = state.area;

    // Horizontal gridlines.
    let y_step = area.height / H_LINES as f64;
    for i in 0..=H_LINES {
        let y = m.top + i as f64 * y_step;
        surface.stroke_polyline(
            &[(m.left, y), (m.left + area.width, y)],
            palette::GRID,
            1.0,
        );
    }

    // Vertical gridlines.
    let num_lines = v_lines(n);
    let x_step = area.width / num_lines as f64;
    for i in 0..=num_lines {
        let x = m.left + i as f64 * x_step;
        surface.stroke_polyline(
            &[(x, m.top), (x, m.top + area.height)],
            palette::GRID,
            1.0,
        );
    }

    // Value labels up the y axis, each over a backing rect so they stay
    // legible where they cross the grid.
    for i in 0..=H_LINES {
        let y = m.top + area.height - i as f64 * y_step;
        let value = i as f64 * state.transform.max_value / H_LINES as f64;
        let label = spec.format.axis(value);
        let text_width = surface.measure_text(&label);
        surface.fill_rect(
            m.left - text_width - 8.0,
            y - 10.0,
            text_width + 6.0,
            20.0,
            palette::BACKING,
        );
        surface.draw_text(
            &label,
            m.left - 5.0,
            y,
            palette::LABEL_TEXT,
            HAlign::Right,
            VAlign::Middle,
        );
    }

    // Time labels along the x axis.
    for i in 0..=num_lines {
        let index = tick_index(i, n, num_lines);
        if index >= n {
            continue;
        }
        let x = m.left + i as f64 * x_step;
        let label = fmt::format_time_short(state.window[index].timestamp);
        let text_width = surface.measure_text(&label);
        surface.fill_rect(
            x - text_width / 2.0 - 2.0,
            m.top + area.height + 2.0,
            text_width + 4.0,
            16.0,
            palette::BACKING,
        );
        surface.draw_text(
            &label,
            x,
            m.top + area.height + 5.0,
            palette::LABEL_TEXT,
            HAlign::Center,
            VAlign::Top,
        );
    }

    // Axis titles.
    surface.draw_text_rotated(
        spec.axis_label,
        m.left - 20.0,
        m.top + area.height / 2.0,
        palette::TEXT,
    );
    surface.draw_text(
        "Time",
        m.left + area.width / 2.0,
        m.top + area.height + 20.0,
        palette::TEXT,
        HAlign::Center,
        VAlign::Middle,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartSpec, RenderState};
    use crate::sample::Sample;
    use crate::scale::Margins;
    use crate::surface::{DrawOp, RecordingSurface};
    use std::sync::Arc;

    fn state(n: usize, spec: &ChartSpec) -> RenderState {
        let window: Vec<Sample> = (0..n)
            .map(|i| Sample::synthetic(1609459200.0 + 60.0 * i as f64, 100, 95, 5.0, 12.0))
            .collect();
        RenderState::compute(Arc::from(window), (400.0, 200.0), Margins::DEFAULT, spec).unwrap()
    }

    #[test]
    fn test_v_lines_capped_at_ten() {
        assert_eq!(v_lines(3), 3);
        assert_eq!(v_lines(10), 10);
        assert_eq!(v_lines(5000), 10);
    }

    #[test]
    fn test_tick_index_floors_and_stays_in_bounds() {
        let n = 37;
        let num = v_lines(n);
        let mut last = 0;
        for i in 0..=num {
            let idx = tick_index(i, n, num);
            assert!(idx < n);
            assert!(idx >= last);
            last = idx;
        }
        assert_eq!(tick_index(num, n, num), n - 1);
    }

    #[test]
    fn test_gridline_counts() {
        let spec = ChartSpec::rtt();
        let st = state(30, &spec);
        let mut surface = RecordingSurface::new(400.0, 200.0);
        draw(&mut surface, &st, &spec);
        let gridlines = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Polyline { color, .. } if *color == palette::GRID))
            .count();
        // 6 horizontal + 11 vertical (both edges included).
        assert_eq!(gridlines, 6 + 11);
    }

    #[test]
    fn test_value_labels_use_channel_format() {
        let spec = ChartSpec::loss();
        let st = state(5, &spec);
        let mut surface = RecordingSurface::new(400.0, 200.0);
        draw(&mut surface, &st, &spec);
        let labels: Vec<&str> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } if text.ends_with('%') => Some(text.as_str()),
                _ => None,
            })
            .collect();
        // 0%..100% in fifths, fixed domain.
        assert_eq!(labels.first(), Some(&"0.0%"));
        assert_eq!(labels.last(), Some(&"100.0%"));
        assert_eq!(labels.len(), 6);
    }

    #[test]
    fn test_each_label_has_backing_rect() {
        let spec = ChartSpec::packets();
        let st = state(12, &spec);
        let mut surface = RecordingSurface::new(400.0, 200.0);
        draw(&mut surface, &st, &spec);
        let backings = surface
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { color, .. } if *color == palette::BACKING))
            .count();
        let texts = surface
            .ops
            .iter()
            .filter(|op| {
                matches!(op, DrawOp::Text { text, .. } if text != "Time")
            })
            .count();
        assert_eq!(backings, texts);
    }

    #[test]
    fn test_axis_title_is_rotated() {
        let spec = ChartSpec::rtt();
        let st = state(5, &spec);
        let mut surface = RecordingSurface::new(400.0, 200.0);
        draw(&mut surface, &st, &spec);
        assert!(surface.ops.iter().any(|op| matches!(
            op,
            DrawOp::RotatedText { text, .. } if text == "RTT (ms)"
        )));
    }
}
