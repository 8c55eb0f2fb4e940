//! Series rendering: polylines and area fills with adaptive downsampling.

use crate::chart::{ChartSpec, Extractor, RenderState};
use crate::surface::Surface;

/// Window size above which plotting starts skipping samples.
pub const SKIP_THRESHOLD: usize = 1000;

/// Stroke width for series polylines.
const LINE_WIDTH: f64 = 2.0;

/// Downsampling stride for a window of `n` samples.
///
/// Bounds the vertex count at roughly a thousand regardless of window size.
/// `1` for windows at or below the threshold, so small windows render every
/// point exactly.
pub fn skip_factor(n: usize) -> usize {
    if n > SKIP_THRESHOLD { n / SKIP_THRESHOLD } else { 1 }
}

/// Surface coordinates for one channel across the window.
///
/// Every skip-th sample is plotted; the final sample is force-included at its
/// true x position even when it does not align with the stride, so the
/// end-of-series value is always exact.
pub fn plot_points(state: &RenderState, extract: Extractor) -> Vec<(f64, f64)> {
    let n = state.window.len();
    let skip = skip_factor(n);
    let mut points = Vec::with_capacity(n / skip + 2);
    let mut i = 0;
    while i < n {
        points.push((state.x(i), state.y(extract(&state.window[i]))));
        i += skip;
    }
    if n > 0 && (n - 1) % skip != 0 {
        points.push((state.x(n - 1), state.y(extract(&state.window[n - 1]))));
    }
    points
}

/// Draw every channel of the chart: optional baseline-anchored area fill,
/// then the polyline on top.
pub fn draw(surface: &mut dyn Surface, state: &RenderState, spec: &ChartSpec) {
    for channel in &spec.channels {
        let points = plot_points(state, channel.extract);
        if points.is_empty() {
            continue;
        }
        if let Some(fill) = channel.fill_under {
            let mut polygon = Vec::with_capacity(points.len() + 2);
            polygon.push((points[0].0, state.baseline()));
            polygon.extend_from_slice(&points);
            polygon.push((points[points.len() - 1].0, state.baseline()));
            surface.fill_polygon(&polygon, fill);
        }
        surface.stroke_polyline(&points, channel.color, LINE_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartSpec, RenderState};
    use crate::sample::Sample;
    use crate::scale::Margins;
    use crate::surface::{DrawOp, RecordingSurface, palette};
    use std::sync::Arc;

    fn rising_state(n: usize, spec: &ChartSpec) -> RenderState {
        // Monotonically increasing sent counts.
        let window: Vec<Sample> = (0..n)
            .map(|i| Sample::synthetic(i as f64, i as u64, i as u64, 0.0, 1.0))
            .collect();
        RenderState::compute(Arc::from(window), (400.0, 200.0), Margins::DEFAULT, spec).unwrap()
    }

    const SENT: Extractor = |s| s.sent as f64;

    #[test]
    fn test_skip_factor_thresholds() {
        assert_eq!(skip_factor(0), 1);
        assert_eq!(skip_factor(1000), 1);
        assert_eq!(skip_factor(1001), 1);
        assert_eq!(skip_factor(2000), 2);
        assert_eq!(skip_factor(10_000), 10);
    }

    #[test]
    fn test_small_window_plots_every_point() {
        let spec = ChartSpec::packets();
        let state = rising_state(500, &spec);
        let points = plot_points(&state, SENT);
        assert_eq!(points.len(), 500);
    }

    #[test]
    fn test_large_window_downsamples_with_exact_tail() {
        // 2000 samples, skip factor 2.
        let spec = ChartSpec::packets();
        let state = rising_state(2000, &spec);
        let points = plot_points(&state, SENT);
        // Strided vertices 0,2,...,1998 plus the forced final sample.
        assert_eq!(points.len(), 1001);
        let skip = skip_factor(2000);
        assert!(points.len() <= 2000usize.div_ceil(skip) + 1);
        let last = points.last().unwrap();
        assert!((last.0 - state.x(1999)).abs() < 1e-9);
        assert!((last.1 - state.y(1999.0)).abs() < 1e-9);
    }

    #[test]
    fn test_aligned_tail_not_duplicated() {
        // 3001 samples, skip 3: index 3000 is stride-aligned, so no extra
        // vertex is appended.
        let spec = ChartSpec::packets();
        let state = rising_state(3001, &spec);
        let points = plot_points(&state, SENT);
        assert_eq!(points.len(), 1001);
        let (last_x, _) = *points.last().unwrap();
        let (prev_x, _) = points[points.len() - 2];
        assert!(last_x > prev_x);
    }

    #[test]
    fn test_x_positions_monotonic() {
        let spec = ChartSpec::packets();
        let state = rising_state(2500, &spec);
        let points = plot_points(&state, SENT);
        for pair in points.windows(2) {
            assert!(pair[1].0 > pair[0].0);
        }
    }

    #[test]
    fn test_loss_channel_fills_to_baseline() {
        let window: Vec<Sample> = (0..10)
            .map(|i| Sample::synthetic(i as f64, 10, 9, 10.0, 1.0))
            .collect();
        let spec = ChartSpec::loss();
        let state =
            RenderState::compute(Arc::from(window), (400.0, 200.0), Margins::DEFAULT, &spec)
                .unwrap();
        let mut surface = RecordingSurface::new(400.0, 200.0);
        draw(&mut surface, &state, &spec);
        let polygon = surface
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Polygon { points, color } if *color == palette::LOSS_FILL => Some(points),
                _ => None,
            })
            .expect("loss chart should emit an area fill");
        // Anchored to the baseline at both ends.
        assert_eq!(polygon.first().unwrap().1, state.baseline());
        assert_eq!(polygon.last().unwrap().1, state.baseline());
    }

    #[test]
    fn test_single_sample_emits_one_vertex() {
        let spec = ChartSpec::packets();
        let state = rising_state(1, &spec);
        let points = plot_points(&state, SENT);
        assert_eq!(points.len(), 1);
        assert!(points[0].0.is_finite() && points[0].1.is_finite());
    }
}
