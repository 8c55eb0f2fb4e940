//! Per-chart descriptors and the draw orchestrator.
//!
//! Each chart is described by a [`ChartSpec`] — channel list, value
//! extractors, axis label, y-domain policy — so the grid/series/hover code is
//! generic and never branches on which chart it is rendering. The
//! [`Dashboard`] owns the sample window and re-runs the full pipeline
//! whenever new data arrives or the viewport changes size.

use std::sync::Arc;
use std::time::Instant;

use crate::sample::Sample;
use crate::scale::{self, DrawArea, Margins, Transform, YDomain};
use crate::stats::TotalsTracker;
use crate::surface::{Color, Surface, palette};
use crate::{grid, hover, series};

/// Pulls one numeric channel out of a sample.
pub type Extractor = fn(&Sample) -> f64;

/// Number formatting rules for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Packet counts: integers.
    Count,
    /// Loss: one-decimal percentage.
    Percent,
    /// RTT: one-decimal "ms" on the axis, two decimals in the tooltip.
    Millis,
}

impl ValueFormat {
    /// Axis gridline label.
    pub fn axis(&self, value: f64) -> String {
        match self {
            ValueFormat::Count => format!("{value:.0}"),
            ValueFormat::Percent => format!("{value:.1}%"),
            ValueFormat::Millis => format!("{value:.1} ms"),
        }
    }

    /// Tooltip value line.
    pub fn tooltip(&self, value: f64) -> String {
        match self {
            ValueFormat::Count => format!("{value:.0}"),
            ValueFormat::Percent => format!("{value:.1}%"),
            ValueFormat::Millis => format!("{value:.2} ms"),
        }
    }
}

/// One rendered series within a chart.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub name: &'static str,
    pub color: Color,
    pub extract: Extractor,
    /// Fill the area between the curve and the x-axis baseline.
    pub fill_under: Option<Color>,
}

/// Everything the generic renderers need to know about one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: &'static str,
    /// Rotated y-axis title.
    pub axis_label: &'static str,
    pub format: ValueFormat,
    pub y_domain: YDomain,
    pub channels: Vec<ChannelSpec>,
}

impl ChartSpec {
    /// Packets sent/received, auto-scaled.
    pub fn packets() -> Self {
        Self {
            title: "Packets",
            axis_label: "Packets",
            format: ValueFormat::Count,
            y_domain: YDomain::AUTO,
            channels: vec![
                ChannelSpec {
                    name: "Sent",
                    color: palette::SENT,
                    extract: |s| s.sent as f64,
                    fill_under: None,
                },
                ChannelSpec {
                    name: "Received",
                    color: palette::RECEIVED,
                    extract: |s| s.received as f64,
                    fill_under: None,
                },
            ],
        }
    }

    /// Packet loss percentage over a fixed 0..100 domain, with area fill.
    pub fn loss() -> Self {
        Self {
            title: "Packet Loss",
            axis_label: "Loss %",
            format: ValueFormat::Percent,
            y_domain: YDomain::PERCENT,
            channels: vec![ChannelSpec {
                name: "Loss",
                color: palette::LOSS,
                extract: |s| s.loss,
                fill_under: Some(palette::LOSS_FILL),
            }],
        }
    }

    /// Round-trip time, auto-scaled.
    pub fn rtt() -> Self {
        Self {
            title: "Round-Trip Time",
            axis_label: "RTT (ms)",
            format: ValueFormat::Millis,
            y_domain: YDomain::AUTO,
            channels: vec![ChannelSpec {
                name: "RTT",
                color: palette::RTT,
                extract: |s| s.rtt,
                fill_under: None,
            }],
        }
    }
}

/// Immutable per-render snapshot: the window, the drawing area, and the
/// transforms derived from them.
///
/// Built fresh on every draw and handed to each rendering step, then kept on
/// the view so hover hit-testing always reads exactly what is on screen.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub window: Arc<[Sample]>,
    /// Full logical canvas size, before margins.
    pub canvas: (f64, f64),
    pub margins: Margins,
    pub area: DrawArea,
    pub transform: Transform,
}

impl RenderState {
    /// Returns `None` when there is nothing to draw: an empty window, or a
    /// viewport too small to hold the margins.
    pub fn compute(
        window: Arc<[Sample]>,
        canvas: (f64, f64),
        margins: Margins,
        spec: &ChartSpec,
    ) -> Option<Self> {
        if window.is_empty() {
            return None;
        }
        let area = DrawArea::inset(canvas.0, canvas.1, margins);
        if area.is_empty() {
            return None;
        }
        let transform = scale::transform(
            &window,
            spec.channels.iter().map(|c| &c.extract),
            area,
            spec.y_domain,
        );
        Some(Self {
            window,
            canvas,
            margins,
            area,
            transform,
        })
    }

    /// Surface x coordinate of sample `i`.
    pub fn x(&self, i: usize) -> f64 {
        self.margins.left + i as f64 * self.transform.x_scale
    }

    /// Surface y coordinate of `value`.
    pub fn y(&self, value: f64) -> f64 {
        self.margins.top + self.area.height - value * self.transform.y_scale
    }

    /// Surface y of the x-axis baseline (value 0).
    pub fn baseline(&self) -> f64 {
        self.margins.top + self.area.height
    }
}

/// One chart: its descriptor, hover controller, and last rendered state.
pub struct ChartView {
    pub spec: ChartSpec,
    pub hover: hover::HoverController,
    state: Option<RenderState>,
}

impl ChartView {
    fn new(spec: ChartSpec) -> Self {
        Self {
            spec,
            hover: hover::HoverController::new(),
            state: None,
        }
    }

    /// State of the most recent completed draw, if any.
    pub fn render_state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }
}

/// Owns the sample window and the set of chart views, and re-runs the draw
/// pipeline on refresh or resize.
pub struct Dashboard {
    window: Arc<[Sample]>,
    margins: Margins,
    views: Vec<ChartView>,
    pub totals: TotalsTracker,
}

impl Dashboard {
    /// The stock three-chart dashboard: packets, loss, RTT.
    pub fn new(margins: Margins) -> Self {
        Self::with_specs(
            vec![ChartSpec::packets(), ChartSpec::loss(), ChartSpec::rtt()],
            margins,
        )
    }

    pub fn with_specs(specs: Vec<ChartSpec>, margins: Margins) -> Self {
        Self {
            window: Arc::from(Vec::new()),
            margins,
            views: specs.into_iter().map(ChartView::new).collect(),
            totals: TotalsTracker::default(),
        }
    }

    /// Replace the sample window wholesale with a freshly fetched history.
    ///
    /// Views keep rendering their previous window until the next draw, which
    /// is when they snapshot the new one.
    pub fn update(&mut self, window: Vec<Sample>) {
        self.totals.observe(&window);
        self.window = Arc::from(window);
    }

    pub fn window(&self) -> &[Sample] {
        &self.window
    }

    pub fn views(&self) -> &[ChartView] {
        &self.views
    }

    /// Run the full pipeline for one chart: clear, grid, series, hover
    /// overlay.
    ///
    /// With an empty window or a degenerate surface this is a no-op and the
    /// previously rendered frame (and hover binding) stays untouched. An
    /// unknown view index is also a no-op, mirroring a missing chart
    /// container.
    pub fn draw(&mut self, view: usize, surface: &mut dyn Surface) {
        let Some(view) = self.views.get_mut(view) else {
            log::debug!("draw skipped: no chart view at index");
            return;
        };
        let Some(state) =
            RenderState::compute(Arc::clone(&self.window), surface.size(), self.margins, &view.spec)
        else {
            return;
        };

        surface.clear();
        grid::draw(surface, &state, &view.spec);
        series::draw(surface, &state, &view.spec);
        view.hover.draw(surface, &state, &view.spec);
        view.state = Some(state);
    }

    /// Route a pointer-move to a chart. Returns `true` when the event was
    /// handled (not throttled away, inside bounds, and a frame has been
    /// drawn).
    pub fn pointer_moved(&mut self, view: usize, pos: (f64, f64), now: Instant) -> bool {
        let Some(view) = self.views.get_mut(view) else {
            return false;
        };
        match &view.state {
            Some(state) => view.hover.pointer_moved(pos, now, state),
            None => false,
        }
    }

    /// Pointer left the chart: hide guide, markers, and tooltip.
    pub fn pointer_left(&mut self, view: usize) {
        if let Some(view) = self.views.get_mut(view) {
            view.hover.pointer_left();
        }
    }
}
