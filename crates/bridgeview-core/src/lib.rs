//! # bridgeview-core
//!
//! Charting engine for NAT64 bridge telemetry.
//!
//! `bridgeview-core` turns an ordered window of timestamped metric samples
//! (packets sent/received, packet loss %, round-trip time) into pixel-accurate
//! line/area plots: gridlines, axis labels, adaptive downsampling for large
//! windows, and pointer-driven hover hit-testing. It draws through the
//! [`Surface`] trait and never touches a concrete backend, so the same code
//! renders to a terminal canvas, an image buffer, or a test recorder.
//!
//! ## Quick start
//!
//! ```
//! use bridgeview_core::{Dashboard, Margins, RecordingSurface, Sample};
//!
//! let window: Vec<Sample> = (0..60)
//!     .map(|i| Sample::synthetic(i as f64, 10, 10, 0.0, 12.5))
//!     .collect();
//!
//! let mut dash = Dashboard::new(Margins::DEFAULT);
//! dash.update(window);
//!
//! let mut surface = RecordingSurface::new(400.0, 200.0);
//! dash.draw(0, &mut surface); // packets chart
//! assert!(!surface.ops.is_empty());
//! ```
//!
//! ## Architecture
//!
//! Samples → [`Dashboard`] → per-chart pipeline (scale → grid → series →
//! hover overlay), one [`chart::ChartSpec`] descriptor per chart. Every draw
//! builds a fresh immutable [`chart::RenderState`]; nothing is mutated in
//! place between refreshes, so rendering is a pure function of the window and
//! the drawing area.

pub mod chart;
pub mod fmt;
pub mod grid;
pub mod hover;
pub mod sample;
pub mod scale;
pub mod series;
pub mod stats;
pub mod surface;

pub use chart::{ChannelSpec, ChartSpec, Dashboard, RenderState, ValueFormat};
pub use hover::HoverController;
pub use sample::{IngestError, Sample, parse_window};
pub use scale::{DrawArea, Margins, Transform, YDomain};
pub use stats::{Severity, SummaryStats, TotalsTracker};
pub use surface::{Color, HAlign, RecordingSurface, ScaledSurface, Surface, VAlign};

/// Crate version, surfaced by the CLI `--version` flag.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
