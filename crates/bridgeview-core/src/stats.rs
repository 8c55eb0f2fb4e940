//! Summary statistics for the stat tiles.

use crate::sample::Sample;

/// Severity grading for stat tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Good,
    Warn,
    Danger,
}

impl Severity {
    /// Loss percentage: anything over 10% is a problem, anything over zero is
    /// worth a look.
    pub fn for_loss(pct: f64) -> Self {
        if pct > 10.0 {
            Severity::Danger
        } else if pct > 0.0 {
            Severity::Warn
        } else {
            Severity::Good
        }
    }

    /// Delivery success rate.
    pub fn for_success(pct: f64) -> Self {
        if pct > 95.0 {
            Severity::Good
        } else if pct > 85.0 {
            Severity::Warn
        } else {
            Severity::Danger
        }
    }
}

/// High-water packet totals.
///
/// The bridge trims its window to the most recent records, so summing the
/// displayed window can go *down* between refreshes. Totals only ever ratchet
/// upward.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalsTracker {
    sent: u64,
    received: u64,
}

impl TotalsTracker {
    /// Fold a freshly fetched window into the totals.
    pub fn observe(&mut self, window: &[Sample]) {
        let sent: u64 = window.iter().map(|s| s.sent).sum();
        let received: u64 = window.iter().map(|s| s.received).sum();
        if sent > self.sent {
            self.sent = sent;
        }
        if received > self.received {
            self.received = received;
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

/// Aggregates over the currently displayed window.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub avg_rtt: f64,
    /// Aggregate loss across the window, from the packet counters.
    pub total_loss: f64,
    pub success_rate: f64,
    pub latest: Sample,
}

impl SummaryStats {
    /// `None` for an empty window.
    pub fn compute(window: &[Sample]) -> Option<Self> {
        let latest = window.last()?.clone();
        let n = window.len() as f64;
        let avg_rtt = window.iter().map(|s| s.rtt).sum::<f64>() / n;
        let sent: u64 = window.iter().map(|s| s.sent).sum();
        let received: u64 = window.iter().map(|s| s.received).sum();
        let (total_loss, success_rate) = if sent > 0 {
            (
                (sent as f64 - received as f64) / sent as f64 * 100.0,
                received as f64 / sent as f64 * 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        Some(Self {
            avg_rtt,
            total_loss,
            success_rate,
            latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sent: u64, received: u64, rtt: f64) -> Sample {
        Sample::synthetic(0.0, sent, received, 0.0, rtt)
    }

    #[test]
    fn test_totals_ratchet_upward() {
        let mut totals = TotalsTracker::default();
        totals.observe(&[sample(50, 45, 1.0), sample(50, 50, 1.0)]);
        assert_eq!(totals.sent(), 100);
        assert_eq!(totals.received(), 95);

        // Server trimmed its window: sums shrink, totals must not.
        totals.observe(&[sample(30, 30, 1.0)]);
        assert_eq!(totals.sent(), 100);
        assert_eq!(totals.received(), 95);

        totals.observe(&[sample(80, 70, 1.0), sample(40, 40, 1.0)]);
        assert_eq!(totals.sent(), 120);
        assert_eq!(totals.received(), 110);
    }

    #[test]
    fn test_summary_aggregates() {
        let window = [sample(100, 90, 10.0), sample(100, 100, 20.0)];
        let stats = SummaryStats::compute(&window).unwrap();
        assert!((stats.avg_rtt - 15.0).abs() < 1e-9);
        assert!((stats.total_loss - 5.0).abs() < 1e-9);
        assert!((stats.success_rate - 95.0).abs() < 1e-9);
        assert_eq!(stats.latest.rtt, 20.0);
    }

    #[test]
    fn test_summary_empty_window() {
        assert!(SummaryStats::compute(&[]).is_none());
    }

    #[test]
    fn test_summary_zero_sent() {
        let stats = SummaryStats::compute(&[sample(0, 0, 1.0)]).unwrap();
        assert_eq!(stats.total_loss, 0.0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::for_loss(0.0), Severity::Good);
        assert_eq!(Severity::for_loss(0.1), Severity::Warn);
        assert_eq!(Severity::for_loss(10.0), Severity::Warn);
        assert_eq!(Severity::for_loss(10.1), Severity::Danger);

        assert_eq!(Severity::for_success(99.0), Severity::Good);
        assert_eq!(Severity::for_success(90.0), Severity::Warn);
        assert_eq!(Severity::for_success(80.0), Severity::Danger);
    }
}
