//! Blocking HTTP client for the bridge metrics API.
//!
//! The dashboard polls from a plain background thread, so the blocking
//! reqwest client is the right shape here; only the demo server is async.

use std::time::Duration;

use bridgeview_core::{IngestError, Sample, parse_window};
use thiserror::Error;
use time::Date;

/// Request timeout. Polling is periodic anyway, a slow bridge should fail
/// the cycle rather than stall the poller forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("bad payload: {0}")]
    Payload(#[from] IngestError),
}

/// Client for one bridge instance.
pub struct BridgeClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl BridgeClient {
    pub fn new(base: &str) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetch the `/api/data` payload as raw text.
    pub fn fetch_raw(&self) -> Result<String, FetchError> {
        let url = format!("{}/api/data", self.base);
        let body = self.http.get(&url).send()?.error_for_status()?.text()?;
        Ok(body)
    }

    /// Fetch and decode the full metric history.
    ///
    /// The bridge replies with its whole retained window every time, not a
    /// delta, so the result replaces whatever the caller held before.
    pub fn fetch_window(&self) -> Result<Vec<Sample>, FetchError> {
        let body = self.fetch_raw()?;
        Ok(parse_window(&body)?)
    }

    /// Fire-and-forget collection trigger.
    ///
    /// A failure is logged and swallowed: the bridge may already be
    /// collecting, or an older build may not expose the endpoint at all, and
    /// the dashboard keeps polling either way.
    pub fn start_metrics(&self) {
        let url = format!("{}/api/start-metrics", self.base);
        if let Err(e) = self.http.get(&url).send().and_then(|r| r.error_for_status()) {
            log::warn!("start-metrics trigger failed: {e}");
        }
    }

    /// Fire-and-forget translation-bridge trigger. Same contract as
    /// [`start_metrics`](Self::start_metrics).
    pub fn start_translation(&self) {
        let url = format!("{}/api/start-translation", self.base);
        if let Err(e) = self.http.post(&url).send().and_then(|r| r.error_for_status()) {
            log::warn!("start-translation trigger failed: {e}");
        }
    }
}

/// Default export file name for a metrics snapshot taken on `date`.
pub fn export_file_name(date: Date) -> String {
    format!("bridge-metrics-{date}.json")
}
