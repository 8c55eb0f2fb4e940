//! Wire sample decoding and normalization.
//!
//! The bridge reports metrics with some historical field-name drift: packet
//! loss arrives as `loss` or `packet_loss`, round-trip time as `rtt` or
//! `rtt_ms`. Everything downstream of this module works with the canonical
//! [`Sample`] shape — one field per concept — so normalization happens exactly
//! once, at ingestion.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced while decoding a metrics payload.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The endpoint returned something other than a JSON array.
    #[error("metrics payload is not an array (got {0})")]
    NotAnArray(&'static str),
    /// A record inside the array failed to decode.
    #[error("failed to decode metrics record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One metric record as it appears on the wire.
///
/// Optional fields cover both naming variants; [`RawSample::normalize`]
/// collapses them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub timestamp: f64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub received: u64,
    #[serde(default)]
    pub loss: Option<f64>,
    #[serde(default)]
    pub packet_loss: Option<f64>,
    #[serde(default)]
    pub rtt: Option<f64>,
    #[serde(default)]
    pub rtt_ms: Option<f64>,
}

/// One normalized metric sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub sent: u64,
    pub received: u64,
    /// Packet loss percentage. Derived from the counters when the wire record
    /// carries neither loss field. Deliberately unclamped: inconsistent
    /// upstream counters (received > sent) produce a negative value, and the
    /// renderer must cope rather than hide it.
    pub loss: f64,
    /// Round-trip time in milliseconds.
    pub rtt: f64,
}

impl RawSample {
    /// Collapse the dual-named wire fields into the canonical shape.
    ///
    /// The explicit variants (`packet_loss`, `rtt_ms`) win when both are
    /// present.
    pub fn normalize(self) -> Sample {
        let loss = self
            .packet_loss
            .or(self.loss)
            .unwrap_or_else(|| derived_loss(self.sent, self.received));
        let rtt = self.rtt_ms.or(self.rtt).unwrap_or(0.0);
        Sample {
            timestamp: self.timestamp,
            source: self.source,
            destination: self.destination,
            sent: self.sent,
            received: self.received,
            loss,
            rtt,
        }
    }
}

impl Sample {
    /// Build a sample directly, mainly for tests and the demo synthesizer.
    pub fn synthetic(timestamp: f64, sent: u64, received: u64, loss: f64, rtt: f64) -> Self {
        Self {
            timestamp,
            source: None,
            destination: None,
            sent,
            received,
            loss,
            rtt,
        }
    }
}

/// Loss percentage derived from the packet counters.
///
/// Computed in floating point so `received > sent` yields a negative
/// percentage instead of an integer underflow.
pub fn derived_loss(sent: u64, received: u64) -> f64 {
    if sent == 0 {
        return 0.0;
    }
    (sent as f64 - received as f64) / sent as f64 * 100.0
}

/// Parse a metrics payload into a normalized sample window.
///
/// The endpoint replaces the whole history on every fetch, so the result is
/// the complete new window, in wire order. A non-array payload is rejected;
/// callers keep their last-known-good window in that case.
pub fn parse_window(payload: &str) -> Result<Vec<Sample>, IngestError> {
    let value: Value = serde_json::from_str(payload)?;
    let records = match value {
        Value::Array(records) => records,
        other => return Err(IngestError::NotAnArray(json_type(&other))),
    };
    records
        .into_iter()
        .map(|record| {
            serde_json::from_value::<RawSample>(record)
                .map(RawSample::normalize)
                .map_err(IngestError::from)
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_loss_from_counters() {
        // sent=50, received=40 => 20.0%
        let window = parse_window(r#"[{"timestamp": 1.0, "sent": 50, "received": 40}]"#).unwrap();
        assert_eq!(window.len(), 1);
        assert!((window[0].loss - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_variant_wins() {
        let window = parse_window(
            r#"[{"timestamp": 1.0, "sent": 10, "received": 10,
                 "loss": 1.0, "packet_loss": 2.5, "rtt": 3.0, "rtt_ms": 4.5}]"#,
        )
        .unwrap();
        assert!((window[0].loss - 2.5).abs() < 1e-9);
        assert!((window[0].rtt - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_short_names_accepted() {
        let window = parse_window(
            r#"[{"timestamp": 1.0, "sent": 10, "received": 9, "loss": 10.0, "rtt": 7.0}]"#,
        )
        .unwrap();
        assert!((window[0].loss - 10.0).abs() < 1e-9);
        assert!((window[0].rtt - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_inconsistent_counters_give_negative_loss() {
        // received > sent is malformed but must not crash or clamp.
        let window = parse_window(r#"[{"timestamp": 1.0, "sent": 10, "received": 12}]"#).unwrap();
        assert!((window[0].loss - (-20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sent_derives_zero_loss() {
        let window = parse_window(r#"[{"timestamp": 1.0, "sent": 0, "received": 0}]"#).unwrap();
        assert_eq!(window[0].loss, 0.0);
    }

    #[test]
    fn test_non_array_payload_rejected() {
        let err = parse_window(r#"{"error": "unauthorized"}"#).unwrap_err();
        assert!(matches!(err, IngestError::NotAnArray("object")));
    }

    #[test]
    fn test_empty_array_is_empty_window() {
        assert!(parse_window("[]").unwrap().is_empty());
    }

    #[test]
    fn test_bad_record_is_decode_error() {
        let err = parse_window(r#"[{"timestamp": "yesterday"}]"#).unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }
}
