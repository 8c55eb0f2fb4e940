//! Demo NAT64 bridge metrics endpoint.
//!
//! Serves the same HTTP surface the real bridge exposes, backed by a
//! synthesizer that fabricates ping-like samples. Exists so the dashboard can
//! be developed and integration-tested without a bridge on the network.
//!
//! Endpoints:
//! - `GET /api/data` — full metric history as a JSON array (not a delta)
//! - `GET /api/start-metrics` — start the collection loop
//! - `POST /api/start-translation` — start the translation bridge (demo no-op)
//! - `GET /api/health` — liveness check

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{Json, Router, extract::State, routing::get, routing::post};
use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;

/// The displayed history is capped; old records fall off the front.
const WINDOW_CAP: usize = 100;

/// One fabricated metric record, in the bridge's wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct MetricData {
    pub timestamp: i64,
    pub source: String,
    pub destination: String,
    pub sent: u64,
    pub received: u64,
    pub loss: f64,
    pub rtt: f64,
}

/// Shared server state.
struct AppState {
    window: Mutex<Vec<MetricData>>,
    collecting: AtomicBool,
    interval: Duration,
}

/// Fabricate one ping-like sample: 10 probes, occasional loss, jittery RTT.
fn synthesize_sample(now: i64) -> MetricData {
    let mut rng = rand::rng();
    let sent: u64 = 10;
    let received = if rng.random_range(0..10) == 0 {
        rng.random_range(6..=9)
    } else {
        sent
    };
    let loss = (sent - received) as f64 / sent as f64 * 100.0;
    let rtt = 12.0 + rng.random_range(-3.0..8.0);
    MetricData {
        timestamp: now,
        source: "192.0.2.10".to_string(),
        destination: "2001:db8:64::1".to_string(),
        sent,
        received,
        loss,
        rtt,
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

async fn push_sample(state: &AppState) {
    let sample = synthesize_sample(unix_now());
    let mut window = state.window.lock().await;
    if window.len() >= WINDOW_CAP {
        window.remove(0);
    }
    window.push(sample);
}

/// Begin the synthesizer loop, once. Subsequent calls are no-ops, matching
/// the idempotent start-metrics trigger on the real bridge.
fn start_collection(state: Arc<AppState>) {
    if state.collecting.swap(true, Ordering::SeqCst) {
        return;
    }
    log::info!("metrics collection started");
    tokio::spawn(async move {
        loop {
            push_sample(&state).await;
            tokio::time::sleep(state.interval).await;
        }
    });
}

async fn handle_data(State(state): State<Arc<AppState>>) -> Json<Vec<MetricData>> {
    let window = state.window.lock().await;
    Json(window.clone())
}

async fn handle_start_metrics(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    start_collection(state);
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_start_translation(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    // The demo has no packets to translate; starting collection is the
    // closest observable effect.
    start_collection(state);
    Json(serde_json::json!({ "status": "ok", "mode": "nat64" }))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let window = state.window.lock().await;
    Json(serde_json::json!({
        "status": "healthy",
        "collecting": state.collecting.load(Ordering::SeqCst),
        "records": window.len(),
    }))
}

/// Build the axum router.
fn build_router(interval: Duration) -> Router {
    let state = Arc::new(AppState {
        window: Mutex::new(Vec::new()),
        collecting: AtomicBool::new(false),
        interval,
    });

    Router::new()
        .route("/api/data", get(handle_data))
        .route("/api/start-metrics", get(handle_start_metrics))
        .route("/api/start-translation", post(handle_start_translation))
        .route("/api/health", get(handle_health))
        .with_state(state)
}

/// Run the demo metrics server.
pub async fn run_server(host: &str, port: u16, interval: Duration) {
    let app = build_router(interval);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    log::info!("demo metrics endpoint on http://{addr}");
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_sample_is_consistent() {
        for _ in 0..200 {
            let s = synthesize_sample(1609459200);
            assert!(s.received <= s.sent);
            assert!((0.0..=100.0).contains(&s.loss));
            assert!(s.rtt > 0.0);
            let derived = (s.sent - s.received) as f64 / s.sent as f64 * 100.0;
            assert!((s.loss - derived).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_window_caps_at_one_hundred() {
        let state = AppState {
            window: Mutex::new(Vec::new()),
            collecting: AtomicBool::new(false),
            interval: Duration::from_secs(1),
        };
        for _ in 0..250 {
            push_sample(&state).await;
        }
        let window = state.window.lock().await;
        assert_eq!(window.len(), WINDOW_CAP);
        // Oldest records fall off the front; order is preserved.
        for pair in window.windows(2) {
            assert!(pair[1].timestamp >= pair[0].timestamp);
        }
    }
}
