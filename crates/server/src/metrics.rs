//! Prometheus registry and server-side metrics.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use tracing::error;

/// Currently connected WebSocket clients.
pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "spoor_ws_connections_active",
        "Currently connected WebSocket clients",
    )
    .unwrap()
});

/// Total WebSocket connections accepted.
pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "spoor_ws_connections_total",
        "Total WebSocket connections accepted",
    )
    .unwrap()
});

/// Scan events delivered to WebSocket clients.
pub static WS_MESSAGES_SENT: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "spoor_ws_messages_sent_total",
        "Scan events delivered to WebSocket clients",
    )
    .unwrap()
});

/// Events dropped because a WebSocket client lagged.
pub static WS_LAG_EVENTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "spoor_ws_lag_events_total",
        "Events dropped because a WebSocket client lagged",
    )
    .unwrap()
});

/// Process-wide registry holding core and server metrics.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();

    spoor_core::metrics::register_core_metrics(&registry)
        .expect("failed to register core metrics");

    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_CONNECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_MESSAGES_SENT.clone()))
        .unwrap();
    registry.register(Box::new(WS_LAG_EVENTS.clone())).unwrap();

    registry
});

/// Render the registry in Prometheus text format.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
