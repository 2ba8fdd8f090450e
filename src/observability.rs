use std::net::SocketAddr;

// ── Operation counters ──────────────────────────────────────────

/// Counter: bookings created (they start out waiting).
pub const BOOKINGS_CREATED_TOTAL: &str = "lendit_bookings_created_total";

/// Counter: bookings decided by an owner. Labels: decision.
pub const BOOKING_DECISIONS_TOTAL: &str = "lendit_booking_decisions_total";

/// Counter: booking attempts rejected for overlapping an approved booking.
pub const BOOKING_CONFLICTS_TOTAL: &str = "lendit_booking_conflicts_total";

/// Counter: comments created.
pub const COMMENTS_CREATED_TOTAL: &str = "lendit_comments_created_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init_metrics(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Plain fmt tracing subscriber. Call once from the embedding service.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
