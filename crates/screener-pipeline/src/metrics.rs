use std::collections::HashMap;
use std::time::Instant;

/// Collector for per-symbol request counts and response latency.
///
/// Passed into the pipeline explicitly so instrumentation is injectable
/// rather than process-global.
pub trait MetricsCollector: Send {
    fn record_request(&mut self, symbol: &str);
    fn record_response(&mut self, symbol: &str);
    fn snapshot(&self) -> serde_json::Value;
}

/// In-memory collector that can export a JSON snapshot to disk.
#[derive(Default)]
pub struct InMemoryMetrics {
    total_requests: u64,
    symbols_requested: HashMap<String, u64>,
    last_response_secs: Option<f64>,
    in_flight: HashMap<String, Instant>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsCollector for InMemoryMetrics {
    fn record_request(&mut self, symbol: &str) {
        self.total_requests += 1;
        *self
            .symbols_requested
            .entry(symbol.to_uppercase())
            .or_insert(0) += 1;
        self.in_flight.insert(symbol.to_uppercase(), Instant::now());
    }

    fn record_response(&mut self, symbol: &str) {
        if let Some(started) = self.in_flight.remove(&symbol.to_uppercase()) {
            self.last_response_secs = Some(started.elapsed().as_secs_f64());
        }
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "summary": {
                "total_requests": self.total_requests,
                "last_response_time_sec": self.last_response_secs,
            },
            "symbols": self.symbols_requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_requests_per_symbol() {
        let mut metrics = InMemoryMetrics::new();
        metrics.record_request("TCS");
        metrics.record_request("tcs");
        metrics.record_request("INFY");
        metrics.record_response("TCS");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot["summary"]["total_requests"], 3);
        assert_eq!(snapshot["symbols"]["TCS"], 2);
        assert_eq!(snapshot["symbols"]["INFY"], 1);
        assert!(snapshot["summary"]["last_response_time_sec"].is_number());
    }

    #[test]
    fn snapshot_before_any_requests() {
        let metrics = InMemoryMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot["summary"]["total_requests"], 0);
        assert!(snapshot["summary"]["last_response_time_sec"].is_null());
    }
}
