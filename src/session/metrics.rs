use serde::Serialize;

/// Running quality statistics for the session. Totals only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsAggregate {
    total_response_time_ms: u64,
    turn_count: u64,
    total_confidence: u64,
    last_response_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub turn_count: u64,
    pub total_response_time_ms: u64,
    pub total_confidence: u64,
    pub average_confidence: Option<u64>,
    pub average_response_time_ms: Option<u64>,
    pub last_response_time_ms: Option<u64>,
}

impl MetricsAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successful turn.
    pub fn record(&mut self, response_time_ms: u64, confidence: u32) {
        self.turn_count = self.turn_count.saturating_add(1);
        self.total_response_time_ms = self.total_response_time_ms.saturating_add(response_time_ms);
        self.total_confidence = self.total_confidence.saturating_add(u64::from(confidence));
        self.last_response_time_ms = Some(response_time_ms);
    }

    pub fn turn_count(&self) -> u64 {
        self.turn_count
    }

    pub fn total_response_time_ms(&self) -> u64 {
        self.total_response_time_ms
    }

    pub fn total_confidence(&self) -> u64 {
        self.total_confidence
    }

    /// `None` until the first turn is recorded.
    pub fn average_confidence(&self) -> Option<u64> {
        rounded_mean(self.total_confidence, self.turn_count)
    }

    pub fn average_response_time_ms(&self) -> Option<u64> {
        rounded_mean(self.total_response_time_ms, self.turn_count)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            turn_count: self.turn_count,
            total_response_time_ms: self.total_response_time_ms,
            total_confidence: self.total_confidence,
            average_confidence: self.average_confidence(),
            average_response_time_ms: self.average_response_time_ms(),
            last_response_time_ms: self.last_response_time_ms,
        }
    }
}

// Round half up, in integers.
fn rounded_mean(total: u64, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    let total = u128::from(total);
    let count = u128::from(count);
    Some(((total * 2 + count) / (count * 2)) as u64)
}
