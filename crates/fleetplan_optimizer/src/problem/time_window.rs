use crate::json::request::JsonTimeWindow;

pub const CENTIMINUTES_PER_MINUTE: i64 = 100;

/// Window in minutes from midnight, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn intersection(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let window = TimeWindow::new(self.start.max(other.start), self.end.min(other.end));
        window.is_valid().then_some(window)
    }

    /// Fills missing ends of a requested window from `fallback`.
    pub fn with_fallback(requested: Option<JsonTimeWindow>, fallback: TimeWindow) -> Self {
        match requested {
            Some(window) => TimeWindow::new(
                window.start.unwrap_or(fallback.start),
                window.end.unwrap_or(fallback.end),
            ),
            None => fallback,
        }
    }

    pub fn start_centiminutes(&self) -> i64 {
        self.start.saturating_mul(CENTIMINUTES_PER_MINUTE)
    }

    pub fn end_centiminutes(&self) -> i64 {
        self.end.saturating_mul(CENTIMINUTES_PER_MINUTE)
    }
}
