use jiff::{SignedDuration, Timestamp};

/// Time budget of one search, measured from its creation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    start: Timestamp,
    limit: SignedDuration,
}

impl Deadline {
    pub fn after(limit: SignedDuration) -> Self {
        Deadline {
            start: Timestamp::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.start)
    }

    /// A zero or negative limit is reached immediately.
    pub fn is_reached(&self) -> bool {
        self.elapsed() >= self.limit
    }
}
