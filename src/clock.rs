use time::{Date, OffsetDateTime, UtcOffset};

/// Source of "now" for the services. The server's calendar day is derived from it.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    /// The server's current calendar date.
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Wall clock pinned to a configured offset rather than the account's locale.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// A clock that always reports the same instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
