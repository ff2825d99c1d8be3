//! Timestamp source for prompt mutations.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use std::sync::{Mutex, PoisonError};

/// Hands out strictly increasing timestamps with microsecond precision.
///
/// If the wall clock stalls or steps backwards, the next timestamp is one
/// microsecond after the last one issued.
pub(crate) struct Clock {
    source: fn() -> DateTime<Utc>,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl Clock {
    pub(crate) fn new(source: fn() -> DateTime<Utc>) -> Self {
        Self {
            source,
            last: Mutex::new(None),
        }
    }

    pub(crate) fn system() -> Self {
        Self::new(Utc::now)
    }

    /// Never issue anything at or before `floor`.
    pub(crate) fn advance_past(&self, floor: DateTime<Utc>) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.map_or(true, |current| current < floor) {
            *last = Some(floor);
        }
    }

    pub(crate) fn tick(&self) -> DateTime<Utc> {
        let now = (self.source)().trunc_subsecs(6);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let stamp = match *last {
            Some(previous) if now <= previous => previous + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

/// Fixed-width RFC 3339 so that text order matches time order.
pub(crate) fn format_timestamp(stamp: &DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
}
