//! Timestamps attached to host events.

use chrono::{DateTime, Utc};

/// UTC timestamp recorded when a characteristic change is emitted.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
