use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use super::schedule::PickupCategory;
use super::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    OneTime,
    Monthly { weekday: Weekday, interval: u32 },
}

/// A reminder to hand to the platform reminder API. `trigger_at` is
/// always the configured lead ahead of the pickup occurrence, in the
/// reference timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderSpec {
    pub category: PickupCategory,
    pub trigger_at: DateTime<Tz>,
    pub recurrence: Recurrence,
    pub message: String,
}
