use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ScheduleError;

/// Day of the week as reported by municipal schedule data.
///
/// Source strings range from full names ("Tuesday") to abbreviations
/// ("Mon", "Thurs"), so parsing accepts any prefix of at least three
/// characters, case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s.len() < 3 {
            return None;
        }
        Weekday::ALL
            .into_iter()
            .find(|day| day.name().to_lowercase().starts_with(&s))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Two-letter abbreviation used by the reminder platform's BYDAY field.
    pub fn by_day_code(&self) -> &'static str {
        match self {
            Weekday::Sunday => "SU",
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
        }
    }

    pub fn days_from_sunday(&self) -> u32 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// "Nth weekday of the month" descriptor, e.g. "1st Tuesday".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalWeekday {
    pub ordinal: u8,
    pub weekday: Weekday,
}

impl OrdinalWeekday {
    /// A month holds at most 5 occurrences of any weekday.
    pub fn new(ordinal: u8, weekday: Weekday) -> Result<Self, ScheduleError> {
        if !(1..=5).contains(&ordinal) {
            return Err(ScheduleError::InvalidOrdinal(ordinal));
        }
        Ok(Self { ordinal, weekday })
    }
}

impl fmt::Display for OrdinalWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.ordinal {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        };
        write!(f, "{}{suffix} {}", self.ordinal, self.weekday)
    }
}
