use std::collections::BTreeMap;

use crate::errors::ScheduleError;
use crate::models::{OrdinalWeekday, PickupCategory, PickupSchedule, ScheduleExpr, Weekday};

/// How a municipality reports its bulk trash day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkFormat {
    /// "1st Tuesday" style ordinal phrase, monthly cadence.
    OrdinalPhrase,
    /// A bare weekday name, weekly cadence.
    BareWeekday,
}

/// Parsing capabilities for one municipality. Supporting a new city is a
/// registration here, not a new branch in the handlers.
#[derive(Debug, Clone, Copy)]
pub struct CityRules {
    pub city: &'static str,
    pub trash_delimiter: &'static str,
    pub bulk_format: BulkFormat,
}

const RULESETS: &[CityRules] = &[
    CityRules {
        city: "Fort Lauderdale",
        trash_delimiter: " & ",
        bulk_format: BulkFormat::OrdinalPhrase,
    },
    CityRules {
        city: "Tamarac",
        trash_delimiter: "/",
        bulk_format: BulkFormat::BareWeekday,
    },
];

pub fn rules_for(city: &str) -> Result<&'static CityRules, ScheduleError> {
    RULESETS
        .iter()
        .find(|r| r.city.eq_ignore_ascii_case(city.trim()))
        .ok_or_else(|| ScheduleError::UnsupportedCity(city.trim().to_string()))
}

/// Converts raw per-category day strings, as fetched from the city's GIS
/// layers, into a canonical schedule. Pure transformation; categories
/// absent from `raw` are simply absent from the result.
pub fn normalize(
    city: &str,
    raw: &BTreeMap<PickupCategory, String>,
) -> Result<PickupSchedule, ScheduleError> {
    let rules = rules_for(city)?;
    let mut schedule = PickupSchedule::new();

    for (&category, value) in raw {
        let expr = match category {
            PickupCategory::Trash => parse_weekly(value, rules.trash_delimiter, category)?,
            PickupCategory::Recycling | PickupCategory::YardWaste => {
                ScheduleExpr::SingleWeekday(parse_weekday(value, category)?)
            }
            PickupCategory::BulkTrash => match rules.bulk_format {
                BulkFormat::OrdinalPhrase => {
                    ScheduleExpr::MonthlyOrdinal(parse_ordinal_phrase(value, category)?)
                }
                BulkFormat::BareWeekday => {
                    ScheduleExpr::SingleWeekday(parse_weekday(value, category)?)
                }
            },
        };
        schedule.insert(category, expr);
    }

    Ok(schedule)
}

fn parse_weekly(
    value: &str,
    delimiter: &str,
    category: PickupCategory,
) -> Result<ScheduleExpr, ScheduleError> {
    let days = value
        .split(delimiter)
        .map(|token| parse_weekday(token, category))
        .collect::<Result<Vec<_>, _>>()?;

    if days.is_empty() {
        return Err(unrecognized(category, value));
    }
    Ok(ScheduleExpr::WeeklyMultiDay(days))
}

/// Parses "`<ordinal><st|nd|rd|th> <Weekday>`", e.g. "1st Tuesday".
fn parse_ordinal_phrase(
    value: &str,
    category: PickupCategory,
) -> Result<OrdinalWeekday, ScheduleError> {
    let mut parts = value.split_whitespace();
    let (Some(ordinal_token), Some(day_token), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(unrecognized(category, value));
    };

    let lower = ordinal_token.to_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .ok_or_else(|| unrecognized(category, value))?;

    let ordinal: u8 = digits.parse().map_err(|_| unrecognized(category, value))?;
    let weekday = parse_weekday(day_token, category)?;
    OrdinalWeekday::new(ordinal, weekday)
}

fn parse_weekday(token: &str, category: PickupCategory) -> Result<Weekday, ScheduleError> {
    Weekday::parse(token).ok_or_else(|| unrecognized(category, token))
}

fn unrecognized(category: PickupCategory, value: &str) -> ScheduleError {
    ScheduleError::UnrecognizedFormat {
        category,
        value: value.to_string(),
    }
}
