use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::models::{OrdinalWeekday, ScheduleExpr, Weekday};

/// Earliest date strictly after `after` that falls on `weekday`.
///
/// The next pickup is always a future event: if `after` itself is the
/// target weekday the result is seven days out, never the same day.
pub fn next_weekday_occurrence(after: NaiveDate, weekday: Weekday) -> NaiveDate {
    let delta = i64::from(weekday.days_from_sunday())
        - i64::from(after.weekday().num_days_from_sunday());
    let days = if delta <= 0 { delta + 7 } else { delta };
    after + Duration::days(days)
}

/// Earliest date on or after `after` that is the ordinal-th occurrence of
/// the weekday within its month. A month that cannot satisfy the ordinal
/// (a "5th Friday" with only four) rolls forward to the next month.
pub fn next_ordinal_occurrence(after: NaiveDate, ord: OrdinalWeekday) -> NaiveDate {
    let mut year = after.year();
    let mut month = after.month();
    loop {
        if let Some(date) = ordinal_in_month(year, month, ord) {
            if date >= after {
                return date;
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
}

/// The ordinal-th `weekday` of the given month, if the month has one.
fn ordinal_in_month(year: i32, month: u32, ord: OrdinalWeekday) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (i64::from(ord.weekday.days_from_sunday())
        - i64::from(first.weekday().num_days_from_sunday()))
    .rem_euclid(7) as u32;
    let day = 1 + offset + (u32::from(ord.ordinal) - 1) * 7;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Next concrete pickup date for a schedule expression; for multi-day
/// weekly schedules, the soonest of the days.
pub fn next_expr_occurrence(after: NaiveDate, expr: &ScheduleExpr) -> Option<NaiveDate> {
    match expr {
        ScheduleExpr::SingleWeekday(day) => Some(next_weekday_occurrence(after, *day)),
        ScheduleExpr::WeeklyMultiDay(days) => days
            .iter()
            .map(|day| next_weekday_occurrence(after, *day))
            .min(),
        ScheduleExpr::MonthlyOrdinal(ord) => Some(next_ordinal_occurrence(after, *ord)),
    }
}

/// Reminder fire time for a pickup occurrence: `lead_days` back, at
/// `lead_hour` wall-clock in the reference timezone. DST gaps resolve to
/// the earliest valid instant.
pub fn reminder_instant(
    occurrence: NaiveDate,
    lead_days: u32,
    lead_hour: u32,
    tz: Tz,
) -> DateTime<Tz> {
    let date = occurrence - Duration::days(i64::from(lead_days));
    let time = NaiveTime::from_hms_opt(lead_hour.min(23), 0, 0).unwrap_or_default();
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}
