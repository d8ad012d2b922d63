use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::errors::ScheduleError;
use crate::models::{
    Affirmation, EscalationState, PickupCategory, PickupSchedule, ReminderSpec, ScheduleExpr,
    Weekday,
};
use crate::services::planner::{self, ReminderPolicy};
use crate::services::{escalation, normalizer};

#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    pub schedule: PickupSchedule,
    pub reminders: Vec<ReminderSpec>,
    pub escalation: EscalationState,
    pub offer_upgrade: bool,
    pub summary: String,
}

/// Single entry point for a conversational turn: normalize the raw city
/// attributes, run the escalation transition, plan reminders, and render
/// the spoken summary. Deterministic for a given `today`; errors from the
/// core surface unmodified.
pub fn resolve_for_address(
    city: &str,
    raw_by_category: &BTreeMap<PickupCategory, String>,
    policy: &ReminderPolicy,
    today: NaiveDate,
    tz: Tz,
    escalation_state: EscalationState,
    affirmation: Option<Affirmation>,
) -> Result<ResolveOutcome, ScheduleError> {
    let schedule = normalizer::normalize(city, raw_by_category)?;

    // The upgrade flow only applies when a monthly-ordinal bulk reminder
    // is being created this turn.
    let bulk_reminder_planned = policy.categories.contains(&PickupCategory::BulkTrash)
        && matches!(
            schedule.get(PickupCategory::BulkTrash),
            Some(ScheduleExpr::MonthlyOrdinal(_))
        );

    let outcome = escalation::transition(escalation_state, bulk_reminder_planned, affirmation);

    let reminders = planner::plan_reminders(&schedule, policy, today, tz, outcome.schedule_recurring)?;

    Ok(ResolveOutcome {
        summary: summarize(&schedule),
        schedule,
        reminders,
        escalation: outcome.next,
        offer_upgrade: outcome.offer_upgrade,
    })
}

/// Human-readable schedule summary, one sentence per category in fixed
/// order, e.g. "Trash pickup is on Monday and Thursday."
pub fn summarize(schedule: &PickupSchedule) -> String {
    let sentences: Vec<String> = schedule
        .iter()
        .map(|(category, expr)| match expr {
            ScheduleExpr::WeeklyMultiDay(days) => {
                format!("{} pickup is on {}.", category.label(), join_days(days))
            }
            ScheduleExpr::SingleWeekday(day) => {
                format!("{} pickup is on {day}.", category.label())
            }
            ScheduleExpr::MonthlyOrdinal(ord) => {
                format!("{} pickup is on the {ord} of each month.", category.label())
            }
        })
        .collect();
    sentences.join(" ")
}

fn join_days(days: &[Weekday]) -> String {
    match days {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(Weekday::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{init} and {last}")
        }
    }
}
