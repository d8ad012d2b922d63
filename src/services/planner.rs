use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::errors::ScheduleError;
use crate::models::{
    PickupCategory, PickupSchedule, Recurrence, ReminderSpec, ScheduleExpr, Weekday,
};
use crate::services::calendar;

#[derive(Debug, Clone)]
pub struct ReminderPolicy {
    pub lead_days: u32,
    pub lead_hour: u32,
    pub categories: Vec<PickupCategory>,
}

impl Default for ReminderPolicy {
    /// 7 PM the evening before, for every category.
    fn default() -> Self {
        Self {
            lead_days: 1,
            lead_hour: 19,
            categories: PickupCategory::ALL.to_vec(),
        }
    }
}

/// Derives reminder specs from a canonical schedule.
///
/// Reminders come out in fixed category order (trash, recycling, bulk
/// trash, yard waste); within a multi-day schedule, in the order the days
/// appeared in the source string. Weekly schedules yield one one-time spec
/// per weekday. A monthly ordinal schedule yields one one-time spec, plus
/// a monthly-recurring one when `include_recurring_bulk` is set by the
/// escalation flow.
pub fn plan_reminders(
    schedule: &PickupSchedule,
    policy: &ReminderPolicy,
    today: NaiveDate,
    tz: Tz,
    include_recurring_bulk: bool,
) -> Result<Vec<ReminderSpec>, ScheduleError> {
    let mut reminders = Vec::new();

    for category in PickupCategory::ALL {
        if !policy.categories.contains(&category) {
            continue;
        }
        let expr = schedule
            .get(category)
            .ok_or(ScheduleError::UnresolvableSchedule(category))?;

        match expr {
            ScheduleExpr::SingleWeekday(day) => {
                reminders.push(weekly_reminder(category, *day, policy, today, tz));
            }
            ScheduleExpr::WeeklyMultiDay(days) => {
                for day in days {
                    reminders.push(weekly_reminder(category, *day, policy, today, tz));
                }
            }
            ScheduleExpr::MonthlyOrdinal(ord) => {
                let occurrence = calendar::next_ordinal_occurrence(today, *ord);
                let trigger_at =
                    calendar::reminder_instant(occurrence, policy.lead_days, policy.lead_hour, tz);
                reminders.push(ReminderSpec {
                    category,
                    trigger_at,
                    recurrence: Recurrence::OneTime,
                    message: reminder_message(category),
                });
                if include_recurring_bulk {
                    reminders.push(ReminderSpec {
                        category,
                        trigger_at,
                        recurrence: Recurrence::Monthly {
                            weekday: ord.weekday,
                            interval: 1,
                        },
                        message: reminder_message(category),
                    });
                }
            }
        }
    }

    Ok(reminders)
}

fn weekly_reminder(
    category: PickupCategory,
    day: Weekday,
    policy: &ReminderPolicy,
    today: NaiveDate,
    tz: Tz,
) -> ReminderSpec {
    let occurrence = calendar::next_weekday_occurrence(today, day);
    ReminderSpec {
        category,
        trigger_at: calendar::reminder_instant(occurrence, policy.lead_days, policy.lead_hour, tz),
        recurrence: Recurrence::OneTime,
        message: reminder_message(category),
    }
}

fn reminder_message(category: PickupCategory) -> String {
    match category {
        PickupCategory::Trash => "Remember to take out the trash for tomorrow's pickup!",
        PickupCategory::Recycling => "Remember to take out the recycling for tomorrow's pickup!",
        PickupCategory::BulkTrash => "Remember to set out your bulk trash for tomorrow's pickup!",
        PickupCategory::YardWaste => "Remember to set out your yard waste for tomorrow's pickup!",
    }
    .to_string()
}
