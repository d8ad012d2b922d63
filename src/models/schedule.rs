use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::weekday::{OrdinalWeekday, Weekday};

/// Waste stream categories, in the fixed order reminders and summaries
/// are emitted: trash, recycling, bulk trash, yard waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupCategory {
    Trash,
    Recycling,
    BulkTrash,
    YardWaste,
}

impl PickupCategory {
    pub const ALL: [PickupCategory; 4] = [
        PickupCategory::Trash,
        PickupCategory::Recycling,
        PickupCategory::BulkTrash,
        PickupCategory::YardWaste,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PickupCategory::Trash => "Trash",
            PickupCategory::Recycling => "Recycling",
            PickupCategory::BulkTrash => "Bulk trash",
            PickupCategory::YardWaste => "Yard waste",
        }
    }
}

impl fmt::Display for PickupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical, city-agnostic pickup cadence for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleExpr {
    /// One or more pickups per week, in source order.
    WeeklyMultiDay(Vec<Weekday>),
    /// Once a month on the Nth weekday.
    MonthlyOrdinal(OrdinalWeekday),
    /// Once a week.
    SingleWeekday(Weekday),
}

/// Normalized schedule for an address, rebuilt per request and never
/// cached across addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupSchedule {
    by_category: BTreeMap<PickupCategory, ScheduleExpr>,
}

impl PickupSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: PickupCategory, expr: ScheduleExpr) {
        self.by_category.insert(category, expr);
    }

    pub fn get(&self, category: PickupCategory) -> Option<&ScheduleExpr> {
        self.by_category.get(&category)
    }

    pub fn contains(&self, category: PickupCategory) -> bool {
        self.by_category.contains_key(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    /// Iterates in the fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (PickupCategory, &ScheduleExpr)> {
        self.by_category.iter().map(|(c, e)| (*c, e))
    }
}
