pub mod reminder;
pub mod schedule;
pub mod session;
pub mod weekday;

pub use reminder::{Recurrence, ReminderSpec};
pub use schedule::{PickupCategory, PickupSchedule, ScheduleExpr};
pub use session::{Affirmation, EscalationState};
pub use weekday::{OrdinalWeekday, Weekday};
