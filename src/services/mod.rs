pub mod calendar;
pub mod escalation;
pub mod geocoding;
pub mod gis;
pub mod normalizer;
pub mod orchestrator;
pub mod planner;
pub mod reminders;
