use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::geocoding::Geocoder;
use crate::services::gis::ScheduleSource;
use crate::services::reminders::ReminderSink;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub geocoder: Box<dyn Geocoder>,
    pub schedule_source: Box<dyn ScheduleSource>,
    pub reminders: Box<dyn ReminderSink>,
}
