use std::env;

use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub google_api_key: String,
    pub gis_base_url: String,
    pub reminders_api_url: String,
    pub reminders_api_token: String,
    pub timezone: Tz,
    pub reminder_lead_days: u32,
    pub reminder_lead_hour: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "curbside.db".to_string()),
            google_api_key: env::var("GOOGLE_API_KEY").unwrap_or_default(),
            gis_base_url: env::var("GIS_BASE_URL").unwrap_or_else(|_| {
                "https://gis.fortlauderdale.gov/arcgis/rest/services/Accela/Accela/MapServer"
                    .to_string()
            }),
            reminders_api_url: env::var("REMINDERS_API_URL")
                .unwrap_or_else(|_| "https://api.amazonalexa.com".to_string()),
            reminders_api_token: env::var("REMINDERS_API_TOKEN").unwrap_or_default(),
            timezone: env::var("REFERENCE_TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::America::New_York),
            reminder_lead_days: env::var("REMINDER_LEAD_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            reminder_lead_hour: env::var("REMINDER_LEAD_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h| *h < 24)
                .unwrap_or(19),
        }
    }
}
