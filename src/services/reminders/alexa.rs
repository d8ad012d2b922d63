use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use super::ReminderSink;
use crate::models::{Recurrence, ReminderSpec};

/// Voice-platform reminders REST client. One-time specs become
/// `SCHEDULED_ABSOLUTE` triggers; monthly specs add a MONTHLY/BYDAY
/// recurrence so the platform reschedules itself each month.
pub struct AlexaReminderClient {
    api_url: String,
    api_token: String,
    client: reqwest::Client,
}

impl AlexaReminderClient {
    pub fn new(api_url: String, api_token: String) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            client: reqwest::Client::new(),
        }
    }

    fn reminder_body(&self, spec: &ReminderSpec) -> serde_json::Value {
        let mut trigger = json!({
            "type": "SCHEDULED_ABSOLUTE",
            "scheduledTime": spec.trigger_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "timeZoneId": spec.trigger_at.timezone().name(),
        });

        if let Recurrence::Monthly { weekday, interval } = &spec.recurrence {
            trigger["recurrence"] = json!({
                "freq": "MONTHLY",
                "byDay": [weekday.by_day_code()],
                "interval": interval,
            });
        }

        json!({
            "requestTime": Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "trigger": trigger,
            "alertInfo": {
                "spokenInfo": {
                    "content": [{
                        "locale": "en-US",
                        "text": spec.message,
                    }]
                }
            },
            "pushNotification": {
                "status": "ENABLED"
            }
        })
    }
}

#[async_trait]
impl ReminderSink for AlexaReminderClient {
    async fn create_reminder(&self, spec: &ReminderSpec) -> anyhow::Result<()> {
        let body = self.reminder_body(spec);

        self.client
            .post(format!("{}/v1/alerts/reminders", self.api_url))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .context("failed to call reminders API")?
            .error_for_status()
            .context("reminders API returned error")?;

        Ok(())
    }
}
