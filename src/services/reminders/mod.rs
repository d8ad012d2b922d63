pub mod alexa;

use async_trait::async_trait;

use crate::models::ReminderSpec;

/// Turns reminder specs into platform-scheduled triggers. The sink owns
/// timezone-correct serialization of one-time and recurring triggers.
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn create_reminder(&self, spec: &ReminderSpec) -> anyhow::Result<()>;
}
