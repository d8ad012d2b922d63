pub mod arcgis;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::models::PickupCategory;

/// Fetches the raw per-category pickup day strings for a coordinate.
///
/// A category with no feature or no day field at the location is simply
/// absent from the map, not an error. All category fetches are joined
/// before the result is handed to the normalizer.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn fetch_raw_schedule(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<BTreeMap<PickupCategory, String>>;
}
