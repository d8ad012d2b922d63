use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;

use super::ScheduleSource;
use crate::models::PickupCategory;

/// MapServer layer ids and day-field names, per category.
const LAYERS: [(PickupCategory, u32, &str); 4] = [
    (PickupCategory::BulkTrash, 21, "BULKDAY"),
    (PickupCategory::Recycling, 22, "RECYCLDAY"),
    (PickupCategory::Trash, 23, "TRASHDAY"),
    (PickupCategory::YardWaste, 24, "YARDDAY"),
];

/// Municipal ArcGIS MapServer client: point-intersection query against
/// one layer per pickup category.
pub struct ArcGisSource {
    base_url: String,
    client: reqwest::Client,
}

impl ArcGisSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_layer(
        &self,
        layer_id: u32,
        field: &str,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<Option<String>> {
        let url = format!("{}/{layer_id}/query", self.base_url);
        let geometry = format!("{longitude},{latitude}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("geometry", geometry.as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("spatialRel", "esriSpatialRelIntersects"),
                ("outFields", "*"),
                ("f", "json"),
            ])
            .send()
            .await
            .with_context(|| format!("failed to query GIS layer {layer_id}"))?;

        let data: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse GIS layer {layer_id} response"))?;

        // No feature at this point, or no day field on it: no schedule
        // for this category rather than an error.
        let day = data["features"][0]["attributes"][field]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(day)
    }
}

#[async_trait]
impl ScheduleSource for ArcGisSource {
    async fn fetch_raw_schedule(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> anyhow::Result<BTreeMap<PickupCategory, String>> {
        let [(c0, l0, f0), (c1, l1, f1), (c2, l2, f2), (c3, l3, f3)] = LAYERS;

        // Independent layer queries, joined before normalization.
        let (bulk, recycling, trash, yard) = tokio::try_join!(
            self.fetch_layer(l0, f0, latitude, longitude),
            self.fetch_layer(l1, f1, latitude, longitude),
            self.fetch_layer(l2, f2, latitude, longitude),
            self.fetch_layer(l3, f3, latitude, longitude),
        )?;

        let mut raw = BTreeMap::new();
        for (category, day) in [(c0, bulk), (c1, recycling), (c2, trash), (c3, yard)] {
            if let Some(day) = day {
                raw.insert(category, day);
            }
        }
        Ok(raw)
    }
}
