pub mod google;

use async_trait::async_trait;

/// Resolved location for a free-text address. `city` selects the
/// normalization ruleset.
#[derive(Debug, Clone)]
pub struct GeocodedAddress {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> anyhow::Result<GeocodedAddress>;
}
