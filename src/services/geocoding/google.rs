use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodedAddress, Geocoder};

const GEOCODING_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub struct GoogleGeocoder {
    api_key: String,
    client: reqwest::Client,
}

impl GoogleGeocoder {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct AddressComponent {
    long_name: String,
    types: Vec<String>,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> anyhow::Result<GeocodedAddress> {
        let resp = self
            .client
            .get(GEOCODING_API_URL)
            .query(&[("address", address), ("key", &self.api_key)])
            .send()
            .await
            .context("failed to call geocoding API")?;

        let data: GeocodeResponse = resp
            .json()
            .await
            .context("failed to parse geocoding response")?;

        if data.status != "OK" {
            anyhow::bail!("geocoding failed with status: {}", data.status);
        }
        let result = data
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("geocoding returned no results"))?;

        let city = result
            .address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == "locality"))
            .map(|c| c.long_name.clone())
            .ok_or_else(|| anyhow::anyhow!("geocoding result has no locality component"))?;

        Ok(GeocodedAddress {
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
            city,
        })
    }
}
