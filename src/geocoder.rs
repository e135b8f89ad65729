//! Address lookup against an OpenCage-compatible forward geocoding endpoint.
//!
//! The adapter only deals with transport: query string, timeout, HTTP status
//! and JSON decoding. An empty result set is `Ok(None)`, anything else that
//! goes wrong is an error.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeocoderConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve free text to the best matching coordinates.
    async fn locate(&self, query: &str) -> anyhow::Result<Option<Coordinates>>;
}

/// Free-text query sent for a street address.
pub fn address_query(street: &str, neighborhood: &str, city: &str) -> String {
    format!("{street}, {neighborhood}, {city}")
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Coordinates,
}

#[derive(Clone)]
pub struct OpenCageGeocoder {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenCageGeocoder {
    pub fn new(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .context("build geocoder http client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn locate(&self, query: &str) -> anyhow::Result<Option<Coordinates>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("key", self.api_key.as_str()), ("limit", "1")])
            .send()
            .await
            .context("geocoder request")?
            .error_for_status()
            .context("geocoder status")?;

        let body: GeocodeResponse = response.json().await.context("geocoder response body")?;
        let best = body.results.into_iter().next().map(|r| r.geometry);
        debug!(%query, found = best.is_some(), "geocoded address");
        Ok(best)
    }
}
