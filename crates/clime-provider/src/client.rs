//! HTTP client for the remote weather provider API.
//!
//! The provider exposes a request/response HTTP interface returning
//! observation records for a station, either for one calendar day
//! (`/history/hourly`) or the single latest reading
//! (`/observations/current`). The exact schema is a collaborator contract;
//! optional measurement fields may be missing and are treated as absent,
//! never zero.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use tracing::debug;

use clime_types::Observation;

use crate::error::{Error, Result};
use crate::limiter::RateLimiter;
use crate::retry::{RetryPolicy, with_retry};
use crate::traits::WeatherProvider;

/// Per-request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rate-limited, retrying HTTP client for the weather provider.
///
/// The limiter is taken as an `Arc` so every client in the process can share
/// one call budget. Retry behavior is owned by the client; callers see only
/// the final outcome of each fetch.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl ProviderClient {
    /// Create a client for the given provider base URL and API key.
    pub fn new(
        base_url: &str,
        api_key: &str,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::InvalidUrl("base URL is empty".to_string()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::InvalidUrl(format!(
                "base URL '{base_url}' must start with http:// or https://"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            limiter,
            retry,
        })
    }

    /// One rate-limited GET returning the provider's observation list.
    async fn get_observations(
        &self,
        path: &str,
        extra_params: &[(&str, String)],
    ) -> Result<Vec<WireObservation>> {
        self.limiter.acquire().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str()), ("format", "json")])
            .query(extra_params)
            .send()
            .await
            .map_err(Error::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status.as_u16()));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        Ok(body.observations)
    }
}

#[async_trait]
impl WeatherProvider for ProviderClient {
    async fn fetch_hourly(&self, station_id: &str, date: Date) -> Result<Vec<Observation>> {
        let date_param = format!(
            "{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        );
        let params = [
            ("stationId", station_id.to_string()),
            ("date", date_param),
        ];

        let records = with_retry(&self.retry, "fetch_hourly", || {
            self.get_observations("/history/hourly", &params)
        })
        .await?;

        records
            .into_iter()
            .map(|record| record.into_observation(station_id))
            .collect()
    }

    async fn fetch_current(&self, station_id: &str) -> Result<Observation> {
        let params = [("stationId", station_id.to_string())];

        let records = with_retry(&self.retry, "fetch_current", || {
            self.get_observations("/observations/current", &params)
        })
        .await?;

        records
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::MalformedResponse("current-conditions response had no observations".to_string())
            })?
            .into_observation(station_id)
    }
}

// ==========================================================================
// Wire schema
// ==========================================================================

/// Top-level provider response.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    observations: Vec<WireObservation>,
}

/// One observation record as the provider sends it.
///
/// Every measurement is optional; only the epoch timestamp is required to
/// identify the record.
#[derive(Debug, Deserialize)]
struct WireObservation {
    #[serde(rename = "stationID")]
    station_id: Option<String>,
    epoch: Option<i64>,
    #[serde(rename = "tempAvg")]
    temp_avg: Option<f64>,
    #[serde(rename = "humidityAvg")]
    humidity_avg: Option<f64>,
    #[serde(rename = "precipTotal")]
    precip_total: Option<f64>,
    #[serde(rename = "windspeedAvg")]
    windspeed_avg: Option<f64>,
    pressure: Option<f64>,
}

impl WireObservation {
    /// Convert a wire record into an [`Observation`].
    ///
    /// `requested_station` fills in the station id when the provider omits
    /// it. A record without a timestamp cannot be identified and makes the
    /// whole response malformed.
    fn into_observation(self, requested_station: &str) -> Result<Observation> {
        let epoch = self.epoch.ok_or_else(|| {
            Error::MalformedResponse("observation record missing 'epoch' timestamp".to_string())
        })?;
        let timestamp = OffsetDateTime::from_unix_timestamp(epoch).map_err(|_| {
            Error::MalformedResponse(format!("observation epoch {epoch} out of range"))
        })?;

        Ok(Observation {
            station_id: self
                .station_id
                .unwrap_or_else(|| requested_station.to_string()),
            timestamp,
            temperature: self.temp_avg,
            humidity: self.humidity_avg,
            precipitation: self.precip_total,
            wind_speed: self.windspeed_avg,
            pressure: self.pressure,
        })
    }
}
