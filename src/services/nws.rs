//! NWS (api.weather.gov) gridpoint forecast client.
//!
//! Two-step fetch, as the NWS API requires: `points/{lat},{lon}` resolves
//! the forecast office, grid data URL and IANA timezone for a location, then
//! the gridpoint URL supplies the run-length-encoded forecast series.
//!
//! Payload parsing is split out into pure functions so the loosely-typed
//! upstream JSON is normalized into the core's strict `GridForecast` at this
//! boundary: null values become zeros, missing series become empty vectors,
//! unparseable entries are skipped with a warning. The core never sees a
//! degenerate shape.

use chrono_tz::Tz;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::forecast::GridForecast;
use crate::services::timeseries::{parse_valid_time, RleEntry};

const NWS_API_URL: &str = "https://api.weather.gov";

/// Timezone used when the upstream omits or mangles the `timeZone` field.
const FALLBACK_TZ: Tz = chrono_tz::America::Chicago;

/// Client for the NWS API.
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: reqwest::Client,
    user_agent: String,
    base_url: String,
}

/// Location metadata from the `points` endpoint.
#[derive(Debug, Clone)]
pub struct PointMetadata {
    /// Forecast office identifier (CWA), e.g. "JAN"
    pub office: String,
    /// Absolute URL of the gridpoint forecast for this location
    pub forecast_grid_data: String,
    /// Forecast timezone
    pub time_zone: Tz,
    /// Nearest city, when the upstream provides one
    pub city: String,
    /// State abbreviation, when the upstream provides one
    pub state: String,
}

// --- NWS JSON response types ---

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    cwa: String,
    #[serde(rename = "forecastGridData")]
    forecast_grid_data: String,
    #[serde(rename = "timeZone")]
    time_zone: Option<String>,
    #[serde(rename = "relativeLocation")]
    relative_location: Option<RelativeLocation>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocation {
    properties: Option<RelativeLocationProperties>,
}

#[derive(Debug, Deserialize)]
struct RelativeLocationProperties {
    city: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GridResponse {
    properties: GridProperties,
}

#[derive(Debug, Deserialize, Default)]
struct GridProperties {
    temperature: Option<NumericSeries>,
    #[serde(rename = "relativeHumidity")]
    relative_humidity: Option<NumericSeries>,
    #[serde(rename = "windSpeed")]
    wind_speed: Option<NumericSeries>,
    #[serde(rename = "windDirection")]
    wind_direction: Option<NumericSeries>,
    #[serde(rename = "windGust")]
    wind_gust: Option<NumericSeries>,
    #[serde(rename = "skyCover")]
    sky_cover: Option<NumericSeries>,
    weather: Option<WeatherSeries>,
    #[serde(rename = "mixingHeight")]
    mixing_height: Option<NumericSeries>,
    #[serde(rename = "transportWindSpeed")]
    transport_wind_speed: Option<NumericSeries>,
    #[serde(rename = "transportWindDirection")]
    transport_wind_direction: Option<NumericSeries>,
    #[serde(rename = "hainesIndex")]
    haines_index: Option<NumericSeries>,
    #[serde(rename = "probabilityOfPrecipitation")]
    probability_of_precipitation: Option<NumericSeries>,
}

#[derive(Debug, Deserialize)]
struct NumericSeries {
    values: Vec<NumericValue>,
}

#[derive(Debug, Deserialize)]
struct NumericValue {
    #[serde(rename = "validTime")]
    valid_time: String,
    /// NWS reports gaps as explicit nulls
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherSeries {
    values: Vec<WeatherValue>,
}

#[derive(Debug, Deserialize)]
struct WeatherValue {
    #[serde(rename = "validTime")]
    valid_time: String,
    value: Option<Vec<WeatherCondition>>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    weather: Option<String>,
}

impl NwsClient {
    pub fn new(user_agent: &str) -> Self {
        Self::with_base_url(user_agent, NWS_API_URL)
    }

    /// Client pointed at a different base URL (tests).
    pub fn with_base_url(user_agent: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            user_agent: user_agent.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| AppError::InternalError(format!("Invalid User-Agent: {}", e)))?,
        );
        Ok(headers)
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, AppError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("NWS request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "NWS returned HTTP {} for {}",
                response.status(),
                url
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("NWS JSON parse error: {}", e)))
    }

    /// Resolve location metadata via the `points` endpoint.
    ///
    /// Coordinates are truncated to 4 decimal places; the NWS API redirects
    /// (and sometimes rejects) higher precision.
    pub async fn fetch_point(&self, lat: f64, lon: f64) -> Result<PointMetadata, AppError> {
        let url = format!("{}/points/{:.4},{:.4}", self.base_url, lat, lon);
        let raw = self.get_json(&url).await?;
        parse_point_payload(&raw)
    }

    /// Fetch the gridpoint forecast series from the URL the `points`
    /// endpoint supplied.
    pub async fn fetch_gridpoint(&self, grid_url: &str) -> Result<GridForecast, AppError> {
        let raw = self.get_json(grid_url).await?;
        parse_grid_payload(&raw)
    }
}

/// Parse a `points` response into `PointMetadata`. Pure (no I/O).
pub fn parse_point_payload(raw: &serde_json::Value) -> Result<PointMetadata, AppError> {
    let points: PointsResponse = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::ExternalServiceError(format!("NWS points structure error: {}", e)))?;

    let props = points.properties;

    let time_zone = match props.time_zone.as_deref() {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!("Unrecognized NWS timezone '{}', using fallback", name);
            FALLBACK_TZ
        }),
        None => FALLBACK_TZ,
    };

    let relative = props
        .relative_location
        .and_then(|r| r.properties)
        .unwrap_or(RelativeLocationProperties {
            city: None,
            state: None,
        });

    Ok(PointMetadata {
        office: props.cwa,
        forecast_grid_data: props.forecast_grid_data,
        time_zone,
        city: relative.city.unwrap_or_default(),
        state: relative.state.unwrap_or_default(),
    })
}

/// Parse a gridpoint response into the core's `GridForecast`. Pure (no I/O).
///
/// Missing series normalize to empty vectors and null values to zero, so
/// downstream assembly needs no defensive branching.
pub fn parse_grid_payload(raw: &serde_json::Value) -> Result<GridForecast, AppError> {
    let grid: GridResponse = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::ExternalServiceError(format!("NWS grid structure error: {}", e)))?;

    let p = grid.properties;

    Ok(GridForecast {
        temperature: numeric_entries(p.temperature),
        relative_humidity: numeric_entries(p.relative_humidity),
        wind_speed: numeric_entries(p.wind_speed),
        wind_direction: numeric_entries(p.wind_direction),
        wind_gust: numeric_entries(p.wind_gust),
        sky_cover: numeric_entries(p.sky_cover),
        weather: weather_entries(p.weather),
        mixing_height: numeric_entries(p.mixing_height),
        transport_wind_speed: numeric_entries(p.transport_wind_speed),
        transport_wind_direction: numeric_entries(p.transport_wind_direction),
        haines_index: numeric_entries(p.haines_index),
        precip_chance: numeric_entries(p.probability_of_precipitation),
    })
}

fn numeric_entries(series: Option<NumericSeries>) -> Vec<RleEntry<f64>> {
    series
        .map(|s| {
            s.values
                .iter()
                .filter_map(|v| {
                    parse_valid_time(&v.valid_time).map(|(start, duration)| RleEntry {
                        start,
                        duration,
                        value: v.value.unwrap_or(0.0),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn weather_entries(series: Option<WeatherSeries>) -> Vec<RleEntry<String>> {
    series
        .map(|s| {
            s.values
                .iter()
                .filter_map(|v| {
                    let code = v
                        .value
                        .as_ref()
                        .and_then(|conditions| conditions.first())
                        .and_then(|c| c.weather.clone())
                        .unwrap_or_default();
                    parse_valid_time(&v.valid_time).map(|(start, duration)| RleEntry {
                        start,
                        duration,
                        value: code,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
