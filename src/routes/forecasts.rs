//! Forecast HTTP endpoints.
//!
//! - GET /api/v1/forecast?lat=LAT&lon=LON&days_since_rain=N

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::HourlyForecast;
use crate::services::forecast::{assemble_hourly, current_hour_index};
use crate::services::nws::NwsClient;

/// Days-since-rain fallback when the client does not supply one.
const DEFAULT_DAYS_SINCE_RAIN: u32 = 3;

/// Shared application state for forecast endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) nws: NwsClient,
    pub(crate) forecast_hours: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Days since the last wetting rain (drives fuel-moisture decay)
    pub days_since_rain: Option<u32>,
}

/// Hourly forecast response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    /// NWS forecast office identifier (e.g. "JAN")
    pub office: String,
    /// Nearest city to the requested point, when known
    pub city: String,
    /// State abbreviation, when known
    pub state: String,
    /// IANA timezone the local-time fields are rendered in
    pub timezone: String,
    /// Index into `hours` of the hour closest to now. Views anchored on the
    /// present should start here, not at index 0.
    pub current_index: usize,
    /// Enriched hourly records, chronological
    pub hours: Vec<HourlyForecast>,
}

/// Reject coordinates outside the valid lat/lon domain before they reach
/// the upstream (the NWS API's own error for these is unhelpful).
pub(crate) fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::BadRequest(format!(
            "lat must be between -90 and 90, got {}",
            lat
        )));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::BadRequest(format!(
            "lon must be between -180 and 180, got {}",
            lon
        )));
    }
    Ok(())
}

/// Get the enriched hourly forecast for a location.
///
/// Resolves the NWS gridpoint for the coordinates, expands the run-length
/// encoded series onto an hourly grid, and derives all fire-weather fields
/// per hour. The forecast is rebuilt from the live upstream on every call.
#[utoipa::path(
    get,
    path = "/api/v1/forecast",
    tag = "Forecasts",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Enriched hourly forecast", body = ForecastResponse),
        (status = 400, description = "Invalid coordinates", body = ErrorResponse),
        (status = 502, description = "NWS API unreachable or returned bad data", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, AppError> {
    validate_coordinates(params.lat, params.lon)?;

    let meta = state.nws.fetch_point(params.lat, params.lon).await?;
    let grid = state.nws.fetch_gridpoint(&meta.forecast_grid_data).await?;

    let days_since_rain = params.days_since_rain.unwrap_or(DEFAULT_DAYS_SINCE_RAIN);
    let hours = assemble_hourly(&grid, meta.time_zone, days_since_rain, state.forecast_hours);
    let current_index = current_hour_index(&hours, Utc::now());

    tracing::debug!(
        "Assembled {} forecast hours for {},{} (office {})",
        hours.len(),
        params.lat,
        params.lon,
        meta.office
    );

    Ok(Json(ForecastResponse {
        office: meta.office,
        city: meta.city,
        state: meta.state,
        timezone: meta.time_zone.name().to_string(),
        current_index,
        hours,
    }))
}
