//! Burn-window HTTP endpoint.
//!
//! - GET /api/v1/burn-windows?lat=LAT&lon=LON&temp_min=..&humidity_max=..

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{BurnWindow, HeatmapDay, PrescriptionParams};
use crate::routes::forecasts::{validate_coordinates, AppState};
use crate::services::forecast::{assemble_hourly, current_hour_index};
use crate::services::windows::{build_heatmap, detect_burn_windows};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BurnWindowQuery {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Minimum acceptable relative humidity in % (default 30)
    pub humidity_min: Option<f64>,
    /// Maximum acceptable relative humidity in % (default 55)
    pub humidity_max: Option<f64>,
    /// Minimum acceptable wind speed in mph (default 4)
    pub wind_speed_min: Option<f64>,
    /// Maximum acceptable wind speed in mph (default 15)
    pub wind_speed_max: Option<f64>,
    /// Minimum acceptable temperature in °F (default 40)
    pub temp_min: Option<f64>,
    /// Maximum acceptable temperature in °F (default 80)
    pub temp_max: Option<f64>,
    /// Minimum acceptable ventilation index (default 20000)
    pub min_ventilation_index: Option<i64>,
    /// Days since the last wetting rain (default 3)
    pub days_since_rain: Option<u32>,
}

impl BurnWindowQuery {
    /// Merge supplied bounds over the standard prescription.
    fn prescription(&self) -> PrescriptionParams {
        let d = PrescriptionParams::default();
        PrescriptionParams {
            humidity_min: self.humidity_min.unwrap_or(d.humidity_min),
            humidity_max: self.humidity_max.unwrap_or(d.humidity_max),
            wind_speed_min: self.wind_speed_min.unwrap_or(d.wind_speed_min),
            wind_speed_max: self.wind_speed_max.unwrap_or(d.wind_speed_max),
            temp_min: self.temp_min.unwrap_or(d.temp_min),
            temp_max: self.temp_max.unwrap_or(d.temp_max),
            min_ventilation_index: self
                .min_ventilation_index
                .unwrap_or(d.min_ventilation_index),
            days_since_rain: self.days_since_rain.unwrap_or(d.days_since_rain),
        }
    }
}

/// Burn-window detection response.
#[derive(Debug, Serialize, ToSchema)]
pub struct BurnWindowsResponse {
    /// NWS forecast office identifier
    pub office: String,
    /// IANA timezone the local labels are rendered in
    pub timezone: String,
    /// The prescription the windows were evaluated against
    pub prescription: PrescriptionParams,
    /// Detected burn windows, chronological
    pub windows: Vec<BurnWindow>,
    /// Unfiltered day-by-hour burn-quality grid
    pub heatmap: Vec<HeatmapDay>,
}

/// Each prescription range must be a finite, non-empty interval.
fn validate_prescription(rx: &PrescriptionParams) -> Result<(), AppError> {
    let ranges = [
        ("temp", rx.temp_min, rx.temp_max),
        ("humidity", rx.humidity_min, rx.humidity_max),
        ("wind_speed", rx.wind_speed_min, rx.wind_speed_max),
    ];
    for (name, min, max) in ranges {
        // Check is_finite() first because NaN passes range comparisons
        // (NaN > max is false even when the range is nonsense).
        if !min.is_finite() || !max.is_finite() {
            return Err(AppError::BadRequest(format!(
                "{}_min and {}_max must be finite numbers",
                name, name
            )));
        }
        if min > max {
            return Err(AppError::BadRequest(format!(
                "{}_min ({}) must not exceed {}_max ({})",
                name, min, name, max
            )));
        }
    }
    if rx.min_ventilation_index < 0 {
        return Err(AppError::BadRequest(format!(
            "min_ventilation_index must not be negative, got {}",
            rx.min_ventilation_index
        )));
    }
    Ok(())
}

/// Detect burnable windows in the forecast for a location.
///
/// Assembles the enriched hourly forecast, then scans forward from the
/// current hour for daytime runs that satisfy the prescription. The heatmap
/// covers the same span unfiltered, with per-hour violation reasons, so
/// clients can show why a given hour failed.
#[utoipa::path(
    get,
    path = "/api/v1/burn-windows",
    tag = "BurnWindows",
    params(BurnWindowQuery),
    responses(
        (status = 200, description = "Burn windows and quality heatmap", body = BurnWindowsResponse),
        (status = 400, description = "Invalid coordinates or prescription", body = ErrorResponse),
        (status = 502, description = "NWS API unreachable or returned bad data", body = ErrorResponse),
    )
)]
pub async fn get_burn_windows(
    State(state): State<AppState>,
    Query(params): Query<BurnWindowQuery>,
) -> Result<Json<BurnWindowsResponse>, AppError> {
    validate_coordinates(params.lat, params.lon)?;
    let rx = params.prescription();
    validate_prescription(&rx)?;

    let meta = state.nws.fetch_point(params.lat, params.lon).await?;
    let grid = state.nws.fetch_gridpoint(&meta.forecast_grid_data).await?;

    let hours = assemble_hourly(&grid, meta.time_zone, rx.days_since_rain, state.forecast_hours);
    // Past hours in the forecast span are not candidate windows.
    let from_now = &hours[current_hour_index(&hours, Utc::now())..];

    let windows = detect_burn_windows(from_now, &rx, meta.time_zone);
    let heatmap = build_heatmap(from_now, &rx, meta.time_zone);

    tracing::debug!(
        "Found {} burn windows across {} forecast hours (office {})",
        windows.len(),
        from_now.len(),
        meta.office
    );

    Ok(Json(BurnWindowsResponse {
        office: meta.office,
        timezone: meta.time_zone.name().to_string(),
        prescription: rx,
        windows,
        heatmap,
    }))
}
