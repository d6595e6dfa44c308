//! Core data types for the prescribed-fire weather API.
//!
//! Everything here is plain immutable data: records are built once per fetch
//! by the assembler, handed to the routes for serialization, and rebuilt from
//! scratch on the next request. Nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One hour of enriched forecast: raw NWS gridpoint values (unit-converted)
/// plus every derived fire-science field.
///
/// Every derived field is a deterministic function of the raw fields on the
/// same record, the days-since-rain parameter, and (for dispersion) the local
/// hour of day. No derived field depends on any other hour.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HourlyForecast {
    /// Forecast hour, UTC
    pub time: DateTime<Utc>,
    /// Human-readable local time label (forecast timezone)
    pub local_time: String,
    /// Air temperature in °F
    pub temp: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Sustained wind speed in mph
    pub wind_speed: f64,
    /// Wind gust speed in mph
    pub wind_gust: f64,
    /// Wind direction in degrees (0 = north)
    pub wind_direction: f64,
    /// Wind direction as 16-point cardinal
    pub wind_direction_cardinal: String,
    /// Sky cover in %
    pub sky_cover: f64,
    /// Sky cover abbreviation (CLR/FW/PC/MC/MCR/OVC)
    pub sky_cover_abbr: String,
    /// Raw NWS weather phenomenon code (e.g. "light_rain")
    pub weather_code: String,
    /// Weather type abbreviation (T/RW/S/F/K/H or empty)
    pub weather_abbr: String,
    /// Mixing height in ft
    pub mixing_height: f64,
    /// Transport wind speed in mph
    pub transport_wind_speed: f64,
    /// Transport wind speed in m/s
    pub transport_wind_speed_ms: f64,
    /// Transport wind direction in degrees
    pub transport_wind_direction: f64,
    /// Transport wind direction as 16-point cardinal
    pub transport_wind_direction_cardinal: String,
    /// Haines index (2–6)
    pub haines_index: f64,
    /// Precipitation probability in %
    pub precip_chance: f64,
    /// Ventilation index: mixing height (ft) × transport wind (mph)
    pub ventilation_index: i64,
    /// Simplified KBDI drought-trend signal
    pub kbdi_trend: i64,
    /// Fine Fuel Moisture Code, 0–100
    pub ffmc: f64,
    /// 1-hour timelag fuel moisture in %, clamped to [1, 35]
    pub fuel_moisture_1hr: f64,
    /// 10-hour timelag fuel moisture in %, clamped to [1, 35]
    pub fuel_moisture_10hr: f64,
    /// 100-hour timelag fuel moisture in %, clamped to [1, 35]
    pub fuel_moisture_100hr: f64,
    /// Smoke dispersion category (Excellent/Good/Fair/Poor/Very Poor)
    pub dispersion_category: String,
    /// Fixed description sentence for the dispersion category
    pub dispersion_description: String,
    /// Stability-adjusted ventilation index
    pub adjusted_vi: i64,
    /// Composite burn quality label (Excellent/Good/Fair/Marginal/Poor)
    pub burn_quality: String,
    /// Composite burn quality score, 0–100
    pub burn_score: u8,
    /// Ignition probability in %
    pub ignition_probability: u8,
}

/// Fuel moisture for the three standard timelag classes, in %.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelMoisture {
    pub one_hour: f64,
    pub ten_hour: f64,
    pub hundred_hour: f64,
}

/// Smoke dispersion classification for a single hour.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionResult {
    /// Excellent / Good / Fair / Poor / Very Poor
    pub category: &'static str,
    /// Fixed operational guidance sentence for the category
    pub description: &'static str,
    /// Ventilation index after the time-of-day stability adjustment, rounded
    pub adjusted_vi: i64,
}

/// Composite burn-quality assessment for a single hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnAssessment {
    /// Excellent / Good / Fair / Marginal / Poor
    pub quality: &'static str,
    /// 0–100
    pub score: u8,
}

/// User-editable acceptance envelope for a prescribed burn.
///
/// Ranges are not validated by the type itself; the route layer rejects
/// min > max before the detector ever sees them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionParams {
    /// Minimum acceptable relative humidity in %
    #[serde(default = "default_humidity_min")]
    pub humidity_min: f64,
    /// Maximum acceptable relative humidity in %
    #[serde(default = "default_humidity_max")]
    pub humidity_max: f64,
    /// Minimum acceptable wind speed in mph
    #[serde(default = "default_wind_speed_min")]
    pub wind_speed_min: f64,
    /// Maximum acceptable wind speed in mph
    #[serde(default = "default_wind_speed_max")]
    pub wind_speed_max: f64,
    /// Minimum acceptable temperature in °F
    #[serde(default = "default_temp_min")]
    pub temp_min: f64,
    /// Maximum acceptable temperature in °F
    #[serde(default = "default_temp_max")]
    pub temp_max: f64,
    /// Minimum acceptable ventilation index
    #[serde(default = "default_min_ventilation_index")]
    pub min_ventilation_index: i64,
    /// Days since the last wetting rain (drives fuel-moisture decay)
    #[serde(default = "default_days_since_rain")]
    pub days_since_rain: u32,
}

fn default_humidity_min() -> f64 {
    30.0
}
fn default_humidity_max() -> f64 {
    55.0
}
fn default_wind_speed_min() -> f64 {
    4.0
}
fn default_wind_speed_max() -> f64 {
    15.0
}
fn default_temp_min() -> f64 {
    40.0
}
fn default_temp_max() -> f64 {
    80.0
}
fn default_min_ventilation_index() -> i64 {
    20000
}
fn default_days_since_rain() -> u32 {
    3
}

impl Default for PrescriptionParams {
    fn default() -> Self {
        Self {
            humidity_min: default_humidity_min(),
            humidity_max: default_humidity_max(),
            wind_speed_min: default_wind_speed_min(),
            wind_speed_max: default_wind_speed_max(),
            temp_min: default_temp_min(),
            temp_max: default_temp_max(),
            min_ventilation_index: default_min_ventilation_index(),
            days_since_rain: default_days_since_rain(),
        }
    }
}

/// A detected contiguous run of ≥2 prescription-passing daytime hours on one
/// calendar day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BurnWindow {
    /// Local date label (e.g. "Tue, Mar 3")
    pub date: String,
    /// Local start time label (e.g. "10 AM")
    pub start_time: String,
    /// Local end time label of the last qualifying hour
    pub end_time: String,
    /// Number of hours in the window (always ≥ 2)
    pub hours: usize,
    /// Mean temperature across the window in °F
    pub avg_temp: f64,
    /// Mean relative humidity across the window in %
    pub avg_humidity: f64,
    /// Mean wind speed across the window in mph
    pub avg_wind_speed: f64,
    /// Mean ventilation index across the window
    pub avg_ventilation_index: f64,
    /// Modal surface wind cardinal across the window
    pub prevailing_surface_wind: String,
    /// Modal transport wind cardinal across the window
    pub prevailing_transport_wind: String,
    /// Dispersion category of the window's first hour
    pub dispersion_category: String,
    /// Quality label derived from the averaged burn score
    pub burn_quality: String,
    /// Mean burn score across the window, rounded
    pub avg_burn_score: i64,
}

/// One cell of the burn-quality heatmap: a single local hour of a single day.
///
/// Unlike `BurnWindow`, heatmap cells are not filtered by daytime band or
/// prescription — out-of-prescription hours carry their violation reasons
/// instead of being dropped.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeatmapCell {
    /// Local hour of day, 0–23
    pub hour: u32,
    /// Burn quality score for this hour, 0–100
    pub score: u8,
    /// Burn quality label for this hour
    pub quality: String,
    /// Out-of-prescription reasons ("Low Temp", "High RH", ...); empty when
    /// the hour satisfies every bound
    pub reasons: Vec<String>,
}

/// One row of the burn-quality heatmap: a local calendar day with its cells
/// in chronological order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeatmapDay {
    /// Local date label (e.g. "Tue, Mar 3")
    pub date: String,
    /// Cells for the hours present in the forecast, ordered by hour
    pub cells: Vec<HeatmapCell>,
}
