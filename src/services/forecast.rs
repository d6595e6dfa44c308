//! Hourly forecast assembly.
//!
//! Takes the normalized gridpoint series bundle from the NWS boundary layer,
//! expands every series onto the hourly grid, and builds one enriched
//! `HourlyForecast` per hour: unit conversions, cardinal/sky/weather labels,
//! and all fire-science derivations. The temperature series anchors the
//! timeline; other series are read positionally and default to zero where
//! they run short (the upstream occasionally truncates minor series early).
//!
//! Assembly is pure and synchronous — every record is a function of the
//! input snapshot alone, rebuilt in full on each fetch.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::HourlyForecast;
use crate::services::fire_science::{
    assess_burn, dispersion_category, ffmc, fuel_moisture, ignition_probability, kbdi_trend,
    ventilation_index,
};
use crate::services::timeseries::{expand_series, HourlyValue, RleEntry};
use crate::units::{
    celsius_to_fahrenheit, degrees_to_cardinal, kmh_to_mph, knots_to_mph, meters_to_feet,
    mph_to_ms, sky_cover_abbr, weather_abbr,
};

/// Normalized gridpoint series bundle, one field per NWS series.
///
/// Units are the raw upstream units; conversion happens during assembly.
/// Missing upstream series arrive as empty vectors (the boundary layer
/// normalizes them), which assembly treats as all-zero.
#[derive(Debug, Clone, Default)]
pub struct GridForecast {
    /// °C
    pub temperature: Vec<RleEntry<f64>>,
    /// %
    pub relative_humidity: Vec<RleEntry<f64>>,
    /// km/h
    pub wind_speed: Vec<RleEntry<f64>>,
    /// degrees
    pub wind_direction: Vec<RleEntry<f64>>,
    /// km/h
    pub wind_gust: Vec<RleEntry<f64>>,
    /// %
    pub sky_cover: Vec<RleEntry<f64>>,
    /// NWS phenomenon code strings
    pub weather: Vec<RleEntry<String>>,
    /// metres
    pub mixing_height: Vec<RleEntry<f64>>,
    /// knots
    pub transport_wind_speed: Vec<RleEntry<f64>>,
    /// degrees
    pub transport_wind_direction: Vec<RleEntry<f64>>,
    /// 2–6 scale
    pub haines_index: Vec<RleEntry<f64>>,
    /// %
    pub precip_chance: Vec<RleEntry<f64>>,
}

/// Round to 1 decimal place (display precision for speeds and moistures).
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Positional read of an expanded numeric series, zero when the series runs
/// short of the anchor timeline.
fn value_at(series: &[HourlyValue<f64>], i: usize) -> f64 {
    series.get(i).map(|hv| hv.value).unwrap_or(0.0)
}

/// Assemble up to `hours_needed` enriched hourly records.
///
/// The local hour of day (in `tz`) drives the dispersion stability
/// adjustment; `days_since_rain` drives fuel-moisture decay. Returns an
/// empty vector when the temperature series is empty — callers treat "no
/// forecast" as a displayable state, not a failure.
pub fn assemble_hourly(
    grid: &GridForecast,
    tz: Tz,
    days_since_rain: u32,
    hours_needed: usize,
) -> Vec<HourlyForecast> {
    let temps = expand_series(&grid.temperature, hours_needed);
    let humidities = expand_series(&grid.relative_humidity, hours_needed);
    let wind_speeds = expand_series(&grid.wind_speed, hours_needed);
    let wind_dirs = expand_series(&grid.wind_direction, hours_needed);
    let wind_gusts = expand_series(&grid.wind_gust, hours_needed);
    let sky_covers = expand_series(&grid.sky_cover, hours_needed);
    let weather_codes = expand_series(&grid.weather, hours_needed);
    let mixing_heights = expand_series(&grid.mixing_height, hours_needed);
    let transport_speeds = expand_series(&grid.transport_wind_speed, hours_needed);
    let transport_dirs = expand_series(&grid.transport_wind_direction, hours_needed);
    let haines_indices = expand_series(&grid.haines_index, hours_needed);
    let precip_chances = expand_series(&grid.precip_chance, hours_needed);

    let mut hourly = Vec::with_capacity(temps.len());

    for (i, anchor) in temps.iter().enumerate() {
        let time = anchor.time;

        let temp_f = celsius_to_fahrenheit(anchor.value);
        let rh = value_at(&humidities, i);
        let wind_speed_mph = kmh_to_mph(value_at(&wind_speeds, i));
        let wind_dir = value_at(&wind_dirs, i);
        let wind_gust_mph = kmh_to_mph(value_at(&wind_gusts, i));
        let sky = value_at(&sky_covers, i);
        let weather_code = weather_codes
            .get(i)
            .map(|hv| hv.value.clone())
            .unwrap_or_default();
        let mixing_height_ft = meters_to_feet(value_at(&mixing_heights, i));
        let transport_mph = knots_to_mph(value_at(&transport_speeds, i));
        let transport_dir = value_at(&transport_dirs, i);
        let haines = value_at(&haines_indices, i);
        let precip = value_at(&precip_chances, i);

        let local = time.with_timezone(&tz);
        let local_hour = local.hour();

        let vi = ventilation_index(mixing_height_ft, transport_mph);
        let fm = fuel_moisture(temp_f, rh, days_since_rain);
        let dispersion = dispersion_category(mixing_height_ft, transport_mph, local_hour);
        let assessment = assess_burn(
            temp_f,
            rh,
            wind_speed_mph,
            wind_gust_mph,
            mixing_height_ft,
            vi,
        );

        hourly.push(HourlyForecast {
            time,
            local_time: local.format("%a, %b %-d, %-I:%M %p").to_string(),
            temp: temp_f.round(),
            humidity: rh.round(),
            wind_speed: round1(wind_speed_mph),
            wind_gust: round1(wind_gust_mph),
            wind_direction: wind_dir,
            wind_direction_cardinal: degrees_to_cardinal(wind_dir).to_string(),
            sky_cover: sky.round(),
            sky_cover_abbr: sky_cover_abbr(sky).to_string(),
            weather_abbr: weather_abbr(&weather_code).to_string(),
            weather_code,
            mixing_height: mixing_height_ft.round(),
            transport_wind_speed: round1(transport_mph),
            transport_wind_speed_ms: round1(mph_to_ms(transport_mph)),
            transport_wind_direction: transport_dir,
            transport_wind_direction_cardinal: degrees_to_cardinal(transport_dir).to_string(),
            haines_index: haines,
            precip_chance: precip.round(),
            ventilation_index: vi,
            kbdi_trend: kbdi_trend(temp_f, rh).round() as i64,
            ffmc: round1(ffmc(temp_f, rh, wind_speed_mph)),
            fuel_moisture_1hr: round1(fm.one_hour),
            fuel_moisture_10hr: round1(fm.ten_hour),
            fuel_moisture_100hr: round1(fm.hundred_hour),
            dispersion_category: dispersion.category.to_string(),
            dispersion_description: dispersion.description.to_string(),
            adjusted_vi: dispersion.adjusted_vi,
            burn_quality: assessment.quality.to_string(),
            burn_score: assessment.score,
            ignition_probability: ignition_probability(fm.one_hour).round() as u8,
        });
    }

    hourly
}

/// Index of the forecast hour closest to `now` (nearest-neighbor; exact
/// ties keep the earlier index). Returns 0 for an empty sequence.
///
/// This index, not index 0, is the canonical "now" anchor: dependent views
/// and the burn-window scan slice the sequence from here forward.
pub fn current_hour_index(hours: &[HourlyForecast], now: DateTime<Utc>) -> usize {
    let mut best_idx = 0;
    let mut best_diff = i64::MAX;

    for (i, h) in hours.iter().enumerate() {
        let diff = (h.time - now).num_seconds().abs();
        if diff < best_diff {
            best_diff = diff;
            best_idx = i;
        }
    }

    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn entry(start: &str, duration: &str, value: f64) -> RleEntry<f64> {
        RleEntry {
            start: utc(start),
            duration: duration.to_string(),
            value,
        }
    }

    /// 24 hours of constant, burn-friendly conditions starting at 06:00 UTC
    /// (midnight Central): 15.6°C ≈ 60°F, 40% RH, ~13 km/h ≈ 8 mph wind,
    /// 914.4 m ≈ 3000 ft mixing height, ~13 kt ≈ 15 mph transport wind.
    fn steady_grid() -> GridForecast {
        let start = "2026-03-03T06:00:00Z";
        GridForecast {
            temperature: vec![entry(start, "P1D", 15.5556)],
            relative_humidity: vec![entry(start, "P1D", 40.0)],
            wind_speed: vec![entry(start, "P1D", 12.87)],
            wind_direction: vec![entry(start, "P1D", 180.0)],
            wind_gust: vec![entry(start, "P1D", 16.0)],
            sky_cover: vec![entry(start, "P1D", 25.0)],
            weather: vec![RleEntry {
                start: utc(start),
                duration: "P1D".to_string(),
                value: String::new(),
            }],
            mixing_height: vec![entry(start, "P1D", 914.4)],
            transport_wind_speed: vec![entry(start, "P1D", 13.035)],
            transport_wind_direction: vec![entry(start, "P1D", 200.0)],
            haines_index: vec![entry(start, "P1D", 4.0)],
            precip_chance: vec![entry(start, "P1D", 10.0)],
        }
    }

    #[test]
    fn test_assemble_anchors_on_temperature_series() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0].time, utc("2026-03-03T06:00:00Z"));
        assert_eq!(hours[23].time, utc("2026-03-04T05:00:00Z"));
    }

    #[test]
    fn test_assemble_truncates_to_horizon() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 12);
        assert_eq!(hours.len(), 12);
    }

    #[test]
    fn test_assemble_converts_units() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        let h = &hours[0];
        assert_eq!(h.temp, 60.0);
        assert_eq!(h.wind_speed, 8.0);
        assert_eq!(h.mixing_height, 3000.0);
        assert_eq!(h.transport_wind_speed, 15.0);
        // 15 mph ≈ 6.7 m/s
        assert!((h.transport_wind_speed_ms - 6.7).abs() < 0.05);
        assert_eq!(h.wind_direction_cardinal, "S");
        assert_eq!(h.transport_wind_direction_cardinal, "SSW");
        assert_eq!(h.sky_cover_abbr, "FW");
    }

    #[test]
    fn test_assemble_derives_fire_fields() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        let h = &hours[0];
        assert_eq!(h.ventilation_index, 45000);
        // 60°F / 40% RH: (100-40)*2 + 0 = 120
        assert_eq!(h.kbdi_trend, 120);
        // 60°F / 40% / 8 mph: 85 + 0 + 2.5 + 0.8 = 88.3
        assert!((h.ffmc - 88.3).abs() < 0.05);
        assert!((1.0..=35.0).contains(&h.fuel_moisture_1hr));
        assert!(h.fuel_moisture_100hr >= h.fuel_moisture_10hr);
        // Ideal conditions in the steady grid score 100.
        assert_eq!(h.burn_score, 100);
        assert_eq!(h.burn_quality, "Excellent");
    }

    #[test]
    fn test_assemble_uses_local_hour_for_dispersion() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        // 06:00 UTC = midnight Central → night stability (0.5).
        let night = &hours[0];
        // 19:00 UTC = 1 PM Central → afternoon stability (1.0).
        let afternoon = &hours[13];
        assert_eq!(night.adjusted_vi, 22500);
        assert_eq!(afternoon.adjusted_vi, 45000);
        assert_eq!(afternoon.adjusted_vi, 2 * night.adjusted_vi);
        assert_eq!(night.dispersion_category, "Fair");
        assert_eq!(afternoon.dispersion_category, "Good");
    }

    #[test]
    fn test_assemble_short_series_default_to_zero() {
        let mut grid = steady_grid();
        grid.relative_humidity = vec![entry("2026-03-03T06:00:00Z", "PT2H", 40.0)];
        let hours = assemble_hourly(&grid, chrono_tz::America::Chicago, 3, 72);
        assert_eq!(hours[1].humidity, 40.0);
        assert_eq!(hours[2].humidity, 0.0);
    }

    #[test]
    fn test_assemble_empty_grid_yields_empty_forecast() {
        let hours = assemble_hourly(&GridForecast::default(), chrono_tz::America::Chicago, 3, 72);
        assert!(hours.is_empty());
    }

    #[test]
    fn test_current_hour_index_nearest() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        // 08:29 is 29 min past 08:00 and 31 min before 09:00 → index 2.
        let idx = current_hour_index(&hours, utc("2026-03-03T08:29:00Z"));
        assert_eq!(idx, 2);
        // 08:31 is closer to 09:00 → index 3.
        let idx = current_hour_index(&hours, utc("2026-03-03T08:31:00Z"));
        assert_eq!(idx, 3);
    }

    #[test]
    fn test_current_hour_index_tie_favors_earlier() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        // Exactly equidistant between 08:00 and 09:00 → first occurrence wins.
        let idx = current_hour_index(&hours, utc("2026-03-03T08:30:00Z"));
        assert_eq!(idx, 2);
    }

    #[test]
    fn test_current_hour_index_empty() {
        assert_eq!(current_hour_index(&[], utc("2026-03-03T08:30:00Z")), 0);
    }

    #[test]
    fn test_current_hour_index_before_and_after_range() {
        let hours = assemble_hourly(&steady_grid(), chrono_tz::America::Chicago, 3, 72);
        assert_eq!(current_hour_index(&hours, utc("2026-03-01T00:00:00Z")), 0);
        assert_eq!(current_hour_index(&hours, utc("2026-03-09T00:00:00Z")), 23);
    }
}
