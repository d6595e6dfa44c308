//! Burn-window detection and the burn-quality heatmap.
//!
//! The detector scans the forward-looking hourly sequence for contiguous
//! daytime runs where every hour sits inside the prescription envelope, then
//! summarizes each run. The heatmap is the unfiltered superset view: every
//! forecast hour, bucketed day × hour, with its score and the list of
//! prescription bounds it violates.
//!
//! Both are single folds into ordered maps keyed by local calendar date, so
//! output order is chronological and the grouping step stays testable on its
//! own.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::models::{BurnWindow, HeatmapCell, HeatmapDay, HourlyForecast, PrescriptionParams};
use crate::services::fire_science::burn_quality_label;

/// Daytime band for burn windows: local hours 10AM–4PM inclusive.
const DAYTIME_START_HOUR: u32 = 10;
const DAYTIME_END_HOUR: u32 = 16;

/// Minimum contiguous hours for a run to count as a window.
const MIN_WINDOW_HOURS: usize = 2;

/// Whether one hour satisfies every prescription bound.
pub fn meets_prescription(h: &HourlyForecast, rx: &PrescriptionParams) -> bool {
    h.temp >= rx.temp_min
        && h.temp <= rx.temp_max
        && h.humidity >= rx.humidity_min
        && h.humidity <= rx.humidity_max
        && h.wind_speed >= rx.wind_speed_min
        && h.wind_speed <= rx.wind_speed_max
        && h.ventilation_index >= rx.min_ventilation_index
}

/// Human-readable reasons an hour falls outside the prescription, one per
/// out-of-range field. Empty when the hour qualifies.
pub fn violation_reasons(h: &HourlyForecast, rx: &PrescriptionParams) -> Vec<String> {
    let mut reasons = Vec::new();
    if h.temp < rx.temp_min {
        reasons.push("Low Temp".to_string());
    }
    if h.temp > rx.temp_max {
        reasons.push("High Temp".to_string());
    }
    if h.humidity < rx.humidity_min {
        reasons.push("Low RH".to_string());
    }
    if h.humidity > rx.humidity_max {
        reasons.push("High RH".to_string());
    }
    if h.wind_speed < rx.wind_speed_min {
        reasons.push("Low Wind".to_string());
    }
    if h.wind_speed > rx.wind_speed_max {
        reasons.push("High Wind".to_string());
    }
    if h.ventilation_index < rx.min_ventilation_index {
        reasons.push("Low VI".to_string());
    }
    reasons
}

/// Find all burn windows in the forward-looking hourly sequence.
///
/// An hour qualifies when its local hour of day sits in the 10AM–4PM band
/// and it individually satisfies every prescription bound. Qualifying hours
/// are grouped by local calendar date, split into maximal runs where
/// consecutive hours are ≤1 hour apart (any gap breaks a run, including one
/// the daytime filter created), and runs shorter than 2 hours are dropped.
pub fn detect_burn_windows(
    hours: &[HourlyForecast],
    rx: &PrescriptionParams,
    tz: Tz,
) -> Vec<BurnWindow> {
    // Fold qualifying hours into an ordered map keyed by local date.
    let by_day: BTreeMap<NaiveDate, Vec<&HourlyForecast>> = hours
        .iter()
        .filter(|h| {
            let local_hour = h.time.with_timezone(&tz).hour();
            (DAYTIME_START_HOUR..=DAYTIME_END_HOUR).contains(&local_hour)
                && meets_prescription(h, rx)
        })
        .fold(BTreeMap::new(), |mut acc, h| {
            let date = h.time.with_timezone(&tz).date_naive();
            acc.entry(date).or_default().push(h);
            acc
        });

    let mut windows = Vec::new();

    for (_, mut day_hours) in by_day {
        day_hours.sort_by_key(|h| h.time);

        let mut run: Vec<&HourlyForecast> = Vec::new();
        for h in day_hours {
            match run.last() {
                Some(prev) if (h.time - prev.time).num_seconds() <= 3600 => run.push(h),
                Some(_) => {
                    if run.len() >= MIN_WINDOW_HOURS {
                        windows.push(build_window(&run, tz));
                    }
                    run = vec![h];
                }
                None => run.push(h),
            }
        }
        if run.len() >= MIN_WINDOW_HOURS {
            windows.push(build_window(&run, tz));
        }
    }

    windows
}

/// Summarize one contiguous run of qualifying hours into a `BurnWindow`.
fn build_window(run: &[&HourlyForecast], tz: Tz) -> BurnWindow {
    let n = run.len() as f64;
    let avg = |f: fn(&HourlyForecast) -> f64| run.iter().map(|h| f(h)).sum::<f64>() / n;

    let avg_score = run.iter().map(|h| h.burn_score as f64).sum::<f64>() / n;

    let first = run[0];
    let last = run[run.len() - 1];
    let start_local = first.time.with_timezone(&tz);

    BurnWindow {
        date: start_local.format("%a, %b %-d").to_string(),
        start_time: start_local.format("%-I %p").to_string(),
        end_time: last.time.with_timezone(&tz).format("%-I %p").to_string(),
        hours: run.len(),
        avg_temp: avg(|h| h.temp),
        avg_humidity: avg(|h| h.humidity),
        avg_wind_speed: avg(|h| h.wind_speed),
        avg_ventilation_index: avg(|h| h.ventilation_index as f64),
        prevailing_surface_wind: modal_cardinal(run.iter().map(|h| &h.wind_direction_cardinal)),
        prevailing_transport_wind: modal_cardinal(
            run.iter().map(|h| &h.transport_wind_direction_cardinal),
        ),
        dispersion_category: first.dispersion_category.clone(),
        burn_quality: burn_quality_label(avg_score).to_string(),
        avg_burn_score: avg_score.round() as i64,
    }
}

/// The most frequent cardinal direction, ties broken by first encounter.
///
/// Counts accumulate in encounter order in a Vec rather than a hash map, and
/// the strict `>` in the final fold keeps the first maximum on a tie
/// (`max_by_key` would keep the last).
fn modal_cardinal<'a>(directions: impl Iterator<Item = &'a String>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for dir in directions {
        match counts.iter_mut().find(|(d, _)| *d == dir.as_str()) {
            Some((_, c)) => *c += 1,
            None => counts.push((dir, 1)),
        }
    }

    counts
        .into_iter()
        .fold(("", 0), |best, (d, c)| if c > best.1 { (d, c) } else { best })
        .0
        .to_string()
}

/// Build the day × hour burn-quality heatmap for the forward-looking
/// sequence.
///
/// Every hour appears regardless of daytime band or prescription; failing
/// hours carry their violation reasons for display. Days and cells come out
/// in chronological order.
pub fn build_heatmap(
    hours: &[HourlyForecast],
    rx: &PrescriptionParams,
    tz: Tz,
) -> Vec<HeatmapDay> {
    let grid: BTreeMap<NaiveDate, HeatmapDay> =
        hours.iter().fold(BTreeMap::new(), |mut acc, h| {
            let local = h.time.with_timezone(&tz);
            let day = acc
                .entry(local.date_naive())
                .or_insert_with(|| HeatmapDay {
                    date: local.format("%a, %b %-d").to_string(),
                    cells: Vec::new(),
                });
            day.cells.push(HeatmapCell {
                hour: local.hour(),
                score: h.burn_score,
                quality: h.burn_quality.clone(),
                reasons: violation_reasons(h, rx),
            });
            acc
        });

    grid.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    const TZ: Tz = chrono_tz::America::Chicago;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    /// An hour that comfortably satisfies the default prescription.
    fn passing_hour(time: &str) -> HourlyForecast {
        HourlyForecast {
            time: utc(time),
            local_time: String::new(),
            temp: 60.0,
            humidity: 40.0,
            wind_speed: 8.0,
            wind_gust: 10.0,
            wind_direction: 180.0,
            wind_direction_cardinal: "S".to_string(),
            sky_cover: 20.0,
            sky_cover_abbr: "FW".to_string(),
            weather_code: String::new(),
            weather_abbr: String::new(),
            mixing_height: 3000.0,
            transport_wind_speed: 15.0,
            transport_wind_speed_ms: 6.7,
            transport_wind_direction: 200.0,
            transport_wind_direction_cardinal: "SSW".to_string(),
            haines_index: 4.0,
            precip_chance: 10.0,
            ventilation_index: 45000,
            kbdi_trend: 120,
            ffmc: 88.3,
            fuel_moisture_1hr: 7.5,
            fuel_moisture_10hr: 16.4,
            fuel_moisture_100hr: 27.3,
            dispersion_category: "Good".to_string(),
            dispersion_description: String::new(),
            adjusted_vi: 45000,
            burn_quality: "Excellent".to_string(),
            burn_score: 100,
            ignition_probability: 81,
        }
    }

    // 2026-03-03 is before the US DST switch, so Central = UTC-6:
    // local 10AM = 16:00 UTC.
    fn local_10am_to_4pm() -> Vec<HourlyForecast> {
        (16..=22)
            .map(|h| passing_hour(&format!("2026-03-03T{:02}:00:00Z", h)))
            .collect()
    }

    #[test]
    fn test_detects_single_window_ending_before_failing_hour() {
        let mut hours = local_10am_to_4pm();
        // Local 4PM fails on wind; 10AM–3PM (6 hours) should survive.
        hours[6].wind_speed = 25.0;

        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.hours, 6);
        assert_eq!(w.start_time, "10 AM");
        assert_eq!(w.end_time, "3 PM");
        assert_eq!(w.date, "Tue, Mar 3");
    }

    #[test]
    fn test_window_summary_averages() {
        let mut hours = local_10am_to_4pm();
        hours.truncate(2);
        hours[1].temp = 70.0;
        hours[1].ventilation_index = 55000;

        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(windows.len(), 1);
        let w = &windows[0];
        assert_eq!(w.avg_temp, 65.0);
        assert_eq!(w.avg_ventilation_index, 50000.0);
        assert_eq!(w.avg_burn_score, 100);
        assert_eq!(w.burn_quality, "Excellent");
        // Dispersion comes from the first hour, not an average.
        assert_eq!(w.dispersion_category, "Good");
    }

    #[test]
    fn test_isolated_qualifying_hour_yields_no_window() {
        let hours = vec![passing_hour("2026-03-03T16:00:00Z")];
        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert!(windows.is_empty());
    }

    #[test]
    fn test_mid_run_failure_splits_into_two_windows() {
        let mut hours = local_10am_to_4pm();
        // Local noon fails → runs 10–11 and 1–4 remain, both ≥2 hours.
        hours[2].humidity = 80.0;

        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].hours, 2);
        assert_eq!(windows[0].start_time, "10 AM");
        assert_eq!(windows[1].hours, 4);
        assert_eq!(windows[1].start_time, "1 PM");
    }

    #[test]
    fn test_hours_outside_daytime_band_are_excluded() {
        // Local 8AM–6PM all pass the prescription, but only 10AM–4PM counts.
        let hours: Vec<HourlyForecast> = (14..=24)
            .map(|h| {
                passing_hour(&format!(
                    "2026-03-{:02}T{:02}:00:00Z",
                    3 + h / 24,
                    h % 24
                ))
            })
            .collect();

        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].hours, 7);
        assert_eq!(windows[0].start_time, "10 AM");
        assert_eq!(windows[0].end_time, "4 PM");
    }

    #[test]
    fn test_windows_split_across_days() {
        let mut hours = local_10am_to_4pm();
        // Same local hours next day.
        hours.extend((16..=22).map(|h| passing_hour(&format!("2026-03-04T{:02}:00:00Z", h))));

        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].date, "Tue, Mar 3");
        assert_eq!(windows[1].date, "Wed, Mar 4");
    }

    #[test]
    fn test_prevailing_wind_is_modal_with_first_encounter_tiebreak() {
        let mut hours = local_10am_to_4pm();
        hours.truncate(4);
        hours[0].wind_direction_cardinal = "N".to_string();
        hours[1].wind_direction_cardinal = "SW".to_string();
        hours[2].wind_direction_cardinal = "SW".to_string();
        hours[3].wind_direction_cardinal = "N".to_string();

        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        // 2–2 tie between N and SW: N was encountered first.
        assert_eq!(windows[0].prevailing_surface_wind, "N");

        // Same tie with SW seen first keeps SW.
        hours[0].wind_direction_cardinal = "SW".to_string();
        hours[1].wind_direction_cardinal = "N".to_string();
        let windows = detect_burn_windows(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(windows[0].prevailing_surface_wind, "SW");
    }

    #[test]
    fn test_empty_sequence_yields_no_windows() {
        let windows = detect_burn_windows(&[], &PrescriptionParams::default(), TZ);
        assert!(windows.is_empty());
    }

    #[test]
    fn test_meets_prescription_bounds_are_inclusive() {
        let rx = PrescriptionParams::default();
        let mut h = passing_hour("2026-03-03T16:00:00Z");
        h.temp = 40.0;
        h.humidity = 55.0;
        h.wind_speed = 15.0;
        h.ventilation_index = 20000;
        assert!(meets_prescription(&h, &rx));
        h.ventilation_index = 19999;
        assert!(!meets_prescription(&h, &rx));
    }

    #[test]
    fn test_violation_reasons_enumerate_each_failure() {
        let rx = PrescriptionParams::default();
        let mut h = passing_hour("2026-03-03T16:00:00Z");
        h.temp = 90.0;
        h.humidity = 10.0;
        h.wind_speed = 1.0;
        h.ventilation_index = 5000;

        let reasons = violation_reasons(&h, &rx);
        assert_eq!(reasons, vec!["High Temp", "Low RH", "Low Wind", "Low VI"]);
    }

    #[test]
    fn test_violation_reasons_empty_for_passing_hour() {
        let h = passing_hour("2026-03-03T16:00:00Z");
        assert!(violation_reasons(&h, &PrescriptionParams::default()).is_empty());
    }

    #[test]
    fn test_heatmap_includes_failing_and_nighttime_hours() {
        let mut hours = local_10am_to_4pm();
        // A 3AM local hour and a failing hour both still appear in the grid.
        hours.push(passing_hour("2026-03-04T09:00:00Z"));
        hours[0].wind_speed = 30.0;

        let grid = build_heatmap(&hours, &PrescriptionParams::default(), TZ);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].date, "Tue, Mar 3");
        assert_eq!(grid[0].cells.len(), 7);
        assert_eq!(grid[0].cells[0].hour, 10);
        assert_eq!(grid[0].cells[0].reasons, vec!["High Wind"]);
        assert!(grid[0].cells[1].reasons.is_empty());
        assert_eq!(grid[1].cells[0].hour, 3);
    }

    #[test]
    fn test_heatmap_empty_input() {
        let grid = build_heatmap(&[], &PrescriptionParams::default(), TZ);
        assert!(grid.is_empty());
    }
}
