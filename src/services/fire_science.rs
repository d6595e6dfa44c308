//! Fire science derivations.
//!
//! Pure, deterministic functions from hourly weather values to fire-behavior
//! indices: simplified KBDI trend, FFMC, Simard fuel moisture with
//! days-since-rain decay, ignition probability, ventilation index, a
//! time-of-day-adjusted smoke dispersion category, and the composite 0–100
//! burn-quality score.
//!
//! None of these functions can fail: out-of-range inputs are clamped, not
//! rejected. The stability factors and fuel-moisture decay constants are
//! heuristic calibration values reproduced exactly; they are not derived
//! from first principles and must not be "corrected".

use crate::models::{BurnAssessment, DispersionResult, FuelMoisture};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// 10-hour fuels: per-day drying factor and wet-side asymptote (%).
const TEN_HOUR_DECAY: f64 = 0.8;
const TEN_HOUR_ASYMPTOTE: f64 = 25.0;

/// 100-hour fuels dry slower (larger diameter) toward a wetter asymptote.
const HUNDRED_HOUR_DECAY: f64 = 0.95;
const HUNDRED_HOUR_ASYMPTOTE: f64 = 40.0;

/// Fuel moisture is reported within [1, 35] %.
const FUEL_MOISTURE_MIN: f64 = 1.0;
const FUEL_MOISTURE_MAX: f64 = 35.0;

/// Adjusted-VI breakpoints for the five dispersion tiers.
const DISPERSION_EXCELLENT: f64 = 60000.0;
const DISPERSION_GOOD: f64 = 40000.0;
const DISPERSION_FAIR: f64 = 20000.0;
const DISPERSION_POOR: f64 = 10000.0;

/// Mixing heights below this get a flat ventilation sub-score penalty.
const LOW_MIXING_HEIGHT_FT: f64 = 1500.0;
const LOW_MIXING_HEIGHT_PENALTY: f64 = 10.0;

/// Gusts above this get a flat wind sub-score penalty.
const GUST_LIMIT_MPH: f64 = 25.0;
const GUST_PENALTY: f64 = 15.0;

// ---------------------------------------------------------------------------
// Drought / moisture indices
// ---------------------------------------------------------------------------

/// Simplified KBDI drought-trend signal.
///
/// Not the cumulative textbook Keetch-Byram index — a stateless proxy from
/// the current hour's temperature and humidity alone, useful only as a
/// relative signal. Unclamped by design.
pub fn kbdi_trend(temp_f: f64, humidity_pct: f64) -> f64 {
    (100.0 - humidity_pct) * 2.0 + (temp_f - 60.0) * 0.5
}

/// Fine Fuel Moisture Code estimate, clamped to [0, 100].
///
/// Higher means drier fine fuels: >92 extreme ignition potential,
/// 89–91 very high, 85–88 high.
pub fn ffmc(temp_f: f64, humidity_pct: f64, wind_speed_mph: f64) -> f64 {
    let raw = 85.0 + (temp_f - 60.0) * 0.3 - (humidity_pct - 45.0) * 0.5 + wind_speed_mph * 0.1;
    raw.clamp(0.0, 100.0)
}

/// Simard (1968) Equilibrium Moisture Content, three humidity branches.
fn equilibrium_moisture_content(temp_f: f64, humidity_pct: f64) -> f64 {
    let h = humidity_pct;
    let t = temp_f;
    if h <= 10.0 {
        0.03229 + 0.281073 * h - 0.000578 * h * t
    } else if h <= 50.0 {
        2.22749 + 0.160107 * h - 0.01478 * t
    } else {
        21.0606 + 0.005565 * h * h - 0.00035 * h * t - 0.483199 * h
    }
}

/// Fuel moisture for the 1-hour, 10-hour and 100-hour timelag classes.
///
/// 1-hour fuels track EMC directly. The larger classes start at a wet
/// asymptote (25% / 40%) and decay exponentially toward EMC as rain-free
/// days accumulate; the 100-hour class decays slower. All three are clamped
/// to [1, 35] %.
pub fn fuel_moisture(temp_f: f64, humidity_pct: f64, days_since_rain: u32) -> FuelMoisture {
    let emc = equilibrium_moisture_content(temp_f, humidity_pct);
    let days = days_since_rain as f64;

    let clamp = |v: f64| v.clamp(FUEL_MOISTURE_MIN, FUEL_MOISTURE_MAX);

    FuelMoisture {
        one_hour: clamp(emc),
        ten_hour: clamp(emc + (TEN_HOUR_ASYMPTOTE - emc) * TEN_HOUR_DECAY.powf(days)),
        hundred_hour: clamp(emc + (HUNDRED_HOUR_ASYMPTOTE - emc) * HUNDRED_HOUR_DECAY.powf(days)),
    }
}

/// Ignition probability in %, from 1-hour fuel moisture. Clamped to [0, 100].
pub fn ignition_probability(fuel_moisture_1hr: f64) -> f64 {
    (100.0 - fuel_moisture_1hr * 2.5).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Smoke dispersion
// ---------------------------------------------------------------------------

/// Ventilation index: mixing height (ft) × transport wind (mph), rounded.
pub fn ventilation_index(mixing_height_ft: f64, transport_wind_mph: f64) -> i64 {
    (mixing_height_ft * transport_wind_mph).round() as i64
}

/// Atmospheric stability multiplier by local hour of day.
///
/// Afternoon (10–15) is the most unstable and mixes best; early morning and
/// evening (7–9, 16–18) are transitional; night traps smoke.
fn stability_factor(hour_of_day: u32) -> f64 {
    match hour_of_day {
        10..=15 => 1.0,
        7..=9 | 16..=18 => 0.8,
        _ => 0.5,
    }
}

/// Classify smoke dispersion for one hour.
///
/// The raw ventilation index is scaled by the hour-of-day stability factor
/// before classification, so identical mixing conditions rate worse at night
/// than in the afternoon.
pub fn dispersion_category(
    mixing_height_ft: f64,
    transport_wind_mph: f64,
    hour_of_day: u32,
) -> DispersionResult {
    let vi = mixing_height_ft * transport_wind_mph;
    let adjusted = vi * stability_factor(hour_of_day);

    let (category, description) = if adjusted >= DISPERSION_EXCELLENT {
        (
            "Excellent",
            "Rapid smoke dispersal expected. Excellent conditions for burning.",
        )
    } else if adjusted >= DISPERSION_GOOD {
        (
            "Good",
            "Good smoke dispersal. Favorable conditions for prescribed burning.",
        )
    } else if adjusted >= DISPERSION_FAIR {
        (
            "Fair",
            "Moderate dispersion. Monitor smoke carefully during burn operations.",
        )
    } else if adjusted >= DISPERSION_POOR {
        (
            "Poor",
            "Limited smoke dispersal. Consider postponing burn operations.",
        )
    } else {
        (
            "Very Poor",
            "Smoke trapping likely. Do NOT burn under these conditions.",
        )
    };

    DispersionResult {
        category,
        description,
        adjusted_vi: adjusted.round() as i64,
    }
}

// ---------------------------------------------------------------------------
// Composite burn quality
// ---------------------------------------------------------------------------

/// Temperature sub-score: full marks for 40–80°F, linear ramps on [30,40)
/// and (80,90], zero beyond.
fn temp_score(temp_f: f64) -> f64 {
    if (40.0..=80.0).contains(&temp_f) {
        25.0
    } else if (30.0..40.0).contains(&temp_f) {
        25.0 - (40.0 - temp_f) * 2.5
    } else if temp_f > 80.0 && temp_f <= 90.0 {
        25.0 - (temp_f - 80.0) * 2.5
    } else {
        0.0
    }
}

/// Humidity sub-score: full marks for 30–55%, linear ramps on [20,30) and
/// (55,65], zero beyond.
fn humidity_score(humidity_pct: f64) -> f64 {
    if (30.0..=55.0).contains(&humidity_pct) {
        25.0
    } else if (20.0..30.0).contains(&humidity_pct) {
        25.0 - (30.0 - humidity_pct) * 2.5
    } else if humidity_pct > 55.0 && humidity_pct <= 65.0 {
        25.0 - (humidity_pct - 55.0) * 2.5
    } else {
        0.0
    }
}

/// Wind sub-score: full marks for 4–15 mph, steep ramp below (calm air
/// stalls the burn), gentler ramp up to 20 mph, gust penalty above 25 mph.
fn wind_score(wind_speed_mph: f64, wind_gust_mph: f64) -> f64 {
    let base = if (4.0..=15.0).contains(&wind_speed_mph) {
        25.0
    } else if (2.0..4.0).contains(&wind_speed_mph) {
        25.0 - (4.0 - wind_speed_mph) * 12.5
    } else if wind_speed_mph > 15.0 && wind_speed_mph <= 20.0 {
        25.0 - (wind_speed_mph - 15.0) * 5.0
    } else {
        0.0
    };

    if wind_gust_mph > GUST_LIMIT_MPH {
        (base - GUST_PENALTY).max(0.0)
    } else {
        base
    }
}

/// Ventilation sub-score: full marks at VI ≥ 40000, linear ramp from 20000,
/// zero below, with a flat penalty for very low mixing heights regardless
/// of VI.
fn ventilation_score(mixing_height_ft: f64, ventilation_index: f64) -> f64 {
    let base = if ventilation_index >= 40000.0 {
        25.0
    } else if ventilation_index >= 20000.0 {
        25.0 * ((ventilation_index - 20000.0) / 20000.0)
    } else {
        0.0
    };

    if mixing_height_ft < LOW_MIXING_HEIGHT_FT {
        (base - LOW_MIXING_HEIGHT_PENALTY).max(0.0)
    } else {
        base
    }
}

/// Composite burn-quality assessment: four independently-capped 0–25
/// sub-scores summed, clamped to [0, 100] and rounded.
pub fn assess_burn(
    temp_f: f64,
    humidity_pct: f64,
    wind_speed_mph: f64,
    wind_gust_mph: f64,
    mixing_height_ft: f64,
    ventilation_index: i64,
) -> BurnAssessment {
    let total = temp_score(temp_f)
        + humidity_score(humidity_pct)
        + wind_score(wind_speed_mph, wind_gust_mph)
        + ventilation_score(mixing_height_ft, ventilation_index as f64);

    let score = total.clamp(0.0, 100.0).round() as u8;

    BurnAssessment {
        quality: burn_quality_label(score as f64),
        score,
    }
}

/// Five-tier quality label for a burn score. Also applied to window-averaged
/// scores, so it takes f64.
pub fn burn_quality_label(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excellent"
    } else if score >= 70.0 {
        "Good"
    } else if score >= 50.0 {
        "Fair"
    } else if score >= 30.0 {
        "Marginal"
    } else {
        "Poor"
    }
}
