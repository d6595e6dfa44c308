//! Unit and direction conversions for NWS gridpoint values.
//!
//! The gridpoint API mixes units: temperatures come in Celsius, surface wind
//! in km/h, transport wind in knots, mixing height in metres. Everything is
//! normalized to the units land managers actually read (°F, mph, ft) before
//! any fire-science derivation runs.
//!
//! All functions here are total over finite inputs; callers are responsible
//! for not passing NaN/Infinity.

/// 16-point compass rose, clockwise from north.
pub const COMPASS_DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Convert Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Convert km/h to mph.
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * 0.621371
}

/// Convert knots to mph.
pub fn knots_to_mph(knots: f64) -> f64 {
    knots * 1.15078
}

/// Convert metres to feet.
pub fn meters_to_feet(m: f64) -> f64 {
    m * 3.28084
}

/// Convert mph to m/s.
pub fn mph_to_ms(mph: f64) -> f64 {
    mph * 0.44704
}

/// Convert a bearing in degrees to a 16-point cardinal direction.
///
/// Uses round-half-up over 22.5° sectors, so 360° (and anything within a
/// half-sector of it) wraps back to "N".
pub fn degrees_to_cardinal(degrees: f64) -> &'static str {
    let index = (degrees / 22.5).round() as usize % 16;
    COMPASS_DIRECTIONS[index]
}

/// Sky cover abbreviation from a percentage, per the standard fire-weather
/// breakpoints (CLR ≤10, FW ≤30, PC ≤50, MC ≤70, MCR ≤90, else OVC).
pub fn sky_cover_abbr(percent: f64) -> &'static str {
    if percent <= 10.0 {
        "CLR"
    } else if percent <= 30.0 {
        "FW"
    } else if percent <= 50.0 {
        "PC"
    } else if percent <= 70.0 {
        "MC"
    } else if percent <= 90.0 {
        "MCR"
    } else {
        "OVC"
    }
}

/// Weather type abbreviation from an NWS phenomenon code or description.
///
/// Substring match against the lowercased code; returns "" for clear or
/// unrecognized codes.
pub fn weather_abbr(code: &str) -> &'static str {
    let lower = code.to_lowercase();
    if lower.contains("thunderstorm") {
        "T"
    } else if lower.contains("rain") || lower.contains("drizzle") {
        "RW"
    } else if lower.contains("snow") || lower.contains("flurries") {
        "S"
    } else if lower.contains("fog") {
        "F"
    } else if lower.contains("smoke") {
        "K"
    } else if lower.contains("haze") {
        "H"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_to_fahrenheit_freezing() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
    }

    #[test]
    fn test_celsius_to_fahrenheit_body_temp() {
        assert!((celsius_to_fahrenheit(37.0) - 98.6).abs() < 1e-10);
    }

    #[test]
    fn test_kmh_to_mph() {
        assert!((kmh_to_mph(100.0) - 62.1371).abs() < 1e-10);
    }

    #[test]
    fn test_knots_to_mph() {
        assert!((knots_to_mph(10.0) - 11.5078).abs() < 1e-10);
    }

    #[test]
    fn test_meters_to_feet() {
        assert!((meters_to_feet(1000.0) - 3280.84).abs() < 1e-10);
    }

    #[test]
    fn test_mph_to_ms_round_trip() {
        // The conversion constants must be mutual inverses to 5 decimal places.
        for mph in [0.0, 1.0, 8.5, 15.0, 47.3] {
            let ms = mph_to_ms(mph);
            let back = ms / 0.44704;
            assert!((back - mph).abs() < 1e-5, "round trip failed for {}", mph);
        }
    }

    #[test]
    fn test_kmh_mph_round_trip() {
        for kmh in [0.0, 3.6, 25.0, 120.0] {
            let back = kmh_to_mph(kmh) / 0.621371;
            assert!((back - kmh).abs() < 1e-5, "round trip failed for {}", kmh);
        }
    }

    #[test]
    fn test_degrees_to_cardinal_exact_points() {
        assert_eq!(degrees_to_cardinal(0.0), "N");
        assert_eq!(degrees_to_cardinal(45.0), "NE");
        assert_eq!(degrees_to_cardinal(90.0), "E");
        assert_eq!(degrees_to_cardinal(180.0), "S");
        assert_eq!(degrees_to_cardinal(270.0), "W");
    }

    #[test]
    fn test_degrees_to_cardinal_wraparound() {
        // 360 wraps to N, and anything within 11.25° of 0/360 is also N.
        assert_eq!(degrees_to_cardinal(360.0), "N");
        assert_eq!(degrees_to_cardinal(349.0), "N");
        assert_eq!(degrees_to_cardinal(11.0), "N");
    }

    #[test]
    fn test_degrees_to_cardinal_sector_boundaries() {
        // 11.25 rounds half-up to sector 1 (NNE); just below stays N.
        assert_eq!(degrees_to_cardinal(11.25), "NNE");
        assert_eq!(degrees_to_cardinal(11.2), "N");
        assert_eq!(degrees_to_cardinal(348.0), "NNW");
    }

    #[test]
    fn test_sky_cover_abbr_thresholds() {
        assert_eq!(sky_cover_abbr(0.0), "CLR");
        assert_eq!(sky_cover_abbr(10.0), "CLR");
        assert_eq!(sky_cover_abbr(10.1), "FW");
        assert_eq!(sky_cover_abbr(30.0), "FW");
        assert_eq!(sky_cover_abbr(50.0), "PC");
        assert_eq!(sky_cover_abbr(70.0), "MC");
        assert_eq!(sky_cover_abbr(90.0), "MCR");
        assert_eq!(sky_cover_abbr(91.0), "OVC");
    }

    #[test]
    fn test_weather_abbr_matches() {
        assert_eq!(weather_abbr("thunderstorms"), "T");
        assert_eq!(weather_abbr("light_rain"), "RW");
        assert_eq!(weather_abbr("Drizzle"), "RW");
        assert_eq!(weather_abbr("snow_showers"), "S");
        assert_eq!(weather_abbr("flurries"), "S");
        assert_eq!(weather_abbr("fog"), "F");
        assert_eq!(weather_abbr("smoke"), "K");
        assert_eq!(weather_abbr("haze"), "H");
    }

    #[test]
    fn test_weather_abbr_empty_and_unknown() {
        assert_eq!(weather_abbr(""), "");
        assert_eq!(weather_abbr("clear"), "");
    }

    #[test]
    fn test_weather_abbr_thunderstorm_wins_over_rain() {
        // "thunderstorms and rain" should classify as T, not RW.
        assert_eq!(weather_abbr("thunderstorms and rain"), "T");
    }
}
