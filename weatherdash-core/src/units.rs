//! Display strings for provider measurements.
//!
//! The provider already sends every quantity in both unit systems; these
//! functions only pick the side the user asked for and format it. The one
//! exception is m/s wind, which is derived from the km/h value.

use crate::settings::{DistanceUnit, PressureUnit, TemperatureUnit, WindUnit};

/// km/h to m/s factor, kept at six places for parity with existing displays.
pub const KPH_TO_MPS: f64 = 0.277778;

/// mb to kPa.
pub const MB_TO_KPA: f64 = 0.1;

/// Nearest integer, halves rounded toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

pub fn temperature(celsius: f64, fahrenheit: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::C => format!("{}°C", round_half_up(celsius)),
        TemperatureUnit::F => format!("{}°F", round_half_up(fahrenheit)),
    }
}

pub fn wind_speed(kph: f64, mph: f64, unit: WindUnit) -> String {
    match unit {
        WindUnit::Kmh => format!("{} km/h", round_half_up(kph)),
        WindUnit::Mph => format!("{} mph", round_half_up(mph)),
        WindUnit::Ms => format!("{} m/s", round_half_up(kph * KPH_TO_MPS)),
    }
}

pub fn pressure(mb: f64, inches: f64, unit: PressureUnit) -> String {
    match unit {
        PressureUnit::Mb => format!("{} mb", round_half_up(mb)),
        PressureUnit::InHg => format!("{inches:.2} inHg"),
        PressureUnit::KPa => format!("{:.1} kPa", mb * MB_TO_KPA),
    }
}

pub fn distance(km: f64, miles: f64, unit: DistanceUnit) -> String {
    match unit {
        DistanceUnit::Km => format!("{km} km"),
        DistanceUnit::Mi => format!("{miles} mi"),
    }
}

pub fn precipitation_mm(mm: f64) -> String {
    format!("{mm} mm")
}

pub fn precipitation_in(inches: f64) -> String {
    format!("{inches:.2} in")
}

pub fn percentage(value: u8) -> String {
    format!("{value}%")
}

pub fn wind_direction(compass: &str, degree: u16) -> String {
    format!("{compass} ({degree}°)")
}

pub fn coordinates(lat: f64, lon: f64) -> String {
    format!("{lat:.4}°, {lon:.4}°")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(-0.4), 0);
    }

    #[test]
    fn temperature_selects_side_and_rounds() {
        assert_eq!(temperature(21.6, 70.9, TemperatureUnit::C), "22°C");
        assert_eq!(temperature(21.6, 70.9, TemperatureUnit::F), "71°F");
        assert_eq!(temperature(-0.3, 31.5, TemperatureUnit::C), "0°C");
    }

    #[test]
    fn temperature_is_deterministic() {
        let a = temperature(12.345, 54.2, TemperatureUnit::F);
        let b = temperature(12.345, 54.2, TemperatureUnit::F);
        assert_eq!(a, b);
    }

    #[test]
    fn wind_ms_is_derived_from_kph() {
        assert_eq!(wind_speed(36.0, 22.4, WindUnit::Ms), "10 m/s");
        assert_eq!(wind_speed(36.0, 22.4, WindUnit::Kmh), "36 km/h");
        assert_eq!(wind_speed(36.0, 22.4, WindUnit::Mph), "22 mph");
        // mph side is ignored for m/s
        assert_eq!(wind_speed(18.0, 999.0, WindUnit::Ms), "5 m/s");
    }

    #[test]
    fn pressure_units() {
        assert_eq!(pressure(1013.0, 29.91, PressureUnit::Mb), "1013 mb");
        assert_eq!(pressure(1013.0, 29.91, PressureUnit::InHg), "29.91 inHg");
        assert_eq!(pressure(1013.0, 29.9, PressureUnit::InHg), "29.90 inHg");
        assert_eq!(pressure(1013.0, 29.91, PressureUnit::KPa), "101.3 kPa");
    }

    #[test]
    fn distance_is_verbatim() {
        assert_eq!(distance(10.0, 6.0, DistanceUnit::Km), "10 km");
        assert_eq!(distance(9.3, 5.78, DistanceUnit::Mi), "5.78 mi");
    }

    #[test]
    fn supplementary_formats() {
        assert_eq!(precipitation_mm(0.1), "0.1 mm");
        assert_eq!(precipitation_in(0.0), "0.00 in");
        assert_eq!(percentage(87), "87%");
        assert_eq!(wind_direction("WSW", 247), "WSW (247°)");
        assert_eq!(coordinates(51.52, -0.11), "51.5200°, -0.1100°");
    }
}
