use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UvBand {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

/// Inclusive upper bounds, ascending. Anything above the last is `Extreme`.
const UV_BOUNDS: &[(f64, UvBand)] = &[
    (2.0, UvBand::Low),
    (5.0, UvBand::Moderate),
    (7.0, UvBand::High),
    (10.0, UvBand::VeryHigh),
];

impl UvBand {
    pub fn classify(uv: f64) -> Self {
        UV_BOUNDS
            .iter()
            .find(|(upper, _)| uv <= *upper)
            .map(|(_, band)| *band)
            .unwrap_or(UvBand::Extreme)
    }

    pub fn label(self) -> &'static str {
        match self {
            UvBand::Low => "Low",
            UvBand::Moderate => "Moderate",
            UvBand::High => "High",
            UvBand::VeryHigh => "Very High",
            UvBand::Extreme => "Extreme",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComfortLevel {
    Comfortable,
    FeelsCooler,
    FeelsWarmer,
}

/// Max |actual - feels like| in °C still reported as comfortable.
const COMFORT_TOLERANCE_C: f64 = 2.0;

impl ComfortLevel {
    pub fn classify(temp_c: f64, feels_like_c: f64) -> Self {
        if (temp_c - feels_like_c).abs() <= COMFORT_TOLERANCE_C {
            ComfortLevel::Comfortable
        } else if feels_like_c < temp_c {
            ComfortLevel::FeelsCooler
        } else {
            ComfortLevel::FeelsWarmer
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComfortLevel::Comfortable => "Comfortable",
            ComfortLevel::FeelsCooler => "Feels Cooler",
            ComfortLevel::FeelsWarmer => "Feels Warmer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HumidityCategory {
    High,
    Low,
    Normal,
}

impl HumidityCategory {
    pub fn classify(humidity_pct: f64) -> Self {
        if humidity_pct > 80.0 {
            HumidityCategory::High
        } else if humidity_pct < 30.0 {
            HumidityCategory::Low
        } else {
            HumidityCategory::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HumidityCategory::High => "High Humidity",
            HumidityCategory::Low => "Low Humidity",
            HumidityCategory::Normal => "Normal",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),+) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })+
    };
}

display_label!(UvBand, ComfortLevel, HumidityCategory);

/// Whole minutes elapsed since `last_updated_epoch`, rounded down.
pub fn freshness_minutes(last_updated_epoch: i64, now_epoch: i64) -> i64 {
    (now_epoch - last_updated_epoch).div_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_boundaries_are_inclusive() {
        let cases = [
            (0.0, "Low"),
            (2.0, "Low"),
            (2.1, "Moderate"),
            (5.0, "Moderate"),
            (5.5, "High"),
            (7.0, "High"),
            (7.01, "Very High"),
            (10.0, "Very High"),
            (10.1, "Extreme"),
            (14.0, "Extreme"),
        ];
        for (uv, expected) in cases {
            assert_eq!(UvBand::classify(uv).label(), expected, "uv={uv}");
        }
    }

    #[test]
    fn comfort_levels() {
        assert_eq!(ComfortLevel::classify(20.0, 22.0), ComfortLevel::Comfortable);
        assert_eq!(ComfortLevel::classify(20.0, 18.0), ComfortLevel::Comfortable);
        assert_eq!(ComfortLevel::classify(20.0, 17.9), ComfortLevel::FeelsCooler);
        assert_eq!(ComfortLevel::classify(30.0, 34.5), ComfortLevel::FeelsWarmer);
        assert_eq!(ComfortLevel::FeelsCooler.to_string(), "Feels Cooler");
    }

    #[test]
    fn humidity_categories_are_exclusive_at_bounds() {
        assert_eq!(HumidityCategory::classify(80.0), HumidityCategory::Normal);
        assert_eq!(HumidityCategory::classify(81.0), HumidityCategory::High);
        assert_eq!(HumidityCategory::classify(30.0), HumidityCategory::Normal);
        assert_eq!(HumidityCategory::classify(29.0), HumidityCategory::Low);
        assert_eq!(HumidityCategory::High.label(), "High Humidity");
    }

    #[test]
    fn nan_inputs_take_last_branch() {
        assert_eq!(UvBand::classify(f64::NAN), UvBand::Extreme);
        assert_eq!(HumidityCategory::classify(f64::NAN), HumidityCategory::Normal);
        assert_eq!(ComfortLevel::classify(f64::NAN, 1.0), ComfortLevel::FeelsWarmer);
    }

    #[test]
    fn freshness_floors() {
        assert_eq!(freshness_minutes(1_000, 1_000), 0);
        assert_eq!(freshness_minutes(1_000, 1_059), 0);
        assert_eq!(freshness_minutes(1_000, 1_060), 1);
        assert_eq!(freshness_minutes(1_000, 1_000 + 15 * 60 + 59), 15);
        // observation stamped slightly in the future
        assert_eq!(freshness_minutes(1_000, 990), -1);
    }
}
