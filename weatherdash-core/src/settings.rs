use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Location used when nothing has been persisted yet.
pub const FALLBACK_LOCATION: &str = "London";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    C,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Kmh,
    Mph,
    Ms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PressureUnit {
    #[default]
    #[serde(rename = "mb")]
    Mb,
    #[serde(rename = "inHg")]
    InHg,
    #[serde(rename = "kPa")]
    KPa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Mi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    H12,
    #[default]
    #[serde(rename = "24h")]
    H24,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutoRefresh {
    #[default]
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
}

impl AutoRefresh {
    /// Timer period, or `None` when auto-refresh is off.
    pub fn interval(self) -> Option<Duration> {
        let minutes = match self {
            AutoRefresh::Off => return None,
            AutoRefresh::FiveMinutes => 5,
            AutoRefresh::FifteenMinutes => 15,
            AutoRefresh::ThirtyMinutes => 30,
        };
        Some(Duration::from_secs(minutes * 60))
    }
}

/// Enumerations that are written and read by their short wire label.
trait Labelled: Sized + Copy + 'static {
    const ALL: &'static [Self];
    const EXPECTED: &'static str;

    fn label(self) -> &'static str;

    fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(value.trim()))
    }
}

macro_rules! labelled {
    ($ty:ty, $expected:literal, [$($variant:path => $label:literal),+ $(,)?]) => {
        impl Labelled for $ty {
            const ALL: &'static [Self] = &[$($variant),+];
            const EXPECTED: &'static str = $expected;

            fn label(self) -> &'static str {
                match self {
                    $($variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Labelled>::from_label(s)
                    .ok_or_else(|| format!("expected one of: {}", $expected))
            }
        }
    };
}

labelled!(TemperatureUnit, "C, F", [
    TemperatureUnit::C => "C",
    TemperatureUnit::F => "F",
]);
labelled!(WindUnit, "kmh, mph, ms", [
    WindUnit::Kmh => "kmh",
    WindUnit::Mph => "mph",
    WindUnit::Ms => "ms",
]);
labelled!(PressureUnit, "mb, inHg, kPa", [
    PressureUnit::Mb => "mb",
    PressureUnit::InHg => "inHg",
    PressureUnit::KPa => "kPa",
]);
labelled!(DistanceUnit, "km, mi", [
    DistanceUnit::Km => "km",
    DistanceUnit::Mi => "mi",
]);
labelled!(TimeFormat, "12h, 24h", [
    TimeFormat::H12 => "12h",
    TimeFormat::H24 => "24h",
]);
labelled!(AutoRefresh, "off, 5min, 15min, 30min", [
    AutoRefresh::Off => "off",
    AutoRefresh::FiveMinutes => "5min",
    AutoRefresh::FifteenMinutes => "15min",
    AutoRefresh::ThirtyMinutes => "30min",
]);

/// User display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub temp_unit: TemperatureUnit,
    pub wind_unit: WindUnit,
    pub pressure_unit: PressureUnit,
    pub distance_unit: DistanceUnit,
    pub time_format: TimeFormat,
    pub auto_refresh: AutoRefresh,
    pub animations: bool,
    pub default_location: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temp_unit: TemperatureUnit::default(),
            wind_unit: WindUnit::default(),
            pressure_unit: PressureUnit::default(),
            distance_unit: DistanceUnit::default(),
            time_format: TimeFormat::default(),
            auto_refresh: AutoRefresh::default(),
            animations: true,
            default_location: FALLBACK_LOCATION.to_string(),
        }
    }
}

impl Settings {
    pub fn apply(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::TempUnit(v) => self.temp_unit = v,
            SettingUpdate::WindUnit(v) => self.wind_unit = v,
            SettingUpdate::PressureUnit(v) => self.pressure_unit = v,
            SettingUpdate::DistanceUnit(v) => self.distance_unit = v,
            SettingUpdate::TimeFormat(v) => self.time_format = v,
            SettingUpdate::AutoRefresh(v) => self.auto_refresh = v,
            SettingUpdate::Animations(v) => self.animations = v,
            SettingUpdate::DefaultLocation(v) => self.default_location = v,
        }
    }

    /// `(key, value)` pairs in display order, keyed like [`SettingUpdate::parse`] expects.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("tempUnit", self.temp_unit.to_string()),
            ("windUnit", self.wind_unit.to_string()),
            ("pressureUnit", self.pressure_unit.to_string()),
            ("distanceUnit", self.distance_unit.to_string()),
            ("timeFormat", self.time_format.to_string()),
            ("autoRefresh", self.auto_refresh.to_string()),
            ("animations", self.animations.to_string()),
            ("defaultLocation", self.default_location.clone()),
        ]
    }
}

/// A single field assignment on a [`Settings`] record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingUpdate {
    TempUnit(TemperatureUnit),
    WindUnit(WindUnit),
    PressureUnit(PressureUnit),
    DistanceUnit(DistanceUnit),
    TimeFormat(TimeFormat),
    AutoRefresh(AutoRefresh),
    Animations(bool),
    DefaultLocation(String),
}

impl SettingUpdate {
    /// Parse a string-keyed update. Keys are camelCase; kebab-case and
    /// snake_case spellings are accepted too.
    pub fn parse(key: &str, value: &str) -> Result<Self, SettingsError> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "tempunit" | "temperatureunit" => parse_labelled(key, value).map(Self::TempUnit),
            "windunit" => parse_labelled(key, value).map(Self::WindUnit),
            "pressureunit" => parse_labelled(key, value).map(Self::PressureUnit),
            "distanceunit" => parse_labelled(key, value).map(Self::DistanceUnit),
            "timeformat" => parse_labelled(key, value).map(Self::TimeFormat),
            "autorefresh" => parse_labelled(key, value).map(Self::AutoRefresh),
            "animations" => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" => Ok(Self::Animations(true)),
                "false" | "off" | "no" => Ok(Self::Animations(false)),
                _ => Err(invalid(key, value, "true, false")),
            },
            "defaultlocation" => {
                let location = value.trim();
                if location.is_empty() {
                    Err(invalid(key, value, "a non-empty location name"))
                } else {
                    Ok(Self::DefaultLocation(location.to_string()))
                }
            }
            _ => Err(SettingsError::UnknownKey(key.to_string())),
        }
    }
}

fn parse_labelled<T: Labelled>(key: &str, value: &str) -> Result<T, SettingsError> {
    T::from_label(value).ok_or_else(|| invalid(key, value, T::EXPECTED))
}

fn invalid(key: &str, value: &str, expected: &'static str) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}
