use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::time::LocalTimestamp;

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Name(String),
    Coordinates(Coordinates),
}

impl WeatherQuery {
    /// Value for the provider's `q` parameter.
    pub fn as_query(&self) -> String {
        match self {
            WeatherQuery::Name(name) => name.trim().to_string(),
            WeatherQuery::Coordinates(c) => format!("{},{}", c.lat, c.lon),
        }
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One reading for a location, exactly as WeatherAPI's `current.json` returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: SnapshotLocation,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLocation {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub tz_id: String,
    pub localtime_epoch: i64,
    pub localtime: LocalTimestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative URL, e.g. `//cdn.weatherapi.com/...png`.
    pub icon: String,
    pub code: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub last_updated_epoch: i64,
    pub last_updated: LocalTimestamp,
    pub temp_c: f64,
    pub temp_f: f64,
    #[serde(deserialize_with = "bool_from_flag", serialize_with = "bool_to_flag")]
    pub is_day: bool,
    pub condition: Condition,
    pub wind_mph: f64,
    pub wind_kph: f64,
    pub wind_degree: u16,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub pressure_in: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: u8,
    pub cloud: u8,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub windchill_c: f64,
    pub windchill_f: f64,
    pub heatindex_c: f64,
    pub heatindex_f: f64,
    pub dewpoint_c: f64,
    pub dewpoint_f: f64,
    pub vis_km: f64,
    pub vis_miles: f64,
    pub uv: f64,
    pub gust_mph: f64,
    pub gust_kph: f64,
}

impl WeatherSnapshot {
    /// Absolute icon URL.
    pub fn icon_url(&self) -> String {
        let icon = &self.current.condition.icon;
        if icon.starts_with("//") {
            format!("https:{icon}")
        } else {
            icon.clone()
        }
    }
}

fn bool_from_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(u8),
        Bool(bool),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Int(n) => n != 0,
        Flag::Bool(b) => b,
    })
}

fn bool_to_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}
