//! Provider timestamps and their 12h/24h display.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::settings::TimeFormat;

/// Formats WeatherAPI uses for `localtime` / `last_updated`, plus ISO variants.
const WIRE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized timestamp '{0}'")]
pub struct TimestampError(String);

/// Wall-clock time as reported by the provider for the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTimestamp(NaiveDateTime);

impl LocalTimestamp {
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.naive_local()));
        }

        WIRE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(Self)
            .ok_or_else(|| TimestampError(value.to_string()))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for LocalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMATS[0]))
    }
}

impl Serialize for LocalTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        LocalTimestamp::parse(&raw).map_err(de::Error::custom)
    }
}

/// Hour and minute, two-digit hour in both modes.
pub fn format_time(ts: LocalTimestamp, format: TimeFormat) -> String {
    let pattern = match format {
        TimeFormat::H12 => "%I:%M %p",
        TimeFormat::H24 => "%H:%M",
    };
    ts.naive().format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> LocalTimestamp {
        LocalTimestamp::parse(value).expect("valid timestamp")
    }

    #[test]
    fn formats_afternoon_in_both_modes() {
        let t = ts("2024-06-01 14:05");
        assert_eq!(format_time(t, TimeFormat::H24), "14:05");
        assert_eq!(format_time(t, TimeFormat::H12), "02:05 PM");
    }

    #[test]
    fn midnight_and_noon_in_12h() {
        assert_eq!(format_time(ts("2024-06-01 00:30"), TimeFormat::H12), "12:30 AM");
        assert_eq!(format_time(ts("2024-06-01 12:00"), TimeFormat::H12), "12:00 PM");
        assert_eq!(format_time(ts("2024-06-01 00:30"), TimeFormat::H24), "00:30");
    }

    #[test]
    fn accepts_unpadded_hour_from_provider() {
        assert_eq!(format_time(ts("2024-05-23 8:01"), TimeFormat::H24), "08:01");
    }

    #[test]
    fn accepts_iso_variants() {
        assert_eq!(format_time(ts("2024-06-01T09:15"), TimeFormat::H24), "09:15");
        assert_eq!(format_time(ts("2024-06-01T09:15:59"), TimeFormat::H24), "09:15");
        // offset is kept as wall-clock time, not converted
        assert_eq!(format_time(ts("2024-06-01T21:40:00+02:00"), TimeFormat::H24), "21:40");
    }

    #[test]
    fn rejects_garbage() {
        let err = LocalTimestamp::parse("yesterday-ish").unwrap_err();
        assert!(err.to_string().contains("yesterday-ish"));
    }

    #[test]
    fn deserializes_from_json_string() {
        let parsed: LocalTimestamp = serde_json::from_str("\"2024-01-02 03:04\"").unwrap();
        assert_eq!(parsed, ts("2024-01-02 03:04"));
        assert!(serde_json::from_str::<LocalTimestamp>("\"not a time\"").is_err());
    }
}
