//! Render-ready projection of a snapshot under the active settings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    comfort::{self, ComfortLevel, HumidityCategory, UvBand},
    model::WeatherSnapshot,
    settings::Settings,
    theme::{self, Theme},
    time::format_time,
    units,
};

/// Everything the presentation layer displays. Rebuilt whole on every
/// snapshot or settings change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub theme: Theme,
    pub animations: bool,

    pub location_name: String,
    pub full_name: String,
    pub country: String,
    pub coordinates: String,
    pub timezone: String,
    pub local_time: String,

    pub condition: String,
    pub condition_code: u32,
    pub icon_url: String,

    pub temperature: String,
    pub feels_like: String,
    pub heat_index: String,
    pub wind_chill: String,
    pub dew_point: String,
    /// Wind chill to heat index.
    pub feels_range: String,

    pub wind_speed: String,
    pub wind_gust: String,
    pub wind_direction: String,
    pub pressure: String,
    pub visibility: String,
    pub precipitation_mm: String,
    pub precipitation_in: String,
    pub humidity: String,
    pub cloud_cover: String,

    pub uv_index: String,
    pub uv_band: UvBand,
    pub comfort: ComfortLevel,
    pub humidity_category: HumidityCategory,

    pub last_updated: String,
    pub freshness_minutes: i64,
}

pub fn compute_derived_view(
    snapshot: &WeatherSnapshot,
    settings: &Settings,
    now: DateTime<Utc>,
) -> DerivedView {
    let loc = &snapshot.location;
    let cur = &snapshot.current;
    let temp = |c: f64, f: f64| units::temperature(c, f, settings.temp_unit);

    let uv_band = UvBand::classify(cur.uv);

    DerivedView {
        theme: theme::select_theme(&cur.condition.text, cur.is_day),
        animations: settings.animations,

        location_name: loc.name.clone(),
        full_name: format!("{}, {}", loc.name, loc.region),
        country: loc.country.clone(),
        coordinates: units::coordinates(loc.lat, loc.lon),
        timezone: loc.tz_id.clone(),
        local_time: format_time(loc.localtime, settings.time_format),

        condition: cur.condition.text.clone(),
        condition_code: cur.condition.code,
        icon_url: snapshot.icon_url(),

        temperature: temp(cur.temp_c, cur.temp_f),
        feels_like: temp(cur.feelslike_c, cur.feelslike_f),
        heat_index: temp(cur.heatindex_c, cur.heatindex_f),
        wind_chill: temp(cur.windchill_c, cur.windchill_f),
        dew_point: temp(cur.dewpoint_c, cur.dewpoint_f),
        feels_range: format!(
            "{} - {}",
            temp(cur.windchill_c, cur.windchill_f),
            temp(cur.heatindex_c, cur.heatindex_f)
        ),

        wind_speed: units::wind_speed(cur.wind_kph, cur.wind_mph, settings.wind_unit),
        wind_gust: units::wind_speed(cur.gust_kph, cur.gust_mph, settings.wind_unit),
        wind_direction: units::wind_direction(&cur.wind_dir, cur.wind_degree),
        pressure: units::pressure(cur.pressure_mb, cur.pressure_in, settings.pressure_unit),
        visibility: units::distance(cur.vis_km, cur.vis_miles, settings.distance_unit),
        precipitation_mm: units::precipitation_mm(cur.precip_mm),
        precipitation_in: units::precipitation_in(cur.precip_in),
        humidity: units::percentage(cur.humidity),
        cloud_cover: units::percentage(cur.cloud),

        uv_index: format!("{} ({})", cur.uv, uv_band.label()),
        uv_band,
        comfort: ComfortLevel::classify(cur.temp_c, cur.feelslike_c),
        humidity_category: HumidityCategory::classify(f64::from(cur.humidity)),

        last_updated: format_time(cur.last_updated, settings.time_format),
        freshness_minutes: comfort::freshness_minutes(cur.last_updated_epoch, now.timestamp()),
    }
}
