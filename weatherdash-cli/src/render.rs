use std::fmt::Write;

use weatherdash_core::{DerivedView, Settings};

/// Plain-text dashboard for one view.
pub fn dashboard(view: &DerivedView, details: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.full_name);
    let _ = writeln!(
        out,
        "{} · {} · {} · {}",
        view.country, view.coordinates, view.timezone, view.local_time
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}  {}", view.temperature, view.condition);
    let _ = writeln!(out, "  Feels like {} ({})", view.feels_like, view.comfort);
    let _ = writeln!(out);

    row(&mut out, "Humidity", &format!("{} ({})", view.humidity, view.humidity_category));
    row(
        &mut out,
        "Wind",
        &format!("{} {}, gusts {}", view.wind_speed, view.wind_direction, view.wind_gust),
    );
    row(&mut out, "Pressure", &view.pressure);
    row(&mut out, "Visibility", &view.visibility);
    row(&mut out, "UV index", &view.uv_index);

    if details {
        let _ = writeln!(out);
        row(&mut out, "Heat index", &view.heat_index);
        row(&mut out, "Wind chill", &view.wind_chill);
        row(&mut out, "Dew point", &view.dew_point);
        row(&mut out, "Feels range", &view.feels_range);
        row(&mut out, "Precipitation", &format!("{} / {}", view.precipitation_mm, view.precipitation_in));
        row(&mut out, "Cloud cover", &view.cloud_cover);
        row(&mut out, "Condition", &format!("{} (code {})", view.condition, view.condition_code));
        row(&mut out, "Icon", &view.icon_url);
        row(&mut out, "Background", view.theme.background);
        row(&mut out, "Text", &format!("{} / {}", view.theme.text, view.theme.text_muted(80)));
        row(&mut out, "Button", view.theme.button);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Updated {} ({} min ago)", view.last_updated, view.freshness_minutes);

    out
}

pub fn settings_table(settings: &Settings) -> String {
    let mut out = String::new();
    for (key, value) in settings.entries() {
        let _ = writeln!(out, "{key:<16} {value}");
    }
    out
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<14}{value}");
}
