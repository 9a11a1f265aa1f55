//! Background and contrast classes for a condition.
//!
//! The condition text is classified once; background, text and button classes
//! are all projections of that single classification.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Thunder,
    Mist,
    Default,
}

/// Keyword table, evaluated in order. First category with a matching keyword wins.
const KEYWORDS: &[(ConditionCategory, &[&str])] = &[
    (ConditionCategory::Clear, &["sunny", "clear"]),
    (ConditionCategory::Cloudy, &["cloud"]),
    (ConditionCategory::Rain, &["rain", "drizzle"]),
    (ConditionCategory::Snow, &["snow"]),
    (ConditionCategory::Thunder, &["thunder", "storm"]),
    (ConditionCategory::Mist, &["mist", "fog"]),
];

const DARK_TEXT: &str = "text-gray-900";
const LIGHT_TEXT: &str = "text-white";
const DARK_BUTTON: &str = "bg-gray-900/20 hover:bg-gray-900/30 text-gray-900 border-gray-900/30";
const LIGHT_BUTTON: &str = "bg-white/20 hover:bg-white/30 text-white border-white/30";

impl ConditionCategory {
    pub fn classify(condition: &str) -> Self {
        let lower = condition.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or(ConditionCategory::Default)
    }

    pub fn background(self, is_day: bool) -> &'static str {
        match (self, is_day) {
            (ConditionCategory::Clear, true) => {
                "bg-gradient-to-br from-amber-300 via-orange-400 to-pink-500"
            }
            (ConditionCategory::Clear, false) => {
                "bg-gradient-to-br from-indigo-900 via-purple-900 to-pink-900"
            }
            (ConditionCategory::Cloudy, true) => {
                "bg-gradient-to-br from-slate-400 via-slate-500 to-slate-600"
            }
            (ConditionCategory::Cloudy, false) => {
                "bg-gradient-to-br from-slate-800 via-slate-900 to-black"
            }
            // day-invariant
            (ConditionCategory::Rain, _) => "bg-gradient-to-br from-slate-600 via-blue-800 to-slate-900",
            (ConditionCategory::Snow, _) => "bg-gradient-to-br from-blue-100 via-slate-200 to-slate-300",
            (ConditionCategory::Thunder, _) => "bg-gradient-to-br from-slate-900 via-purple-900 to-black",
            (ConditionCategory::Mist, _) => "bg-gradient-to-br from-slate-300 via-slate-400 to-slate-500",
            (ConditionCategory::Default, _) => {
                "bg-gradient-to-br from-blue-400 via-indigo-500 to-purple-600"
            }
        }
    }

    /// Whether the background is light enough to need dark foreground.
    pub fn light_background(self, is_day: bool) -> bool {
        match self {
            ConditionCategory::Clear => is_day,
            ConditionCategory::Snow | ConditionCategory::Mist => true,
            ConditionCategory::Cloudy
            | ConditionCategory::Rain
            | ConditionCategory::Thunder
            | ConditionCategory::Default => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Theme {
    pub category: ConditionCategory,
    pub background: &'static str,
    pub light_background: bool,
    pub text: &'static str,
    pub button: &'static str,
}

impl Theme {
    /// Text class at reduced opacity, e.g. `text-white/80`.
    pub fn text_muted(&self, opacity: u8) -> String {
        format!("{}/{opacity}", self.text)
    }
}

impl Default for Theme {
    fn default() -> Self {
        select_theme("", true)
    }
}

pub fn select_theme(condition: &str, is_day: bool) -> Theme {
    let category = ConditionCategory::classify(condition);
    let light_background = category.light_background(is_day);

    Theme {
        category,
        background: category.background(is_day),
        light_background,
        text: if light_background { DARK_TEXT } else { LIGHT_TEXT },
        button: if light_background { DARK_BUTTON } else { LIGHT_BUTTON },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive_and_ordered() {
        assert_eq!(ConditionCategory::classify("SUNNY"), ConditionCategory::Clear);
        assert_eq!(ConditionCategory::classify("Partly cloudy"), ConditionCategory::Cloudy);
        assert_eq!(ConditionCategory::classify("Patchy light drizzle"), ConditionCategory::Rain);
        // rain comes before snow in the table
        assert_eq!(
            ConditionCategory::classify("Moderate or heavy rain with snow"),
            ConditionCategory::Rain
        );
        // "Thundery outbreaks" contains no rain/snow keyword
        assert_eq!(
            ConditionCategory::classify("Thundery outbreaks possible"),
            ConditionCategory::Thunder
        );
        assert_eq!(ConditionCategory::classify("Freezing fog"), ConditionCategory::Mist);
        assert_eq!(ConditionCategory::classify("Overcast"), ConditionCategory::Default);
        assert_eq!(ConditionCategory::classify(""), ConditionCategory::Default);
    }

    #[test]
    fn snow_ignores_day_night() {
        for text in ["Light snow", "Blowing snow", "Patchy snow possible"] {
            assert_eq!(select_theme(text, true), select_theme(text, false));
        }
    }

    #[test]
    fn clear_and_cloud_vary_with_day() {
        assert_ne!(select_theme("Clear", true).background, select_theme("Clear", false).background);
        assert_ne!(select_theme("Cloudy", true).background, select_theme("Cloudy", false).background);
        assert_eq!(select_theme("Heavy rain", true), select_theme("Heavy rain", false));
    }

    #[test]
    fn contrast_follows_one_predicate() {
        let sunny = select_theme("Sunny", true);
        assert!(sunny.light_background);
        assert_eq!(sunny.text, "text-gray-900");
        assert!(sunny.button.contains("text-gray-900"));
        assert_eq!(sunny.text_muted(80), "text-gray-900/80");

        let clear_night = select_theme("Clear", false);
        assert!(!clear_night.light_background);
        assert_eq!(clear_night.text, "text-white");
        assert!(clear_night.button.contains("text-white"));

        let fog_night = select_theme("Fog", false);
        assert!(fog_night.light_background);
        assert!(fog_night.button.contains("gray-900"));
    }

    #[test]
    fn text_and_button_never_diverge() {
        let samples = ["Sunny", "Clear", "Cloudy", "Rain", "Snow", "Thunder", "Mist", "Haze"];
        for text in samples {
            for is_day in [true, false] {
                let theme = select_theme(text, is_day);
                assert_eq!(
                    theme.text == "text-gray-900",
                    theme.button.contains("text-gray-900"),
                    "{text} / day={is_day}"
                );
            }
        }
    }

    #[test]
    fn unknown_falls_back_to_default() {
        let theme = select_theme("Volcanic ash", true);
        assert_eq!(theme.category, ConditionCategory::Default);
        assert_eq!(theme.background, "bg-gradient-to-br from-blue-400 via-indigo-500 to-purple-600");
        assert_eq!(theme.text, "text-white");
        assert_eq!(Theme::default(), theme);
    }
}
