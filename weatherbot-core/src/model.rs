use serde::{Deserialize, Serialize};

/// hPa to mmHg.
pub const HPA_TO_MMHG: f64 = 0.75006;

/// Maximum number of forecast entries inspected for precipitation.
pub const FORECAST_WINDOW_LEN: usize = 6;

/// Substrings marking a precipitation forecast (matched case-insensitively).
pub const PRECIPITATION_KEYWORDS: &[&str] = &[
    "дожд", "гроза", "снег", "ливень", "град", "rain", "storm", "snow", "downpour", "hail",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions as reported by the provider, before the UV lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub coord: Coordinates,
}

impl CurrentConditions {
    pub fn with_uv_index(self, uv_index: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            conditions: self,
            uv_index,
        }
    }
}

/// All measurements for a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(flatten)]
    pub conditions: CurrentConditions,
    /// Zero when the UV lookup failed.
    pub uv_index: f64,
}

impl WeatherSnapshot {
    pub fn temperature_c(&self) -> f64 {
        self.conditions.temperature_c
    }

    pub fn wind_speed_mps(&self) -> f64 {
        self.conditions.wind_speed_mps
    }

    pub fn humidity_pct(&self) -> u8 {
        self.conditions.humidity_pct
    }

    pub fn description(&self) -> &str {
        &self.conditions.description
    }

    pub fn pressure_mmhg(&self) -> i64 {
        hpa_to_mmhg(self.conditions.pressure_hpa)
    }
}

pub fn hpa_to_mmhg(hpa: f64) -> i64 {
    rounded(hpa * HPA_TO_MMHG)
}

/// Nearest integer, halves to even.
pub fn rounded(value: f64) -> i64 {
    value.round_ties_even() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// `YYYY-MM-DD HH:MM:SS` in UTC.
    pub dt_txt: String,
    pub description: String,
}

impl ForecastEntry {
    /// `HH:MM` part of the timestamp.
    pub fn time_of_day(&self) -> String {
        let time = self
            .dt_txt
            .split_once(' ')
            .map_or(self.dt_txt.as_str(), |(_, time)| time);
        time.chars().take(5).collect()
    }

    pub fn is_precipitation(&self) -> bool {
        contains_any(&self.description, PRECIPITATION_KEYWORDS)
    }
}

/// The first few forecast entries of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastWindow {
    entries: Vec<ForecastEntry>,
}

impl ForecastWindow {
    pub fn new(entries: impl IntoIterator<Item = ForecastEntry>) -> Self {
        Self {
            entries: entries.into_iter().take(FORECAST_WINDOW_LEN).collect(),
        }
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    /// One `• HH:MM: Description` line per precipitation entry, in forecast order.
    pub fn precipitation_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.is_precipitation())
            .map(|entry| {
                format!(
                    "• {}: {}",
                    entry.time_of_day(),
                    capitalize(&entry.description)
                )
            })
            .collect()
    }
}

/// A warning and the matching tip produced by one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advisory {
    pub warning: Option<String>,
    pub tip: Option<String>,
}

impl Advisory {
    pub fn new(warning: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            warning: Some(warning.into()),
            tip: Some(tip.into()),
        }
    }

    pub fn warning_only(warning: impl Into<String>) -> Self {
        Self {
            warning: Some(warning.into()),
            tip: None,
        }
    }
}

pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(keyword))
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt_txt: &str, description: &str) -> ForecastEntry {
        ForecastEntry {
            dt_txt: dt_txt.into(),
            description: description.into(),
        }
    }

    #[test]
    fn pressure_is_converted_and_rounded() {
        assert_eq!(hpa_to_mmhg(1013.0), 760);
        assert_eq!(hpa_to_mmhg(1000.0), 750);
    }

    #[test]
    fn time_of_day_takes_five_chars_after_space() {
        assert_eq!(entry("2024-06-01 15:00:00", "x").time_of_day(), "15:00");
        assert_eq!(entry("09:30:00", "x").time_of_day(), "09:30");
    }

    #[test]
    fn window_keeps_only_first_six_entries() {
        let entries = (0..10).map(|h| entry(&format!("2024-06-01 {h:02}:00:00"), "дождь"));
        let window = ForecastWindow::new(entries);

        assert_eq!(window.entries().len(), FORECAST_WINDOW_LEN);
        let lines = window.precipitation_lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "• 00:00: Дождь");
        assert_eq!(lines[5], "• 05:00: Дождь");
    }

    #[test]
    fn precipitation_match_is_case_insensitive_substring() {
        let window = ForecastWindow::new([
            entry("2024-06-01 09:00:00", "ясно"),
            entry("2024-06-01 12:00:00", "Небольшой ДОЖДЬ"),
            entry("2024-06-01 15:00:00", "Light Rain"),
            entry("2024-06-01 18:00:00", "облачно"),
            entry("2024-06-01 21:00:00", "гроза"),
        ]);

        assert_eq!(
            window.precipitation_lines(),
            vec![
                "• 12:00: Небольшой дождь".to_string(),
                "• 15:00: Light rain".to_string(),
                "• 21:00: Гроза".to_string(),
            ]
        );
    }

    #[test]
    fn every_precipitation_keyword_matches() {
        for description in [
            "Thunderstorm",
            "SNOW",
            "heavy downpour",
            "Hail",
            "ГРАД",
            "ливень",
            "снег с дождём",
        ] {
            assert!(
                entry("2024-06-01 09:00:00", description).is_precipitation(),
                "{description}"
            );
        }

        let window = ForecastWindow::new([
            entry("2024-06-01 09:00:00", "Thunderstorm"),
            entry("2024-06-01 12:00:00", "ГРАД"),
            entry("2024-06-01 15:00:00", "scattered clouds"),
        ]);
        assert_eq!(
            window.precipitation_lines(),
            vec!["• 09:00: Thunderstorm".to_string(), "• 12:00: Град".to_string()]
        );
    }

    #[test]
    fn rounding_sends_halves_to_even() {
        assert_eq!(rounded(22.5), 22);
        assert_eq!(rounded(23.5), 24);
        assert_eq!(rounded(-0.5), 0);
        assert_eq!(rounded(-1.5), -2);
        assert_eq!(rounded(21.6), 22);
    }

    #[test]
    fn precipitation_beyond_window_is_ignored() {
        let mut entries: Vec<_> = (0..6)
            .map(|h| entry(&format!("2024-06-01 {h:02}:00:00"), "ясно"))
            .collect();
        entries.push(entry("2024-06-01 18:00:00", "снег"));

        assert!(ForecastWindow::new(entries).precipitation_lines().is_empty());
    }

    #[test]
    fn capitalize_handles_cyrillic_and_empty() {
        assert_eq!(capitalize("пасмурно"), "Пасмурно");
        assert_eq!(capitalize("CLEAR SKY"), "Clear sky");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn snapshot_accessors_read_conditions() {
        let snapshot = CurrentConditions {
            location_name: "Kyiv".into(),
            temperature_c: 21.4,
            feels_like_c: 20.9,
            description: "ясно".into(),
            humidity_pct: 40,
            pressure_hpa: 1013.0,
            wind_speed_mps: 3.0,
            coord: Coordinates { lat: 50.45, lon: 30.52 },
        }
        .with_uv_index(4.2);

        assert_eq!(snapshot.pressure_mmhg(), 760);
        assert_eq!(snapshot.uv_index, 4.2);
        assert_eq!(snapshot.description(), "ясно");
    }
}
