//! Threshold rules turning a snapshot into warnings and tips.
//!
//! Each rule is a pure function yielding at most one [`Advisory`]. Rules run
//! in [`RULES`] order and their output keeps that order in the message.

use crate::model::{Advisory, ForecastWindow, WeatherSnapshot, contains_any, rounded};

pub const HEAT_C: f64 = 30.0;
pub const SEVERE_COLD_C: f64 = -10.0;
pub const FROST_C: f64 = 0.0;
pub const SEVERE_WIND_MPS: f64 = 10.0;
pub const STRONG_WIND_MPS: f64 = 8.0;
pub const VERY_HIGH_UV: f64 = 8.0;
pub const HIGH_UV: f64 = 6.0;
pub const HIGH_HUMIDITY_PCT: u8 = 80;

pub const FOG_KEYWORDS: &[&str] = &["туман", "дымка", "смог", "fog", "haze", "smog", "mist"];

/// Inputs available to every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub snapshot: &'a WeatherSnapshot,
    pub forecast: Option<&'a ForecastWindow>,
}

pub type Rule = fn(&RuleInput<'_>) -> Option<Advisory>;

pub const RULES: &[Rule] = &[
    temperature_rule,
    wind_rule,
    visibility_rule,
    precipitation_rule,
    uv_rule,
    humidity_rule,
];

/// Warnings and tips in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advisories {
    pub warnings: Vec<String>,
    pub tips: Vec<String>,
}

impl Advisories {
    fn push(&mut self, advisory: Advisory) {
        self.warnings.extend(advisory.warning);
        self.tips.extend(advisory.tip);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.tips.is_empty()
    }
}

pub fn evaluate(input: &RuleInput<'_>) -> Advisories {
    evaluate_rules(RULES, input)
}

pub fn evaluate_rules(rules: &[Rule], input: &RuleInput<'_>) -> Advisories {
    let mut advisories = Advisories::default();
    for advisory in rules.iter().filter_map(|rule| rule(input)) {
        advisories.push(advisory);
    }
    advisories
}

fn temperature_rule(input: &RuleInput<'_>) -> Option<Advisory> {
    let temp = input.snapshot.temperature_c();
    if temp >= HEAT_C {
        return Some(Advisory::new(
            "🌡 Жарко! Температура выше 30°C",
            "💧 Пей больше воды, избегай перегрева.",
        ));
    }
    if temp <= SEVERE_COLD_C {
        return Some(Advisory::new(
            format!("🥶 Сильный мороз: {}°C", rounded(temp)),
            "🧣 Одевайся теплее и береги открытые участки кожи.",
        ));
    }
    if temp <= FROST_C {
        return Some(Advisory::new(
            "❄️ Температура ниже нуля, возможен гололёд",
            "👟 Осторожно на дорогах и тротуарах.",
        ));
    }
    None
}

fn wind_rule(input: &RuleInput<'_>) -> Option<Advisory> {
    let wind = input.snapshot.wind_speed_mps();
    if wind >= SEVERE_WIND_MPS {
        return Some(Advisory::new(
            format!("🌪 Очень сильный ветер: {wind} м/с"),
            "🏠 По возможности оставайся дома, держись подальше от деревьев и конструкций.",
        ));
    }
    if wind >= STRONG_WIND_MPS {
        return Some(Advisory::new(
            format!("💨 Сильный ветер: {wind} м/с"),
            "⚠️ Будь осторожен на улице из-за ветра.",
        ));
    }
    None
}

fn visibility_rule(input: &RuleInput<'_>) -> Option<Advisory> {
    contains_any(input.snapshot.description(), FOG_KEYWORDS)
        .then(|| Advisory::warning_only("🌫 Возможна плохая видимость (туман или смог)"))
}

fn precipitation_rule(input: &RuleInput<'_>) -> Option<Advisory> {
    let lines = input.forecast?.precipitation_lines();
    if lines.is_empty() {
        return None;
    }
    Some(Advisory::new(
        format!("☔️ Возможны осадки:\n{}", lines.join("\n")),
        "🌂 Захвати зонт или дождевик на всякий случай.",
    ))
}

fn uv_rule(input: &RuleInput<'_>) -> Option<Advisory> {
    let uvi = input.snapshot.uv_index;
    if uvi >= VERY_HIGH_UV {
        return Some(Advisory::new(
            format!("☀️ Очень высокий UV-индекс: {uvi}"),
            "🧢 Избегай солнца с 11 до 16, используй крем SPF 50.",
        ));
    }
    if uvi >= HIGH_UV {
        return Some(Advisory::new(
            format!("🔆 Высокий UV-индекс: {uvi}"),
            "🧴 Используй солнцезащитный крем, особенно днём.",
        ));
    }
    None
}

fn humidity_rule(input: &RuleInput<'_>) -> Option<Advisory> {
    let humidity = input.snapshot.humidity_pct();
    (humidity >= HIGH_HUMIDITY_PCT).then(|| {
        Advisory::new(
            format!("💦 Высокая влажность: {humidity}%"),
            "👕 Выбирай лёгкую одежду из дышащих тканей.",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, CurrentConditions, ForecastEntry};

    fn snapshot(temp: f64, wind: f64, humidity: u8, uvi: f64, desc: &str) -> WeatherSnapshot {
        CurrentConditions {
            location_name: "Kyiv".into(),
            temperature_c: temp,
            feels_like_c: temp,
            description: desc.into(),
            humidity_pct: humidity,
            pressure_hpa: 1013.0,
            wind_speed_mps: wind,
            coord: Coordinates { lat: 50.45, lon: 30.52 },
        }
        .with_uv_index(uvi)
    }

    fn run(snapshot: &WeatherSnapshot) -> Advisories {
        evaluate(&RuleInput {
            snapshot,
            forecast: None,
        })
    }

    fn has(items: &[String], needle: &str) -> bool {
        items.iter().any(|item| item.contains(needle))
    }

    #[test]
    fn mild_weather_produces_nothing() {
        let advisories = run(&snapshot(18.0, 3.0, 50, 2.0, "ясно"));
        assert!(advisories.is_empty());
    }

    #[test]
    fn heat_excludes_cold_tiers() {
        let advisories = run(&snapshot(30.0, 0.0, 10, 0.0, "ясно"));
        assert_eq!(advisories.warnings, vec!["🌡 Жарко! Температура выше 30°C"]);
        assert_eq!(advisories.tips, vec!["💧 Пей больше воды, избегай перегрева."]);
    }

    #[test]
    fn severe_cold_excludes_frost_and_heat() {
        let advisories = run(&snapshot(-10.0, 0.0, 10, 0.0, "ясно"));
        assert_eq!(advisories.warnings.len(), 1);
        assert!(has(&advisories.warnings, "Сильный мороз: -10°C"));
        assert!(!has(&advisories.warnings, "гололёд"));
    }

    #[test]
    fn frost_tier_between_zero_and_minus_ten() {
        for temp in [0.0, -0.5, -9.9] {
            let advisories = run(&snapshot(temp, 0.0, 10, 0.0, "ясно"));
            assert_eq!(advisories.warnings.len(), 1, "temp {temp}");
            assert!(has(&advisories.warnings, "гололёд"));
        }
    }

    #[test]
    fn exactly_one_temperature_tier_fires() {
        for temp in [-40.0, -10.0, -3.0, 0.0, 30.0, 41.0] {
            let advisories = run(&snapshot(temp, 0.0, 10, 0.0, "ясно"));
            assert_eq!(advisories.warnings.len(), 1, "temp {temp}");
            assert_eq!(advisories.tips.len(), 1, "temp {temp}");
        }
    }

    #[test]
    fn wind_tiers_are_exclusive() {
        let severe = run(&snapshot(15.0, 10.0, 10, 0.0, "ясно"));
        assert!(has(&severe.warnings, "Очень сильный ветер: 10 м/с"));
        assert!(!has(&severe.warnings, "💨"));

        for wind in [8.0, 9.99] {
            let moderate = run(&snapshot(15.0, wind, 10, 0.0, "ясно"));
            assert_eq!(moderate.warnings, vec![format!("💨 Сильный ветер: {wind} м/с")]);
        }

        assert!(run(&snapshot(15.0, 7.9, 10, 0.0, "ясно")).is_empty());
    }

    #[test]
    fn fog_gives_warning_without_tip() {
        let advisories = run(&snapshot(15.0, 0.0, 10, 0.0, "Туман"));
        assert_eq!(advisories.warnings.len(), 1);
        assert!(has(&advisories.warnings, "плохая видимость"));
        assert!(advisories.tips.is_empty());

        assert!(!run(&snapshot(15.0, 0.0, 10, 0.0, "light haze")).is_empty());
    }

    #[test]
    fn uv_tiers_are_exclusive() {
        let very_high = run(&snapshot(15.0, 0.0, 10, 8.0, "ясно"));
        assert_eq!(very_high.warnings, vec!["☀️ Очень высокий UV-индекс: 8"]);

        let high = run(&snapshot(15.0, 0.0, 10, 6.5, "ясно"));
        assert_eq!(high.warnings, vec!["🔆 Высокий UV-индекс: 6.5"]);

        assert!(run(&snapshot(15.0, 0.0, 10, 5.9, "ясно")).is_empty());
    }

    #[test]
    fn high_humidity_threshold() {
        assert!(has(&run(&snapshot(15.0, 0.0, 80, 0.0, "ясно")).warnings, "80%"));
        assert!(run(&snapshot(15.0, 0.0, 79, 0.0, "ясно")).is_empty());
    }

    #[test]
    fn precipitation_lists_forecast_lines() {
        let snapshot = snapshot(15.0, 0.0, 10, 0.0, "ясно");
        let forecast = ForecastWindow::new([
            ForecastEntry {
                dt_txt: "2024-06-01 12:00:00".into(),
                description: "облачно".into(),
            },
            ForecastEntry {
                dt_txt: "2024-06-01 15:00:00".into(),
                description: "ливень".into(),
            },
        ]);

        let advisories = evaluate(&RuleInput {
            snapshot: &snapshot,
            forecast: Some(&forecast),
        });

        assert_eq!(advisories.warnings, vec!["☔️ Возможны осадки:\n• 15:00: Ливень"]);
        assert_eq!(advisories.tips, vec!["🌂 Захвати зонт или дождевик на всякий случай."]);
    }

    #[test]
    fn output_follows_rule_order() {
        let snapshot = snapshot(35.0, 12.0, 90, 9.0, "дымка");
        let advisories = run(&snapshot);

        assert_eq!(advisories.warnings.len(), 5);
        assert!(advisories.warnings[0].contains("Жарко"));
        assert!(advisories.warnings[1].contains("Очень сильный ветер"));
        assert!(advisories.warnings[2].contains("видимость"));
        assert!(advisories.warnings[3].contains("UV"));
        assert!(advisories.warnings[4].contains("влажность"));
        assert_eq!(advisories.tips.len(), 4);
    }

    #[test]
    fn custom_rule_list_is_honoured() {
        let snapshot = snapshot(35.0, 12.0, 90, 9.0, "ясно");
        let input = RuleInput {
            snapshot: &snapshot,
            forecast: None,
        };
        let advisories = evaluate_rules(&[humidity_rule, temperature_rule], &input);
        assert!(advisories.warnings[0].contains("влажность"));
        assert!(advisories.warnings[1].contains("Жарко"));
    }
}
