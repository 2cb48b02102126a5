//! Notification text in Telegram's HTML flavour.

use chrono::{DateTime, FixedOffset};

use crate::{
    fetcher::WeatherReport,
    model::{capitalize, rounded},
    rules::{self, RuleInput},
};

const WARNINGS_TITLE: &str = "⚠️ <b>Предупреждения на сегодня:</b>";
const TIPS_TITLE: &str = "💡 <b>Полезные советы:</b>";

pub fn compose(report: &WeatherReport, now: DateTime<FixedOffset>) -> String {
    let snapshot = &report.snapshot;
    let conditions = &snapshot.conditions;

    let mut lines = vec![
        format!(
            "🌍 Доброе утро! Погода: {} ({})",
            escape_html(&conditions.location_name),
            now.format("%H:%M")
        ),
        format!("🌡 Температура: {}°C", rounded(conditions.temperature_c)),
        format!("🌤 {}", escape_html(&capitalize(&conditions.description))),
        format!("🌡 Ощущается как: {}°C", rounded(conditions.feels_like_c)),
        format!("💧 Влажность: {}%", conditions.humidity_pct),
        format!("💨 Ветер: {} м/с", conditions.wind_speed_mps),
        format!("📈 Давление: {} мм рт. ст.", snapshot.pressure_mmhg()),
        format!("🔆 UV-индекс: {}", snapshot.uv_index),
    ];

    let advisories = rules::evaluate(&RuleInput {
        snapshot,
        forecast: report.forecast.as_ref(),
    });

    push_block(&mut lines, WARNINGS_TITLE, &advisories.warnings);
    push_block(&mut lines, TIPS_TITLE, &advisories.tips);

    lines.push(String::new());
    lines.push("Хорошего дня! ☀️".to_string());
    lines.join("\n")
}

fn push_block(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(title.to_string());
    lines.extend(items.iter().map(|item| escape_html(item)));
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
