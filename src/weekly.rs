use crate::models::{DecodedStats, SeriesPoint, WeeklySeries};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Exercise,
    Sleep,
    Nutrition,
}

pub fn build_series(stats: &DecodedStats, category: Category) -> WeeklySeries {
    build_series_at(Local::now().date_naive(), stats, category)
}

/// Exactly 7 points for `today` and the 6 preceding days, oldest first.
/// Days without a value plot as 0, but only days whose raw value was
/// present and nonzero enter `total` and `average`; `max_value` is over
/// the plotted values and may be 0.
pub fn build_series_at(today: NaiveDate, stats: &DecodedStats, category: Category) -> WeeklySeries {
    let mut points = Vec::with_capacity(7);
    let mut total = 0.0;
    let mut max_value = 0.0_f64;
    let mut days_with_data = 0u32;

    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let raw = stats.get(&date_key(date)).and_then(|day| match category {
            Category::Exercise => day.exercise,
            Category::Sleep => day.sleep,
            Category::Nutrition => day.nutrition,
        });
        let value = raw.unwrap_or(0.0);

        points.push(SeriesPoint {
            value,
            label: weekday_letter(date),
        });
        if value > 0.0 {
            total += value;
            days_with_data += 1;
        }
        if value > max_value {
            max_value = value;
        }
    }

    let average = if days_with_data > 0 {
        total / f64::from(days_with_data)
    } else {
        0.0
    };

    WeeklySeries {
        points,
        average,
        total,
        max_value,
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn weekday_letter(date: NaiveDate) -> String {
    date.format("%A")
        .to_string()
        .chars()
        .next()
        .map(|letter| letter.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}
