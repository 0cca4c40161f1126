//! Analytics overview for the selected date range.

use chrono::NaiveDate;
use leptos::prelude::*;
use serde_json::Value;

use crate::shared::data::use_analytics;
use crate::shared::date_utils::DateRange;

/// Top-level fields of the analytics payload as label/value pairs.
pub fn metric_cards(payload: &Value) -> Vec<(String, String)> {
    match payload {
        Value::Object(fields) => fields
            .iter()
            .filter(|(_, v)| !v.is_object() && !v.is_array())
            .map(|(k, v)| {
                let shown = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), shown)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let analytics = use_analytics::<Value>(None);
    let range = analytics.date_range;

    let set_start = move |raw: String| {
        if let Some(start) = parse_date(&raw) {
            let end = range.get_untracked().end;
            analytics.handle_date_range_change(DateRange::new(start, end));
        }
    };
    let set_end = move |raw: String| {
        if let Some(end) = parse_date(&raw) {
            let start = range.get_untracked().start;
            analytics.handle_date_range_change(DateRange::new(start, end));
        }
    };

    view! {
        <div class="page dashboard">
            <div class="page__toolbar">
                <label>
                    "From "
                    <input
                        type="date"
                        prop:value=move || range.get().start.to_string()
                        on:change=move |ev| set_start(event_target_value(&ev))
                    />
                </label>
                <label>
                    "To "
                    <input
                        type="date"
                        prop:value=move || range.get().end.to_string()
                        on:change=move |ev| set_end(event_target_value(&ev))
                    />
                </label>
            </div>

            <Show when=move || analytics.error.get().is_some()>
                <div class="error-message">{move || analytics.error.get().unwrap_or_default()}</div>
            </Show>
            <Show when=move || analytics.loading.get()>
                <div class="dashboard__loading">"Loading..."</div>
            </Show>

            <div class="dashboard__cards">
                {move || {
                    analytics
                        .data
                        .with(|data| data.as_ref().map(metric_cards).unwrap_or_default())
                        .into_iter()
                        .map(|(label, value)| view! {
                            <div class="card">
                                <div class="card__label">{label}</div>
                                <div class="card__value">{value}</div>
                            </div>
                        })
                        .collect_view()
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_cards_skip_nested() {
        let cards = metric_cards(&json!({
            "revenue": 1200.5,
            "currency": "EUR",
            "series": [1, 2, 3],
        }));
        assert_eq!(
            cards,
            vec![
                ("currency".to_string(), "EUR".to_string()),
                ("revenue".to_string(), "1200.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("29.02.2024"), None);
    }
}
