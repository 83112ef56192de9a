use crate::shared::format::format_thousands;
use crate::shared::icons::icon;
use leptos::prelude::*;

/// `≈` marks counts that cover only part of the collection.
pub fn format_count(value: Option<u64>, approximate: bool) -> String {
    match value {
        Some(v) => {
            let text = format_thousands(i64::try_from(v).unwrap_or(i64::MAX));
            if approximate {
                format!("≈{}", text)
            } else {
                text
            }
        }
        None => "—".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTone {
    Neutral,
    Success,
    Error,
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    label: String,
    /// Icon name from the icon() helper
    icon_name: String,
    /// Count to show (None = loading/error)
    #[prop(into)]
    value: Signal<Option<u64>>,
    /// Counts derived from a truncated fetch
    #[prop(into)]
    approximate: Signal<bool>,
    #[prop(optional)]
    tone: Option<StatTone>,
    /// Optional subtitle below the value
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let status_class = match tone.unwrap_or(StatTone::Neutral) {
        StatTone::Success => "stat-card stat-card--success",
        StatTone::Error => "stat-card stat-card--error",
        StatTone::Neutral => "stat-card",
    };

    let formatted = move || format_count(value.get(), approximate.get());

    let subtitle_view = move || {
        subtitle.get().map(|s| {
            view! { <div class="stat-card__subtitle">{s}</div> }
        })
    };

    view! {
        <div class=status_class title=move || approximate.get().then_some("Подсчитано по неполной выборке")>
            <div class="stat-card__icon">
                {icon(&icon_name)}
            </div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                {subtitle_view}
            </div>
        </div>
    }
}
