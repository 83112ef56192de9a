use crate::shared::icons::icon;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Задержка перед отправкой поискового запроса
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Поле поиска с debounce. `on_change` вызывается только после паузы в наборе.
#[component]
pub fn SearchInput(
    /// Текущее значение поиска (из контроллера)
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск по коду или наименованию...".to_string()
    } else {
        placeholder
    };

    // Локальное состояние для input (до debounce)
    let input_value = RwSignal::new(value.get_untracked());

    // Timeout отменяется при drop
    let pending = StoredValue::new_local(None::<Timeout>);

    let handle_input = move |new_value: String| {
        input_value.set(new_value.clone());
        let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, move || {
            on_change.run(new_value);
        });
        // replace dropping the previous Timeout cancels it
        pending.set_value(Some(timeout));
    };

    let clear = move |_| {
        pending.set_value(None);
        input_value.set(String::new());
        on_change.run(String::new());
    };

    let is_active = move || !value.get().trim().is_empty();

    view! {
        <div style="position: relative; display: inline-flex; align-items: center;">
            <input
                type="text"
                placeholder=placeholder
                style=move || format!(
                    "width: 260px; padding: 6px 32px 6px 10px; border: 1px solid #ddd; border-radius: 4px; font-size: 14px; background: {};",
                    if is_active() { "#fffbea" } else { "white" }
                )
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button
                    style="position: absolute; right: 6px; background: none; border: none; cursor: pointer; padding: 4px; display: inline-flex; align-items: center; color: #666;"
                    on:click=clear
                    title="Очистить"
                >
                    {icon("x")}
                </button>
            </Show>
        </div>
    }
}
