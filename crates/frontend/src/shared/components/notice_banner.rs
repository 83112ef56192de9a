use crate::shared::icons::icon;
use crate::shared::query::FetchError;
use leptos::prelude::*;

/// Баннер ошибки над таблицей. Скрывается кнопкой до следующей ошибки.
#[component]
pub fn NoticeBanner(
    #[prop(into)] error: Signal<Option<FetchError>>,
    /// Повторить последний запрос
    #[prop(optional)]
    on_retry: Option<Callback<()>>,
) -> impl IntoView {
    let dismissed = RwSignal::new(None::<FetchError>);

    // новая ошибка снова показывает баннер
    let visible = move || {
        let current = error.get();
        match current {
            Some(err) if dismissed.get().as_ref() != Some(&err) => Some(err),
            _ => None,
        }
    };

    move || {
        visible().map(|err| {
            let message = err.user_message();
            let dismiss_err = err.clone();
            view! {
                <div
                    class="notice-banner notice-banner--error"
                    style="display: flex; align-items: center; gap: 8px; padding: 8px 12px; background: var(--color-error-50, #fdecea); border: 1px solid var(--color-error-100, #f5c2c0); border-radius: 6px; color: var(--color-error, #b3261e); margin-bottom: 8px;"
                >
                    {icon("alert")}
                    <span style="flex: 1;">{message}</span>
                    {on_retry.map(|retry| view! {
                        <button class="notice-banner__btn" title="Повторить" on:click=move |_| retry.run(())>
                            {icon("refresh")}
                        </button>
                    })}
                    <button
                        class="notice-banner__btn"
                        title="Закрыть"
                        on:click=move |_| dismissed.set(Some(dismiss_err.clone()))
                    >
                        {icon("x")}
                    </button>
                </div>
            }
        })
    }
}
