use leptos::prelude::*;

use crate::system::auth::context::use_auth;

/// Ввод API-токена. The token is checked by the first request that uses it;
/// a `401` brings the user back here.
#[component]
pub fn LoginPage() -> impl IntoView {
    let (token, set_token) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);

    let auth = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let value = token.get().trim().to_string();
        if value.is_empty() {
            set_error_message.set(Some("Введите токен".to_string()));
            return;
        }
        set_error_message.set(None);
        auth.sign_in(value);
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Ювелирный учёт"</h1>
                <h2>"Вход в систему"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="api-token">"API токен"</label>
                        <input
                            type="password"
                            id="api-token"
                            value=move || token.get()
                            on:input=move |ev| set_token.set(event_target_value(&ev))
                            required
                        />
                    </div>

                    <button type="submit" class="login-button">
                        "Войти"
                    </button>
                </form>
            </div>
        </div>
    }
}
