use leptos::prelude::*;

use super::storage;
use crate::shared::query::FetchError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
}

#[derive(Clone, Copy)]
pub struct AuthContext(pub RwSignal<AuthState>);

/// Restores the token saved by a previous session.
pub fn provide_auth() -> AuthContext {
    let ctx = AuthContext(RwSignal::new(AuthState {
        access_token: storage::get_access_token(),
    }));
    provide_context(ctx);
    ctx
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext not found")
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.0.with(|s| s.access_token.is_some())
    }

    pub fn sign_in(&self, token: String) {
        storage::save_access_token(&token);
        self.0.set(AuthState {
            access_token: Some(token),
        });
    }

    /// Called when any request comes back `401`; the shell then shows the
    /// token page again.
    pub fn sign_out(&self) {
        log::info!("session rejected by the API, clearing token");
        storage::clear_access_token();
        self.0.set(AuthState::default());
    }
}

/// Returns to the token page as soon as `error` turns into `Unauthorized`.
pub fn sign_out_on_unauthorized(error: Signal<Option<FetchError>>) {
    let auth = use_auth();
    Effect::new(move |_| {
        if error.with(|e| e.as_ref().is_some_and(FetchError::is_unauthorized)) {
            auth.sign_out();
        }
    });
}
