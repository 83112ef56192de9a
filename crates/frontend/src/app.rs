use crate::app_shell::AppShell;
use crate::shared::config::AppConfig;
use crate::shared::query::{provide_query_client, HttpCollectionApi, QueryClient};
use crate::system::auth::context::provide_auth;
use leptos::prelude::*;
use std::rc::Rc;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_location();
    log::info!("API root: {}", config.api_root);

    // Один кэш на всё приложение: мутации на любом экране инвалидируют его
    let client = QueryClient::new(Rc::new(HttpCollectionApi::new(config.api_root.clone())));
    provide_query_client(client);
    provide_context(config);
    provide_auth();

    view! {
        <ConfigProvider>
            <AppShell />
        </ConfigProvider>
    }
}
