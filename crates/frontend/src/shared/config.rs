use leptos::prelude::*;

use crate::shared::query::StatsConfig;

/// Default page size of list screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the pagination selector.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Root of the REST API, e.g. `http://localhost:3000/api`.
    pub api_root: String,
    pub page_size: u32,
    pub stats: StatsConfig,
}

impl AppConfig {
    /// API root on port 3000 of the host serving the app; falls back to a
    /// relative `/api` when there is no window.
    pub fn from_location() -> Self {
        let api_root = web_sys::window()
            .map(|w| {
                let location = w.location();
                let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
                let hostname = location
                    .hostname()
                    .unwrap_or_else(|_| "127.0.0.1".to_string());
                format!("{}//{}:3000/api", protocol, hostname)
            })
            .unwrap_or_else(|| "/api".to_string());
        Self {
            api_root,
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_root: "/api".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            stats: StatsConfig::default(),
        }
    }
}

pub fn use_app_config() -> AppConfig {
    use_context::<AppConfig>().unwrap_or_default()
}
