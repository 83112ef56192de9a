//! Leptos glue: the query client lives in context, list controllers and
//! stats live in `StoredValue`s owned by the mounting component, and their
//! snapshots are mirrored into signals for rendering.

use contracts::shared::list_query::ListQuery;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use std::rc::Rc;

use super::client::QueryClient;
use super::controller::{ListController, ListView};
use super::error::FetchError;
use super::stats::{derive_stats, AggregateSnapshot, Categorizer};
use crate::shared::config::use_app_config;

#[derive(Clone, Copy)]
struct QueryClientContext(StoredValue<QueryClient, LocalStorage>);

pub fn provide_query_client(client: QueryClient) {
    provide_context(QueryClientContext(StoredValue::new_local(client)));
}

pub fn use_query_client() -> QueryClient {
    use_context::<QueryClientContext>()
        .expect("QueryClient context not found")
        .0
        .get_value()
}

/// Reactive handle over a `ListController`. Every setter triggers a reload.
pub struct ListViewHandle<T: Send + Sync + 'static> {
    pub view: RwSignal<ListView<T>>,
    /// Query behind `view`, for inputs that display it.
    pub params: RwSignal<ListQuery>,
    controller: StoredValue<ListController<T>, LocalStorage>,
}

impl<T: Send + Sync + 'static> Clone for ListViewHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for ListViewHandle<T> {}

impl<T> ListViewHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn set_search(&self, value: String) {
        self.controller.with_value(|c| c.set_search(value));
        self.reload();
    }

    pub fn set_filter(&self, key: &'static str, value: String) {
        self.controller.with_value(|c| c.set_filter(key, value));
        self.reload();
    }

    pub fn set_page(&self, page: u32) {
        self.controller.with_value(|c| c.set_page(page));
        self.reload();
    }

    pub fn set_limit(&self, limit: u32) {
        self.controller.with_value(|c| c.set_limit(limit));
        self.reload();
    }

    pub fn client(&self) -> Option<QueryClient> {
        self.controller.try_with_value(|c| c.client().clone())
    }

    pub fn resource(&self) -> Option<String> {
        self.controller.try_with_value(|c| c.resource().to_string())
    }

    /// Re-reads the current query. After a mutation the cache is already
    /// invalidated, so this goes to the network.
    pub fn reload(&self) {
        let Some(controller) = self.controller.try_get_value() else {
            return;
        };
        let view = self.view;
        let fetch = controller.refresh();
        self.params.set(controller.params());
        view.set(controller.view());
        spawn_local(async move {
            fetch.await;
            view.try_set(controller.view());
        });
    }
}

/// Creates a list controller for `resource` and loads the first page.
pub fn use_list_view<T>(resource: &'static str, limit: u32) -> ListViewHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let controller = ListController::new(use_query_client(), resource, limit);
    let handle = ListViewHandle {
        view: RwSignal::new(controller.view()),
        params: RwSignal::new(controller.params()),
        controller: StoredValue::new_local(controller),
    };
    handle.reload();
    handle
}

/// Aggregate counts for stat cards.
#[derive(Clone, Copy)]
pub struct StatsHandle {
    pub snapshot: RwSignal<Option<AggregateSnapshot>>,
    pub error: RwSignal<Option<FetchError>>,
    reload: StoredValue<Rc<dyn Fn()>, LocalStorage>,
}

impl StatsHandle {
    pub fn reload(&self) {
        if let Some(reload) = self.reload.try_get_value() {
            reload();
        }
    }
}

/// Derives the counts once on mount; call `reload` after mutations.
pub fn use_aggregate_stats<T>(resource: &'static str, categorizers: Vec<Categorizer<T>>) -> StatsHandle
where
    T: DeserializeOwned + 'static,
{
    let client = use_query_client();
    let config = use_app_config().stats;
    let snapshot = RwSignal::new(None::<AggregateSnapshot>);
    let error = RwSignal::new(None::<FetchError>);
    let categorizers = Rc::new(categorizers);

    let reload: Rc<dyn Fn()> = Rc::new(move || {
        let client = client.clone();
        let categorizers = categorizers.clone();
        spawn_local(async move {
            match derive_stats(&client, resource, &categorizers, config).await {
                Ok(result) => {
                    snapshot.try_set(Some(result));
                    error.try_set(None);
                }
                Err(err) => {
                    log::warn!("stats for {} unavailable: {}", resource, err);
                    error.try_set(Some(err));
                }
            }
        });
    });

    let handle = StatsHandle {
        snapshot,
        error,
        reload: StoredValue::new_local(reload),
    };
    handle.reload();
    handle
}
