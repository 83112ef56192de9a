//! Состояние списка: страница, размер страницы, поиск, фильтры.
//!
//! `ListController` turns user interaction into `ListQuery` values and
//! applies the matching cache responses. Only the response of the most
//! recently issued refresh is applied; anything older is dropped on arrival.

use contracts::shared::list_query::ListQuery;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use super::client::QueryClient;
use super::error::FetchError;

/// Snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
    pub is_fetching: bool,
    pub error: Option<FetchError>,
}

struct ControllerState<T> {
    query: ListQuery,
    generation: u64,
    rows: Vec<T>,
    total_count: u64,
    is_fetching: bool,
    error: Option<FetchError>,
}

pub struct ListController<T> {
    client: QueryClient,
    resource: String,
    state: Rc<RefCell<ControllerState<T>>>,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            resource: self.resource.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T> ListController<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    pub fn new(client: QueryClient, resource: impl Into<String>, limit: u32) -> Self {
        Self {
            client,
            resource: resource.into(),
            state: Rc::new(RefCell::new(ControllerState {
                query: ListQuery::new(limit.max(1)),
                generation: 0,
                rows: Vec::new(),
                total_count: 0,
                is_fetching: false,
                error: None,
            })),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    /// Query the next refresh will request.
    pub fn params(&self) -> ListQuery {
        self.state.borrow().query.clone()
    }

    /// A new search term addresses a different result set, so the page goes back to 1.
    pub fn set_search(&self, value: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.query.search = value.into();
        state.query.page = 1;
    }

    /// Same reset as `set_search`. An empty value removes the filter.
    pub fn set_filter(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let mut state = self.state.borrow_mut();
        if value.is_empty() {
            state.query.filters.remove(&key);
        } else {
            state.query.filters.insert(key, value);
        }
        state.query.page = 1;
    }

    pub fn clear_filter(&self, key: &str) {
        let mut state = self.state.borrow_mut();
        state.query.filters.remove(key);
        state.query.page = 1;
    }

    /// Pages past the end are requested as-is; the server answers with an
    /// empty page. Zero is raised to 1.
    pub fn set_page(&self, page: u32) {
        self.state.borrow_mut().query.page = page.max(1);
    }

    pub fn set_limit(&self, limit: u32) {
        let mut state = self.state.borrow_mut();
        state.query.limit = limit.max(1);
        state.query.page = 1;
    }

    pub fn view(&self) -> ListView<T> {
        let state = self.state.borrow();
        ListView {
            rows: state.rows.clone(),
            total_count: state.total_count,
            page: state.query.page,
            limit: state.query.limit,
            is_fetching: state.is_fetching,
            error: state.error.clone(),
        }
    }

    /// Marks the view as fetching right away and returns the future that
    /// loads the current query. On failure the last good rows stay visible
    /// and `error` is set.
    pub fn refresh(&self) -> impl Future<Output = ()> + 'static {
        let (generation, query) = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.is_fetching = true;
            (state.generation, state.query.clone())
        };
        let client = self.client.clone();
        let resource = self.resource.clone();
        let state = self.state.clone();

        async move {
            let result = client.read_typed::<T>(&resource, &query).await;

            let mut state = state.borrow_mut();
            if state.generation != generation {
                log::debug!(
                    "discarding stale {} page {} (generation {} < {})",
                    resource,
                    query.page,
                    generation,
                    state.generation
                );
                return;
            }

            state.is_fetching = false;
            match result {
                Ok(page) => {
                    state.rows = page.rows;
                    state.total_count = page.total_count;
                    state.error = None;
                }
                Err(err) => {
                    log::warn!("failed to load {} page {}: {}", resource, query.page, err);
                    state.error = Some(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::query::testing::{rows, FakeApi, TestRow};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    fn setup(n: usize) -> (Rc<FakeApi>, ListController<TestRow>) {
        let api = Rc::new(FakeApi::new());
        api.seed("suppliers", rows(n));
        let client = QueryClient::new(api.clone());
        (api, ListController::new(client, "suppliers", 10))
    }

    fn ids(view: &ListView<TestRow>) -> Vec<String> {
        view.rows.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_defaults() {
        let (_api, controller) = setup(0);
        let params = controller.params();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.search, "");
        assert!(params.filters.is_empty());
        assert!(!controller.view().is_fetching);
    }

    #[test]
    fn test_set_search_resets_page() {
        let (api, controller) = setup(25);
        controller.set_page(3);
        block_on(controller.refresh());
        assert_eq!(controller.view().page, 3);

        controller.set_search("C01");
        assert_eq!(controller.params().page, 1);
        block_on(controller.refresh());
        assert_eq!(api.last_query().unwrap().page, 1);
        assert_eq!(api.last_query().unwrap().search, "C01");
        assert_eq!(controller.view().total_count, 10);
    }

    #[test]
    fn test_set_filter_resets_page() {
        let (api, controller) = setup(25);
        controller.set_page(2);
        controller.set_filter("status", "inactive");
        assert_eq!(controller.params().page, 1);

        block_on(controller.refresh());
        assert_eq!(api.last_query().unwrap().filter("status"), Some("inactive"));
        assert_eq!(controller.view().total_count, 8);

        controller.set_page(2);
        controller.set_filter("status", "");
        assert_eq!(controller.params().page, 1);
        assert!(controller.params().filters.is_empty());

        controller.set_page(2);
        controller.clear_filter("status");
        assert_eq!(controller.params().page, 1);
    }

    #[test]
    fn test_set_page_keeps_search_and_tolerates_out_of_range() {
        let (api, controller) = setup(25);
        controller.set_search("C00");
        controller.set_page(40);
        assert_eq!(controller.params().search, "C00");

        block_on(controller.refresh());
        assert_eq!(api.last_query().unwrap().page, 40);
        let view = controller.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.total_count, 9);

        controller.set_page(0);
        assert_eq!(controller.params().page, 1);
    }

    #[test]
    fn test_paging_through_25_rows() {
        let (_api, controller) = setup(25);

        block_on(controller.refresh());
        let view = controller.view();
        assert_eq!(view.total_count, 25);
        assert_eq!(ids(&view), (1..=10).map(|i| i.to_string()).collect::<Vec<_>>());

        controller.set_page(3);
        block_on(controller.refresh());
        let view = controller.view();
        assert_eq!(view.total_count, 25);
        assert_eq!(ids(&view), (21..=25).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (api, controller) = setup(25);
        let release_first = api.gate(1);
        let release_second = api.gate(2);
        let mut pool = LocalPool::new();

        pool.spawner().spawn_local(controller.refresh()).unwrap();
        controller.set_page(2);
        pool.spawner().spawn_local(controller.refresh()).unwrap();
        pool.run_until_stalled();
        assert!(controller.view().is_fetching);

        release_second.send(()).unwrap();
        pool.run_until_stalled();
        let view = controller.view();
        assert!(!view.is_fetching);
        assert_eq!(view.rows[0].id, "11");

        release_first.send(()).unwrap();
        pool.run_until_stalled();
        let view = controller.view();
        assert_eq!(view.page, 2);
        assert_eq!(view.rows[0].id, "11");
        assert_eq!(view.rows.len(), 10);
    }

    #[test]
    fn test_is_fetching_until_latest_resolves() {
        let (api, controller) = setup(25);
        let release = api.gate(1);
        let mut pool = LocalPool::new();

        pool.spawner().spawn_local(controller.refresh()).unwrap();
        pool.run_until_stalled();
        assert!(controller.view().is_fetching);

        release.send(()).unwrap();
        pool.run_until_stalled();
        assert!(!controller.view().is_fetching);
    }

    #[test]
    fn test_unauthorized_keeps_last_rows() {
        let (api, controller) = setup(25);
        block_on(controller.refresh());
        assert_eq!(controller.view().rows.len(), 10);

        api.fail_with(Some(FetchError::Unauthorized));
        controller.set_page(2);
        block_on(controller.refresh());

        let view = controller.view();
        assert_eq!(view.error, Some(FetchError::Unauthorized));
        assert_eq!(view.rows.len(), 10);
        assert_eq!(view.rows[0].id, "1");
        assert_eq!(view.total_count, 25);
        assert!(!view.is_fetching);

        api.fail_with(None);
        block_on(controller.refresh());
        let view = controller.view();
        assert_eq!(view.error, None);
        assert_eq!(view.rows[0].id, "11");
    }

    #[test]
    fn test_empty_collection() {
        let (_api, controller) = setup(0);
        block_on(controller.refresh());
        let view = controller.view();
        assert_eq!(view.total_count, 0);
        assert!(view.rows.is_empty());
        assert!(!view.is_fetching);
    }

    #[test]
    fn test_mutation_is_observed_by_other_controllers() {
        let (api, first) = setup(25);
        let second: ListController<TestRow> =
            ListController::new(first.client().clone(), "suppliers", 10);

        block_on(first.refresh());
        block_on(second.refresh());
        assert_eq!(api.list_calls(), 1);

        block_on(first.client().delete("suppliers", "2")).unwrap();
        block_on(second.refresh());
        assert_eq!(second.view().total_count, 24);
        assert_eq!(api.list_calls(), 2);
    }
}
