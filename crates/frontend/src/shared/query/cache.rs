//! Shared cache of collection pages keyed by `(resource, ListQuery)`.
//!
//! One `QueryCache` is created by the app shell and handed to every list
//! view through context. It runs on the single-threaded UI executor, so the
//! state lives behind `Rc<RefCell<..>>` and no borrow is held across an
//! `.await`.

use contracts::shared::list_query::ListQuery;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::error::FetchError;
use super::transport::{CollectionApi, Page};

pub type PageResult = Result<Rc<Page<Value>>, FetchError>;

type SharedFetch = Shared<LocalBoxFuture<'static, PageResult>>;

/// Сколько страниц держим в памяти; лишние готовые/ошибочные вытесняются
/// по давности использования. Загружающиеся не вытесняются.
pub const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: String,
    pub query: ListQuery,
}

impl CacheKey {
    pub fn new(resource: &str, query: &ListQuery) -> Self {
        Self {
            resource: resource.to_string(),
            query: query.clone(),
        }
    }
}

/// Lifecycle of one `(resource, query)` request as seen by observers.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Success(Rc<Page<Value>>),
    Error(FetchError),
}

enum Slot {
    Loading { request_id: u64, fetch: SharedFetch },
    Ready(Rc<Page<Value>>),
    Failed(FetchError),
}

struct Entry {
    slot: Slot,
    /// Set by `invalidate`; a stale entry is never served and its in-flight
    /// result is never stored as fresh.
    stale: bool,
    last_used: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, Entry>,
    next_request_id: u64,
    clock: u64,
}

impl CacheInner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Least recently used settled entries go first.
    fn evict_over_capacity(&mut self) {
        while self.entries.len() > MAX_ENTRIES {
            let oldest = self
                .entries
                .iter()
                .filter(|(_, entry)| !matches!(entry.slot, Slot::Loading { .. }))
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            let Some(key) = oldest else {
                break;
            };
            log::debug!("evicting {} page {}", key.resource, key.query.page);
            self.entries.remove(&key);
        }
    }
}

enum Lookup {
    Hit(Rc<Page<Value>>),
    Pending { request_id: u64, fetch: SharedFetch },
}

#[derive(Clone)]
pub struct QueryCache {
    api: Rc<dyn CollectionApi>,
    inner: Rc<RefCell<CacheInner>>,
}

impl QueryCache {
    pub fn new(api: Rc<dyn CollectionApi>) -> Self {
        Self {
            api,
            inner: Rc::new(RefCell::new(CacheInner::default())),
        }
    }

    /// Returns the page for `query`, issuing at most one request per key at
    /// a time. Failures are recorded but not served from cache, so the next
    /// read of the same key is a fresh request.
    pub async fn read(&self, resource: &str, query: &ListQuery) -> PageResult {
        let key = CacheKey::new(resource, query);
        let (request_id, fetch) = match self.lookup_or_issue(&key) {
            Lookup::Hit(page) => return Ok(page),
            Lookup::Pending { request_id, fetch } => (request_id, fetch),
        };

        let result = fetch.await;
        self.settle(&key, request_id, &result);
        result
    }

    fn lookup_or_issue(&self, key: &CacheKey) -> Lookup {
        let mut inner = self.inner.borrow_mut();
        let now = inner.tick();

        if let Some(entry) = inner.entries.get_mut(key) {
            if !entry.stale {
                entry.last_used = now;
                match &entry.slot {
                    Slot::Ready(page) => {
                        log::debug!("cache hit: {} page {}", key.resource, key.query.page);
                        return Lookup::Hit(page.clone());
                    }
                    Slot::Loading { request_id, fetch } => {
                        log::debug!(
                            "joining in-flight request #{} for {} page {}",
                            request_id,
                            key.resource,
                            key.query.page
                        );
                        return Lookup::Pending {
                            request_id: *request_id,
                            fetch: fetch.clone(),
                        };
                    }
                    Slot::Failed(_) => {}
                }
            }
        }

        inner.next_request_id += 1;
        let request_id = inner.next_request_id;
        log::debug!(
            "cache miss: request #{} for {} page {}",
            request_id,
            key.resource,
            key.query.page
        );

        let api = self.api.clone();
        let resource = key.resource.clone();
        let query = key.query.clone();
        let fetch = async move { api.list(&resource, &query).await.map(Rc::new) }
            .boxed_local()
            .shared();

        inner.entries.insert(
            key.clone(),
            Entry {
                slot: Slot::Loading {
                    request_id,
                    fetch: fetch.clone(),
                },
                stale: false,
                last_used: now,
            },
        );
        inner.evict_over_capacity();

        Lookup::Pending { request_id, fetch }
    }

    /// Stores a completed request unless a newer request for the same key
    /// has replaced it in the meantime.
    fn settle(&self, key: &CacheKey, request_id: u64, result: &PageResult) {
        let mut inner = self.inner.borrow_mut();
        let Some(entry) = inner.entries.get_mut(key) else {
            return;
        };

        match &entry.slot {
            Slot::Loading { request_id: current, .. } if *current == request_id => {}
            Slot::Loading { request_id: current, .. } => {
                log::debug!(
                    "dropping superseded response #{} for {} (current #{})",
                    request_id,
                    key.resource,
                    current
                );
                return;
            }
            // Already settled by another waiter of the same request.
            _ => return,
        }

        entry.slot = match result {
            Ok(page) => Slot::Ready(page.clone()),
            Err(err) => Slot::Failed(err.clone()),
        };
    }

    /// Drops settled pages of `resource` and marks its in-flight requests
    /// stale so their results are not stored.
    pub fn invalidate(&self, resource: &str) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|key, entry| {
            if key.resource != resource {
                return true;
            }
            entry.stale = true;
            matches!(entry.slot, Slot::Loading { .. })
        });
        log::debug!(
            "invalidated {} pages of {} ({} in flight)",
            before - inner.entries.len(),
            resource,
            inner
                .entries
                .keys()
                .filter(|key| key.resource == resource)
                .count()
        );
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self, resource: &str, query: &ListQuery) -> FetchState {
        let inner = self.inner.borrow();
        match inner.entries.get(&CacheKey::new(resource, query)) {
            None => FetchState::Idle,
            Some(entry) => match &entry.slot {
                Slot::Loading { .. } => FetchState::Loading,
                Slot::Ready(page) => FetchState::Success(page.clone()),
                Slot::Failed(err) => FetchState::Error(err.clone()),
            },
        }
    }

    pub fn is_stale(&self, resource: &str, query: &ListQuery) -> bool {
        self.inner
            .borrow()
            .entries
            .get(&CacheKey::new(resource, query))
            .map(|entry| entry.stale)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::query::testing::{rows, FakeApi};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    fn setup(n: usize) -> (Rc<FakeApi>, QueryCache) {
        let api = Rc::new(FakeApi::new());
        api.seed("suppliers", rows(n));
        let cache = QueryCache::new(api.clone());
        (api, cache)
    }

    #[test]
    fn test_concurrent_identical_reads_issue_one_request() {
        let (api, cache) = setup(25);
        let release = api.gate(1);
        let query = ListQuery::new(10);

        let mut pool = LocalPool::new();
        let results = Rc::new(RefCell::new(Vec::new()));
        for _ in 0..2 {
            let cache = cache.clone();
            let query = query.clone();
            let results = results.clone();
            pool.spawner()
                .spawn_local(async move {
                    let page = cache.read("suppliers", &query).await;
                    results.borrow_mut().push(page);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(api.list_calls(), 1);
        assert_eq!(cache.state("suppliers", &query), FetchState::Loading);

        release.send(()).unwrap();
        pool.run_until_stalled();

        let results = results.borrow();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.as_ref().unwrap().rows.len() == 10));
        assert_eq!(api.list_calls(), 1);
    }

    #[test]
    fn test_ready_entry_is_served_from_cache() {
        let (api, cache) = setup(25);
        let query = ListQuery::new(10);

        block_on(cache.read("suppliers", &query)).unwrap();
        let page = block_on(cache.read("suppliers", &query)).unwrap();

        assert_eq!(api.list_calls(), 1);
        assert_eq!(page.total_count, 25);
        assert!(matches!(
            cache.state("suppliers", &query),
            FetchState::Success(_)
        ));
    }

    #[test]
    fn test_invalidate_forces_refetch_for_any_params() {
        let (api, cache) = setup(25);
        let first = ListQuery::new(10);
        let second = ListQuery::new(10).with_page(2);

        block_on(cache.read("suppliers", &first)).unwrap();
        block_on(cache.read("suppliers", &second)).unwrap();
        assert_eq!(api.list_calls(), 2);

        api.remove("suppliers", "1");
        cache.invalidate("suppliers");
        assert_eq!(cache.state("suppliers", &first), FetchState::Idle);
        assert!(cache.is_empty());

        let page = block_on(cache.read("suppliers", &first)).unwrap();
        assert_eq!(page.total_count, 24);
        assert_eq!(api.list_calls(), 3);
        block_on(cache.read("suppliers", &second)).unwrap();
        assert_eq!(api.list_calls(), 4);
    }

    #[test]
    fn test_invalidate_leaves_other_resources_cached() {
        let (api, cache) = setup(5);
        api.seed("employees", rows(3));
        let query = ListQuery::new(10);

        block_on(cache.read("suppliers", &query)).unwrap();
        block_on(cache.read("employees", &query)).unwrap();
        cache.invalidate("suppliers");
        block_on(cache.read("employees", &query)).unwrap();

        assert_eq!(api.list_calls(), 2);
    }

    #[test]
    fn test_in_flight_result_is_not_stored_after_invalidation() {
        let (api, cache) = setup(25);
        let release = api.gate(1);
        let query = ListQuery::new(10);

        let mut pool = LocalPool::new();
        {
            let cache = cache.clone();
            let query = query.clone();
            pool.spawner()
                .spawn_local(async move {
                    let _ = cache.read("suppliers", &query).await;
                })
                .unwrap();
        }
        pool.run_until_stalled();

        cache.invalidate("suppliers");
        release.send(()).unwrap();
        pool.run_until_stalled();

        assert!(cache.is_stale("suppliers", &query));
        block_on(cache.read("suppliers", &query)).unwrap();
        assert_eq!(api.list_calls(), 2);
    }

    #[test]
    fn test_superseded_response_does_not_overwrite_newer_request() {
        let (api, cache) = setup(25);
        let old_release = api.gate(1);
        let query = ListQuery::new(10);

        let mut pool = LocalPool::new();
        let old_result = Rc::new(RefCell::new(None));
        {
            let cache = cache.clone();
            let query = query.clone();
            let old_result = old_result.clone();
            pool.spawner()
                .spawn_local(async move {
                    *old_result.borrow_mut() = Some(cache.read("suppliers", &query).await);
                })
                .unwrap();
        }
        pool.run_until_stalled();

        // Mutation lands while the old request is in flight, then a new read.
        api.remove("suppliers", "1");
        cache.invalidate("suppliers");
        let fresh = block_on(cache.read("suppliers", &query)).unwrap();
        assert_eq!(fresh.total_count, 24);

        // The old request resolves last with pre-mutation data.
        api.seed("suppliers", rows(25));
        old_release.send(()).unwrap();
        pool.run_until_stalled();
        assert!(old_result.borrow().is_some());

        match cache.state("suppliers", &query) {
            FetchState::Success(page) => assert_eq!(page.total_count, 24),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_error_is_recorded_but_not_served() {
        let (api, cache) = setup(25);
        let query = ListQuery::new(10);

        api.fail_with(Some(FetchError::Network("offline".to_string())));
        let err = block_on(cache.read("suppliers", &query)).unwrap_err();
        assert_eq!(err, FetchError::Network("offline".to_string()));
        assert_eq!(cache.state("suppliers", &query), FetchState::Error(err));

        api.fail_with(None);
        let page = block_on(cache.read("suppliers", &query)).unwrap();
        assert_eq!(page.rows.len(), 10);
        assert_eq!(api.list_calls(), 2);
    }

    #[test]
    fn test_invalidate_drops_failed_and_ready_pages() {
        let (api, cache) = setup(25);
        block_on(cache.read("suppliers", &ListQuery::new(10))).unwrap();
        api.fail_with(Some(FetchError::Network("offline".to_string())));
        let failing = ListQuery::new(1000);
        block_on(cache.read("suppliers", &failing)).unwrap_err();
        assert_eq!(cache.len(), 2);

        cache.invalidate("suppliers");
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.state("suppliers", &failing), FetchState::Idle);
    }

    #[test]
    fn test_distinct_searches_are_bounded_and_recent_pages_kept() {
        let (api, cache) = setup(25);
        let first = ListQuery::new(10);
        block_on(cache.read("suppliers", &first)).unwrap();

        for i in 0..MAX_ENTRIES + 10 {
            let query = ListQuery::new(10).with_search(format!("term {i}"));
            block_on(cache.read("suppliers", &query)).unwrap();
            // первая страница остаётся самой свежей
            block_on(cache.read("suppliers", &first)).unwrap();
        }

        assert_eq!(cache.len(), MAX_ENTRIES);
        assert!(matches!(cache.state("suppliers", &first), FetchState::Success(_)));
        assert_eq!(
            cache.state("suppliers", &ListQuery::new(10).with_search("term 0")),
            FetchState::Idle
        );
        assert_eq!(api.list_calls(), MAX_ENTRIES + 11);
    }

    #[test]
    fn test_idle_before_first_read() {
        let (_api, cache) = setup(1);
        assert_eq!(
            cache.state("suppliers", &ListQuery::new(10)),
            FetchState::Idle
        );
    }
}
