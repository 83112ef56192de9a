//! In-memory `CollectionApi` for query-layer tests.

use async_trait::async_trait;
use contracts::shared::api_response::{ApiMessageResponse, StatsDto};
use contracts::shared::list_query::ListQuery;
use futures::channel::oneshot;
use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use super::error::FetchError;
use super::transport::{CollectionApi, Page};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestRow {
    pub id: String,
    pub code: String,
    pub is_active: bool,
}

/// Rows `1..=n`; every third row is inactive.
pub fn rows(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| json!({ "id": i.to_string(), "code": format!("C{:03}", i), "is_active": i % 3 != 0 }))
        .collect()
}

#[derive(Default)]
pub struct FakeApi {
    collections: RefCell<HashMap<String, Vec<Value>>>,
    gates: RefCell<HashMap<u32, oneshot::Receiver<()>>>,
    failure: RefCell<Option<FetchError>>,
    stats_response: RefCell<Option<Result<StatsDto, FetchError>>>,
    list_calls: Cell<usize>,
    stats_calls: Cell<usize>,
    last_query: RefCell<Option<ListQuery>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, resource: &str, rows: Vec<Value>) {
        self.collections
            .borrow_mut()
            .insert(resource.to_string(), rows);
    }

    pub fn remove(&self, resource: &str, id: &str) {
        if let Some(rows) = self.collections.borrow_mut().get_mut(resource) {
            rows.retain(|row| row["id"] != id);
        }
    }

    /// Holds the next list request for `page` until the returned sender fires.
    pub fn gate(&self, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(page, rx);
        tx
    }

    pub fn fail_with(&self, failure: Option<FetchError>) {
        *self.failure.borrow_mut() = failure;
    }

    pub fn stats_answer(&self, answer: Option<Result<StatsDto, FetchError>>) {
        *self.stats_response.borrow_mut() = answer;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.get()
    }

    pub fn last_query(&self) -> Option<ListQuery> {
        self.last_query.borrow().clone()
    }

    fn check_failure(&self) -> Result<(), FetchError> {
        match self.failure.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn matches(row: &Value, query: &ListQuery) -> bool {
        if let Some(term) = query.search_term() {
            let term = term.to_lowercase();
            let code = row["code"].as_str().unwrap_or_default().to_lowercase();
            if !code.contains(&term) {
                return false;
            }
        }
        query.filters.iter().all(|(key, value)| match key.as_str() {
            "status" => match value.as_str() {
                "active" => row["is_active"] == true,
                "inactive" => row["is_active"] == false,
                _ => true,
            },
            _ => row[key.as_str()].as_str() == Some(value.as_str()),
        })
    }
}

#[async_trait(?Send)]
impl CollectionApi for FakeApi {
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<Page<Value>, FetchError> {
        self.list_calls.set(self.list_calls.get() + 1);
        *self.last_query.borrow_mut() = Some(query.clone());

        let gate = self.gates.borrow_mut().remove(&query.page);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.check_failure()?;

        let collections = self.collections.borrow();
        let matching: Vec<Value> = collections
            .get(resource)
            .map(|rows| {
                rows.iter()
                    .filter(|row| Self::matches(row, query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let rows = matching
            .iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(Page {
            rows,
            total_count: matching.len() as u64,
        })
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value, FetchError> {
        self.check_failure()?;
        self.collections
            .borrow()
            .get(resource)
            .and_then(|rows| rows.iter().find(|row| row["id"] == id).cloned())
            .ok_or_else(|| FetchError::from_status(404, Some("not found".to_string())))
    }

    async fn create(&self, resource: &str, body: &Value) -> Result<ApiMessageResponse, FetchError> {
        self.check_failure()?;
        let mut collections = self.collections.borrow_mut();
        let rows = collections.entry(resource.to_string()).or_default();
        let id = (rows.len() + 1000).to_string();
        let mut row = body.clone();
        row["id"] = Value::String(id.clone());
        rows.push(row);
        Ok(ApiMessageResponse::created(id))
    }

    async fn update(
        &self,
        resource: &str,
        id: &str,
        body: &Value,
    ) -> Result<ApiMessageResponse, FetchError> {
        self.check_failure()?;
        let mut collections = self.collections.borrow_mut();
        let row = collections
            .get_mut(resource)
            .and_then(|rows| rows.iter_mut().find(|row| row["id"] == id))
            .ok_or_else(|| FetchError::from_status(404, None))?;
        let mut updated = body.clone();
        updated["id"] = Value::String(id.to_string());
        *row = updated;
        Ok(ApiMessageResponse::ok("updated"))
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<ApiMessageResponse, FetchError> {
        self.check_failure()?;
        self.remove(resource, id);
        Ok(ApiMessageResponse::ok("deleted"))
    }

    async fn stats(&self, resource: &str) -> Result<StatsDto, FetchError> {
        self.stats_calls.set(self.stats_calls.get() + 1);
        if let Some(answer) = self.stats_response.borrow().clone() {
            return answer;
        }
        let collections = self.collections.borrow();
        let rows = collections.get(resource).cloned().unwrap_or_default();
        let active = rows.iter().filter(|row| row["is_active"] == true).count() as u64;
        let mut counts = BTreeMap::new();
        counts.insert("active".to_string(), active);
        counts.insert("inactive".to_string(), rows.len() as u64 - active);
        Ok(StatsDto {
            total: rows.len() as u64,
            counts,
        })
    }
}
