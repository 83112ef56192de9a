use contracts::shared::api_response::{ApiMessageResponse, StatsDto};
use contracts::shared::list_query::ListQuery;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

use super::cache::{PageResult, QueryCache};
use super::error::FetchError;
use super::transport::{CollectionApi, Page};

/// Entry point for list views: reads go through the shared cache, and every
/// successful mutation invalidates the cached pages of its resource.
#[derive(Clone)]
pub struct QueryClient {
    api: Rc<dyn CollectionApi>,
    cache: QueryCache,
}

impl QueryClient {
    pub fn new(api: Rc<dyn CollectionApi>) -> Self {
        let cache = QueryCache::new(api.clone());
        Self { api, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn read(&self, resource: &str, query: &ListQuery) -> PageResult {
        self.cache.read(resource, query).await
    }

    pub async fn read_typed<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, FetchError> {
        self.cache.read(resource, query).await?.decode()
    }

    pub async fn get<T: DeserializeOwned>(&self, resource: &str, id: &str) -> Result<T, FetchError> {
        let value = self.api.get(resource, id).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Unknown(e.to_string()))
    }

    /// Not cached: the aggregate endpoint is hit once per mount.
    pub async fn stats(&self, resource: &str) -> Result<StatsDto, FetchError> {
        self.api.stats(resource).await
    }

    pub async fn create<B: Serialize>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<ApiMessageResponse, FetchError> {
        let body = encode(body)?;
        let response = self.api.create(resource, &body).await?;
        self.cache.invalidate(resource);
        Ok(response)
    }

    pub async fn update<B: Serialize>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
    ) -> Result<ApiMessageResponse, FetchError> {
        let body = encode(body)?;
        let response = self.api.update(resource, id, &body).await?;
        self.cache.invalidate(resource);
        Ok(response)
    }

    pub async fn delete(&self, resource: &str, id: &str) -> Result<ApiMessageResponse, FetchError> {
        let response = self.api.delete(resource, id).await?;
        self.cache.invalidate(resource);
        Ok(response)
    }
}

fn encode<B: Serialize>(body: &B) -> Result<serde_json::Value, FetchError> {
    serde_json::to_value(body).map_err(|e| FetchError::Unknown(format!("request encode failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::query::testing::{rows, FakeApi, TestRow};
    use futures::executor::block_on;
    use serde_json::json;

    fn setup() -> (Rc<FakeApi>, QueryClient) {
        let api = Rc::new(FakeApi::new());
        api.seed("suppliers", rows(12));
        let client = QueryClient::new(api.clone());
        (api, client)
    }

    #[test]
    fn test_delete_invalidates_cached_pages() {
        let (api, client) = setup();
        let query = ListQuery::new(10);

        let before = block_on(client.read_typed::<TestRow>("suppliers", &query)).unwrap();
        assert_eq!(before.total_count, 12);

        block_on(client.delete("suppliers", "1")).unwrap();
        let after = block_on(client.read_typed::<TestRow>("suppliers", &query)).unwrap();

        assert_eq!(after.total_count, 11);
        assert_ne!(after.rows[0].id, "1");
        assert_eq!(api.list_calls(), 2);
    }

    #[test]
    fn test_create_and_update_invalidate() {
        let (api, client) = setup();
        let query = ListQuery::new(50);

        block_on(client.read("suppliers", &query)).unwrap();
        let created = block_on(client.create(
            "suppliers",
            &json!({ "code": "C999", "is_active": true }),
        ))
        .unwrap();
        let page = block_on(client.read("suppliers", &query)).unwrap();
        assert_eq!(page.total_count, 13);

        let id = created.id.unwrap();
        block_on(client.update(
            "suppliers",
            &id,
            &json!({ "code": "C999", "is_active": false }),
        ))
        .unwrap();
        let row: TestRow = block_on(client.get("suppliers", &id)).unwrap();
        assert!(!row.is_active);
        block_on(client.read("suppliers", &query)).unwrap();
        assert_eq!(api.list_calls(), 3);
    }

    #[test]
    fn test_failed_mutation_keeps_cache() {
        let (api, client) = setup();
        let query = ListQuery::new(10);

        block_on(client.read("suppliers", &query)).unwrap();
        api.fail_with(Some(FetchError::Unauthorized));
        assert_eq!(
            block_on(client.delete("suppliers", "1")),
            Err(FetchError::Unauthorized)
        );
        api.fail_with(None);

        block_on(client.read("suppliers", &query)).unwrap();
        assert_eq!(api.list_calls(), 1);
    }

    #[test]
    fn test_decode_mismatch_is_unknown() {
        let (api, client) = setup();
        api.seed("suppliers", vec![json!({ "id": 7 })]);
        let result = block_on(client.read_typed::<TestRow>("suppliers", &ListQuery::new(10)));
        assert!(matches!(result, Err(FetchError::Unknown(_))));
    }
}
