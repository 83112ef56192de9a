//! Remote collection endpoint client.
//!
//! `CollectionApi` is the seam between the query layer and the network:
//! the cache and the mutation helpers only ever talk to this trait, so
//! tests swap in an in-memory implementation.

use async_trait::async_trait;
use contracts::shared::api_response::{
    ApiItemResponse, ApiListResponse, ApiMessageResponse, StatsDto,
};
use contracts::shared::list_query::ListQuery;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::FetchError;
use crate::system::auth::storage;

/// One page of a collection together with the size of the whole
/// (search/filter-matching) result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub total_count: u64,
}

impl<R> Page<R> {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            total_count: 0,
        }
    }
}

impl Page<Value> {
    /// Decodes the raw rows into the resource row type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Page<T>, FetchError> {
        let rows = self
            .rows
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| FetchError::Unknown(format!("row decode failed: {}", e)))?;
        Ok(Page {
            rows,
            total_count: self.total_count,
        })
    }
}

#[async_trait(?Send)]
pub trait CollectionApi {
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<Page<Value>, FetchError>;

    async fn get(&self, resource: &str, id: &str) -> Result<Value, FetchError>;

    async fn create(&self, resource: &str, body: &Value) -> Result<ApiMessageResponse, FetchError>;

    async fn update(
        &self,
        resource: &str,
        id: &str,
        body: &Value,
    ) -> Result<ApiMessageResponse, FetchError>;

    async fn delete(&self, resource: &str, id: &str) -> Result<ApiMessageResponse, FetchError>;

    /// Exact counts from the aggregate endpoint.
    async fn stats(&self, resource: &str) -> Result<StatsDto, FetchError>;
}

/// `CollectionApi` over HTTP/JSON using `gloo-net`.
#[derive(Debug, Clone)]
pub struct HttpCollectionApi {
    base: String,
}

impl HttpCollectionApi {
    /// `base` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn collection_url(&self, resource: &str, query: &ListQuery) -> String {
        let query_string = query
            .to_query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/{}?{}", self.base, resource, query_string)
    }

    pub fn item_url(&self, resource: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base, resource, urlencoding::encode(id))
    }

    pub fn stats_url(&self, resource: &str) -> String {
        format!("{}/{}/stats", self.base, resource)
    }
}

fn auth_header() -> Result<String, FetchError> {
    storage::get_access_token()
        .map(|token| format!("Bearer {}", token))
        .ok_or(FetchError::Unauthorized)
}

async fn send(builder: RequestBuilder) -> Result<(u16, String), FetchError> {
    let response: Response = builder
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    Ok((status, body))
}

async fn send_json(request: Result<Request, gloo_net::Error>) -> Result<(u16, String), FetchError> {
    let request = request.map_err(|e| FetchError::Unknown(format!("request encode failed: {}", e)))?;
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    Ok((status, body))
}

/// Turns a raw HTTP answer into the typed envelope, classifying failures.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, FetchError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiMessageResponse>(body)
            .ok()
            .map(|m| m.message)
            .filter(|m| !m.trim().is_empty());
        return Err(FetchError::from_status(status, message));
    }
    serde_json::from_str(body).map_err(|e| FetchError::Unknown(e.to_string()))
}

/// A 2xx answer can still carry `status: false`.
fn ensure_status(ok: bool, message: &str, status: u16) -> Result<(), FetchError> {
    if ok {
        Ok(())
    } else {
        Err(FetchError::Server {
            kind: super::error::ServerErrorKind::Generic,
            status,
            message: message.to_string(),
        })
    }
}

pub fn decode_list(status: u16, body: &str) -> Result<Page<Value>, FetchError> {
    let envelope: ApiListResponse<Value> = decode_response(status, body)?;
    ensure_status(envelope.status, &envelope.message, status)?;
    Ok(Page {
        rows: envelope.data,
        total_count: envelope.pagination.total,
    })
}

pub fn decode_message(status: u16, body: &str) -> Result<ApiMessageResponse, FetchError> {
    let envelope: ApiMessageResponse = decode_response(status, body)?;
    ensure_status(envelope.status, &envelope.message, status)?;
    Ok(envelope)
}

fn decode_item<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, FetchError> {
    let envelope: ApiItemResponse<T> = decode_response(status, body)?;
    ensure_status(envelope.status, &envelope.message, status)?;
    Ok(envelope.data)
}

#[async_trait(?Send)]
impl CollectionApi for HttpCollectionApi {
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<Page<Value>, FetchError> {
        let url = self.collection_url(resource, query);
        log::debug!("GET {}", url);
        let (status, body) = send(Request::get(&url)).await?;
        decode_list(status, &body)
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value, FetchError> {
        let (status, body) = send(Request::get(&self.item_url(resource, id))).await?;
        decode_item(status, &body)
    }

    async fn create(&self, resource: &str, body: &Value) -> Result<ApiMessageResponse, FetchError> {
        let request = Request::post(&format!("{}/{}", self.base, resource))
            .header("Authorization", &auth_header()?)
            .json(body);
        let (status, body) = send_json(request).await?;
        decode_message(status, &body)
    }

    async fn update(
        &self,
        resource: &str,
        id: &str,
        body: &Value,
    ) -> Result<ApiMessageResponse, FetchError> {
        let request = Request::put(&self.item_url(resource, id))
            .header("Authorization", &auth_header()?)
            .json(body);
        let (status, body) = send_json(request).await?;
        decode_message(status, &body)
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<ApiMessageResponse, FetchError> {
        let (status, body) = send(Request::delete(&self.item_url(resource, id))).await?;
        decode_message(status, &body)
    }

    async fn stats(&self, resource: &str) -> Result<StatsDto, FetchError> {
        let (status, body) = send(Request::get(&self.stats_url(resource))).await?;
        decode_item(status, &body)
    }
}
