//! Category counts for dashboard cards.
//!
//! The preferred source is the `/<resource>/stats` endpoint, which counts on
//! the server. The fallback reads one oversized page (`fetch_limit` rows)
//! and counts it on the client; when the collection is larger than that page
//! the snapshot only covers the fetched rows and reports itself as
//! approximate.

use contracts::shared::api_response::StatsDto;
use contracts::shared::list_query::ListQuery;
use serde::de::DeserializeOwned;
use std::rc::Rc;

use super::client::QueryClient;
use super::error::FetchError;

pub const DEFAULT_STATS_FETCH_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsConfig {
    /// Page size of the fallback fetch.
    pub fetch_limit: u32,
    /// Ask the aggregate endpoint before falling back to client-side counting.
    pub prefer_endpoint: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            fetch_limit: DEFAULT_STATS_FETCH_LIMIT,
            prefer_endpoint: true,
        }
    }
}

/// Named predicate over a row. Predicates are not required to be mutually
/// exclusive; overlapping ones count the same row twice.
pub struct Categorizer<T> {
    pub label: String,
    predicate: Rc<dyn Fn(&T) -> bool>,
}

impl<T> Clone for Categorizer<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> Categorizer<T> {
    pub fn new(label: impl Into<String>, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        Self {
            label: label.into(),
            predicate: Rc::new(predicate),
        }
    }

    pub fn matches(&self, row: &T) -> bool {
        (self.predicate)(row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    Endpoint,
    ClientReduce,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSnapshot {
    /// Counts in categorizer order.
    pub counts: Vec<(String, u64)>,
    /// Rows the counts were computed from.
    pub fetched: u64,
    /// Size of the whole collection as reported by the server.
    pub total: u64,
    pub source: StatsSource,
}

impl AggregateSnapshot {
    pub fn count(&self, label: &str) -> Option<u64> {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    /// True when the counts cover only part of the collection.
    pub fn is_approximate(&self) -> bool {
        self.source == StatsSource::ClientReduce && self.fetched < self.total
    }

    pub fn reduce<T>(rows: &[T], total: u64, categorizers: &[Categorizer<T>]) -> Self {
        let counts = categorizers
            .iter()
            .map(|c| {
                let count = rows.iter().filter(|row| c.matches(row)).count() as u64;
                (c.label.clone(), count)
            })
            .collect();
        Self {
            counts,
            fetched: rows.len() as u64,
            total,
            source: StatsSource::ClientReduce,
        }
    }

    /// `None` when the endpoint does not know one of the labels.
    pub fn from_endpoint<T>(dto: &StatsDto, categorizers: &[Categorizer<T>]) -> Option<Self> {
        let counts = categorizers
            .iter()
            .map(|c| dto.counts.get(&c.label).map(|count| (c.label.clone(), *count)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            counts,
            fetched: dto.total,
            total: dto.total,
            source: StatsSource::Endpoint,
        })
    }
}

pub async fn derive_stats<T>(
    client: &QueryClient,
    resource: &str,
    categorizers: &[Categorizer<T>],
    config: StatsConfig,
) -> Result<AggregateSnapshot, FetchError>
where
    T: DeserializeOwned,
{
    if config.prefer_endpoint {
        match client.stats(resource).await {
            Ok(dto) => match AggregateSnapshot::from_endpoint(&dto, categorizers) {
                Some(snapshot) => return Ok(snapshot),
                None => log::debug!(
                    "stats endpoint of {} lacks requested labels, counting on the client",
                    resource
                ),
            },
            Err(FetchError::Unauthorized) => return Err(FetchError::Unauthorized),
            Err(err) => log::warn!(
                "stats endpoint of {} failed ({}), counting on the client",
                resource,
                err
            ),
        }
    }

    let query = ListQuery::new(config.fetch_limit.max(1));
    let page = client.read_typed::<T>(resource, &query).await?;
    let snapshot = AggregateSnapshot::reduce(&page.rows, page.total_count, categorizers);
    if snapshot.is_approximate() {
        log::warn!(
            "{} stats cover {} of {} rows; raise fetch_limit or use the stats endpoint",
            resource,
            snapshot.fetched,
            snapshot.total
        );
    }
    Ok(snapshot)
}
