//! Server-driven list views: transport, shared page cache, list controller,
//! aggregate statistics and the Leptos hooks binding them to components.

pub mod cache;
pub mod client;
pub mod controller;
pub mod error;
pub mod hooks;
pub mod stats;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{FetchState, QueryCache};
pub use client::QueryClient;
pub use controller::{ListController, ListView};
pub use error::{FetchError, ServerErrorKind};
pub use hooks::{provide_query_client, use_aggregate_stats, use_list_view, use_query_client};
pub use stats::{AggregateSnapshot, Categorizer, StatsConfig, StatsSource};
pub use transport::{CollectionApi, HttpCollectionApi, Page};
