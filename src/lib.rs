//! Multi-source news aggregation client.
//!
//! newsdesk queries three upstream news APIs — NewsAPI (aggregator), the
//! Guardian content API (editorial), and the New York Times article
//! search (wire-service archive) — and normalizes their incompatible
//! response shapes into one canonical [`model::Article`] record.
//!
//! Three operations are exposed through [`NewsDesk`]:
//!
//! - [`NewsDesk::search`] — fan out to every configured provider in
//!   parallel, tolerate per-provider failure, and concatenate results in
//!   fixed precedence order.
//! - [`NewsDesk::feed`] — preferences-driven fetch from the aggregator
//!   provider, with a derived author list.
//! - [`NewsDesk::taxonomy`] — provider-native sources, sections, and
//!   contributor names.
//!
//! Results are cached per operation class with distinct freshness
//! windows; providers without a configured credential are skipped
//! silently.

pub mod aggregator;
pub mod cache;
pub mod category;
pub mod config;
pub mod model;
pub mod preferences;
pub mod provider;

pub use aggregator::{FeedError, NewsDesk};
pub use config::{Config, ConfigError};
pub use model::{Article, Feed, Preferences, SearchFilters, Taxonomy};
pub use preferences::PreferenceStore;
pub use provider::{ProviderError, ProviderKind};
