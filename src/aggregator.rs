//! Aggregation query engine over the configured providers.
//!
//! `search` fans out to every provider with a credential, in parallel,
//! and concatenates whatever comes back in fixed precedence order:
//! NewsAPI, then Guardian, then NYT. One provider's failure never affects
//! another's contribution — a failed branch is logged and contributes an
//! empty list. `feed` talks to the aggregator provider alone and surfaces
//! its errors. All three operations sit behind the per-operation TTL
//! caches in [`crate::cache`].
use std::time::Duration;
use thiserror::Error;

use crate::cache::{cache_key, TtlCache, FEED_TTL, SEARCH_TTL, TAXONOMY_TTL};
use crate::category;
use crate::config::Config;
use crate::model::{Article, Feed, Preferences, SearchFilters, Taxonomy, UNKNOWN_AUTHOR};
use crate::provider::{
    GuardianClient, NewsApiClient, NytClient, ProviderError, ProviderKind,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the single-provider feed fetch. Unlike aggregated search,
/// these surface to the caller — there is no second provider to fall
/// back on, and the caller owns the retry affordance.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("No aggregator credential configured — set NEWSAPI_KEY")]
    NotConfigured,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

// ============================================================================
// Provider Outcomes
// ============================================================================

/// Outcome of one provider's contribution to an aggregated call.
///
/// A failure is carried as data rather than propagated: the merged result
/// discards the reason, the log line keeps it.
#[derive(Debug)]
pub enum ProviderOutcome {
    /// Normalized results, in upstream order.
    Hit(Vec<Article>),
    /// This provider contributed nothing.
    Empty(ProviderError),
}

impl From<Result<Vec<Article>, ProviderError>> for ProviderOutcome {
    fn from(result: Result<Vec<Article>, ProviderError>) -> Self {
        match result {
            Ok(articles) => ProviderOutcome::Hit(articles),
            Err(e) => ProviderOutcome::Empty(e),
        }
    }
}

impl ProviderOutcome {
    /// Unwrap into the merged list, logging an empty contribution.
    fn into_articles(self, provider: ProviderKind) -> Vec<Article> {
        match self {
            ProviderOutcome::Hit(articles) => {
                tracing::debug!(
                    provider = %provider,
                    count = articles.len(),
                    "Provider returned results"
                );
                articles
            }
            ProviderOutcome::Empty(reason) => {
                tracing::warn!(
                    provider = %provider,
                    error = %reason,
                    "Provider contributed no results"
                );
                Vec::new()
            }
        }
    }
}

// ============================================================================
// NewsDesk
// ============================================================================

/// The aggregation client. Holds one HTTP connection pool, one client per
/// configured provider, and the per-operation caches. All state is
/// initialized once and never mutated afterwards; per-call state is local
/// to the call.
pub struct NewsDesk {
    newsapi: Option<NewsApiClient>,
    guardian: Option<GuardianClient>,
    nyt: Option<NytClient>,
    search_cache: TtlCache<Vec<Article>>,
    feed_cache: TtlCache<Feed>,
    taxonomy_cache: TtlCache<Taxonomy>,
}

impl NewsDesk {
    /// Build a client from configuration. Providers without a resolved
    /// credential are left unconfigured and silently excluded from every
    /// operation.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::new();
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let newsapi = config.resolved_newsapi_key().map(|key| {
            NewsApiClient::new(http.clone(), config.newsapi_base_url.clone(), key, timeout)
        });
        let guardian = config.resolved_guardian_key().map(|key| {
            GuardianClient::new(http.clone(), config.guardian_base_url.clone(), key, timeout)
        });
        let nyt = config.resolved_nyt_key().map(|key| {
            NytClient::new(http.clone(), config.nyt_base_url.clone(), key, timeout)
        });

        if newsapi.is_none() && guardian.is_none() && nyt.is_none() {
            tracing::warn!("No provider credentials configured; queries will return no results");
        }

        Self {
            newsapi,
            guardian,
            nyt,
            search_cache: TtlCache::new(SEARCH_TTL),
            feed_cache: TtlCache::new(FEED_TTL),
            taxonomy_cache: TtlCache::new(TAXONOMY_TTL),
        }
    }

    /// The providers that hold a credential, in precedence order.
    pub fn configured_providers(&self) -> Vec<ProviderKind> {
        let mut providers = Vec::new();
        if self.newsapi.is_some() {
            providers.push(ProviderKind::NewsApi);
        }
        if self.guardian.is_some() {
            providers.push(ProviderKind::Guardian);
        }
        if self.nyt.is_some() {
            providers.push(ProviderKind::Nyt);
        }
        providers
    }

    /// Aggregated search across all configured providers.
    ///
    /// All provider requests run concurrently and are joined once every
    /// branch has settled, so the concatenation order is fixed by
    /// provider precedence, never by response latency. A branch that
    /// fails (transport, status, decode, or timeout) contributes an
    /// empty list; an all-empty result is a valid empty list, not an
    /// error.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Vec<Article> {
        let key = cache_key("search", &(query, filters));
        if let Some(hit) = self.search_cache.get(&key) {
            tracing::debug!(query = %query, "Search served from cache");
            return hit;
        }

        let (newsapi, guardian, nyt) = tokio::join!(
            async {
                match &self.newsapi {
                    Some(client) => {
                        Some(ProviderOutcome::from(client.fetch_search(query, filters).await))
                    }
                    None => None,
                }
            },
            async {
                match &self.guardian {
                    Some(client) => {
                        Some(ProviderOutcome::from(client.fetch_search(query, filters).await))
                    }
                    None => None,
                }
            },
            async {
                match &self.nyt {
                    Some(client) => {
                        Some(ProviderOutcome::from(client.fetch_search(query, filters).await))
                    }
                    None => None,
                }
            },
        );

        let mut articles = Vec::new();
        for (provider, outcome) in [
            (ProviderKind::NewsApi, newsapi),
            (ProviderKind::Guardian, guardian),
            (ProviderKind::Nyt, nyt),
        ] {
            if let Some(outcome) = outcome {
                articles.extend(outcome.into_articles(provider));
            }
        }

        if let Some(author) = filters.author.as_deref().filter(|a| !a.is_empty()) {
            articles = filter_by_author(articles, author);
        }

        tracing::info!(query = %query, total = articles.len(), "Aggregated search complete");
        self.search_cache.insert(key, articles.clone());
        articles
    }

    /// Preferences-driven feed from the aggregator provider only.
    ///
    /// Served from cache while fresh; an identical preference set inside
    /// the freshness window costs no network call.
    pub async fn feed(&self, preferences: &Preferences) -> Result<Feed, FeedError> {
        let key = cache_key("feed", preferences);
        if let Some(hit) = self.feed_cache.get(&key) {
            tracing::debug!("Feed served from cache");
            return Ok(hit);
        }

        let client = self.newsapi.as_ref().ok_or(FeedError::NotConfigured)?;
        let feed = client.fetch_feed(preferences).await?;

        tracing::info!(
            articles = feed.articles.len(),
            authors = feed.authors.len(),
            "Feed fetch complete"
        );
        self.feed_cache.insert(key, feed.clone());
        Ok(feed)
    }

    /// Aggregate taxonomy: aggregator sources, the canonical category
    /// vocabulary plus editorial sections, and editorial contributors.
    /// Branches are isolated like search — a failed listing contributes
    /// an empty part.
    pub async fn taxonomy(&self) -> Taxonomy {
        let key = cache_key("taxonomy", &"all");
        if let Some(hit) = self.taxonomy_cache.get(&key) {
            return hit;
        }

        let (sources, sections, authors) = tokio::join!(
            async {
                match &self.newsapi {
                    Some(client) => client.fetch_sources().await.unwrap_or_else(|e| {
                        tracing::warn!(provider = %ProviderKind::NewsApi, error = %e, "Source listing failed");
                        Vec::new()
                    }),
                    None => Vec::new(),
                }
            },
            async {
                match &self.guardian {
                    Some(client) => client.fetch_sections().await.unwrap_or_else(|e| {
                        tracing::warn!(provider = %ProviderKind::Guardian, error = %e, "Section listing failed");
                        Vec::new()
                    }),
                    None => Vec::new(),
                }
            },
            async {
                match &self.guardian {
                    Some(client) => client.fetch_contributors().await.unwrap_or_else(|e| {
                        tracing::warn!(provider = %ProviderKind::Guardian, error = %e, "Contributor listing failed");
                        Vec::new()
                    }),
                    None => Vec::new(),
                }
            },
        );

        let mut categories = category::canonical_categories();
        categories.extend(sections);

        let taxonomy = Taxonomy { sources, categories, authors };
        self.taxonomy_cache.insert(key, taxonomy.clone());
        taxonomy
    }
}

/// Keep articles whose author partially matches the filter.
///
/// Matching is case-insensitive substring; the sentinel author is never a
/// match, compared exactly like everywhere else in the crate.
fn filter_by_author(articles: Vec<Article>, author: &str) -> Vec<Article> {
    let needle = author.to_lowercase();
    articles
        .into_iter()
        .filter(|a| a.author != UNKNOWN_AUTHOR && a.author.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_CATEGORY, PLACEHOLDER_IMAGE};
    use pretty_assertions::assert_eq;

    fn article(author: &str) -> Article {
        Article {
            id: Article::new_id(),
            title: "T".to_string(),
            description: String::new(),
            content: String::new(),
            published_at: String::new(),
            author: author.to_string(),
            source: "S".to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            trending: false,
        }
    }

    #[test]
    fn test_author_filter_is_case_insensitive_partial_match() {
        let articles = vec![article("Jane Doe"), article("John Smith")];
        let filtered = filter_by_author(articles, "jane");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].author, "Jane Doe");
    }

    #[test]
    fn test_author_filter_never_matches_the_sentinel() {
        let articles = vec![article("Unknown"), article("Jane Doe")];
        // "unknown" as a needle would substring-match the sentinel; the
        // exact-comparison guard keeps it out
        let filtered = filter_by_author(articles, "unknown");
        assert!(filtered.is_empty());
    }

    #[tokio::test]
    async fn test_search_with_no_providers_is_empty() {
        let desk = NewsDesk::new(&Config::default());
        assert!(desk.configured_providers().is_empty());

        let articles = desk.search("anything", &SearchFilters::default()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_feed_without_aggregator_credential_errors() {
        let desk = NewsDesk::new(&Config::default());
        let result = desk.feed(&Preferences::default()).await;
        assert!(matches!(result, Err(FeedError::NotConfigured)));
    }

    #[test]
    fn test_configured_providers_in_precedence_order() {
        let config = Config {
            guardian_key: Some("g".to_string()),
            nyt_key: Some("n".to_string()),
            ..Config::default()
        };
        let desk = NewsDesk::new(&config);
        assert_eq!(
            desk.configured_providers(),
            vec![ProviderKind::Guardian, ProviderKind::Nyt]
        );
    }
}
