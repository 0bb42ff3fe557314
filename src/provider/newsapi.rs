//! NewsAPI client — the aggregator provider.
//!
//! Queries the `/everything` search endpoint and the `/sources` listing.
//! NewsAPI returns articles from many outlets but no section taxonomy, so
//! normalized articles always carry the default category.
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::category;
use crate::model::{
    constrained, Article, Feed, Preferences, SearchFilters, SourceInfo, DEFAULT_CATEGORY,
    DEFAULT_QUERY, NO_TITLE, PLACEHOLDER_IMAGE, UNKNOWN_AUTHOR,
};
use crate::provider::{date_param, get_json, ProviderError, ProviderKind};

// ============================================================================
// Request Parameters
// ============================================================================

/// Typed parameters for `GET /everything`.
///
/// Only the fields named here ever reach the wire; `language` and `sortBy`
/// are fixed defaults attached at serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EverythingParams {
    pub q: String,
    /// Comma-joined source identifiers.
    pub sources: Option<String>,
    /// Mapped category token. The `/everything` endpoint does not act on
    /// it upstream, but the shaping is kept so a move to `/top-headlines`
    /// would not change callers.
    pub category: Option<String>,
    /// Calendar date lower bound (`YYYY-MM-DD`).
    pub from: Option<String>,
    /// Calendar date upper bound (`YYYY-MM-DD`).
    pub to: Option<String>,
}

impl EverythingParams {
    /// Shape parameters for an aggregated search call.
    pub fn from_filters(query: &str, filters: &SearchFilters) -> Self {
        let category = constrained(&filters.category)
            .map(|c| category::resolve(c, ProviderKind::NewsApi))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self {
            q: if query.is_empty() { DEFAULT_QUERY.to_string() } else { query.to_string() },
            sources: constrained(&filters.source).map(str::to_string),
            category,
            from: date_param(&filters.date_from),
            to: date_param(&filters.date_to),
        }
    }

    /// Shape parameters for a preferences-driven feed fetch.
    pub fn from_preferences(preferences: &Preferences) -> Self {
        let q = if preferences.categories.is_empty() {
            DEFAULT_QUERY.to_string()
        } else {
            preferences.categories.join(" OR ")
        };
        let sources = if preferences.sources.is_empty() {
            None
        } else {
            Some(preferences.sources.join(","))
        };

        Self { q, sources, ..Self::default() }
    }

    fn into_query(self, api_key: &SecretString) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("apiKey", api_key.expose_secret().to_string()),
            ("q", self.q),
            ("language", "en".to_string()),
            ("sortBy", "publishedAt".to_string()),
        ];
        if let Some(sources) = self.sources {
            query.push(("sources", sources));
        }
        if let Some(category) = self.category {
            query.push(("category", category));
        }
        if let Some(from) = self.from {
            query.push(("from", from));
        }
        if let Some(to) = self.to {
            query.push(("to", to));
        }
        query
    }
}

// ============================================================================
// Raw Response Schema
// ============================================================================

/// One article as NewsAPI returns it. Every field is optional — upstream
/// payloads routinely omit or null them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub author: Option<String>,
    pub source: Option<RawSource>,
    pub url_to_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EverythingResponse {
    articles: Vec<RawArticle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourcesResponse {
    sources: Vec<RawSource>,
}

// ============================================================================
// Normalization
// ============================================================================

/// Convert a raw NewsAPI article into the canonical shape. Total: any
/// combination of missing fields yields a fully-populated [`Article`].
pub fn normalize(raw: RawArticle) -> Article {
    let author = raw
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();

    Article {
        id: Article::new_id(),
        title: raw.title.filter(|t| !t.is_empty()).unwrap_or_else(|| NO_TITLE.to_string()),
        description: raw.description.unwrap_or_default(),
        content: raw.content.unwrap_or_default(),
        published_at: raw.published_at.unwrap_or_default(),
        author,
        source: raw
            .source
            .and_then(|s| s.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown Source".to_string()),
        category: DEFAULT_CATEGORY.to_string(),
        image_url: raw
            .url_to_image
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        trending: false,
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the NewsAPI aggregator.
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl NewsApiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        api_key: SecretString,
        timeout: Duration,
    ) -> Self {
        Self { http, base_url, api_key, timeout }
    }

    /// Filter-driven search against `/everything`.
    pub async fn fetch_search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Article>, ProviderError> {
        let params = EverythingParams::from_filters(query, filters);
        self.fetch_everything(params).await
    }

    /// Preference-driven feed fetch with a derived author list.
    pub async fn fetch_feed(&self, preferences: &Preferences) -> Result<Feed, ProviderError> {
        let params = EverythingParams::from_preferences(preferences);
        let articles = self.fetch_everything(params).await?;
        Ok(Feed::from_articles(articles))
    }

    /// Provider-native source listing, for the taxonomy.
    pub async fn fetch_sources(&self) -> Result<Vec<SourceInfo>, ProviderError> {
        let url = format!("{}/sources", self.base_url);
        let query = [("apiKey", self.api_key.expose_secret().to_string())];
        let response: SourcesResponse = get_json(&self.http, &url, &query, self.timeout).await?;

        Ok(response
            .sources
            .into_iter()
            .map(|s| SourceInfo {
                id: s.id.unwrap_or_default(),
                name: s.name.unwrap_or_default(),
            })
            .collect())
    }

    async fn fetch_everything(
        &self,
        params: EverythingParams,
    ) -> Result<Vec<Article>, ProviderError> {
        let url = format!("{}/everything", self.base_url);
        let query = params.into_query(&self.api_key);
        let response: EverythingResponse = get_json(&self.http, &url, &query, self.timeout).await?;

        Ok(response.articles.into_iter().map(normalize).collect())
    }
}
