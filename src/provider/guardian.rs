//! Guardian content API client — the editorial provider.
//!
//! Queries `/search` for articles, `/sections` for the section taxonomy,
//! and `/tags?type=contributor` for author names. Every article request
//! asks for the expanded field set (headline, byline, thumbnail, body)
//! and contributor tags, since the default payload carries neither body
//! nor author.
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::category;
use crate::model::{
    constrained, Article, CategoryInfo, Feed, Preferences, SearchFilters, DEFAULT_CATEGORY,
    DEFAULT_QUERY, NO_TITLE, PLACEHOLDER_IMAGE, UNKNOWN_AUTHOR,
};
use crate::provider::{date_param, get_json, ProviderError, ProviderKind};

/// Expanded fields requested on every article query.
const SHOW_FIELDS: &str = "headline,byline,thumbnail,body";
const SHOW_TAGS: &str = "contributor";

/// Contributors fetched per taxonomy call.
const CONTRIBUTOR_PAGE_SIZE: &str = "50";

// ============================================================================
// Request Parameters
// ============================================================================

/// Typed parameters for `GET /search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSearchParams {
    pub q: String,
    /// Mapped section identifier.
    pub section: Option<String>,
    /// Calendar date lower bound (`YYYY-MM-DD`).
    pub from_date: Option<String>,
    /// Calendar date upper bound (`YYYY-MM-DD`).
    pub to_date: Option<String>,
}

impl ContentSearchParams {
    /// Shape parameters for an aggregated search call.
    pub fn from_filters(query: &str, filters: &SearchFilters) -> Self {
        let section = constrained(&filters.category)
            .map(|c| category::resolve(c, ProviderKind::Guardian))
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Self {
            q: if query.is_empty() { DEFAULT_QUERY.to_string() } else { query.to_string() },
            section,
            from_date: date_param(&filters.date_from),
            to_date: date_param(&filters.date_to),
        }
    }

    /// Shape parameters for a preferences-driven feed fetch.
    pub fn from_preferences(preferences: &Preferences) -> Self {
        let q = if preferences.categories.is_empty() {
            DEFAULT_QUERY.to_string()
        } else {
            preferences.categories.join(" OR ")
        };
        Self { q, ..Self::default() }
    }

    fn into_query(self, api_key: &SecretString) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("api-key", api_key.expose_secret().to_string()),
            ("q", self.q),
            ("show-fields", SHOW_FIELDS.to_string()),
            ("show-tags", SHOW_TAGS.to_string()),
        ];
        if let Some(section) = self.section {
            query.push(("section", section));
        }
        if let Some(from_date) = self.from_date {
            query.push(("from-date", from_date));
        }
        if let Some(to_date) = self.to_date {
            query.push(("to-date", to_date));
        }
        query
    }
}

// ============================================================================
// Raw Response Schema
// ============================================================================

/// One result as the content API returns it, with the expanded fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawResult {
    pub web_publication_date: Option<String>,
    pub fields: Option<RawFields>,
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFields {
    pub headline: Option<String>,
    pub byline: Option<String>,
    pub thumbnail: Option<String>,
    pub body: Option<String>,
}

/// A contributor tag. Names are split upstream; `web_title` is the
/// display form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawTag {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub web_title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSection {
    pub id: Option<String>,
    pub web_title: Option<String>,
}

/// The content API wraps every payload in a `response` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    response: Results<T>,
}

#[derive(Debug, Deserialize)]
struct Results<T> {
    #[serde(default)]
    results: Vec<T>,
}

impl<T> Default for Results<T> {
    fn default() -> Self {
        Self { results: Vec::new() }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Resolve a contributor tag into a display name: first + last name
/// trimmed, else the tag's display title, else [`UNKNOWN_AUTHOR`].
pub(crate) fn resolve_author(tags: &[RawTag]) -> String {
    let Some(tag) = tags.first() else {
        return UNKNOWN_AUTHOR.to_string();
    };

    let full_name = format!(
        "{} {}",
        tag.first_name.as_deref().unwrap_or(""),
        tag.last_name.as_deref().unwrap_or("")
    );
    let full_name = full_name.trim();
    if !full_name.is_empty() {
        return full_name.to_string();
    }

    tag.web_title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

/// Convert a raw Guardian result into the canonical shape. Total: any
/// combination of missing fields yields a fully-populated [`Article`].
///
/// `description` is always empty (the expanded field set has no distinct
/// summary) and `category` is pinned to the default — the canonical
/// vocabulary belongs to the application, not the provider, and
/// category-scoped queries constrain via the `section` request parameter
/// instead.
pub fn normalize(raw: RawResult) -> Article {
    let fields = raw.fields.unwrap_or_default();

    Article {
        id: Article::new_id(),
        title: fields
            .headline
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string()),
        description: String::new(),
        content: fields.body.unwrap_or_default(),
        published_at: raw.web_publication_date.unwrap_or_default(),
        author: resolve_author(&raw.tags),
        source: "The Guardian".to_string(),
        category: DEFAULT_CATEGORY.to_string(),
        image_url: fields
            .thumbnail
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        trending: false,
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the Guardian content API.
pub struct GuardianClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl GuardianClient {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        api_key: SecretString,
        timeout: Duration,
    ) -> Self {
        Self { http, base_url, api_key, timeout }
    }

    /// Filter-driven search against `/search`.
    pub async fn fetch_search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Article>, ProviderError> {
        let params = ContentSearchParams::from_filters(query, filters);
        self.fetch_content(params).await
    }

    /// Preference-driven feed fetch with a derived author list.
    pub async fn fetch_feed(&self, preferences: &Preferences) -> Result<Feed, ProviderError> {
        let params = ContentSearchParams::from_preferences(preferences);
        let articles = self.fetch_content(params).await?;
        Ok(Feed::from_articles(articles))
    }

    /// Provider-native section taxonomy.
    pub async fn fetch_sections(&self) -> Result<Vec<CategoryInfo>, ProviderError> {
        let url = format!("{}/sections", self.base_url);
        let query = [("api-key", self.api_key.expose_secret().to_string())];
        let envelope: Envelope<RawSection> =
            get_json(&self.http, &url, &query, self.timeout).await?;

        Ok(envelope
            .response
            .results
            .into_iter()
            .map(|s| CategoryInfo {
                id: s.id.unwrap_or_default(),
                name: s.web_title.unwrap_or_default(),
            })
            .collect())
    }

    /// Top contributor names, resolved like article authors.
    pub async fn fetch_contributors(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/tags", self.base_url);
        let query = [
            ("api-key", self.api_key.expose_secret().to_string()),
            ("type", SHOW_TAGS.to_string()),
            ("page-size", CONTRIBUTOR_PAGE_SIZE.to_string()),
        ];
        let envelope: Envelope<RawTag> = get_json(&self.http, &url, &query, self.timeout).await?;

        Ok(envelope
            .response
            .results
            .into_iter()
            .map(|tag| resolve_author(std::slice::from_ref(&tag)))
            .collect())
    }

    async fn fetch_content(
        &self,
        params: ContentSearchParams,
    ) -> Result<Vec<Article>, ProviderError> {
        let url = format!("{}/search", self.base_url);
        let query = params.into_query(&self.api_key);
        let envelope: Envelope<RawResult> = get_json(&self.http, &url, &query, self.timeout).await?;

        Ok(envelope.response.results.into_iter().map(normalize).collect())
    }
}
