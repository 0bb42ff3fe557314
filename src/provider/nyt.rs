//! New York Times article-search client — the wire-service provider.
//!
//! Queries `/articlesearch.json`. Date bounds use the archive's compact
//! numeric form (`YYYYMMDD`) and category constraints are expressed as a
//! filter-query (`fq`) on the section name. Multimedia paths come back
//! relative to the public site root.
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::category;
use crate::model::{
    constrained, Article, Feed, Preferences, SearchFilters, DEFAULT_CATEGORY, DEFAULT_QUERY,
    NO_TITLE, PLACEHOLDER_IMAGE, UNKNOWN_AUTHOR,
};
use crate::provider::{compact_date, get_json, ProviderError, ProviderKind};

/// Public site root, prefixed onto relative multimedia paths.
const SITE_ROOT: &str = "https://www.nytimes.com";

// ============================================================================
// Request Parameters
// ============================================================================

/// Typed parameters for `GET /articlesearch.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleSearchParams {
    pub q: String,
    /// Filter-query expression, e.g. `section_name:arts`.
    pub fq: Option<String>,
    /// Compact lower date bound (`YYYYMMDD`).
    pub begin_date: Option<String>,
    /// Compact upper date bound (`YYYYMMDD`).
    pub end_date: Option<String>,
    /// Result page, used by the feed fetch.
    pub page: Option<u32>,
}

impl ArticleSearchParams {
    /// Shape parameters for an aggregated search call.
    pub fn from_filters(query: &str, filters: &SearchFilters) -> Self {
        let fq = constrained(&filters.category)
            .map(|c| category::resolve(c, ProviderKind::Nyt))
            .filter(|c| !c.is_empty())
            .map(|section| format!("section_name:{section}"));

        Self {
            q: if query.is_empty() { DEFAULT_QUERY.to_string() } else { query.to_string() },
            fq,
            begin_date: compact_date_param(&filters.date_from),
            end_date: compact_date_param(&filters.date_to),
            page: None,
        }
    }

    /// Shape parameters for a preferences-driven feed fetch.
    pub fn from_preferences(preferences: &Preferences) -> Self {
        let q = if preferences.categories.is_empty() {
            DEFAULT_QUERY.to_string()
        } else {
            preferences.categories.join(" OR ")
        };
        Self { q, page: Some(0), ..Self::default() }
    }

    fn into_query(self, api_key: &SecretString) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("api-key", api_key.expose_secret().to_string()),
            ("q", self.q),
            ("sort", "newest".to_string()),
        ];
        if let Some(fq) = self.fq {
            query.push(("fq", fq));
        }
        if let Some(begin_date) = self.begin_date {
            query.push(("begin_date", begin_date));
        }
        if let Some(end_date) = self.end_date {
            query.push(("end_date", end_date));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        query
    }
}

fn compact_date_param(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(compact_date(value))
    }
}

// ============================================================================
// Raw Response Schema
// ============================================================================

/// One document as the article-search API returns it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDoc {
    pub headline: Option<RawHeadline>,
    pub snippet: Option<String>,
    pub pub_date: Option<String>,
    pub byline: Option<RawByline>,
    pub section_name: Option<String>,
    pub multimedia: Vec<RawMultimedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHeadline {
    pub main: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawByline {
    pub original: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMultimedia {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    response: DocsEnvelope,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocsEnvelope {
    docs: Vec<RawDoc>,
}

// ============================================================================
// Normalization
// ============================================================================

/// Convert a raw article-search document into the canonical shape. Total:
/// any combination of missing fields yields a fully-populated [`Article`].
///
/// The snippet fills both `description` and `content` — this shape has no
/// separate body. The image URL is built only when at least one
/// multimedia asset carries a path.
pub fn normalize(raw: RawDoc) -> Article {
    let image_url = raw
        .multimedia
        .first()
        .and_then(|m| m.url.as_deref())
        .filter(|u| !u.is_empty())
        .map(|path| format!("{SITE_ROOT}/{path}"))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let snippet = raw.snippet.unwrap_or_default();

    Article {
        id: Article::new_id(),
        title: raw
            .headline
            .and_then(|h| h.main)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string()),
        description: snippet.clone(),
        content: snippet,
        published_at: raw.pub_date.unwrap_or_default(),
        author: raw
            .byline
            .and_then(|b| b.original)
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        source: "New York Times".to_string(),
        category: raw
            .section_name
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        image_url,
        trending: false,
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the NYT article-search API.
pub struct NytClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl NytClient {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        api_key: SecretString,
        timeout: Duration,
    ) -> Self {
        Self { http, base_url, api_key, timeout }
    }

    /// Filter-driven search against `/articlesearch.json`.
    pub async fn fetch_search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<Article>, ProviderError> {
        let params = ArticleSearchParams::from_filters(query, filters);
        self.fetch_docs(params).await
    }

    /// Preference-driven feed fetch with a derived author list.
    pub async fn fetch_feed(&self, preferences: &Preferences) -> Result<Feed, ProviderError> {
        let params = ArticleSearchParams::from_preferences(preferences);
        let articles = self.fetch_docs(params).await?;
        Ok(Feed::from_articles(articles))
    }

    async fn fetch_docs(&self, params: ArticleSearchParams) -> Result<Vec<Article>, ProviderError> {
        let url = format!("{}/articlesearch.json", self.base_url);
        let query = params.into_query(&self.api_key);
        let response: SearchResponse = get_json(&self.http, &url, &query, self.timeout).await?;

        Ok(response.response.docs.into_iter().map(normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: String) -> NytClient {
        NytClient::new(
            reqwest::Client::new(),
            base_url,
            SecretString::from("test-key"),
            Duration::from_secs(5),
        )
    }

    // ------------------------------------------------------------------
    // Parameter shaping
    // ------------------------------------------------------------------

    #[test]
    fn test_params_compact_dates_and_fq() {
        let filters = SearchFilters {
            category: "entertainment".to_string(),
            date_from: "2024-01-01T00:00:00Z".to_string(),
            date_to: "2024-01-31".to_string(),
            ..SearchFilters::default()
        };
        let params = ArticleSearchParams::from_filters("opera", &filters);
        assert_eq!(params.q, "opera");
        assert_eq!(params.fq.as_deref(), Some("section_name:arts"));
        assert_eq!(params.begin_date.as_deref(), Some("20240101"));
        assert_eq!(params.end_date.as_deref(), Some("20240131"));
    }

    #[test]
    fn test_params_unmapped_category_passes_through() {
        let filters = SearchFilters {
            category: "obituaries".to_string(),
            ..SearchFilters::default()
        };
        let params = ArticleSearchParams::from_filters("", &filters);
        assert_eq!(params.fq.as_deref(), Some("section_name:obituaries"));
    }

    #[test]
    fn test_params_from_preferences_sets_page() {
        let preferences = Preferences {
            categories: vec!["science".to_string(), "health".to_string()],
            ..Preferences::default()
        };
        let params = ArticleSearchParams::from_preferences(&preferences);
        assert_eq!(params.q, "science OR health");
        assert_eq!(params.page, Some(0));
        assert_eq!(params.fq, None);
    }

    // ------------------------------------------------------------------
    // Normalization
    // ------------------------------------------------------------------

    #[test]
    fn test_normalize_snippet_fills_description_and_content() {
        let raw = RawDoc {
            headline: Some(RawHeadline { main: Some("Title".to_string()) }),
            snippet: Some("Summary text".to_string()),
            pub_date: Some("2024-02-02T00:00:00Z".to_string()),
            byline: Some(RawByline { original: Some("By Someone".to_string()) }),
            section_name: Some("Science".to_string()),
            multimedia: vec![RawMultimedia { url: Some("images/2024/photo.jpg".to_string()) }],
        };
        let article = normalize(raw);
        assert_eq!(article.description, "Summary text");
        assert_eq!(article.content, "Summary text");
        assert_eq!(article.author, "By Someone");
        assert_eq!(article.category, "Science");
        assert_eq!(article.source, "New York Times");
        assert_eq!(article.image_url, "https://www.nytimes.com/images/2024/photo.jpg");
    }

    #[test]
    fn test_normalize_no_multimedia_uses_placeholder() {
        let raw = RawDoc {
            headline: Some(RawHeadline { main: Some("X".to_string()) }),
            ..RawDoc::default()
        };
        assert_eq!(normalize(raw).image_url, "/placeholder.svg");
    }

    #[test]
    fn test_normalize_missing_everything() {
        let article = normalize(RawDoc::default());
        assert_eq!(article.title, "No Title");
        assert_eq!(article.author, "Unknown");
        assert_eq!(article.category, "General");
        assert_eq!(article.published_at, "");
        assert_eq!(article.image_url, "/placeholder.svg");
    }

    #[test]
    fn test_normalize_empty_byline_is_unknown() {
        let raw = RawDoc {
            byline: Some(RawByline { original: Some(String::new()) }),
            ..RawDoc::default()
        };
        assert_eq!(normalize(raw).author, "Unknown");
    }

    // ------------------------------------------------------------------
    // Totality
    // ------------------------------------------------------------------

    proptest::proptest! {
        #[test]
        fn test_normalize_is_total(
            main in proptest::option::of(".*"),
            snippet in proptest::option::of(".*"),
            pub_date in proptest::option::of(".*"),
            original in proptest::option::of(".*"),
            section_name in proptest::option::of(".*"),
            multimedia_urls in proptest::collection::vec(proptest::option::of(".*"), 0..3),
        ) {
            let raw = RawDoc {
                headline: Some(RawHeadline { main }),
                snippet,
                pub_date,
                byline: Some(RawByline { original }),
                section_name,
                multimedia: multimedia_urls
                    .into_iter()
                    .map(|url| RawMultimedia { url })
                    .collect(),
            };
            let article = normalize(raw);
            proptest::prop_assert!(!article.title.is_empty());
            proptest::prop_assert!(!article.author.is_empty());
            proptest::prop_assert!(!article.category.is_empty());
            proptest::prop_assert!(!article.image_url.is_empty());
            proptest::prop_assert_eq!(article.description, article.content);
        }
    }

    // ------------------------------------------------------------------
    // HTTP
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_search_sends_sort_and_dates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articlesearch.json"))
            .and(query_param("sort", "newest"))
            .and(query_param("begin_date", "20240101"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {
                    "docs": [
                        {
                            "headline": {"main": "Doc"},
                            "snippet": "S",
                            "section_name": "World"
                        }
                    ]
                }
            })))
            .mount(&mock_server)
            .await;

        let filters = SearchFilters {
            date_from: "2024-01-01".to_string(),
            ..SearchFilters::default()
        };
        let client = test_client(mock_server.uri());
        let articles = client.fetch_search("war", &filters).await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Doc");
        assert_eq!(articles[0].category, "World");
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response": {"docs": []}}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = NytClient::new(
            reqwest::Client::new(),
            mock_server.uri(),
            SecretString::from("test-key"),
            Duration::from_millis(50),
        );
        let result = client.fetch_search("x", &SearchFilters::default()).await;
        assert!(matches!(result, Err(ProviderError::Timeout(_))));
    }
}
