//! Canonical data model shared across all providers.
//!
//! Every upstream API returns its own shape; the normalizers in
//! `crate::provider` convert each of them into [`Article`]. After
//! normalization, every field is present — downstream code never has to
//! handle a missing title, author, or image.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel author name used when a provider supplies no identifiable author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Placeholder image path used when a provider supplies no image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Category assigned when a provider exposes no native section.
pub const DEFAULT_CATEGORY: &str = "General";

/// Title placeholder for articles arriving without a headline.
pub const NO_TITLE: &str = "No Title";

/// Query term sent upstream when neither the caller nor the preferences
/// supply one.
pub const DEFAULT_QUERY: &str = "news";

// ============================================================================
// Article
// ============================================================================

/// One normalized news article, immutable after construction.
///
/// The `id` is generated at normalization time — provider responses carry
/// no stable cross-system identifier, and reusing provider ids would risk
/// collisions once results from several providers are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    /// ISO-8601 timestamp, verbatim from the provider, or empty if absent.
    pub published_at: String,
    /// Resolved author name; [`UNKNOWN_AUTHOR`] when none could be derived.
    pub author: String,
    /// Human-readable outlet or provider name.
    pub source: String,
    /// Canonical category; [`DEFAULT_CATEGORY`] when the provider has none.
    pub category: String,
    pub image_url: String,
    /// Application-level derived state; always `false` at normalization.
    pub trending: bool,
}

impl Article {
    /// Generate a fresh globally-unique article id.
    pub(crate) fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

// ============================================================================
// Query Inputs
// ============================================================================

/// Filters applied to an aggregated search.
///
/// Empty strings mean "unconstrained"; for `source` and `category` the
/// literal `"all"` is treated the same as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: String,
    pub source: String,
    pub category: String,
    pub author: Option<String>,
    /// Inclusive lower date bound, ISO-8601 (time component ignored).
    pub date_from: String,
    /// Inclusive upper date bound, ISO-8601 (time component ignored).
    pub date_to: String,
}

/// Treats `""` and `"all"` as an absent constraint.
pub(crate) fn constrained(value: &str) -> Option<&str> {
    if value.is_empty() || value == "all" {
        None
    } else {
        Some(value)
    }
}

/// User-selected sources, categories, and authors.
///
/// Empty lists mean "no preference" — the provider receives a generic
/// default query instead of a constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub sources: Vec<String>,
    pub categories: Vec<String>,
    pub authors: Vec<String>,
}

// ============================================================================
// Query Outputs
// ============================================================================

/// Result of a preferences-driven feed fetch: the articles plus the
/// distinct author names that appear in them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub articles: Vec<Article>,
    pub authors: Vec<String>,
}

impl Feed {
    /// Build a feed from normalized articles, deriving the author list.
    ///
    /// Authors are deduplicated in order of first appearance. The sentinel
    /// [`UNKNOWN_AUTHOR`] is excluded by exact, case-sensitive comparison —
    /// the one comparison rule used everywhere in this crate.
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let mut authors: Vec<String> = Vec::new();
        for article in &articles {
            if article.author != UNKNOWN_AUTHOR && !authors.contains(&article.author) {
                authors.push(article.author.clone());
            }
        }
        Self { articles, authors }
    }
}

/// A provider-native source, as listed by the aggregator API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
}

/// A selectable category, canonical or provider-native.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
}

/// Aggregate taxonomy: sources, categories, and contributor names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub sources: Vec<SourceInfo>,
    pub categories: Vec<CategoryInfo>,
    pub authors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_feed_authors_deduplicated_in_first_appearance_order() {
        let feed = Feed::from_articles(vec![
            article("Alice"),
            article("Bob"),
            article("Alice"),
            article("Carol"),
        ]);
        assert_eq!(feed.authors, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_feed_authors_exclude_unknown_exactly() {
        let feed = Feed::from_articles(vec![
            article("Unknown"),
            article("Alice"),
            // Case differs from the sentinel, so this one is kept
            article("unknown"),
        ]);
        assert_eq!(feed.authors, vec!["Alice", "unknown"]);
    }

    #[test]
    fn test_feed_from_empty_articles() {
        let feed = Feed::from_articles(Vec::new());
        assert!(feed.articles.is_empty());
        assert!(feed.authors.is_empty());
    }

    #[test]
    fn test_constrained_treats_all_and_empty_as_none() {
        assert_eq!(constrained(""), None);
        assert_eq!(constrained("all"), None);
        assert_eq!(constrained("business"), Some("business"));
    }

    #[test]
    fn test_article_ids_are_unique() {
        assert_ne!(Article::new_id(), Article::new_id());
    }
}
