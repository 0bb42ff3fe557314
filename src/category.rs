//! Canonical category vocabulary and the per-provider mapping table.
//!
//! The application speaks one category vocabulary; each provider has its
//! own. `resolve` translates a canonical category into whatever the given
//! provider calls it. Categories absent from the table pass through
//! unchanged — the provider is assumed to accept the same token.
use crate::model::CategoryInfo;
use crate::provider::ProviderKind;

struct CategoryMapping {
    canonical: &'static str,
    display: &'static str,
    newsapi: &'static str,
    guardian: &'static str,
    nyt: &'static str,
}

/// Fixed table: canonical category → provider-native value.
const CATEGORY_MAPPINGS: &[CategoryMapping] = &[
    CategoryMapping {
        canonical: "general",
        display: "General",
        newsapi: "general",
        guardian: "news",
        nyt: "news",
    },
    CategoryMapping {
        canonical: "business",
        display: "Business",
        newsapi: "business",
        guardian: "business",
        nyt: "business",
    },
    CategoryMapping {
        canonical: "technology",
        display: "Technology",
        newsapi: "technology",
        guardian: "technology",
        nyt: "technology",
    },
    CategoryMapping {
        canonical: "entertainment",
        display: "Entertainment",
        newsapi: "entertainment",
        guardian: "culture",
        nyt: "arts",
    },
    CategoryMapping {
        canonical: "health",
        display: "Health",
        newsapi: "health",
        guardian: "lifeandstyle",
        nyt: "health",
    },
    CategoryMapping {
        canonical: "science",
        display: "Science",
        newsapi: "science",
        guardian: "science",
        nyt: "science",
    },
    CategoryMapping {
        canonical: "sports",
        display: "Sports",
        newsapi: "sports",
        guardian: "sport",
        nyt: "sports",
    },
];

/// Translate a canonical category into the given provider's vocabulary.
///
/// - `""` or `"all"` → `""` (no category constraint is sent upstream)
/// - category not in the table → returned unchanged
///
/// Pure lookup; no failure modes.
pub fn resolve(category: &str, provider: ProviderKind) -> &str {
    if category.is_empty() || category == "all" {
        return "";
    }

    match CATEGORY_MAPPINGS.iter().find(|m| m.canonical == category) {
        Some(mapping) => match provider {
            ProviderKind::NewsApi => mapping.newsapi,
            ProviderKind::Guardian => mapping.guardian,
            ProviderKind::Nyt => mapping.nyt,
        },
        None => category,
    }
}

/// The canonical category vocabulary, for taxonomy listings.
pub fn canonical_categories() -> Vec<CategoryInfo> {
    CATEGORY_MAPPINGS
        .iter()
        .map(|m| CategoryInfo {
            id: m.canonical.to_string(),
            name: m.display.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entertainment_maps_per_provider() {
        assert_eq!(resolve("entertainment", ProviderKind::NewsApi), "entertainment");
        assert_eq!(resolve("entertainment", ProviderKind::Guardian), "culture");
        assert_eq!(resolve("entertainment", ProviderKind::Nyt), "arts");
    }

    #[test]
    fn test_unmapped_category_passes_through() {
        for provider in [ProviderKind::NewsApi, ProviderKind::Guardian, ProviderKind::Nyt] {
            assert_eq!(resolve("unknown-category", provider), "unknown-category");
        }
    }

    #[test]
    fn test_all_and_empty_clear_the_constraint() {
        assert_eq!(resolve("all", ProviderKind::Guardian), "");
        assert_eq!(resolve("", ProviderKind::Nyt), "");
    }

    #[test]
    fn test_health_uses_guardian_lifeandstyle() {
        assert_eq!(resolve("health", ProviderKind::Guardian), "lifeandstyle");
        assert_eq!(resolve("health", ProviderKind::Nyt), "health");
    }

    #[test]
    fn test_canonical_categories_cover_the_table() {
        let categories = canonical_categories();
        assert_eq!(categories.len(), CATEGORY_MAPPINGS.len());
        assert!(categories.iter().any(|c| c.id == "general" && c.name == "General"));
    }
}
