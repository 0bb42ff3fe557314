use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use newsdesk::model::SearchFilters;
use newsdesk::{Config, NewsDesk, PreferenceStore};

/// Get the config directory path (~/.config/newsdesk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdesk"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Multi-source news aggregation client")]
struct Args {
    /// Path to config.toml (defaults to ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search all configured providers
    Search {
        /// Search query term
        query: String,
        /// Constrain to one provider-native source id
        #[arg(long, default_value = "")]
        source: String,
        /// Constrain to a canonical category
        #[arg(long, default_value = "")]
        category: String,
        /// Keep only articles whose author matches (partial, case-insensitive)
        #[arg(long)]
        author: Option<String>,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        from: String,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        to: String,
    },
    /// Fetch the preferences-driven feed
    Feed,
    /// List provider sources, categories, and contributors
    Taxonomy,
    /// Show or update stored preferences
    Prefs {
        /// Comma-separated source ids to store (omit to leave unchanged)
        #[arg(long, value_delimiter = ',')]
        sources: Option<Vec<String>>,
        /// Comma-separated canonical categories to store
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
        /// Comma-separated author names to store
        #[arg(long, value_delimiter = ',')]
        authors: Option<Vec<String>>,
        /// Reset all preferences to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Reject malformed CLI date bounds before they reach a provider.
fn validate_date(flag: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .with_context(|| format!("--{flag} must be a YYYY-MM-DD date, got '{value}'"))
}

fn print_articles(articles: &[newsdesk::Article], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(articles)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for article in articles {
        let date = DateTime::parse_from_rfc3339(&article.published_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| article.published_at.clone());
        println!("{:<12} {:<20} {}", date, article.source, article.title);
        if article.author != "Unknown" {
            println!("{:>12} by {}", "", article.author);
        }
    }
    println!("\n{} articles", articles.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)?;
    let store = PreferenceStore::new(config_dir);

    match args.command {
        Command::Search { query, source, category, author, from, to } => {
            validate_date("from", &from)?;
            validate_date("to", &to)?;

            let desk = NewsDesk::new(&config);
            if desk.configured_providers().is_empty() {
                eprintln!("Warning: no provider credentials configured.");
                eprintln!("Set NEWSAPI_KEY, GUARDIAN_API_KEY, or NYT_API_KEY.");
            }

            let filters = SearchFilters {
                query: query.clone(),
                source,
                category,
                author,
                date_from: from,
                date_to: to,
            };
            let articles = desk.search(&query, &filters).await;
            print_articles(&articles, args.json)?;
        }

        Command::Feed => {
            let desk = NewsDesk::new(&config);
            let preferences = store.load();
            let feed = desk
                .feed(&preferences)
                .await
                .context("Feed fetch failed — retry or check the aggregator credential")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&feed)?);
            } else {
                print_articles(&feed.articles, false)?;
                if !feed.authors.is_empty() {
                    println!("Authors: {}", feed.authors.join(", "));
                }
            }
        }

        Command::Taxonomy => {
            let desk = NewsDesk::new(&config);
            let taxonomy = desk.taxonomy().await;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&taxonomy)?);
            } else {
                println!("Categories:");
                for category in &taxonomy.categories {
                    println!("  {:<16} {}", category.id, category.name);
                }
                println!("Sources:");
                for source in &taxonomy.sources {
                    println!("  {:<16} {}", source.id, source.name);
                }
                if !taxonomy.authors.is_empty() {
                    println!("Contributors:");
                    for author in &taxonomy.authors {
                        println!("  {author}");
                    }
                }
            }
        }

        Command::Prefs { sources, categories, authors, reset } => {
            if reset {
                store.reset()?;
                println!("Preferences reset.");
                return Ok(());
            }

            let mut preferences = store.load();
            let changed = sources.is_some() || categories.is_some() || authors.is_some();
            if let Some(sources) = sources {
                preferences.sources = sources;
            }
            if let Some(categories) = categories {
                preferences.categories = categories;
            }
            if let Some(authors) = authors {
                preferences.authors = authors;
            }
            if changed {
                store.save(&preferences)?;
            }

            if args.json {
                println!("{}", serde_json::to_string_pretty(&preferences)?);
            } else {
                println!("sources:    {}", preferences.sources.join(", "));
                println!("categories: {}", preferences.categories.join(", "));
                println!("authors:    {}", preferences.authors.join(", "));
            }
        }
    }

    Ok(())
}
