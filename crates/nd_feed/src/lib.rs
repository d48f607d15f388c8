use chrono::{DateTime, Utc};
use nd_core::{Article, ArticleSource, ContentType};
use tracing::warn;

pub mod assign;
pub mod config;
pub mod convert;
pub mod newsapi;
pub mod offline;

pub use assign::{FixedTypeAssigner, RandomTypeAssigner, TypeAssigner};
pub use config::FeedConfig;
pub use newsapi::NewsApiSource;
pub use offline::StaticSource;

/// Result of a fetch that always yields something to show.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub articles: Vec<Article>,
    /// Why the fallback set was used, if it was.
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn used_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Articles shown when the upstream service cannot be reached.
pub fn fallback_articles(now: DateTime<Utc>) -> Vec<Article> {
    vec![Article {
        id: "fallback-1".to_string(),
        title: "API Currently Unavailable".to_string(),
        description: "The news API might be experiencing issues. This is fallback content.".to_string(),
        author: "System".to_string(),
        source: "Local".to_string(),
        url: "#".to_string(),
        url_to_image: Some("https://picsum.photos/id/30/600/400".to_string()),
        published_at: now,
        content: "Unable to fetch live news at the moment. Please try again later.".to_string(),
        content_type: ContentType::News,
    }]
}

/// Fetch once from `source`; on failure or an empty answer return the
/// fallback set instead.
pub async fn fetch_or_fallback(source: &dyn ArticleSource) -> FetchOutcome {
    let error = match source.fetch_articles().await {
        Ok(articles) if !articles.is_empty() => return FetchOutcome { articles, error: None },
        Ok(_) => format!("{} returned no articles", source.name()),
        Err(e) => e.to_string(),
    };
    warn!("Using fallback news articles: {}", error);
    FetchOutcome {
        articles: fallback_articles(Utc::now()),
        error: Some(error),
    }
}

pub mod prelude {
    pub use super::{fetch_or_fallback, FeedConfig, FetchOutcome, NewsApiSource, StaticSource};
    pub use nd_core::{Article, ArticleSource, Error, Result};
}
