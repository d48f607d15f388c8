use async_trait::async_trait;
use nd_core::{Article, ArticleSource, Result};

/// Serves a fixed article list without touching the network.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    articles: Vec<Article>,
}

impl StaticSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        Ok(self.articles.clone())
    }
}
