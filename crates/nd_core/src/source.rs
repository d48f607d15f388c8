use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human-readable name of the upstream service
    fn name(&self) -> &str;

    /// Fetch the current article list in one request
    async fn fetch_articles(&self) -> Result<Vec<Article>>;
}
