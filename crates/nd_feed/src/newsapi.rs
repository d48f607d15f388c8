use async_trait::async_trait;
use chrono::Utc;
use nd_core::{Article, ArticleSource, Error, Result};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::assign::{RandomTypeAssigner, TypeAssigner};
use crate::config::FeedConfig;
use crate::convert::{into_articles, HeadlinesResponse};

/// Top-headlines client for newsapi.org style services.
pub struct NewsApiSource {
    client: Client,
    config: FeedConfig,
    assigner: Arc<dyn TypeAssigner>,
}

impl NewsApiSource {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            assigner: Arc::new(RandomTypeAssigner::new()),
        })
    }

    pub fn with_assigner(mut self, assigner: Arc<dyn TypeAssigner>) -> Self {
        self.assigner = assigner;
        self
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/top-headlines", base))
            .map_err(|e| Error::Source(format!("Invalid API URL {}: {}", base, e)))?;
        url.query_pairs_mut()
            .append_pair("country", &self.config.country)
            .append_pair("apiKey", api_key);
        Ok(url)
    }
}

impl fmt::Debug for NewsApiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiSource")
            .field("base_url", &self.config.base_url)
            .field("country", &self.config.country)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn status_error(status: StatusCode, message: Option<String>) -> Error {
    let reason = match status {
        StatusCode::TOO_MANY_REQUESTS => "API rate limit exceeded. Please try again later.".to_string(),
        StatusCode::UNAUTHORIZED => "API authentication failed. Please check your API key.".to_string(),
        _ => message.unwrap_or_else(|| format!("Error {}: Failed to fetch news", status.as_u16())),
    };
    Error::Source(reason)
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Source("No API key configured".to_string()))?;
        let url = self.endpoint(api_key)?;
        debug!("Fetching headlines from {}", self.config.base_url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.json::<HeadlinesResponse>().await.ok().and_then(|r| r.message);
            return Err(status_error(status, message));
        }

        let body = response.json::<HeadlinesResponse>().await?;
        info!("📰 {} returned {} articles", self.name(), body.articles.len());
        Ok(into_articles(body.articles, self.assigner.as_ref(), Utc::now()))
    }
}
