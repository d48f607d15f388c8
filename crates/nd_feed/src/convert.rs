use chrono::{DateTime, Utc};
use nd_core::{Article, ContentType};
use serde::Deserialize;
use std::collections::HashSet;

use crate::assign::TypeAssigner;

#[derive(Debug, Default, Deserialize)]
pub struct HeadlinesResponse {
    pub status: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// One headline as the upstream service sends it. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub source: Option<RawSource>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    present(value).unwrap_or_else(|| default.to_string())
}

fn parse_published(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Pick an id not yet handed out: the upstream id when it is free, else the
/// positional `article-<n>`, else that with a numeric suffix.
fn claim_id(seen: &mut HashSet<String>, supplied: Option<String>, index: usize) -> String {
    let positional = format!("article-{}", index + 1);
    let mut id = match present(supplied) {
        Some(id) if !seen.contains(&id) => id,
        _ => positional.clone(),
    };
    let mut suffix = 1;
    while seen.contains(&id) {
        suffix += 1;
        id = format!("{}-{}", positional, suffix);
    }
    seen.insert(id.clone());
    id
}

/// Convert upstream records into articles.
///
/// Missing ids become `article-<n>` (1-based position) and ids are unique
/// across the batch. A record that names its own `news`/`blog` type keeps
/// it; otherwise `assigner` decides.
pub fn into_articles(raw: Vec<RawArticle>, assigner: &dyn TypeAssigner, now: DateTime<Utc>) -> Vec<Article> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(index, record)| {
            let content_type = record
                .content_type
                .as_deref()
                .and_then(|t| t.parse::<ContentType>().ok())
                .unwrap_or_else(|| assigner.assign(&record, index));
            let published_at = parse_published(record.published_at.as_deref(), now);
            let url_to_image = present(record.url_to_image)
                .unwrap_or_else(|| format!("https://picsum.photos/id/{}/600/400", 30 + index));
            Article {
                id: claim_id(&mut seen, record.id, index),
                title: or_default(record.title, "Untitled"),
                description: or_default(record.description, "No description available"),
                author: or_default(record.author, "Unknown Author"),
                source: or_default(record.source.and_then(|s| s.name), "Unknown Source"),
                url: or_default(record.url, "#"),
                url_to_image: Some(url_to_image),
                published_at,
                content: or_default(record.content, "No content available"),
                content_type,
            }
        })
        .collect()
}
