use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Editorial classification of an article. Only `News` and `Blog` are payable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    News,
    Blog,
    #[serde(other)]
    Unknown,
}

impl ContentType {
    pub const PAYABLE: [ContentType; 2] = [ContentType::News, ContentType::Blog];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Blog => "blog",
            ContentType::Unknown => "unknown",
        }
    }

    pub fn is_payable(&self) -> bool {
        !matches!(self, ContentType::Unknown)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "news" => Ok(ContentType::News),
            "blog" => Ok(ContentType::Blog),
            other => Err(Error::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub source: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

/// Persisted shape of one rate table entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutRate {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutBreakdown {
    pub news: usize,
    pub blog: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayout {
    pub author: String,
    pub articles: usize,
    pub total_payout: f64,
    pub breakdown: PayoutBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

/// A signed-in user. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_wire_names() {
        let json = r#"{
            "id": "article-1",
            "title": "Title",
            "description": "Desc",
            "author": "Jane",
            "source": "Wire",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.png",
            "publishedAt": "2024-03-01T10:00:00Z",
            "content": "Body",
            "type": "blog"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.content_type, ContentType::Blog);
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a.png"));

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["type"], "blog");
        assert_eq!(value["publishedAt"], "2024-03-01T10:00:00Z");
    }

    #[test]
    fn test_unrecognised_type_is_unknown() {
        let rate: PayoutRate = serde_json::from_str(r#"{"type": "podcast", "rate": 10}"#).unwrap();
        assert_eq!(rate.content_type, ContentType::Unknown);
        assert!(!rate.content_type.is_payable());
    }

    #[test]
    fn test_content_type_from_str() {
        assert_eq!("news".parse::<ContentType>().unwrap(), ContentType::News);
        assert_eq!("blog".parse::<ContentType>().unwrap(), ContentType::Blog);
        assert!("unknown".parse::<ContentType>().is_err());
        assert!("News".parse::<ContentType>().is_err());
    }
}
