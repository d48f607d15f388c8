use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

use crate::types::{Article, ContentType};
use crate::{Error, Result};

/// Constraints narrowing an article collection. Every field defaults to
/// "unconstrained" and the fields are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub author: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type", deserialize_with = "blank_as_unconstrained")]
    pub content_type: Option<ContentType>,
    pub search_query: String,
}

/// Browsers send an empty string for "any type".
fn blank_as_unconstrained<'de, D>(deserializer: D) -> std::result::Result<Option<ContentType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Author,
    StartDate,
    EndDate,
    Type,
    SearchQuery,
}

impl FromStr for FilterField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "author" => Ok(FilterField::Author),
            "startDate" => Ok(FilterField::StartDate),
            "endDate" => Ok(FilterField::EndDate),
            "type" => Ok(FilterField::Type),
            "searchQuery" => Ok(FilterField::SearchQuery),
            other => Err(Error::InvalidFilter(other.to_string())),
        }
    }
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Replace a single field, leaving the others as they are.
    ///
    /// An empty value clears the field. A type value other than `news` or
    /// `blog` is rejected and the criteria are left untouched.
    pub fn set(&mut self, field: FilterField, value: &str) -> Result<()> {
        match field {
            FilterField::Author => self.author = value.to_string(),
            FilterField::StartDate => self.start_date = value.to_string(),
            FilterField::EndDate => self.end_date = value.to_string(),
            FilterField::SearchQuery => self.search_query = value.to_string(),
            FilterField::Type => {
                self.content_type = if value.is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = FilterCriteria::default();
    }
}

/// Criteria with lowercased needles and parsed bounds, built once per pass.
struct Predicate {
    author: Option<String>,
    content_type: Option<ContentType>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    query: Option<String>,
}

impl Predicate {
    fn new(criteria: &FilterCriteria) -> Self {
        Self {
            author: needle(&criteria.author),
            content_type: criteria.content_type,
            start: parse_bound(&criteria.start_date),
            end: parse_bound(&criteria.end_date),
            query: needle(&criteria.search_query),
        }
    }

    fn matches(&self, article: &Article) -> bool {
        if let Some(author) = &self.author {
            if !article.author.to_lowercase().contains(author) {
                return false;
            }
        }
        if let Some(content_type) = self.content_type {
            if article.content_type != content_type {
                return false;
            }
        }
        if let Some(start) = self.start {
            if article.published_at < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if article.published_at > end {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let hit = article.title.to_lowercase().contains(query)
                || article.description.to_lowercase().contains(query)
                || article.author.to_lowercase().contains(query);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn needle(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

/// Parse a date bound. Anything unparseable yields `None`, which leaves the
/// bound unapplied.
pub fn parse_bound(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    debug!("Ignoring unparseable date bound {:?}", value);
    None
}

/// Apply `criteria` to `articles`, preserving their relative order.
pub fn filter(articles: &[Article], criteria: &FilterCriteria) -> Vec<Article> {
    if criteria.is_unconstrained() {
        return articles.to_vec();
    }
    let predicate = Predicate::new(criteria);
    articles
        .iter()
        .filter(|article| predicate.matches(article))
        .cloned()
        .collect()
}

/// Distinct author names across the whole collection, sorted for display.
pub fn unique_authors(articles: &[Article]) -> Vec<String> {
    articles
        .iter()
        .map(|article| article.author.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
