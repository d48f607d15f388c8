use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::payout::total_payout;
use crate::types::{Article, AuthorPayout, ContentType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: usize,
    pub total_authors: usize,
    pub news_count: usize,
    pub blog_count: usize,
    pub total_payout: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub news: usize,
    pub blog: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

pub fn summarize(articles: &[Article], payouts: &[AuthorPayout]) -> DashboardStats {
    let types = articles_by_type(articles);
    DashboardStats {
        total_articles: articles.len(),
        total_authors: articles.iter().map(|a| a.author.as_str()).collect::<HashSet<_>>().len(),
        news_count: types.news,
        blog_count: types.blog,
        total_payout: total_payout(payouts),
    }
}

/// Article count per author, in first-seen order.
pub fn articles_by_author(articles: &[Article]) -> Vec<AuthorCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<AuthorCount> = Vec::new();
    for article in articles {
        match index.get(article.author.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(&article.author, counts.len());
                counts.push(AuthorCount {
                    author: article.author.clone(),
                    count: 1,
                });
            }
        }
    }
    counts
}

pub fn articles_by_type(articles: &[Article]) -> TypeCounts {
    articles.iter().fold(TypeCounts::default(), |mut counts, article| {
        match article.content_type {
            ContentType::News => counts.news += 1,
            ContentType::Blog => counts.blog += 1,
            ContentType::Unknown => {}
        }
        counts
    })
}

/// Longest activity window that will be computed.
pub const MAX_ACTIVITY_DAYS: u32 = 366;

/// Articles per UTC calendar day for the `days` days ending on `today`,
/// oldest first. Days without articles are reported with a zero count.
/// Windows longer than [`MAX_ACTIVITY_DAYS`] are clamped.
pub fn daily_activity(articles: &[Article], today: NaiveDate, days: u32) -> Vec<DailyCount> {
    let days = days.min(MAX_ACTIVITY_DAYS);
    if days == 0 {
        return Vec::new();
    }
    let first = today
        .checked_sub_signed(Duration::days(i64::from(days - 1)))
        .unwrap_or(NaiveDate::MIN);
    let mut series: Vec<DailyCount> = first
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| DailyCount { date, count: 0 })
        .collect();

    for article in articles {
        let day = article.published_at.date_naive();
        if day < first || day > today {
            continue;
        }
        let slot = (day - first).num_days() as usize;
        if let Some(entry) = series.get_mut(slot) {
            entry.count += 1;
        }
    }
    series
}
