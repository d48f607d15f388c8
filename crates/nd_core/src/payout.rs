use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::rates::RateTable;
use crate::types::{Article, AuthorPayout, ContentType, PayoutBreakdown};

/// Per-author payout summary for `articles` under `rates`.
///
/// Produces exactly one record per distinct author string, in first-seen
/// order. Articles of a non-payable type still register their author but do
/// not count toward any bucket.
pub fn compute_payouts(articles: &[Article], rates: &RateTable) -> Vec<AuthorPayout> {
    if articles.is_empty() || rates.is_empty() {
        return Vec::new();
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, PayoutBreakdown)> = Vec::new();
    for article in articles {
        let slot = *index.entry(article.author.as_str()).or_insert_with(|| {
            counts.push((article.author.as_str(), PayoutBreakdown::default()));
            counts.len() - 1
        });
        let breakdown = &mut counts[slot].1;
        match article.content_type {
            ContentType::News => breakdown.news += 1,
            ContentType::Blog => breakdown.blog += 1,
            ContentType::Unknown => {}
        }
    }

    let news_rate = rates.rate(ContentType::News);
    let blog_rate = rates.rate(ContentType::Blog);
    counts
        .into_iter()
        .map(|(author, breakdown)| AuthorPayout {
            author: author.to_string(),
            articles: breakdown.news + breakdown.blog,
            total_payout: breakdown.news as f64 * news_rate + breakdown.blog as f64 * blog_rate,
            breakdown,
        })
        .collect()
}

/// Order payouts by total payout, highest first. Ties keep their order.
pub fn sort_by_payout_desc(payouts: &mut [AuthorPayout]) {
    payouts.sort_by(|a, b| b.total_payout.partial_cmp(&a.total_payout).unwrap_or(Ordering::Equal));
}

/// Sum of all author payouts.
pub fn total_payout(payouts: &[AuthorPayout]) -> f64 {
    payouts.iter().map(|p| p.total_payout).sum()
}

/// Remembers the last aggregation so repeated calls with unchanged inputs
/// skip the recomputation. Inputs are compared by value.
#[derive(Debug, Default)]
pub struct PayoutCache {
    last: Option<Snapshot>,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct Snapshot {
    articles: Vec<Article>,
    rates: RateTable,
    result: Vec<AuthorPayout>,
}

impl PayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(&mut self, articles: &[Article], rates: &RateTable) -> &[AuthorPayout] {
        let fresh = matches!(
            &self.last,
            Some(snapshot) if snapshot.rates == *rates && snapshot.articles == articles
        );
        if fresh {
            self.hits += 1;
            debug!("Payout cache hit ({} hits)", self.hits);
        } else {
            self.misses += 1;
            self.last = Some(Snapshot {
                articles: articles.to_vec(),
                rates: rates.clone(),
                result: compute_payouts(articles, rates),
            });
        }
        self.last.as_ref().map(|s| s.result.as_slice()).unwrap_or(&[])
    }

    /// Result of the most recent computation, if any.
    pub fn last(&self) -> Option<&[AuthorPayout]> {
        self.last.as_ref().map(|s| s.result.as_slice())
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::article;
    use std::collections::HashSet;

    fn rates(news: f64, blog: f64) -> RateTable {
        let mut table = RateTable::new();
        table.set_rate(ContentType::News, news).unwrap();
        table.set_rate(ContentType::Blog, blog).unwrap();
        table
    }

    fn x_articles() -> Vec<Article> {
        vec![
            article("1", "X", ContentType::News, "2024-03-01T00:00:00Z"),
            article("2", "X", ContentType::News, "2024-03-02T00:00:00Z"),
            article("3", "X", ContentType::Blog, "2024-03-03T00:00:00Z"),
        ]
    }

    #[test]
    fn test_totals_for_single_author() {
        let payouts = compute_payouts(&x_articles(), &rates(50.0, 75.0));
        assert_eq!(
            payouts,
            vec![AuthorPayout {
                author: "X".to_string(),
                articles: 3,
                total_payout: 175.0,
                breakdown: PayoutBreakdown { news: 2, blog: 1 },
            }]
        );
    }

    #[test]
    fn test_one_record_per_distinct_author() {
        let articles = vec![
            article("1", "Ann", ContentType::News, "2024-03-01T00:00:00Z"),
            article("2", "ann", ContentType::Blog, "2024-03-01T00:00:00Z"),
            article("3", "Ann ", ContentType::News, "2024-03-01T00:00:00Z"),
            article("4", "Ann", ContentType::Blog, "2024-03-01T00:00:00Z"),
            article("5", "Bo", ContentType::News, "2024-03-01T00:00:00Z"),
        ];
        let payouts = compute_payouts(&articles, &RateTable::defaults());

        let distinct: HashSet<&str> = articles.iter().map(|a| a.author.as_str()).collect();
        let reported: HashSet<&str> = payouts.iter().map(|p| p.author.as_str()).collect();
        assert_eq!(payouts.len(), distinct.len());
        assert_eq!(reported, distinct);

        let ann = payouts.iter().find(|p| p.author == "Ann").unwrap();
        assert_eq!(ann.breakdown, PayoutBreakdown { news: 1, blog: 1 });
        assert_eq!(ann.total_payout, 125.0);
    }

    #[test]
    fn test_unknown_type_does_not_inflate_payout() {
        let mut articles = x_articles();
        articles.push(article("4", "X", ContentType::Unknown, "2024-03-04T00:00:00Z"));
        articles.push(article("5", "Y", ContentType::Unknown, "2024-03-04T00:00:00Z"));
        let payouts = compute_payouts(&articles, &rates(50.0, 75.0));

        let x = payouts.iter().find(|p| p.author == "X").unwrap();
        assert_eq!(x.articles, 3);
        assert_eq!(x.total_payout, 175.0);

        let y = payouts.iter().find(|p| p.author == "Y").unwrap();
        assert_eq!(y.articles, 0);
        assert_eq!(y.total_payout, 0.0);
    }

    #[test]
    fn test_missing_rate_pays_nothing() {
        let mut table = RateTable::new();
        table.set_rate(ContentType::Blog, 75.0).unwrap();
        let payouts = compute_payouts(&x_articles(), &table);
        assert_eq!(payouts[0].total_payout, 75.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(compute_payouts(&[], &RateTable::defaults()).is_empty());
        assert!(compute_payouts(&x_articles(), &RateTable::new()).is_empty());
    }

    #[test]
    fn test_sort_by_payout_desc() {
        let articles = vec![
            article("1", "Low", ContentType::News, "2024-03-01T00:00:00Z"),
            article("2", "High", ContentType::Blog, "2024-03-01T00:00:00Z"),
            article("3", "High", ContentType::Blog, "2024-03-01T00:00:00Z"),
            article("4", "Mid", ContentType::Blog, "2024-03-01T00:00:00Z"),
        ];
        let mut payouts = compute_payouts(&articles, &RateTable::defaults());
        sort_by_payout_desc(&mut payouts);
        let order: Vec<&str> = payouts.iter().map(|p| p.author.as_str()).collect();
        assert_eq!(order, vec!["High", "Mid", "Low"]);
        assert_eq!(total_payout(&payouts), 150.0 + 75.0 + 50.0);
    }

    #[test]
    fn test_cache_returns_equal_results_for_equal_inputs() {
        let articles = x_articles();
        let table = rates(50.0, 75.0);
        let mut cache = PayoutCache::new();

        let first = cache.compute(&articles, &table).to_vec();
        let second = cache.compute(&articles.clone(), &table.clone()).to_vec();
        assert_eq!(first, second);
        assert_eq!(first, compute_payouts(&articles, &table));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_cache_invalidated_by_rate_change() {
        let articles = x_articles();
        let mut table = rates(50.0, 75.0);
        let mut cache = PayoutCache::new();
        let before = cache.compute(&articles, &table).to_vec();

        table.set_rate(ContentType::Blog, 80.0).unwrap();
        let after = cache.compute(&articles, &table).to_vec();
        assert_ne!(before, after);
        assert_eq!(after[0].total_payout, 180.0);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_cache_invalidated_by_appended_article() {
        let mut articles = x_articles();
        let table = rates(50.0, 75.0);
        let mut cache = PayoutCache::new();
        let before = cache.compute(&articles, &table).to_vec();

        articles.push(article("4", "X", ContentType::News, "2024-03-04T00:00:00Z"));
        let after = cache.compute(&articles, &table).to_vec();
        assert_ne!(before, after);
        assert_eq!(after[0].articles, 4);
        assert_eq!(after, compute_payouts(&articles, &table));
    }

    #[test]
    fn test_cache_tracks_emptied_inputs() {
        let articles = x_articles();
        let table = RateTable::defaults();
        let mut cache = PayoutCache::new();
        assert_eq!(cache.compute(&articles, &table).len(), 1);
        assert!(cache.compute(&[], &table).is_empty());
        assert_eq!(cache.compute(&articles, &table).len(), 1);
        assert_eq!(cache.misses(), 3);
    }
}
