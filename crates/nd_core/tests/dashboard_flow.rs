use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::{
    compute_payouts, filter, Article, ContentType, Dashboard, FilterCriteria, FilterField, KeyValueStore, RateTable,
    Result,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Store(Mutex<HashMap<String, String>>);

#[async_trait]
impl KeyValueStore for Store {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.0.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }
}

fn article(id: usize, author: &str, content_type: ContentType, day: u32) -> Article {
    Article {
        id: format!("a{}", id),
        title: format!("Headline {}", id),
        description: if id % 2 == 0 { "Markets rally".to_string() } else { "Weather turns".to_string() },
        author: author.to_string(),
        source: "Wire".to_string(),
        url: "#".to_string(),
        url_to_image: None,
        published_at: DateTime::parse_from_rfc3339(&format!("2024-03-{:02}T10:00:00Z", day))
            .unwrap()
            .with_timezone(&Utc),
        content: String::new(),
        content_type,
    }
}

fn newsroom() -> Vec<Article> {
    let authors = ["Jane Doe", "John Roe", "jane doe", "Ann Poe"];
    (0..12)
        .map(|i| {
            let content_type = if i % 3 == 0 { ContentType::Blog } else { ContentType::News };
            article(i, authors[i % authors.len()], content_type, 1 + i as u32)
        })
        .collect()
}

#[test]
fn test_views_follow_every_mutation() {
    let mut dashboard = Dashboard::default();
    dashboard.replace_articles(newsroom());
    assert_eq!(dashboard.filtered(), dashboard.articles());
    assert_eq!(dashboard.payouts().len(), 4);

    dashboard.update_filter(FilterField::Author, "JANE").unwrap();
    assert_eq!(dashboard.filtered().len(), 6);
    assert!(dashboard.filtered().iter().all(|a| a.author.to_lowercase() == "jane doe"));

    dashboard.update_filter(FilterField::SearchQuery, "markets").unwrap();
    let narrowed = dashboard.filtered().to_vec();
    assert!(narrowed.iter().all(|a| a.description == "Markets rally"));
    assert_eq!(narrowed, filter(dashboard.articles(), dashboard.criteria()));

    // payouts always cover the whole store
    assert_eq!(dashboard.payouts().len(), 4);

    let before = dashboard.payouts().to_vec();
    dashboard.set_rate(ContentType::Blog, 10.0).unwrap();
    assert_ne!(dashboard.payouts(), before.as_slice());
    assert_eq!(dashboard.payouts(), compute_payouts(dashboard.articles(), dashboard.rates()).as_slice());
    assert_eq!(dashboard.filtered(), narrowed.as_slice());

    dashboard.reset_filters();
    assert!(dashboard.criteria().is_unconstrained());
    assert_eq!(dashboard.filtered().len(), 12);
}

#[test]
fn test_rejected_inputs_change_nothing() {
    let mut dashboard = Dashboard::default();
    dashboard.replace_articles(newsroom());
    let payouts = dashboard.payouts().to_vec();

    assert!(dashboard.set_rate(ContentType::News, -5.0).is_err());
    assert!(dashboard.update_filter(FilterField::Type, "podcast").is_err());

    assert_eq!(dashboard.rates().rate(ContentType::News), 50.0);
    assert!(dashboard.criteria().is_unconstrained());
    assert_eq!(dashboard.payouts(), payouts.as_slice());
}

#[test]
fn test_malformed_dates_fail_open() {
    let articles = newsroom();
    for bad in ["not-a-date", "2024-13-45", "03/07/2024"] {
        let criteria = FilterCriteria {
            start_date: bad.to_string(),
            end_date: bad.to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(filter(&articles, &criteria), articles);
    }

    let inclusive = FilterCriteria {
        start_date: "2024-03-02".to_string(),
        end_date: "2024-03-04T10:00:00Z".to_string(),
        ..FilterCriteria::default()
    };
    let ids: Vec<String> = filter(&articles, &inclusive).into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
}

#[test]
fn test_grouping_is_case_sensitive() {
    let payouts = compute_payouts(&newsroom(), &RateTable::defaults());
    let authors: Vec<&str> = payouts.iter().map(|p| p.author.as_str()).collect();
    assert_eq!(authors, vec!["Jane Doe", "John Roe", "jane doe", "Ann Poe"]);
    assert_eq!(payouts.iter().map(|p| p.articles).sum::<usize>(), 12);
}

#[tokio::test]
async fn test_rates_survive_a_restart() {
    let store = Store::default();

    let mut rates = RateTable::load_or_seed(&store).await;
    assert_eq!(rates, RateTable::defaults());
    rates.set_rate(ContentType::News, 100.0).unwrap();
    rates.persist(&store).await.unwrap();

    let mut dashboard = Dashboard::new(RateTable::load_or_seed(&store).await);
    dashboard.replace_articles(vec![article(1, "X", ContentType::News, 1), article(2, "X", ContentType::Blog, 2)]);
    assert_eq!(dashboard.rates().rate(ContentType::News), 100.0);
    assert_eq!(dashboard.rates().rate(ContentType::Blog), 75.0);
    assert_eq!(dashboard.payouts()[0].total_payout, 175.0);
}
