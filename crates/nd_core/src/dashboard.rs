use tracing::{info, warn};

use crate::filter::{self, FilterCriteria, FilterField};
use crate::payout::PayoutCache;
use crate::rates::RateTable;
use crate::stats::{self, DashboardStats};
use crate::types::{Article, AuthorPayout, ContentType};
use crate::Result;

/// Session state behind the admin views.
///
/// Owns the article store, the rate table and the current filter criteria,
/// and keeps both derived views (filtered list, payouts) in step with them:
/// every mutation recomputes the views before returning.
#[derive(Debug)]
pub struct Dashboard {
    articles: Vec<Article>,
    rates: RateTable,
    criteria: FilterCriteria,
    filtered: Vec<Article>,
    payouts: PayoutCache,
}

impl Dashboard {
    pub fn new(rates: RateTable) -> Self {
        let mut dashboard = Self {
            articles: Vec::new(),
            rates,
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            payouts: PayoutCache::new(),
        };
        dashboard.refresh();
        dashboard
    }

    /// Replace the whole article store, e.g. after a fetch.
    pub fn replace_articles(&mut self, articles: Vec<Article>) {
        info!("Replacing article store ({} -> {} articles)", self.articles.len(), articles.len());
        self.articles = articles;
        self.refresh();
    }

    /// Replace all criteria at once.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) -> &[Article] {
        self.criteria = criteria;
        self.refresh();
        &self.filtered
    }

    /// Replace one criteria field, keeping the others.
    pub fn update_filter(&mut self, field: FilterField, value: &str) -> Result<&[Article]> {
        if let Err(e) = self.criteria.set(field, value) {
            warn!("Rejected filter update {:?}={:?}: {}", field, value, e);
            return Err(e);
        }
        self.refresh();
        Ok(&self.filtered)
    }

    pub fn reset_filters(&mut self) -> &[Article] {
        self.criteria.reset();
        self.refresh();
        &self.filtered
    }

    /// Update the rate for one type. A rejected rate leaves the table as it was.
    pub fn set_rate(&mut self, content_type: ContentType, rate: f64) -> Result<&RateTable> {
        if let Err(e) = self.rates.set_rate(content_type, rate) {
            warn!("Rejected rate update for {}: {}", content_type, e);
            return Err(e);
        }
        info!("Rate for {} set to {}", content_type, rate);
        self.refresh();
        Ok(&self.rates)
    }

    /// Swap in a whole table, e.g. to undo an update that could not be stored.
    pub fn replace_rates(&mut self, rates: RateTable) {
        self.rates = rates;
        self.refresh();
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn filtered(&self) -> &[Article] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Authors across the full, unfiltered store.
    pub fn unique_authors(&self) -> Vec<String> {
        filter::unique_authors(&self.articles)
    }

    /// Payouts for the full store under the current rates, in no particular order.
    pub fn payouts(&self) -> &[AuthorPayout] {
        self.payouts.last().unwrap_or(&[])
    }

    pub fn payout_cache(&self) -> &PayoutCache {
        &self.payouts
    }

    pub fn stats(&self) -> DashboardStats {
        stats::summarize(&self.articles, self.payouts())
    }

    fn refresh(&mut self) {
        self.filtered = filter::filter(&self.articles, &self.criteria);
        self.payouts.compute(&self.articles, &self.rates);
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(RateTable::defaults())
    }
}
