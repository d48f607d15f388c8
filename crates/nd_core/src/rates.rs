use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use crate::storage::{KeyValueStore, RATES_KEY};
use crate::types::{ContentType, PayoutRate};
use crate::{Error, Result};

pub const DEFAULT_NEWS_RATE: f64 = 50.0;
pub const DEFAULT_BLOG_RATE: f64 = 75.0;

/// Payout rate per content type.
///
/// Holds at most one entry per payable type. A freshly constructed table is
/// empty; [`RateTable::defaults`] and [`RateTable::load_or_seed`] produce a
/// table with every payable type present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PayoutRate>", into = "Vec<PayoutRate>")]
pub struct RateTable {
    entries: BTreeMap<ContentType, f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ContentType::News, DEFAULT_NEWS_RATE);
        entries.insert(ContentType::Blog, DEFAULT_BLOG_RATE);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once every payable type has an entry.
    pub fn is_complete(&self) -> bool {
        ContentType::PAYABLE.iter().all(|t| self.entries.contains_key(t))
    }

    /// Rate for `content_type`; an absent entry pays nothing.
    pub fn rate(&self, content_type: ContentType) -> f64 {
        self.entries.get(&content_type).copied().unwrap_or(0.0)
    }

    /// Replace the entry for `content_type`. Negative or non-finite rates and
    /// non-payable types are rejected and the table is left unchanged.
    pub fn set_rate(&mut self, content_type: ContentType, rate: f64) -> Result<()> {
        if !content_type.is_payable() {
            return Err(Error::InvalidType(content_type.to_string()));
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::InvalidRate {
                content_type: content_type.to_string(),
                rate,
            });
        }
        self.entries.insert(content_type, rate);
        Ok(())
    }

    pub fn to_rates(&self) -> Vec<PayoutRate> {
        self.entries
            .iter()
            .map(|(&content_type, &rate)| PayoutRate { content_type, rate })
            .collect()
    }

    /// Load the persisted table, or seed and persist the defaults when nothing
    /// usable is stored. Never fails: storage and decoding problems are logged
    /// and answered with the defaults.
    pub async fn load_or_seed(store: &dyn KeyValueStore) -> Self {
        match Self::load(store).await {
            Ok(Some(table)) if table.is_complete() => {
                info!("Loaded persisted payout rates: {:?}", table.to_rates());
                return table;
            }
            Ok(Some(table)) => warn!(
                "Persisted payout rates are incomplete ({:?}), reseeding defaults",
                table.to_rates()
            ),
            Ok(None) => info!("No persisted payout rates, seeding defaults"),
            Err(e) => warn!("Failed to load persisted payout rates, seeding defaults: {}", e),
        }

        let table = Self::defaults();
        if let Err(e) = table.persist(store).await {
            error!("Failed to persist default payout rates: {}", e);
        }
        table
    }

    async fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        crate::storage::get_json(store, RATES_KEY).await
    }

    pub async fn persist(&self, store: &dyn KeyValueStore) -> Result<()> {
        crate::storage::put_json(store, RATES_KEY, &self.to_rates()).await
    }
}

impl TryFrom<Vec<PayoutRate>> for RateTable {
    type Error = Error;

    fn try_from(rates: Vec<PayoutRate>) -> Result<Self> {
        let mut table = RateTable::new();
        for PayoutRate { content_type, rate } in rates {
            if table.entries.contains_key(&content_type) {
                return Err(Error::InvalidType(format!("duplicate rate for {}", content_type)));
            }
            table.set_rate(content_type, rate)?;
        }
        Ok(table)
    }
}

impl From<RateTable> for Vec<PayoutRate> {
    fn from(table: RateTable) -> Self {
        table.to_rates()
    }
}
