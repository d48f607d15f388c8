use async_trait::async_trait;
use nd_core::{KeyValueStore, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store; contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_core::{RateTable, ContentType};

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("payoutRates").await.unwrap(), None);

        store.set("payoutRates", "[]").await.unwrap();
        store.set("payoutRates", "[1]").await.unwrap();
        assert_eq!(store.get("payoutRates").await.unwrap().as_deref(), Some("[1]"));

        store.remove("payoutRates").await.unwrap();
        store.remove("payoutRates").await.unwrap();
        assert_eq!(store.get("payoutRates").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rates_survive_reload() {
        let store = MemoryStore::new();
        let mut rates = RateTable::load_or_seed(&store).await;
        rates.set_rate(ContentType::News, 65.0).unwrap();
        rates.persist(&store).await.unwrap();

        let reloaded = RateTable::load_or_seed(&store).await;
        assert_eq!(reloaded.rate(ContentType::News), 65.0);
        assert_eq!(reloaded.rate(ContentType::Blog), 75.0);
    }
}
