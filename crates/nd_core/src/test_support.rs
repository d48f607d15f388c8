use async_trait::async_trait;
use chrono::DateTime;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::KeyValueStore;
use crate::types::{Article, ContentType};
use crate::Result;

pub fn article(id: &str, author: &str, content_type: ContentType, published_at: &str) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Article {}", id),
        description: String::new(),
        author: author.to_string(),
        source: "Test Wire".to_string(),
        url: format!("https://example.com/{}", id),
        url_to_image: None,
        published_at: DateTime::parse_from_rfc3339(published_at).unwrap().into(),
        content: String::new(),
        content_type,
    }
}

#[derive(Default)]
pub struct MapStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MapStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
