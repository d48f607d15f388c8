use nd_core::ContentType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::convert::RawArticle;

/// Decides the content type of a record the upstream service did not classify.
pub trait TypeAssigner: Send + Sync {
    fn assign(&self, record: &RawArticle, index: usize) -> ContentType;
}

/// Every unclassified record gets the same type.
#[derive(Debug, Clone, Copy)]
pub struct FixedTypeAssigner(pub ContentType);

impl TypeAssigner for FixedTypeAssigner {
    fn assign(&self, _record: &RawArticle, _index: usize) -> ContentType {
        self.0
    }
}

/// Splits unclassified records between news and blog at random, with
/// `news_share` of them (70% by default) landing in news.
#[derive(Debug)]
pub struct RandomTypeAssigner {
    rng: Mutex<StdRng>,
    news_share: f64,
}

pub const DEFAULT_NEWS_SHARE: f64 = 0.7;

impl RandomTypeAssigner {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            news_share: DEFAULT_NEWS_SHARE,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            news_share: DEFAULT_NEWS_SHARE,
        }
    }

    pub fn with_news_share(mut self, news_share: f64) -> Self {
        self.news_share = news_share.clamp(0.0, 1.0);
        self
    }
}

impl Default for RandomTypeAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeAssigner for RandomTypeAssigner {
    fn assign(&self, _record: &RawArticle, _index: usize) -> ContentType {
        let roll: f64 = match self.rng.lock() {
            Ok(mut rng) => rng.gen(),
            Err(poisoned) => poisoned.into_inner().gen(),
        };
        if roll < self.news_share {
            ContentType::News
        } else {
            ContentType::Blog
        }
    }
}
