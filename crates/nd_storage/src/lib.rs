use nd_core::{Error, KeyValueStore, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    Memory,
    File,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            other => Err(Error::Storage(format!(
                "Unknown storage backend `{}` (expected memory or file)",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            StorageKind::File => f.write_str("file"),
        }
    }
}

/// Build the key-value store selected on the command line.
pub async fn create_store(kind: StorageKind, data_dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match kind {
        StorageKind::Memory => {
            info!("💾 Using memory storage");
            Arc::new(MemoryStore::new())
        }
        StorageKind::File => {
            let store = FileStore::open(data_dir).await?;
            info!("💾 Using file storage in {}", store.root().display());
            Arc::new(store)
        }
    };
    Ok(store)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, StorageKind};
}
