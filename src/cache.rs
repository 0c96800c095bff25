use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{error::LoadError, loader, model::CombinedRecord};

/// Shared, immutable combined table.
pub type Table = Arc<Vec<CombinedRecord>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    price: PathBuf,
    metadata: PathBuf,
}

impl SourceKey {
    fn new(price: &Path, metadata: &Path) -> Self {
        // unresolvable paths are kept as given; the load below reports them
        Self {
            price: price.canonicalize().unwrap_or_else(|_| price.to_owned()),
            metadata: metadata.canonicalize().unwrap_or_else(|_| metadata.to_owned()),
        }
    }
}

/// Memoizes loaded tables per pair of source files for as long as the cache
/// lives. Sources are treated as immutable, so entries are never invalidated.
/// Failed loads are not cached.
#[derive(Default)]
pub struct TableCache {
    tables: Mutex<HashMap<SourceKey, Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &self,
        price_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<Table, LoadError> {
        let key = SourceKey::new(price_path.as_ref(), metadata_path.as_ref());

        if let Some(table) = self.tables.lock().get(&key) {
            debug!("Table cache hit for {}", key.price.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(loader::load(&key.price, &key.metadata)?);

        // a concurrent load of the same sources may have won; keep the first
        let mut tables = self.tables.lock();
        Ok(Arc::clone(tables.entry(key).or_insert(table)))
    }

    pub fn len(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, sync::Arc};

    use tempfile::NamedTempFile;

    use super::TableCache;

    fn write_csv(content: &str) -> eyre::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{content}")?;
        Ok(file)
    }

    #[test]
    fn unittest_cache_returns_same_table() -> eyre::Result<()> {
        let prices = write_csv("Symbol,Date,Open,High,Low,Close,Volume\nTCS,2020-01-01,1,2,0.5,1.5,10\n")?;
        let metadata = write_csv("Symbol,Company Name,Industry\nTCS,Tata Consultancy,IT\n")?;
        let cache = TableCache::new();

        let first = cache.get_or_load(prices.path(), metadata.path())?;
        let second = cache.get_or_load(prices.path(), metadata.path())?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        Ok(())
    }

    #[test]
    fn unittest_cache_skips_failures() -> eyre::Result<()> {
        let metadata = write_csv("Symbol,Company Name,Industry\nTCS,Tata Consultancy,IT\n")?;
        let cache = TableCache::new();

        assert!(cache.get_or_load("./missing.csv", metadata.path()).is_err());
        assert!(cache.is_empty());

        Ok(())
    }
}
