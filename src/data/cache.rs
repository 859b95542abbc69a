use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::error::LoadError;
use super::loader::load_file;
use super::model::SalesDataset;

/// Load-once holder for the dashboard's dataset.
///
/// The first successful [`get_or_load`](Self::get_or_load) parses the source
/// file; every later call hands out the same `Arc` without touching disk.
/// Failed loads are not remembered, so the next call tries again.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    dataset: Option<Arc<SalesDataset>>,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dataset: None,
        }
    }

    /// File the cache reads from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Return the cached dataset, parsing the source file on first use.
    pub fn get_or_load(&mut self) -> Result<Arc<SalesDataset>, LoadError> {
        if let Some(ds) = &self.dataset {
            return Ok(Arc::clone(ds));
        }

        let started = Instant::now();
        let dataset = Arc::new(load_file(&self.source)?);
        log::info!(
            "Loaded {} transactions from {} in {:.1?}",
            dataset.len(),
            self.source.display(),
            started.elapsed()
        );
        self.dataset = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Point the cache at another file and forget the current table.
    pub fn replace_source(&mut self, source: impl Into<PathBuf>) {
        self.source = source.into();
        self.dataset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Invoice_ID,Date,City,Item,Quantity,Total_Price\n1,2024-01-01,Dhaka,Shirt,2,500\n";

    #[test]
    fn second_call_reuses_the_parsed_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.get_or_load().unwrap();
        assert!(cache.is_loaded());

        // The file is gone, but the cached table is still served.
        std::fs::remove_file(&path).unwrap();
        let second = cache.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");

        let mut cache = DatasetCache::new(&path);
        assert!(matches!(cache.get_or_load(), Err(LoadError::Io { .. })));
        assert!(!cache.is_loaded());

        std::fs::write(&path, CSV).unwrap();
        assert_eq!(cache.get_or_load().unwrap().len(), 1);
    }

    #[test]
    fn replacing_the_source_drops_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, CSV).unwrap();
        std::fs::write(
            &b,
            "Invoice_ID,Date,City,Item,Quantity,Total_Price\n1,2024-01-01,Dhaka,Shirt,2,500\n2,2024-01-02,Sylhet,Pant,1,900\n",
        )
        .unwrap();

        let mut cache = DatasetCache::new(&a);
        assert_eq!(cache.get_or_load().unwrap().len(), 1);

        cache.replace_source(&b);
        assert!(!cache.is_loaded());
        assert_eq!(cache.source(), b.as_path());
        assert_eq!(cache.get_or_load().unwrap().len(), 2);
    }
}
