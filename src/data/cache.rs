use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::load_csv;
use super::model::SalesTable;
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identity of a CSV source: canonical path plus what the filesystem says
/// about its current contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSignature {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceSignature {
    pub fn of(path: &Path) -> Result<Self, DataLoadError> {
        let io_err = |source: std::io::Error| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io_err)?;
        let meta = std::fs::metadata(&canonical).map_err(io_err)?;
        Ok(SourceSignature {
            path: canonical,
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// TableCache
// ---------------------------------------------------------------------------

struct CacheEntry {
    signature: SourceSignature,
    table: Arc<SalesTable>,
}

/// Memoised loader, keyed by canonical path.
///
/// An entry is reused while the file's signature is unchanged; a changed
/// file is parsed again and replaces the entry. A failed load leaves the
/// previous entry untouched.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `path`, parsing it only if the source is new or changed.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<SalesTable>, DataLoadError> {
        let signature = SourceSignature::of(path)?;

        if let Some(entry) = self.entries.get(&signature.path) {
            if entry.signature == signature {
                log::debug!("Cache hit for {}", signature.path.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::info!("{} changed on disk, reloading", signature.path.display());
        }

        let table = Arc::new(load_csv(&signature.path)?);
        self.entries.insert(
            signature.path.clone(),
            CacheEntry {
                signature,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the entry for `path`. Returns whether one was present.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "Invoice ID,Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total,Date,Time,Payment,cogs,gross income,Rating\n";
    const ROW: &str = "1,A,Yangon,Member,Male,Food,1,1,0.05,1.05,1/1/2019,10:29,Cash,1,0.05,5\n";

    fn write_csv(rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        for _ in 0..rows {
            file.write_all(ROW.as_bytes()).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn second_load_reuses_table() {
        let file = write_csv(2);
        let mut cache = TableCache::new();

        let first = cache.get_or_load(file.path()).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn changed_source_is_reparsed() {
        let mut file = write_csv(1);
        let mut cache = TableCache::new();
        assert_eq!(cache.get_or_load(file.path()).unwrap().len(), 1);

        file.write_all(ROW.as_bytes()).unwrap();
        file.flush().unwrap();

        assert_eq!(cache.get_or_load(file.path()).unwrap().len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = write_csv(1);
        let mut cache = TableCache::new();
        let first = cache.get_or_load(file.path()).unwrap();

        assert!(cache.invalidate(file.path()));
        assert!(cache.is_empty());

        let again = cache.get_or_load(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &again));
        assert_eq!(*first, *again);
    }

    #[test]
    fn missing_source_is_not_cached() {
        let mut cache = TableCache::new();
        assert!(cache.get_or_load(Path::new("/no/such/sales.csv")).is_err());
        assert!(cache.is_empty());
    }
}
