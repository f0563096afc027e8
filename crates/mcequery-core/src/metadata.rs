//! The metadata seam: how the analysis core learns a table's fields.
//!
//! The core never caches. [`CachingFetcher`] is the caller-owned cache object;
//! wrap a fetcher in it and keep it alive across calls to reuse lookups.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::warn;

use crate::catalog::system_view_fields;
use crate::error::MetadataError;
use crate::types::Field;

/// Source of table field metadata.
///
/// `Ok(None)` means the table is unknown. Errors are treated the same way by
/// the analysis core and never abort a multi-table operation.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn get_fields_for_table(&self, table_name: &str)
        -> Result<Option<Vec<Field>>, MetadataError>;
}

/// In-memory metadata keyed case-insensitively by table name.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    tables: HashMap<String, Vec<Field>>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, fields: Vec<Field>) -> Self {
        self.insert(name, fields);
        self
    }

    pub fn insert(&mut self, name: &str, fields: Vec<Field>) {
        self.tables.insert(name.to_lowercase(), fields);
    }

    pub fn fields(&self, name: &str) -> Option<&[Field]> {
        self.tables.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[async_trait]
impl MetadataFetcher for StaticMetadata {
    async fn get_fields_for_table(
        &self,
        table_name: &str,
    ) -> Result<Option<Vec<Field>>, MetadataError> {
        Ok(self.fields(table_name).map(<[Field]>::to_vec))
    }
}

/// A fetcher that remembers every successful answer of the wrapped fetcher.
///
/// Failures are not cached, so the next call retries.
pub struct CachingFetcher<F> {
    inner: F,
    cache: Mutex<HashMap<String, Option<Vec<Field>>>>,
}

impl<F: MetadataFetcher> CachingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every cached answer.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn cached_tables(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

#[async_trait]
impl<F: MetadataFetcher> MetadataFetcher for CachingFetcher<F> {
    async fn get_fields_for_table(
        &self,
        table_name: &str,
    ) -> Result<Option<Vec<Field>>, MetadataError> {
        let key = table_name.to_lowercase();
        let cached = self
            .cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(&key).cloned());
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let fetched = self.inner.get_fields_for_table(table_name).await?;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, fetched.clone());
        }
        Ok(fetched)
    }
}

/// Fields of one table, consulting the system view catalog first.
///
/// A failed fetch is logged and reported as an unknown table.
pub async fn fields_for_table(fetcher: &dyn MetadataFetcher, table_name: &str) -> Option<Vec<Field>> {
    if let Some(fields) = system_view_fields(table_name) {
        return Some(fields);
    }
    match fetcher.get_fields_for_table(table_name).await {
        Ok(fields) => fields,
        Err(err) => {
            warn!(table = table_name, error = %err, "metadata fetch failed; treating table as unknown");
            None
        }
    }
}

/// Looks up several tables concurrently. Results keep the input order.
pub async fn fields_for_tables(
    fetcher: &dyn MetadataFetcher,
    table_names: &[String],
) -> Vec<Option<Vec<Field>>> {
    join_all(
        table_names
            .iter()
            .map(|name| fields_for_table(fetcher, name)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetadataFetcher for Counting {
        async fn get_fields_for_table(
            &self,
            table_name: &str,
        ) -> Result<Option<Vec<Field>>, MetadataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if table_name == "Broken" {
                return Err(MetadataError::Request("boom".to_string()));
            }
            Ok(Some(vec![Field::new("Id", FieldType::Integer)]))
        }
    }

    #[tokio::test]
    async fn test_static_metadata_case_insensitive() {
        let metadata =
            StaticMetadata::new().with_table("Contacts", vec![Field::text("Email", 254)]);
        let fields = metadata.get_fields_for_table("CONTACTS").await.unwrap();
        assert_eq!(fields.map(|f| f.len()), Some(1));
        assert_eq!(metadata.get_fields_for_table("Other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_caching_fetcher_reuses_answers() {
        let fetcher = CachingFetcher::new(Counting {
            calls: AtomicUsize::new(0),
        });
        fetcher.get_fields_for_table("T").await.unwrap();
        fetcher.get_fields_for_table("t").await.unwrap();
        assert_eq!(fetcher.cached_tables(), 1);
        assert_eq!(fetcher.into_inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let fetcher = CachingFetcher::new(Counting {
            calls: AtomicUsize::new(0),
        });
        assert!(fetcher.get_fields_for_table("Broken").await.is_err());
        assert!(fetcher.get_fields_for_table("Broken").await.is_err());
        assert_eq!(fetcher.cached_tables(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_reads_as_unknown() {
        let fetcher = Counting {
            calls: AtomicUsize::new(0),
        };
        let names = vec!["Broken".to_string(), "Fine".to_string()];
        let results = fields_for_tables(&fetcher, &names).await;
        assert!(results[0].is_none());
        assert!(results[1].is_some());
    }

    #[tokio::test]
    async fn test_system_views_skip_fetcher() {
        let fetcher = Counting {
            calls: AtomicUsize::new(0),
        };
        let fields = fields_for_table(&fetcher, "_Sent").await.unwrap();
        assert!(fields.iter().any(|f| f.name == "JobID"));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
