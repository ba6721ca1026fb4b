use catalog_core::{LoadOutcome, ProductRecord};
use catalog_logging::{catalog_error, catalog_info};
use thiserror::Error;

use crate::marker::{CompletionMarker, MarkerError};
use crate::store::{DocumentStore, IndexSchema, StoreError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not create index {index}: {source}")]
    IndexCreation {
        index: String,
        #[source]
        source: StoreError,
    },
    #[error("completion marker unavailable: {0}")]
    Marker(#[from] MarkerError),
}

/// Writes a catalog into the store at most once, guarded by a completion marker.
pub struct LoadController<'a> {
    store: &'a dyn DocumentStore,
    marker: &'a dyn CompletionMarker,
    index: &'a str,
}

impl<'a> LoadController<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        marker: &'a dyn CompletionMarker,
        index: &'a str,
    ) -> Self {
        Self {
            store,
            marker,
            index,
        }
    }

    /// Creates the index from the record shape when it is missing.
    /// Returns `true` when this call created it.
    pub async fn ensure_index(&self) -> Result<bool, LoadError> {
        let exists = self
            .store
            .index_exists(self.index)
            .await
            .map_err(|source| self.index_error(source))?;
        if exists {
            return Ok(false);
        }
        self.store
            .create_index(self.index, &IndexSchema::for_product_record())
            .await
            .map_err(|source| self.index_error(source))?;
        catalog_info!("Created index {}", self.index);
        Ok(true)
    }

    /// Best-effort bulk load.
    ///
    /// A failed write is logged and counted; the pass continues. The marker
    /// is set once the pass finishes, even after partial failure, so the
    /// unwritten records are not retried by later runs.
    pub async fn ensure_indexed(&self, records: &[ProductRecord]) -> Result<LoadOutcome, LoadError> {
        if self.marker.exists()? {
            catalog_info!("Index {} already loaded; skipping", self.index);
            return Ok(LoadOutcome::Skipped);
        }

        self.ensure_index().await?;

        let mut written = 0;
        let mut failed = 0;
        for (position, record) in records.iter().enumerate() {
            match self.store.upsert(self.index, record).await {
                Ok(()) => written += 1,
                Err(err) => {
                    failed += 1;
                    catalog_error!(
                        "Write {} ({}) to {} failed: {}",
                        position,
                        record.name.as_deref().unwrap_or("<unnamed>"),
                        self.index,
                        err
                    );
                }
            }
        }

        if let Err(err) = self.marker.set() {
            catalog_error!("Could not set completion marker for {}: {}", self.index, err);
        }

        let outcome = LoadOutcome::from_counts(written, failed);
        catalog_info!("Load into {}: {}", self.index, outcome);
        Ok(outcome)
    }

    fn index_error(&self, source: StoreError) -> LoadError {
        LoadError::IndexCreation {
            index: self.index.to_string(),
            source,
        }
    }
}
