use catalog_core::{render_results, ResultsView, SearchHits, DISPLAY_LIMIT};
use catalog_logging::catalog_info;
use thiserror::Error;

use crate::store::{DocumentStore, FieldWeight, Fuzziness, SearchRequest, StoreError};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search in {index} failed: {source}")]
    Store {
        index: String,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub field: String,
    pub boost: f32,
    pub fuzziness: Fuzziness,
    pub page_size: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            field: "name".to_string(),
            boost: 3.0,
            fuzziness: Fuzziness::Auto,
            page_size: DISPLAY_LIMIT,
        }
    }
}

/// Ranked fuzzy search over product names.
pub struct QueryEngine<'a> {
    store: &'a dyn DocumentStore,
    index: &'a str,
    settings: QuerySettings,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a dyn DocumentStore, index: &'a str, settings: QuerySettings) -> Self {
        Self {
            store,
            index,
            settings,
        }
    }

    pub fn request_for(&self, text: &str) -> SearchRequest {
        SearchRequest {
            text: text.to_string(),
            fields: vec![FieldWeight {
                field: self.settings.field.clone(),
                boost: self.settings.boost,
            }],
            fuzziness: self.settings.fuzziness,
            size: self.settings.page_size,
        }
    }

    /// Hits in descending score order; `total` is the full match count.
    pub async fn search(&self, text: &str) -> Result<SearchHits, SearchError> {
        let request = self.request_for(text);
        let hits = self
            .store
            .query(self.index, &request)
            .await
            .map_err(|source| SearchError::Store {
                index: self.index.to_string(),
                source,
            })?;
        catalog_info!(
            "Query {:?} on {}: {} hit(s) returned, {} total",
            text,
            self.index,
            hits.hits.len(),
            hits.total
        );
        Ok(hits)
    }

    /// Renders at most [`DISPLAY_LIMIT`] entries followed by the total.
    pub fn render(hits: &SearchHits) -> String {
        render_results(&ResultsView::from_hits(hits, DISPLAY_LIMIT))
    }
}
