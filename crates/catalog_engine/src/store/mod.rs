//! Document store port and its adapters.
//!
//! The pipeline only needs four operations from a search backend: check that
//! an index exists, create it, write one document, and run a weighted fuzzy
//! query ordered by relevance. [`DocumentStore`] captures exactly those so the
//! backend can be swapped (Elasticsearch in production, [`MemoryStore`] in
//! tests).

mod elastic;
mod memory;

use catalog_core::{ProductRecord, SearchHits};

pub use elastic::{ElasticsearchStore, StoreSettings};
pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store url {0}")]
    InvalidUrl(String),
    #[error("store unreachable: {0}")]
    Transport(String),
    #[error("store returned status {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("malformed store response: {0}")]
    Decode(String),
    #[error("index {0} does not exist")]
    IndexNotFound(String),
    #[error("store backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Analyzed full text, with an exact `keyword` sub-field.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Index layout inferred from the record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub fields: Vec<FieldSpec>,
}

impl IndexSchema {
    /// Every `ProductRecord` field holds text (or a list of text), so each
    /// maps to a text field.
    pub fn for_product_record() -> Self {
        let fields = ["name", "prices", "quantities"]
            .into_iter()
            .map(|name| FieldSpec {
                name,
                kind: FieldKind::Text,
            })
            .collect();
        Self { fields }
    }
}

/// Edit-distance tolerance for query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// 0 edits up to 2 chars, 1 edit up to 5 chars, 2 edits beyond.
    Auto,
    Edits(u8),
}

impl Fuzziness {
    pub fn max_edits(&self, term: &str) -> usize {
        match self {
            Fuzziness::Auto => match term.chars().count() {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
            Fuzziness::Edits(edits) => usize::from(*edits),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeight {
    pub field: String,
    pub boost: f32,
}

/// Multi-field fuzzy match, always ordered by descending relevance.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub text: String,
    pub fields: Vec<FieldWeight>,
    pub fuzziness: Fuzziness,
    /// Number of hits to return; the reported total is not capped by it.
    pub size: usize,
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError>;

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), StoreError>;

    async fn upsert(&self, index: &str, record: &ProductRecord) -> Result<(), StoreError>;

    async fn query(&self, index: &str, request: &SearchRequest)
        -> Result<SearchHits, StoreError>;
}
