//! Catalog engine: page fetch, product extraction, loading and search.
mod decode;
mod extract;
mod fetch;
mod load;
mod marker;
mod pipeline;
mod query;
pub mod store;
mod types;

pub use extract::{CatalogParser, ExtractError, ProductExtractor, ProductSelectors};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use load::{LoadController, LoadError};
pub use marker::{CompletionMarker, FileMarker, MarkerError, MarkerSettings};
pub use pipeline::{Pipeline, PipelineConfig, RunReport};
pub use query::{QueryEngine, QuerySettings, SearchError};
pub use store::{
    DocumentStore, ElasticsearchStore, Fuzziness, IndexSchema, MemoryStore, SearchRequest,
    StoreError, StoreSettings,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchedPage};
