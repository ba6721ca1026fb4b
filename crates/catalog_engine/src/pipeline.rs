use std::time::{Duration, Instant};

use catalog_core::{LoadOutcome, SearchHits, Stage};
use catalog_logging::{catalog_error, catalog_info, catalog_warn};

use crate::extract::{CatalogParser, ExtractError, ProductExtractor, ProductSelectors};
use crate::fetch::PageFetcher;
use crate::load::LoadController;
use crate::marker::CompletionMarker;
use crate::query::{QueryEngine, QuerySettings};
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub catalog_url: String,
    pub index: String,
    pub query: String,
    pub selectors: ProductSelectors,
    pub query_settings: QuerySettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://cumbakuruyemis.com/Kategori".to_string(),
            index: "cumbakuruyemish".to_string(),
            query: "badem".to_string(),
            selectors: ProductSelectors::default(),
            query_settings: QuerySettings::default(),
        }
    }
}

/// What one run did. Failed phases leave their field empty.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub index_created: Option<bool>,
    pub extracted: usize,
    pub load: Option<LoadOutcome>,
    pub hits: Option<SearchHits>,
    pub rendered: Option<String>,
    /// Time spent querying and rendering.
    pub search_elapsed: Duration,
}

/// Runs ensure-index, extract, load and search in sequence.
///
/// A failing phase is logged and the run moves on; only the search output
/// depends on the search phase succeeding.
pub struct Pipeline<'a> {
    config: PipelineConfig,
    parser: CatalogParser,
    fetcher: &'a dyn PageFetcher,
    store: &'a dyn DocumentStore,
    marker: &'a dyn CompletionMarker,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        fetcher: &'a dyn PageFetcher,
        store: &'a dyn DocumentStore,
        marker: &'a dyn CompletionMarker,
    ) -> Result<Self, ExtractError> {
        let parser = CatalogParser::new(&config.selectors)?;
        Ok(Self {
            config,
            parser,
            fetcher,
            store,
            marker,
        })
    }

    pub async fn run(self) -> RunReport {
        let mut report = RunReport::default();
        let loader = LoadController::new(self.store, self.marker, &self.config.index);

        log_stage(Stage::EnsureIndex);
        match loader.ensure_index().await {
            Ok(created) => report.index_created = Some(created),
            Err(err) => catalog_error!("{}", err),
        }

        log_stage(Stage::Extracting);
        let extractor = ProductExtractor::new(self.fetcher, self.parser);
        let records = match extractor.extract(&self.config.catalog_url).await {
            Ok(records) => records,
            Err(err) => {
                catalog_error!("Fetching {} failed: {}", self.config.catalog_url, err);
                Vec::new()
            }
        };
        report.extracted = records.len();
        if records.is_empty() {
            catalog_warn!("No products extracted from {}", self.config.catalog_url);
        }

        log_stage(Stage::Loading);
        match loader.ensure_indexed(&records).await {
            Ok(outcome) => report.load = Some(outcome),
            Err(err) => catalog_error!("Load aborted: {}", err),
        }

        log_stage(Stage::Searching);
        let started = Instant::now();
        let engine = QueryEngine::new(
            self.store,
            &self.config.index,
            self.config.query_settings.clone(),
        );
        match engine.search(&self.config.query).await {
            Ok(hits) => {
                report.rendered = Some(QueryEngine::render(&hits));
                report.hits = Some(hits);
            }
            Err(err) => catalog_error!("{}", err),
        }
        report.search_elapsed = started.elapsed();

        log_stage(Stage::Done);
        report
    }
}

fn log_stage(stage: Stage) {
    catalog_info!("Stage: {}", stage);
}
