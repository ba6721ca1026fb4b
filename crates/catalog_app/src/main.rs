mod config;

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use catalog_engine::{ElasticsearchStore, FetchSettings, FileMarker, Pipeline, ReqwestFetcher};
use catalog_logging::catalog_info;

use config::{AppConfig, CONFIG_FILENAME};

fn main() -> anyhow::Result<()> {
    let started = Instant::now();

    let config = AppConfig::load_or_default(Path::new(CONFIG_FILENAME))?;
    if !catalog_logging::initialize(config.log_destination(), config.level()?) {
        eprintln!("Warning: logging is not available for this run");
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let store = ElasticsearchStore::new(&config.store())?;
    let marker = FileMarker::new(config.marker());
    let pipeline = Pipeline::new(config.pipeline(), &fetcher, &store, &marker)?;

    let report = runtime.block_on(pipeline.run());
    if let Some(rendered) = &report.rendered {
        print!("{rendered}");
    }
    catalog_info!(
        "Run finished: {} extracted, load {:?}",
        report.extracted,
        report.load
    );

    println!(
        "Search completed in {} ms.",
        report.search_elapsed.as_millis()
    );
    println!("All completed in {} ms.", started.elapsed().as_millis());
    Ok(())
}
