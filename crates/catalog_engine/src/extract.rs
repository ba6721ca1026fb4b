use catalog_core::ProductRecord;
use catalog_logging::{catalog_debug, catalog_info};
use scraper::{ElementRef, Html, Selector};

use crate::fetch::PageFetcher;
use crate::FetchError;

/// CSS selectors describing one product tile on the catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSelectors {
    pub container: String,
    pub name: String,
    pub price: String,
    pub quantity: String,
}

impl Default for ProductSelectors {
    fn default() -> Self {
        Self {
            container: r#"div[class*="col-xl-4 col-lg-6 col-md-6 mt-4"]"#.to_string(),
            name: r#"a[class="text-decoration-none textBlack"]"#.to_string(),
            price: r#"div[class*="newPrice"]"#.to_string(),
            quantity: r#"span[class*="productQuantityText"]"#.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid {field} selector {selector:?}: {message}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

/// Turns catalog markup into product records.
#[derive(Debug)]
pub struct CatalogParser {
    container: Selector,
    name: Selector,
    price: Selector,
    quantity: Selector,
}

impl CatalogParser {
    pub fn new(selectors: &ProductSelectors) -> Result<Self, ExtractError> {
        Ok(Self {
            container: compile("container", &selectors.container)?,
            name: compile("name", &selectors.name)?,
            price: compile("price", &selectors.price)?,
            quantity: compile("quantity", &selectors.quantity)?,
        })
    }

    /// One record per container, in document order. A page without any
    /// container yields an empty list.
    pub fn parse(&self, html: &str) -> Vec<ProductRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.container)
            .map(|tile| self.parse_tile(tile))
            .collect()
    }

    // Each lookup stands alone; a missing field never stops the others.
    fn parse_tile(&self, tile: ElementRef<'_>) -> ProductRecord {
        ProductRecord::builder()
            .name(first_text(tile, &self.name))
            .prices(all_text(tile, &self.price))
            .quantities(all_text(tile, &self.quantity))
            .build()
    }
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::InvalidSelector {
        field,
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(tile: ElementRef<'_>, selector: &Selector) -> Option<String> {
    tile.select(selector).next().map(element_text)
}

fn all_text(tile: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    tile.select(selector).map(element_text).collect()
}

/// Fetches the catalog page and parses it into records.
pub struct ProductExtractor<'a> {
    fetcher: &'a dyn PageFetcher,
    parser: CatalogParser,
}

impl<'a> ProductExtractor<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, parser: CatalogParser) -> Self {
        Self { fetcher, parser }
    }

    pub async fn extract(&self, url: &str) -> Result<Vec<ProductRecord>, FetchError> {
        let page = self.fetcher.fetch(url).await?;
        catalog_debug!(
            "Parsing {} bytes from {}",
            page.metadata.byte_len,
            page.metadata.final_url
        );
        let records = self.parser.parse(&page.html);
        catalog_info!("Extracted {} product(s) from {}", records.len(), url);
        Ok(records)
    }
}
