use catalog_core::ProductRecord;
use catalog_engine::{
    CatalogParser, ExtractError, FailureKind, ProductExtractor, ProductSelectors, ReqwestFetcher,
    FetchSettings,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG: &str = include_str!("fixtures/catalog.html");

fn parser() -> CatalogParser {
    CatalogParser::new(&ProductSelectors::default()).expect("default selectors compile")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn parses_every_tile_in_document_order() {
    catalog_logging::initialize_for_tests();
    let records = parser().parse(CATALOG);

    assert_eq!(
        records,
        vec![
            ProductRecord {
                name: Some("Kavrulmuş Badem".to_string()),
                prices: strings(&["120.50"]),
                quantities: strings(&["250 g"]),
            },
            ProductRecord {
                name: Some("Antep Fıstığı".to_string()),
                prices: strings(&["450.00", "860.00"]),
                quantities: strings(&["500 g", "1 kg"]),
            },
            ProductRecord {
                name: None,
                prices: strings(&["75.00", "99.90"]),
                quantities: vec![],
            },
            ProductRecord {
                name: Some("Çiğ Kaju".to_string()),
                prices: vec![],
                quantities: vec![],
            },
        ]
    );
}

#[test]
fn page_without_containers_yields_no_records() {
    let html = r#"<html><body><div class="col-md-6">Bakımdayız</div></body></html>"#;
    assert!(parser().parse(html).is_empty());
    assert!(parser().parse("").is_empty());
}

#[test]
fn blank_tile_is_still_emitted() {
    let html = r#"<div class="col-xl-4 col-lg-6 col-md-6 mt-4"><p>yakında</p></div>"#;
    let records = parser().parse(html);
    assert_eq!(records.len(), 1);
    assert!(records[0].is_blank());
}

#[test]
fn duplicate_tiles_are_not_merged() {
    let tile = r#"
        <div class="col-xl-4 col-lg-6 col-md-6 mt-4">
            <a class="text-decoration-none textBlack">Fındık</a>
            <div class="newPrice">90.00</div>
        </div>"#;
    let html = format!("<html><body>{tile}{tile}</body></html>");
    let records = parser().parse(&html);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[test]
fn only_first_name_element_is_used() {
    let html = r#"
        <div class="col-xl-4 col-lg-6 col-md-6 mt-4">
            <a class="text-decoration-none textBlack">  Ceviz İçi </a>
            <a class="text-decoration-none textBlack">Ceviz (kampanya)</a>
        </div>"#;
    let records = parser().parse(html);
    assert_eq!(records[0].name.as_deref(), Some("Ceviz İçi"));
}

#[test]
fn name_requires_exact_class_value() {
    let html = r#"
        <div class="col-xl-4 col-lg-6 col-md-6 mt-4">
            <a class="text-decoration-none textBlack active">Leblebi</a>
        </div>"#;
    assert_eq!(parser().parse(html)[0].name, None);
}

#[test]
fn invalid_selector_is_reported() {
    let selectors = ProductSelectors {
        price: "div[class*=".to_string(),
        ..ProductSelectors::default()
    };
    let err = CatalogParser::new(&selectors).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidSelector { field: "price", .. }));
}

#[tokio::test]
async fn extractor_fetches_and_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Kategori"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CATALOG, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let extractor = ProductExtractor::new(&fetcher, parser());
    let records = extractor
        .extract(&format!("{}/Kategori", server.uri()))
        .await
        .expect("extract ok");
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].name.as_deref(), Some("Kavrulmuş Badem"));
}

#[tokio::test]
async fn extractor_reports_fetch_failure_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Kategori"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let extractor = ProductExtractor::new(&fetcher, parser());
    let err = extractor
        .extract(&format!("{}/Kategori", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}
