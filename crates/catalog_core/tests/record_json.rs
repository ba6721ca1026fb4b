use catalog_core::ProductRecord;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn record_serializes_with_stable_field_names() {
    let record = ProductRecord {
        name: Some("Antep Fıstığı".to_string()),
        prices: vec!["450,00 TL".to_string()],
        quantities: vec!["500 g".to_string()],
    };
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "name": "Antep Fıstığı",
            "prices": ["450,00 TL"],
            "quantities": ["500 g"]
        })
    );
}

#[test]
fn missing_sequences_default_to_empty() {
    let record: ProductRecord = serde_json::from_value(json!({ "name": null })).unwrap();
    assert_eq!(record, ProductRecord::default());
    assert!(record.is_blank());
}
