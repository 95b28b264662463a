//! Tests for formbind-model wire shapes.

use formbind_model::{
    BackendData, Column, ColumnKind, FieldMappingConfig, MappingSet, NormalizedDataset,
    NormalizedReport, ReportMetadata,
};
use serde_json::json;

#[test]
fn column_serializes_camel_case() {
    let column = Column::synthetic("CommodityKey", "Commodity Key");
    let json = serde_json::to_value(&column).expect("serialize column");
    assert_eq!(
        json,
        json!({
            "key": "CommodityKey",
            "displayLabel": "Commodity Key",
            "kind": "characteristic",
            "isSyntheticKey": true
        })
    );
}

#[test]
fn report_flattens_dataset_next_to_metadata() {
    let report = NormalizedReport {
        metadata: ReportMetadata {
            description: "Inventory".to_string(),
            loaded_at: None,
        },
        dataset: NormalizedDataset {
            columns: vec![Column::new("Value", "Value", ColumnKind::KeyFigure)],
            ..NormalizedDataset::default()
        },
    };
    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["metadata"]["description"], "Inventory");
    assert_eq!(json["columns"][0]["kind"], "keyFigure");
    assert_eq!(json["primaryAxisKey"], serde_json::Value::Null);
    let round: NormalizedReport = serde_json::from_value(json).expect("deserialize report");
    assert_eq!(round, report);
}

#[test]
fn backend_data_reads_transport_payload() {
    let data: BackendData = serde_json::from_value(json!({
        "header": [
            {"type": "CHA", "label": "Commodity", "fieldName": "ZSCMCMD"},
            {"type": "KF", "label": "Value", "fieldName": "VALUE002"}
        ],
        "chartData": [{"ZSCMCMD": "OCTG", "VALUE002": 51.4}]
    }))
    .expect("deserialize backend data");
    assert_eq!(data.header[1].field_name, "VALUE002");
    assert_eq!(data.chart_data[0]["VALUE002"], json!(51.4));
}

#[test]
fn mapping_set_round_trips() {
    let raw = json!({
        "chart": {
            "inputType": "hybrid",
            "hybridMapping": [
                {"field": "title", "type": "manual", "value": "Stock"},
                {
                    "field": "total",
                    "type": "mapped",
                    "value": {"chaField": "ZSCMCMD", "chaValue": "OCTG", "kfField": "VALUE002"}
                }
            ],
            "transformations": [{"kind": "custom", "params": {"name": "round"}}]
        },
        "name": {"inputType": "manual", "manualValue": "Active Inventory"}
    });
    let set: MappingSet = serde_json::from_value(raw.clone()).expect("deserialize mappings");
    assert!(matches!(set["chart"], FieldMappingConfig::Hybrid { .. }));
    assert_eq!(serde_json::to_value(&set).expect("serialize mappings"), raw);
}
