//! Integration tests for loading sources from disk.

use std::fs;
use std::path::PathBuf;

use formbind_ingest::{IngestError, Source, load_json, load_source, load_value};
use formbind_model::MappingSet;
use formbind_normalize::{NormalizeOptions, normalize_backend, normalize_document};
use serde_json::json;
use tempfile::TempDir;

const INVENTORY_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<asx:abap xmlns:asx="http://www.sap.com/abapxml" version="1.0">
  <asx:values>
    <metadata>
      <description>Inventory by commodity</description>
      <load_date>01/15/2024 10:30:00</load_date>
    </metadata>
    <META>
      <columnMetadata>
        <label>Plant</label>
        <fieldIdentifier>0PLANT</fieldIdentifier>
        <type>CHA</type>
      </columnMetadata>
      <columnMetadata>
        <label>Commodity</label>
        <fieldIdentifier>ZSCMCMD</fieldIdentifier>
        <type>CHA</type>
        <expanded><label>Commodity</label></expanded>
      </columnMetadata>
      <columnMetadata>
        <label>Value</label>
        <fieldIdentifier>VALUE002</fieldIdentifier>
        <type>KF</type>
      </columnMetadata>
    </META>
    <OUTPUT>
      <item><value>P100</value><value>OCTG</value><value>51.4</value><value>C01</value></item>
      <item><value>P100</value><value>Line Pipe</value><value>12</value><value>C02</value></item>
      <item><value>Overall Result</value><value/><value>63.4</value><value/></item>
    </OUTPUT>
  </asx:values>
</asx:abap>
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn markup_export_normalizes_like_json() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inventory.xml", INVENTORY_XML);

    let Source::Report(document) = load_source(&path).unwrap() else {
        panic!("markup must load as a report");
    };
    let report = normalize_document(&document, &NormalizeOptions::default()).unwrap();

    let keys: Vec<&str> = report
        .dataset
        .columns
        .iter()
        .map(|c| c.key.as_str())
        .collect();
    assert_eq!(keys, ["CommodityKey", "Commodity", "Plant", "Value"]);
    assert_eq!(report.dataset.rows.len(), 2);
    assert_eq!(report.dataset.rows[1].text("Commodity"), "Line Pipe");
    assert_eq!(report.dataset.rows[1].get("Value"), Some(&json!(12)));
    assert_eq!(report.metadata.description, "Inventory by commodity");
    assert!(report.metadata.loaded_at.is_some());
}

#[test]
fn backend_json_is_recognized() {
    let dir = TempDir::new().unwrap();
    let payload = json!({
        "header": [
            {"type": "CHA", "label": "Commodity", "fieldName": "ZSCMCMD"},
            {"type": "KF", "label": "Value", "fieldName": "VALUE002"}
        ],
        "chartData": [{"ZSCMCMD": "OCTG", "VALUE002": 51.4}]
    });
    let path = write(&dir, "backend.json", &payload.to_string());

    let Source::Backend(data) = load_source(&path).unwrap() else {
        panic!("header and chartData mark a backend payload");
    };
    let dataset = normalize_backend(&data, &NormalizeOptions::default()).unwrap();
    assert_eq!(dataset.primary_axis_key.as_deref(), Some("ZSCMCMD"));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.xml");
    let err = load_source(&path).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
    assert!(err.to_string().contains("absent.xml"));
}

#[test]
fn malformed_markup_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.xml", "<values><META></values>");
    assert!(load_source(&path).is_err());
}

#[test]
fn mapping_set_loads_from_json() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "mapping.json",
        r#"{
            "title": {"inputType": "manual", "manualValue": "Inventory"},
            "value": {
                "inputType": "mapped",
                "mappedConfig": {"chaField": "ZSCMCMD", "chaValue": "OCTG", "kfField": "VALUE002"}
            }
        }"#,
    );
    let mapping: MappingSet = load_json(&path).unwrap();
    assert_eq!(mapping.len(), 2);
    assert!(mapping.contains_key("title"));
}

#[test]
fn raw_values_load_from_either_format() {
    let dir = TempDir::new().unwrap();
    let xml = write(&dir, "props.xml", "<props><title>Stock</title></props>");
    let json = write(&dir, "props.json", r#"{"title": "Stock"}"#);
    assert_eq!(load_value(&xml).unwrap(), load_value(&json).unwrap());
}
