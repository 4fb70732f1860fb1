//! Tests for the catalog module

use super::*;
use crate::error::Error;
use crate::streams::StreamKind;
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn defs(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

fn contains_ref(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Object(obj) => obj.contains_key("$ref") || obj.values().any(contains_ref),
        serde_json::Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}

// ============================================================================
// Reference Resolution
// ============================================================================

#[test]
fn test_resolve_refs_inlines_definition() {
    let definitions = defs(json!({
        "reference": {"type": "object", "properties": {"id": {"type": "string"}}}
    }));
    let schema = json!({
        "properties": {
            "service": {"$ref": "#/definitions/reference"},
            "teams": {"type": "array", "items": {"$ref": "#/definitions/reference"}}
        }
    });

    let resolved = resolve_refs(&schema, &definitions, 0).unwrap();
    assert_eq!(
        resolved,
        json!({
            "properties": {
                "service": {"type": "object", "properties": {"id": {"type": "string"}}},
                "teams": {
                    "type": "array",
                    "items": {"type": "object", "properties": {"id": {"type": "string"}}}
                }
            }
        })
    );
}

#[test]
fn test_resolve_refs_nested_definitions() {
    let definitions = defs(json!({
        "outer": {"type": "object", "properties": {"inner": {"$ref": "#/definitions/inner"}}},
        "inner": {"type": "string"}
    }));
    let schema = json!({"$ref": "#/definitions/outer"});

    let resolved = resolve_refs(&schema, &definitions, 0).unwrap();
    assert_eq!(
        resolved,
        json!({"type": "object", "properties": {"inner": {"type": "string"}}})
    );
}

#[test]
fn test_resolve_refs_unknown_definition() {
    let schema = json!({"$ref": "#/definitions/missing"});
    let err = resolve_refs(&schema, &JsonObject::new(), 0).unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[test]
fn test_resolve_refs_cycle() {
    let definitions = defs(json!({
        "a": {"$ref": "#/definitions/b"},
        "b": {"$ref": "#/definitions/a"}
    }));
    let err = resolve_refs(&json!({"$ref": "#/definitions/a"}), &definitions, 0).unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn test_resolve_refs_external_ref_rejected() {
    let schema = json!({"$ref": "other.json#/x"});
    assert!(resolve_refs(&schema, &JsonObject::new(), 0).is_err());
}

// ============================================================================
// Embedded Schemas
// ============================================================================

#[test]
fn test_every_stream_has_schema() {
    for kind in StreamKind::ALL {
        let schema = load_schema(kind).unwrap();
        assert!(schema.get("definitions").is_none(), "{kind}");
        assert!(!contains_ref(&schema), "{kind}");
        assert!(schema["properties"].get("id").is_some(), "{kind}");
    }
}

#[test]
fn test_incident_schema_reference_inlined() {
    let schema = load_schema(StreamKind::Incidents).unwrap();
    assert_eq!(
        schema["properties"]["service"]["properties"]["id"],
        json!({"type": ["null", "string"]})
    );
}

// ============================================================================
// Metadata
// ============================================================================

#[test]
fn test_generate_metadata() {
    let schema = json!({
        "properties": {
            "id": {"type": "string"},
            "name": {"type": ["null", "string"]}
        }
    });

    let metadata = generate_metadata(StreamKind::Teams, &schema);
    let value = serde_json::to_value(&metadata).unwrap();

    assert_eq!(
        value,
        json!([
            {"breadcrumb": [], "metadata": {"table-key-properties": ["id"]}},
            {"breadcrumb": ["properties", "id"], "metadata": {"inclusion": "automatic"}},
            {"breadcrumb": ["properties", "name"], "metadata": {"inclusion": "available"}}
        ])
    );
}

#[test]
fn test_generate_metadata_without_properties() {
    let metadata = generate_metadata(StreamKind::Vendors, &json!({"type": "object"}));
    assert_eq!(metadata.len(), 1);
    assert!(metadata[0].breadcrumb.is_empty());
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discover_lists_all_streams() {
    let catalog = discover().unwrap();

    assert_eq!(
        catalog.stream_ids(),
        vec![
            "incidents",
            "alerts",
            "escalation_policies",
            "services",
            "teams",
            "users",
            "vendors"
        ]
    );

    for entry in &catalog.streams {
        assert_eq!(entry.stream, entry.tap_stream_id);
        assert_eq!(entry.key_properties, vec!["id".to_string()]);
        assert!(!entry.metadata.is_empty());
    }
}

#[test]
fn test_discover_serializes_like_singer_catalog() {
    let catalog = discover().unwrap();
    let value = serde_json::to_value(&catalog).unwrap();

    let first = &value["streams"][0];
    assert_eq!(first["stream"], "incidents");
    assert_eq!(first["tap_stream_id"], "incidents");
    assert_eq!(first["key_properties"], json!(["id"]));
    assert_eq!(
        first["metadata"][0],
        json!({"breadcrumb": [], "metadata": {"table-key-properties": ["id"]}})
    );
}

// ============================================================================
// Catalog Files
// ============================================================================

#[test]
fn test_catalog_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{"streams": [{"tap_stream_id": "teams", "schema": {"type": "object"}}]}"#,
    )
    .unwrap();

    let catalog = Catalog::from_file(&path).unwrap();
    assert_eq!(catalog.stream_ids(), vec!["teams"]);
    assert!(catalog.get("teams").unwrap().metadata.is_empty());
}

#[test]
fn test_catalog_from_missing_file() {
    let err = Catalog::from_file("/nonexistent/catalog.json").unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_catalog_filter_keeps_order() {
    let catalog = discover().unwrap();
    let filtered = catalog.filter(&["users".to_string(), "incidents".to_string()]);
    assert_eq!(filtered.stream_ids(), vec!["incidents", "users"]);
}
