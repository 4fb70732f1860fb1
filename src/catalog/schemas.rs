//! Embedded schemas and discovery

use super::types::{Catalog, CatalogEntry, MetadataEntry};
use crate::error::{Error, Result};
use crate::streams::StreamKind;
use crate::types::{Inclusion, JsonObject, JsonValue};
use serde_json::json;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Nesting limit while inlining references; deeper means a cycle
const MAX_REF_DEPTH: usize = 32;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Built-in stream schemas
static RAW_SCHEMAS: LazyLock<HashMap<StreamKind, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(StreamKind::Incidents, include_str!("../../schemas/incidents.json"));
    m.insert(StreamKind::Alerts, include_str!("../../schemas/alerts.json"));
    m.insert(
        StreamKind::EscalationPolicies,
        include_str!("../../schemas/escalation_policies.json"),
    );
    m.insert(StreamKind::Services, include_str!("../../schemas/services.json"));
    m.insert(StreamKind::Teams, include_str!("../../schemas/teams.json"));
    m.insert(StreamKind::Users, include_str!("../../schemas/users.json"));
    m.insert(StreamKind::Vendors, include_str!("../../schemas/vendors.json"));

    m
});

/// Raw embedded schema text for a stream
pub fn raw_schema(kind: StreamKind) -> Option<&'static str> {
    RAW_SCHEMAS.get(&kind).copied()
}

/// Load a stream schema with its definitions inlined
pub fn load_schema(kind: StreamKind) -> Result<JsonValue> {
    let raw = raw_schema(kind).ok_or_else(|| Error::schema(kind.name(), "no embedded schema"))?;
    let mut schema: JsonValue = serde_json::from_str(raw)
        .map_err(|e| Error::schema(kind.name(), format!("invalid schema JSON: {e}")))?;

    let definitions = match schema.as_object_mut() {
        Some(obj) => match obj.remove("definitions") {
            Some(JsonValue::Object(defs)) => defs,
            Some(_) => return Err(Error::schema(kind.name(), "'definitions' must be an object")),
            None => JsonObject::new(),
        },
        None => return Err(Error::schema(kind.name(), "schema must be an object")),
    };

    resolve_refs(&schema, &definitions, 0).map_err(|e| match e {
        Error::Schema { message, .. } => Error::schema(kind.name(), message),
        other => other,
    })
}

/// Replace every `{"$ref": "#/definitions/x"}` with the definition of `x`
///
/// Definitions may reference each other; a chain deeper than the nesting
/// limit is reported as a cycle.
pub fn resolve_refs(value: &JsonValue, definitions: &JsonObject, depth: usize) -> Result<JsonValue> {
    if depth > MAX_REF_DEPTH {
        return Err(Error::schema("", "reference cycle in definitions"));
    }

    match value {
        JsonValue::Object(obj) => {
            if let Some(JsonValue::String(reference)) = obj.get("$ref") {
                let name = reference
                    .strip_prefix(DEFINITIONS_PREFIX)
                    .ok_or_else(|| Error::schema("", format!("unsupported $ref '{reference}'")))?;
                let target = definitions
                    .get(name)
                    .ok_or_else(|| Error::schema("", format!("unknown definition '{name}'")))?;
                return resolve_refs(target, definitions, depth + 1);
            }

            let mut out = JsonObject::new();
            for (key, child) in obj {
                out.insert(key.clone(), resolve_refs(child, definitions, depth)?);
            }
            Ok(JsonValue::Object(out))
        }
        JsonValue::Array(items) => items
            .iter()
            .map(|item| resolve_refs(item, definitions, depth))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        other => Ok(other.clone()),
    }
}

/// Key-property and field-inclusion metadata for a schema
pub fn generate_metadata(kind: StreamKind, schema: &JsonValue) -> Vec<MetadataEntry> {
    let keys = kind.key_properties();

    let mut table = JsonObject::new();
    table.insert("table-key-properties".to_string(), json!(keys));
    let mut entries = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        metadata: table,
    }];

    if let Some(properties) = schema.get("properties").and_then(JsonValue::as_object) {
        for field in properties.keys() {
            let inclusion = if keys.contains(&field.as_str()) {
                Inclusion::Automatic
            } else {
                Inclusion::Available
            };
            let mut metadata = JsonObject::new();
            metadata.insert("inclusion".to_string(), json!(inclusion));
            entries.push(MetadataEntry {
                breadcrumb: vec!["properties".to_string(), field.clone()],
                metadata,
            });
        }
    }

    entries
}

/// Build the catalog of every stream
pub fn discover() -> Result<Catalog> {
    let streams = StreamKind::ALL
        .into_iter()
        .map(|kind| {
            let schema = load_schema(kind)?;
            let metadata = generate_metadata(kind, &schema);
            Ok(CatalogEntry {
                stream: kind.name().to_string(),
                tap_stream_id: kind.name().to_string(),
                schema,
                metadata,
                key_properties: kind.key_properties().iter().map(ToString::to_string).collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog { streams })
}
