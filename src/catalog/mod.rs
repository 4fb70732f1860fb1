//! Catalog module
//!
//! Stream schemas and discovery.
//!
//! # Overview
//!
//! Every stream ships a JSON schema embedded in the binary. Discovery loads
//! each schema, inlines its `#/definitions/...` references, and pairs it
//! with key-property and field-inclusion metadata.
//!
//! A catalog can also be supplied from a file; syncing only reads each
//! entry's `tap_stream_id` and `schema`.

mod schemas;
mod types;

pub use schemas::{discover, generate_metadata, load_schema, raw_schema, resolve_refs};
pub use types::{Catalog, CatalogEntry, MetadataEntry};

#[cfg(test)]
mod tests;
