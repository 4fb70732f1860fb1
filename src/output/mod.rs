//! Output module
//!
//! Serializes tap messages onto the data stream.
//!
//! # Overview
//!
//! Three message kinds are written, one JSON object each:
//! - `SCHEMA` - the schema and key properties of a stream, before its records
//! - `RECORD` - one extracted record
//! - `STATE` - the bookmark document after a commit
//!
//! Sinks are shared between stream tasks, so `emit` takes `&self` and each
//! message is written whole.

mod sink;
mod types;

pub use sink::{MemorySink, MessageSink, StdoutSink, WriterSink};
pub use types::Message;

#[cfg(test)]
mod tests;
