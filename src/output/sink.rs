//! Message sinks

use super::types::Message;
use crate::error::{Error, Result};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Destination for tap messages
pub trait MessageSink: Send + Sync {
    /// Write one message
    fn emit(&self, message: &Message) -> Result<()>;
}

// ============================================================================
// Writer Sink
// ============================================================================

/// Writes messages as JSON to any writer
///
/// Compact mode writes one object per line; pretty mode indents each object.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
    pretty: bool,
}

/// Sink writing to the process's stdout
pub type StdoutSink = WriterSink<std::io::Stdout>;

impl StdoutSink {
    /// Compact JSON lines on stdout
    pub fn json() -> Self {
        WriterSink::new(std::io::stdout(), false)
    }

    /// Pretty-printed JSON on stdout
    pub fn pretty() -> Self {
        WriterSink::new(std::io::stdout(), true)
    }
}

impl<W: Write + Send> WriterSink<W> {
    /// Create a sink over `writer`
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> MessageSink for WriterSink<W> {
    fn emit(&self, message: &Message) -> Result<()> {
        let line = if self.pretty {
            serde_json::to_string_pretty(message)?
        } else {
            serde_json::to_string(message)?
        };

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::output("output writer lock poisoned"))?;
        writeln!(writer, "{line}").map_err(|e| Error::output(format!("write failed: {e}")))?;
        writer
            .flush()
            .map_err(|e| Error::output(format!("flush failed: {e}")))
    }
}

// ============================================================================
// Memory Sink
// ============================================================================

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<Message>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record bodies of one stream, in emission order
    pub fn records(&self, stream: &str) -> Vec<serde_json::Value> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// State messages in emission order
    pub fn states(&self) -> Vec<crate::state::State> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Number of collected messages
    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for MemorySink {
    fn emit(&self, message: &Message) -> Result<()> {
        self.messages
            .lock()
            .map_err(|_| Error::output("memory sink lock poisoned"))?
            .push(message.clone());
        Ok(())
    }
}
