//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Bookmark key of the incidents stream
pub const INCIDENTS_SINCE: &str = "since";

/// Per-stream bookmark values
pub type Bookmarks = BTreeMap<String, BTreeMap<String, Value>>;

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Bookmarks keyed by stream, then by bookmark key
    #[serde(default)]
    pub bookmarks: Bookmarks,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a bookmark value
    pub fn get_bookmark(&self, stream: &str, key: &str) -> Option<&Value> {
        self.bookmarks.get(stream)?.get(key)
    }

    /// Return a copy of this state with one bookmark replaced
    #[must_use]
    pub fn with_bookmark(&self, stream: &str, key: &str, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.bookmarks
            .entry(stream.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        next
    }

    /// Whether no bookmark is recorded
    pub fn is_empty(&self) -> bool {
        self.bookmarks.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_state_default() {
        let state = State::new();
        assert!(state.is_empty());
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({"bookmarks": {}}));
    }

    #[test]
    fn test_with_bookmark_is_pure() {
        let state = State::new();
        let next = state.with_bookmark("incidents", INCIDENTS_SINCE, "2023-03-01T00:00:00.000");

        assert!(state.get_bookmark("incidents", INCIDENTS_SINCE).is_none());
        assert_eq!(
            next.get_bookmark("incidents", INCIDENTS_SINCE),
            Some(&json!("2023-03-01T00:00:00.000"))
        );
    }

    #[test]
    fn test_with_bookmark_keeps_other_streams() {
        let state: State = serde_json::from_value(json!({
            "bookmarks": {
                "incidents": {"since": "2022-01-01T00:00:00.000"},
                "custom": {"cursor": 42}
            }
        }))
        .unwrap();

        let next = state.with_bookmark("incidents", INCIDENTS_SINCE, "2023-01-01T00:00:00.000");

        assert_eq!(
            serde_json::to_value(&next).unwrap(),
            json!({
                "bookmarks": {
                    "custom": {"cursor": 42},
                    "incidents": {"since": "2023-01-01T00:00:00.000"}
                }
            })
        );
    }

    #[test]
    fn test_missing_bookmarks_key() {
        let state: State = serde_json::from_str("{}").unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_non_string_bookmark_is_kept_raw() {
        let state = State::new().with_bookmark("incidents", INCIDENTS_SINCE, 5);
        assert_eq!(state.get_bookmark("incidents", INCIDENTS_SINCE), Some(&json!(5)));
    }
}
