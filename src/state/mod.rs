//! State management module
//!
//! Bookmark tracking between sync runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - the `{"bookmarks": {stream: {key: value}}}` document
//! - `StateManager` - shared, file-backed store that commits new snapshots
//!
//! Updates are pure: [`State::with_bookmark`] returns a new snapshot which is
//! then handed to [`StateManager::commit`].

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{Bookmarks, State, INCIDENTS_SINCE};
