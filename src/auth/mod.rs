//! Authentication module
//!
//! Supports: PagerDuty REST API tokens (`Token token=...`) and OAuth bearer tokens.
//!
//! The `Authenticator` attaches the configured credential to every outbound request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, TokenType};
