//! Auth configuration types
//!
//! These types represent the runtime auth configuration built from the tap config.

use serde::{Deserialize, Serialize};

/// How the API token is presented to PagerDuty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// REST API key, sent as `Authorization: Token token=<key>`
    #[default]
    Token,
    /// OAuth access token, sent as `Authorization: Bearer <token>`
    Bearer,
}

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// REST API key authentication
    Token {
        /// The API key value
        token: String,
    },

    /// OAuth bearer token authentication
    Bearer {
        /// The access token
        token: String,
    },
}

impl AuthConfig {
    /// Build auth config for a token of the given type
    pub fn from_token(token_type: TokenType, token: impl Into<String>) -> Self {
        let token = token.into();
        match token_type {
            TokenType::Token => Self::Token { token },
            TokenType::Bearer => Self::Bearer { token },
        }
    }

    /// Value of the `Authorization` header, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Token { token } => Some(format!("Token token={token}")),
            Self::Bearer { token } => Some(format!("Bearer {token}")),
        }
    }
}

// Credentials never reach logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Token { .. } => f.debug_struct("Token").finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}
