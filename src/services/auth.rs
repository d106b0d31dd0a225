use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Identity of an authenticated caller
///
/// Used for logging only; recommendations never depend on who asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub user_id: String,
}

/// Validates opaque bearer credentials
///
/// Token issuance lives outside this service; implementations only decide
/// whether a presented token is acceptable and whose it is.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> AppResult<Caller>;
}

/// Authenticator backed by a fixed token table
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, String>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    /// Builds the table from `token:user_id` entries; blank entries are skipped
    pub fn from_entries(entries: &[String]) -> AppResult<Self> {
        let mut tokens = HashMap::new();

        for entry in entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
            let (token, user_id) = entry
                .split_once(':')
                .map(|(t, u)| (t.trim(), u.trim()))
                .filter(|(t, u)| !t.is_empty() && !u.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput(
                        "API token entries must have the form token:user_id".to_string(),
                    )
                })?;
            tokens.insert(token.to_string(), user_id.to_string());
        }

        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait::async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> AppResult<Caller> {
        self.tokens
            .get(token)
            .map(|user_id| Caller {
                user_id: user_id.clone(),
            })
            .ok_or_else(|| AppError::Unauthorized("Invalid bearer token".to_string()))
    }
}
