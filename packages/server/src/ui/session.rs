//! Login sessions.
//!
//! A token is an opaque UUID bound to the user id given at login.
//! Credentials are not checked.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::UserId;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Default)]
pub struct SessionStore {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl SessionStore {
    /// Issue a fresh token for `user_id`.
    ///
    /// Logging in again issues another token; earlier ones stay valid.
    pub async fn login(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        tracing::info!("User '{}' logged in", user_id);
        self.tokens.write().await.insert(token.clone(), user_id);
        token
    }

    /// Resolve an `Authorization` header value (`Bearer <token>` or the bare token).
    pub async fn resolve(&self, authorization: &str) -> Option<UserId> {
        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .unwrap_or(authorization)
            .trim();
        self.tokens.read().await.get(token).cloned()
    }
}
