//! Store extractor for handlers that talk to PostgreSQL.
//!
//! Resolves the database handle from application state. When the state was built
//! without one, the request is rejected with 500 before any parameter is looked at.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;
use std::sync::Arc;

use crate::services::Database;
use crate::startup::AppState;

/// Database handle taken from [`AppState`].
#[derive(Clone)]
pub struct Store(pub Arc<Database>);

#[async_trait]
impl FromRequestParts<AppState> for Store {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match &state.db {
            Some(db) => Ok(Store(db.clone())),
            None => {
                tracing::error!(path = %parts.uri.path(), "Database not initialized");
                Err(AppError::InternalError(anyhow::anyhow!(
                    "database not initialized"
                )))
            }
        }
    }
}
