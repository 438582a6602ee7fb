//! Site-wide visit counter.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/site-stats` | `{ visits }`, 0 before the first hit |
//! | `POST` | `/site-stats` | Records one visit, returns the new total |

use axum::{Json, extract::State};
use serde_json::json;
use vitrina_core::{mailer::Mailer, store::ShowcaseStore};

use crate::{AppState, error::ApiError};

/// `GET /site-stats`
pub async fn get<S, M>(
  State(state): State<AppState<S, M>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let visits = state
    .store
    .site_visits()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({ "visits": visits })))
}

/// `POST /site-stats`
pub async fn record<S, M>(
  State(state): State<AppState<S, M>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let visits = state
    .store
    .increment_site_visits()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({ "visits": visits })))
}
