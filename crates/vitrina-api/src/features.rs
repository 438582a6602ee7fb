//! Handlers for the feature-request verification flow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/projects/:id/features` | With votes, most-voted first |
//! | `POST` | `/projects/:id/features` | 403 — direct writes are disabled |
//! | `POST` | `/projects/:id/features/request` | Body: [`FeatureRequestBody`] |
//! | `POST` | `/features/verify` | Body: [`VerifyBody`]; returns 201 + feature |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use vitrina_core::{
  feature::FeatureWithVotes,
  flow::VerifiedAction,
  mailer::Mailer,
  store::ShowcaseStore,
  verification::{ActionKind, ActionPayload, FeaturePayload},
};

use crate::{AppState, VerifyBody, code_sent, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /projects/:id/features`
pub async fn list<S, M>(
  State(state): State<AppState<S, M>>,
  Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<FeatureWithVotes>>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let features = state
    .store
    .list_features(project_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(features))
}

// ─── Direct write (disabled) ──────────────────────────────────────────────────

/// `POST /projects/:id/features` — kept for wire compatibility; always 403.
pub async fn direct_create_disabled() -> impl IntoResponse {
  (
    StatusCode::FORBIDDEN,
    Json(json!({
      "error": "email verification is required to request features; use the request form"
    })),
  )
}

// ─── Request a code ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequestBody {
  pub title:       String,
  pub description: String,
  pub user_name:   String,
  pub user_email:  String,
}

/// `POST /projects/:id/features/request`
pub async fn request<S, M>(
  State(state): State<AppState<S, M>>,
  Path(project_id): Path<Uuid>,
  Json(body): Json<FeatureRequestBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  state
    .flow
    .request(ActionPayload::Feature(FeaturePayload {
      project_id,
      title: body.title,
      description: body.description,
      user_name: body.user_name,
      user_email: body.user_email,
    }))
    .await?;
  Ok(code_sent())
}

// ─── Verify ───────────────────────────────────────────────────────────────────

/// `POST /features/verify` — returns 201 + the created feature (votes
/// included, empty at creation).
pub async fn verify<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<VerifyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let action = state
    .flow
    .verify(&body.email, &body.code, ActionKind::Feature)
    .await?;

  match action {
    VerifiedAction::Feature(feature) => {
      Ok((StatusCode::CREATED, Json(feature)))
    }
    _ => Err(ApiError::Internal(
      "feature verification produced a non-feature action".to_owned(),
    )),
  }
}
