//! Handlers for the vote verification flow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/features/:id/vote` | 403 — direct writes are disabled |
//! | `POST` | `/features/:id/vote/request` | Body: [`VoteRequestBody`] |
//! | `POST` | `/votes/verify` | Body: [`VerifyBody`]; returns 201 + `{vote, voteCount}` |

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
  flow::VerifiedAction,
  mailer::Mailer,
  store::ShowcaseStore,
  verification::{ActionKind, ActionPayload, VotePayload},
};

use crate::{AppState, VerifyBody, code_sent, error::ApiError};

// ─── Direct write (disabled) ──────────────────────────────────────────────────

/// `POST /features/:id/vote` — kept for wire compatibility; always 403.
pub async fn direct_create_disabled() -> impl IntoResponse {
  (
    StatusCode::FORBIDDEN,
    Json(json!({
      "error": "email verification is required to vote; use the vote form"
    })),
  )
}

// ─── Request a code ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequestBody {
  pub user_name:  String,
  pub user_email: String,
}

/// `POST /features/:id/vote/request`
pub async fn request<S, M>(
  State(state): State<AppState<S, M>>,
  Path(feature_id): Path<Uuid>,
  Json(body): Json<VoteRequestBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  state
    .flow
    .request(ActionPayload::Vote(VotePayload {
      feature_id,
      user_name: body.user_name,
      user_email: body.user_email,
    }))
    .await?;
  Ok(code_sent())
}

// ─── Verify ───────────────────────────────────────────────────────────────────

/// `POST /votes/verify` — returns 201 + the created vote and the recomputed
/// count, so the caller can update its view without a second fetch.
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
    .verify(&body.email, &body.code, ActionKind::Vote)
    .await?;

  match action {
    VerifiedAction::Vote { vote, vote_count } => Ok((
      StatusCode::CREATED,
      Json(json!({ "vote": vote, "voteCount": vote_count })),
    )),
    _ => Err(ApiError::Internal(
      "vote verification produced a non-vote action".to_owned(),
    )),
  }
}
