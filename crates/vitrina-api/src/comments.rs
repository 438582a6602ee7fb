//! Handlers for the comment verification flow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/projects/:id/comments` | Newest first |
//! | `POST` | `/projects/:id/comments` | 403 — direct writes are disabled |
//! | `POST` | `/projects/:id/comments/request` | Body: [`CommentRequestBody`] |
//! | `POST` | `/comments/verify` | Body: [`VerifyBody`]; returns 201 + comment |

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
  project::Comment,
  store::ShowcaseStore,
  verification::{ActionKind, ActionPayload, CommentPayload},
};

use crate::{AppState, VerifyBody, code_sent, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /projects/:id/comments`
pub async fn list<S, M>(
  State(state): State<AppState<S, M>>,
  Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let comments = state
    .store
    .list_comments(project_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(comments))
}

// ─── Direct write (disabled) ──────────────────────────────────────────────────

/// `POST /projects/:id/comments` — kept for wire compatibility; always 403.
pub async fn direct_create_disabled() -> impl IntoResponse {
  (
    StatusCode::FORBIDDEN,
    Json(json!({
      "error": "email verification is required to comment; use the comment form"
    })),
  )
}

// ─── Request a code ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentRequestBody {
  pub name:    String,
  pub email:   String,
  pub message: String,
}

/// `POST /projects/:id/comments/request`
pub async fn request<S, M>(
  State(state): State<AppState<S, M>>,
  Path(project_id): Path<Uuid>,
  Json(body): Json<CommentRequestBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  state
    .flow
    .request(ActionPayload::Comment(CommentPayload {
      project_id,
      name: body.name,
      email: body.email,
      message: body.message,
    }))
    .await?;
  Ok(code_sent())
}

// ─── Verify ───────────────────────────────────────────────────────────────────

/// `POST /comments/verify` — returns 201 + the created [`Comment`].
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
    .verify(&body.email, &body.code, ActionKind::Comment)
    .await?;

  match action {
    VerifiedAction::Comment(comment) => {
      Ok((StatusCode::CREATED, Json(comment)))
    }
    _ => Err(ApiError::Internal(
      "comment verification produced a non-comment action".to_owned(),
    )),
  }
}
