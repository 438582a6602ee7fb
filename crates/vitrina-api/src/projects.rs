//! Handlers for `/projects` endpoints (admin CRUD + public reads).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/projects` | All projects with comments, newest first |
//! | `POST`   | `/projects` | Body: [`NewProject`]; returns 201 + stored project |
//! | `GET`    | `/projects/:id` | With comments; 404 if not found |
//! | `PUT`    | `/projects/:id` | Body: [`NewProject`]; slug recomputed |
//! | `DELETE` | `/projects/:id` | Cascades to comments, features, votes, tasks |
//! | `POST`   | `/projects/:slug/view` | Counts one page view, returns `{ views }` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;
use vitrina_core::{
  mailer::Mailer,
  project::{Comment, NewProject, Project},
  store::ShowcaseStore,
};

use crate::{AppState, error::ApiError};

/// A project with its comments inlined, matching the shape the frontend
/// expects from the list and detail endpoints.
#[derive(Debug, Serialize)]
pub struct ProjectWithComments {
  #[serde(flatten)]
  pub project:  Project,
  pub comments: Vec<Comment>,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /projects`
pub async fn list<S, M>(
  State(state): State<AppState<S, M>>,
) -> Result<Json<Vec<ProjectWithComments>>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let projects = state
    .store
    .list_projects()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut out = Vec::with_capacity(projects.len());
  for project in projects {
    let comments = state
      .store
      .list_comments(project.id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;
    out.push(ProjectWithComments { project, comments });
  }

  Ok(Json(out))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /projects/:id`
pub async fn get_one<S, M>(
  State(state): State<AppState<S, M>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ProjectWithComments>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let project = state
    .store
    .get_project(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))?;

  let comments = state
    .store
    .list_comments(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ProjectWithComments { project, comments }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /projects` — returns 201 + the stored [`Project`].
pub async fn create<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<NewProject>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let project = state
    .store
    .add_project(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(project)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /projects/:id`
pub async fn update_one<S, M>(
  State(state): State<AppState<S, M>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewProject>,
) -> Result<Json<Project>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let project = state
    .store
    .update_project(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))?;
  Ok(Json(project))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /projects/:id`
pub async fn delete_one<S, M>(
  State(state): State<AppState<S, M>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let deleted = state
    .store
    .delete_project(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("project {id} not found")));
  }
  Ok(Json(json!({ "success": true })))
}

// ─── View counter ─────────────────────────────────────────────────────────────

/// `POST /projects/:slug/view` — addressed by slug, since that is what the
/// public project page knows.
pub async fn count_view<S, M>(
  State(state): State<AppState<S, M>>,
  Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let views = state
    .store
    .increment_views(&slug)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("project {slug} not found")))?;
  Ok(Json(json!({ "views": views })))
}
