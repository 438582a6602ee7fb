//! Handlers for project tasks (admin roadmap CRUD).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/projects/:id/tasks` | Ordered by `order` ascending |
//! | `POST`   | `/projects/:id/tasks` | Body: [`NewTask`]; returns 201 + task |
//! | `PUT`    | `/tasks/:id` | Body: [`TaskUpdate`]; full replace |
//! | `DELETE` | `/tasks/:id` | 404 if the task does not exist |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use vitrina_core::{
  mailer::Mailer,
  store::ShowcaseStore,
  task::{NewTask, Task, TaskUpdate},
};

use crate::{AppState, error::ApiError};

/// `GET /projects/:id/tasks`
pub async fn list<S, M>(
  State(state): State<AppState<S, M>>,
  Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  let tasks = state
    .store
    .list_tasks(project_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(tasks))
}

/// `POST /projects/:id/tasks` — returns 201 + the stored [`Task`].
pub async fn create<S, M>(
  State(state): State<AppState<S, M>>,
  Path(project_id): Path<Uuid>,
  Json(body): Json<NewTask>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title is required".to_owned()));
  }
  if state
    .store
    .get_project(project_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "project {project_id} not found"
    )));
  }

  let task = state
    .store
    .add_task(project_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/:id`
pub async fn update_one<S, M>(
  State(state): State<AppState<S, M>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title is required".to_owned()));
  }

  let task = state
    .store
    .update_task(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("task {id} not found")))?;
  Ok(Json(task))
}

/// `DELETE /tasks/:id`
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
    .delete_task(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("task {id} not found")));
  }
  Ok(Json(json!({ "success": true })))
}
