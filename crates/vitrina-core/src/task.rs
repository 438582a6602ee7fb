//! Project tasks — the admin-facing roadmap items shown on a project page.
//!
//! Tasks are plain admin writes with no verification gate; ordering within a
//! project is explicit via the `order` field, not insertion time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress state of a task. Serialises as `pending` / `in-progress` /
/// `completed` on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
  Pending,
  InProgress,
  Completed,
}

impl TaskStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::InProgress => "in-progress",
      Self::Completed => "completed",
    }
  }
}

impl Default for TaskStatus {
  fn default() -> Self {
    Self::Pending
  }
}

/// A roadmap item belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id:           Uuid,
  pub project_id:   Uuid,
  pub title:        String,
  pub description:  Option<String>,
  pub status:       TaskStatus,
  pub order:        i64,
  pub completed_at: Option<DateTime<Utc>>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ShowcaseStore::add_task`]. `completed_at` is not
/// settable at creation; it arrives later via an update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub status:      TaskStatus,
  #[serde(default)]
  pub order:       i64,
}

/// Full-replace input to [`crate::store::ShowcaseStore::update_task`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
  pub title:        String,
  #[serde(default)]
  pub description:  Option<String>,
  pub status:       TaskStatus,
  pub order:        i64,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_serialises_kebab_case() {
    let json = serde_json::to_value(TaskStatus::InProgress).unwrap();
    assert_eq!(json, "in-progress");
  }

  #[test]
  fn new_task_defaults_to_pending_order_zero() {
    let task: NewTask =
      serde_json::from_value(serde_json::json!({ "title": "Ship it" }))
        .unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.order, 0);
    assert!(task.description.is_none());
  }
}
