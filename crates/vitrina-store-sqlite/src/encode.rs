//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Tags and ledger payloads
//! are stored as compact JSON. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vitrina_core::{
  feature::{Feature, Vote},
  project::{Comment, Project},
  task::{Task, TaskStatus},
  verification::{ActionKind, ActionPayload, VerificationEntry},
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ActionKind ───────────────────────────────────────────────────────────────

pub fn encode_kind(k: ActionKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<ActionKind> {
  match s {
    "comment" => Ok(ActionKind::Comment),
    "feature" => Ok(ActionKind::Feature),
    "vote" => Ok(ActionKind::Vote),
    other => Err(Error::UnknownKind(other.to_owned())),
  }
}

// ─── TaskStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: TaskStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<TaskStatus> {
  match s {
    "pending" => Ok(TaskStatus::Pending),
    "in-progress" => Ok(TaskStatus::InProgress),
    "completed" => Ok(TaskStatus::Completed),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `projects` row.
pub struct RawProject {
  pub project_id:  String,
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub image_url:   String,
  pub project_url: String,
  pub tags:        String,
  pub views:       i64,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawProject {
  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:          decode_uuid(&self.project_id)?,
      slug:        self.slug,
      title:       self.title,
      description: self.description,
      image_url:   self.image_url,
      project_url: self.project_url,
      tags:        decode_tags(&self.tags)?,
      views:       self.views,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `tasks` row.
pub struct RawTask {
  pub task_id:      String,
  pub project_id:   String,
  pub title:        String,
  pub description:  Option<String>,
  pub status:       String,
  pub ordering:     i64,
  pub completed_at: Option<String>,
  pub created_at:   String,
}

impl RawTask {
  pub fn into_task(self) -> Result<Task> {
    Ok(Task {
      id:           decode_uuid(&self.task_id)?,
      project_id:   decode_uuid(&self.project_id)?,
      title:        self.title,
      description:  self.description,
      status:       decode_status(&self.status)?,
      order:        self.ordering,
      completed_at: self
        .completed_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub project_id: String,
  pub name:       String,
  pub email:      String,
  pub message:    String,
  pub created_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:         decode_uuid(&self.comment_id)?,
      name:       self.name,
      email:      self.email,
      message:    self.message,
      project_id: decode_uuid(&self.project_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `features` row.
pub struct RawFeature {
  pub feature_id:  String,
  pub project_id:  String,
  pub title:       String,
  pub description: String,
  pub user_name:   String,
  pub user_email:  String,
  pub created_at:  String,
}

impl RawFeature {
  pub fn into_feature(self) -> Result<Feature> {
    Ok(Feature {
      id:          decode_uuid(&self.feature_id)?,
      title:       self.title,
      description: self.description,
      user_name:   self.user_name,
      user_email:  self.user_email,
      project_id:  decode_uuid(&self.project_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `votes` row.
pub struct RawVote {
  pub vote_id:    String,
  pub feature_id: String,
  pub user_name:  String,
  pub user_email: String,
  pub created_at: String,
}

impl RawVote {
  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      id:         decode_uuid(&self.vote_id)?,
      user_name:  self.user_name,
      user_email: self.user_email,
      feature_id: decode_uuid(&self.feature_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `verification_codes` row.
pub struct RawEntry {
  pub entry_id:   String,
  pub email:      String,
  pub code:       String,
  pub kind:       String,
  pub payload:    String,
  pub created_at: String,
  pub expires_at: String,
  pub consumed:   bool,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<VerificationEntry> {
    let kind = decode_kind(&self.kind)?;
    let data: serde_json::Value = serde_json::from_str(&self.payload)?;
    let payload = ActionPayload::from_parts(kind, data)?;

    Ok(VerificationEntry {
      id: decode_uuid(&self.entry_id)?,
      email: self.email,
      code: self.code,
      kind,
      payload,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
      consumed: self.consumed,
    })
  }
}
