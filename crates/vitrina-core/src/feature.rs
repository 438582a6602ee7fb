//! Feature requests and votes.
//!
//! Both record types are created only by the action dispatcher; votes are
//! additionally guarded by a storage-level UNIQUE constraint on
//! (feature_id, user_email).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Feature ─────────────────────────────────────────────────────────────────

/// A visitor-requested feature for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
  pub id:          Uuid,
  pub title:       String,
  pub description: String,
  pub user_name:   String,
  pub user_email:  String,
  pub project_id:  Uuid,
  pub created_at:  DateTime<Utc>,
}

/// The read model for a feature: the row plus its vote rows. Serialises with
/// the feature fields inlined, matching the shape the frontend expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureWithVotes {
  #[serde(flatten)]
  pub feature: Feature,
  pub votes:   Vec<Vote>,
}

// ─── Vote ────────────────────────────────────────────────────────────────────

/// A single vote for a feature. At most one per (feature_id, user_email).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
  pub id:         Uuid,
  pub user_name:  String,
  pub user_email: String,
  pub feature_id: Uuid,
  pub created_at: DateTime<Utc>,
}

/// Outcome of [`crate::store::ShowcaseStore::insert_vote`].
///
/// The uniqueness constraint is the authoritative guard, so backends must
/// report a violation as `Duplicate` rather than as an opaque error — the
/// flow turns it into [`crate::FlowError::DuplicateVote`].
#[derive(Debug)]
pub enum VoteInsert {
  Created(Vote),
  Duplicate,
}
