//! The verification ledger — pending one-time codes and their payloads.
//!
//! Every gated write (comment, feature request, vote) is first recorded here
//! as a pending entry carrying the full action payload. The entry is consumed
//! exactly once when the caller returns with the emailed code; entries are
//! never deleted, so used and expired rows simply accumulate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Minutes from issuance until a code stops being accepted. Fixed, not
/// configurable per call.
pub const CODE_TTL_MINUTES: i64 = 10;

// ─── Action kind ─────────────────────────────────────────────────────────────

/// The kind of write a ledger entry will materialise once verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
  Comment,
  Feature,
  Vote,
}

impl ActionKind {
  /// The discriminant string stored in the `kind` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Comment => "comment",
      Self::Feature => "feature",
      Self::Vote => "vote",
    }
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Everything needed to create a [`Comment`](crate::project::Comment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPayload {
  pub project_id: Uuid,
  pub name:       String,
  pub email:      String,
  pub message:    String,
}

/// Everything needed to create a [`Feature`](crate::feature::Feature).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePayload {
  pub project_id:  Uuid,
  pub title:       String,
  pub description: String,
  pub user_name:   String,
  pub user_email:  String,
}

/// Everything needed to create a [`Vote`](crate::feature::Vote).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePayload {
  pub feature_id: Uuid,
  pub user_name:  String,
  pub user_email: String,
}

/// The typed payload of a ledger entry. The variant serves as the entry's
/// kind; the dispatcher's branch-by-kind is therefore checked at compile
/// time instead of deserialising an untyped blob per kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActionPayload {
  Comment(CommentPayload),
  Feature(FeaturePayload),
  Vote(VotePayload),
}

impl ActionPayload {
  pub fn kind(&self) -> ActionKind {
    match self {
      Self::Comment(_) => ActionKind::Comment,
      Self::Feature(_) => ActionKind::Feature,
      Self::Vote(_) => ActionKind::Vote,
    }
  }

  /// The email address the verification code is sent to.
  pub fn email(&self) -> &str {
    match self {
      Self::Comment(p) => &p.email,
      Self::Feature(p) => &p.user_email,
      Self::Vote(p) => &p.user_email,
    }
  }

  /// Check that every required field is present and non-empty.
  pub fn validate(&self) -> Result<()> {
    let missing = |field: &str| {
      crate::FlowError::Validation(format!("{field} is required"))
    };
    let require = |value: &str, field: &str| {
      if value.trim().is_empty() { Err(missing(field)) } else { Ok(()) }
    };

    match self {
      Self::Comment(p) => {
        require(&p.name, "name")?;
        require(&p.email, "email")?;
        require(&p.message, "message")
      }
      Self::Feature(p) => {
        require(&p.title, "title")?;
        require(&p.description, "description")?;
        require(&p.user_name, "userName")?;
        require(&p.user_email, "userEmail")
      }
      Self::Vote(p) => {
        require(&p.user_name, "userName")?;
        require(&p.user_email, "userEmail")
      }
    }
  }

  /// Serialise the inner payload (without the type tag) for the `payload`
  /// database column.
  pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
    // The full serialised form is `{"type": "...", "data": <payload>}`.
    // We want only the payload; the tag lives in the `kind` column.
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Deserialise from the kind discriminant and JSON payload stored in the
  /// database.
  pub fn from_parts(
    kind: ActionKind,
    data: serde_json::Value,
  ) -> Result<Self, serde_json::Error> {
    let wrapped = serde_json::json!({ "type": kind.as_str(), "data": data });
    serde_json::from_value(wrapped)
  }
}

// ─── Ledger entry ────────────────────────────────────────────────────────────

/// A pending (or consumed) one-time code. A code is only valid for matching
/// (`email`, `code`, `kind`), `consumed = false` and `expires_at` in the
/// future; `consumed` flips to true exactly once, at dispatch time.
#[derive(Debug, Clone)]
pub struct VerificationEntry {
  pub id:         Uuid,
  pub email:      String,
  /// Exactly 6 ASCII decimal digits; leading zeroes preserved.
  pub code:       String,
  pub kind:       ActionKind,
  pub payload:    ActionPayload,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
  pub consumed:   bool,
}

/// Input to [`crate::store::ShowcaseStore::insert_verification`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewVerification {
  pub email:      String,
  pub code:       String,
  pub payload:    ActionPayload,
  pub expires_at: DateTime<Utc>,
}
