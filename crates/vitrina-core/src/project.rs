//! Project and comment types.
//!
//! A project is the unit the public showcase displays. Comments hang off a
//! project and are created only through the verification flow — there is no
//! direct write path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Project ─────────────────────────────────────────────────────────────────

/// A showcased project. Field names serialise in camelCase for wire
/// compatibility with the public frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id:          Uuid,
  /// URL-safe identifier computed from the title; see [`slugify`].
  pub slug:        String,
  pub title:       String,
  pub description: String,
  pub image_url:   String,
  pub project_url: String,
  pub tags:        Vec<String>,
  /// Page-view counter, incremented by the public view endpoint. Never
  /// client-settable.
  pub views:       i64,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ShowcaseStore::add_project`] and
/// [`crate::store::ShowcaseStore::update_project`].
/// `id`, `slug` and timestamps are always set by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
  pub title:       String,
  pub description: String,
  pub image_url:   String,
  pub project_url: String,
  #[serde(default)]
  pub tags:        Vec<String>,
}

// ─── Comment ─────────────────────────────────────────────────────────────────

/// A visitor comment on a project. Created only by the action dispatcher
/// from a consumed Comment-kind verification entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub message:    String,
  pub project_id: Uuid,
  pub created_at: DateTime<Utc>,
}

// ─── Slug ────────────────────────────────────────────────────────────────────

/// Derive a URL slug from a title: lowercase, whitespace runs become a single
/// `-`, anything outside `[a-z0-9_-]` is dropped, leading/trailing dashes are
/// trimmed.
pub fn slugify(title: &str) -> String {
  let mut slug = String::with_capacity(title.len());
  let mut pending_dash = false;

  for c in title.trim().to_lowercase().chars() {
    if c.is_whitespace() || c == '-' {
      pending_dash = !slug.is_empty();
    } else if c.is_ascii_alphanumeric() || c == '_' {
      if pending_dash {
        slug.push('-');
        pending_dash = false;
      }
      slug.push(c);
    }
  }

  slug
}

#[cfg(test)]
mod tests {
  use super::slugify;

  #[test]
  fn slugify_basic() {
    assert_eq!(slugify("Inventory Manager"), "inventory-manager");
  }

  #[test]
  fn slugify_collapses_separators_and_strips_punctuation() {
    assert_eq!(slugify("  E-commerce --  Moderno!  "), "e-commerce-moderno");
  }

  #[test]
  fn slugify_drops_non_ascii() {
    assert_eq!(slugify("Análisis de datos"), "anlisis-de-datos");
  }

  #[test]
  fn slugify_empty_input() {
    assert_eq!(slugify("  ¡! "), "");
  }
}
