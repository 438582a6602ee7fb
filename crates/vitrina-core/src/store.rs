//! The `ShowcaseStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `vitrina-store-sqlite`). Higher layers (`vitrina-api`, the verification
//! flow) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  feature::{Feature, FeatureWithVotes, Vote, VoteInsert},
  project::{Comment, NewProject, Project},
  task::{NewTask, Task, TaskUpdate},
  verification::{ActionKind, CommentPayload, FeaturePayload, NewVerification,
                 VerificationEntry, VotePayload},
};

/// Abstraction over a Vitrina storage backend.
///
/// The store is the sole source of truth and the only shared resource:
/// request handlers are stateless, and all exactly-once guarantees (code
/// consumption, vote uniqueness) are enforced here, not in memory.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ShowcaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Create and persist a project; the store assigns id, slug and
  /// timestamps.
  fn add_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Retrieve a project by id. Returns `None` if not found.
  fn get_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// List all projects, newest first.
  fn list_projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Replace a project's fields (slug recomputed from the new title).
  /// Returns `None` if the project does not exist.
  fn update_project(
    &self,
    id: Uuid,
    input: NewProject,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Delete a project and its owned rows. Returns `false` if nothing
  /// matched.
  fn delete_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Increment the page-view counter of the project with `slug` and return
  /// the new count. Returns `None` if no project has that slug.
  fn increment_views<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  // ── Tasks ─────────────────────────────────────────────────────────────

  /// Create a task under a project; the store assigns id and `created_at`.
  fn add_task(
    &self,
    project_id: Uuid,
    input: NewTask,
  ) -> impl Future<Output = Result<Task, Self::Error>> + Send + '_;

  /// All tasks for a project, ordered by `order` ascending.
  fn list_tasks(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Task>, Self::Error>> + Send + '_;

  /// Replace a task's fields. Returns `None` if the task does not exist.
  fn update_task(
    &self,
    id: Uuid,
    input: TaskUpdate,
  ) -> impl Future<Output = Result<Option<Task>, Self::Error>> + Send + '_;

  /// Delete a task. Returns `false` if nothing matched.
  fn delete_task(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Site stats ────────────────────────────────────────────────────────

  /// Total recorded site visits; zero when nothing has been recorded yet.
  fn site_visits(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Record one site visit and return the new total.
  fn increment_site_visits(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Insert a comment from a consumed ledger payload.
  fn insert_comment(
    &self,
    input: CommentPayload,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// All comments for a project, newest first.
  fn list_comments(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Features ──────────────────────────────────────────────────────────

  /// Insert a feature request from a consumed ledger payload.
  fn insert_feature(
    &self,
    input: FeaturePayload,
  ) -> impl Future<Output = Result<Feature, Self::Error>> + Send + '_;

  /// Retrieve a feature by id. Returns `None` if not found.
  fn get_feature(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Feature>, Self::Error>> + Send + '_;

  /// All features for a project with their votes, ordered by vote count
  /// (descending), then newest first.
  fn list_features(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<FeatureWithVotes>, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Insert a vote. A violation of the (feature_id, user_email) UNIQUE
  /// constraint is reported as [`VoteInsert::Duplicate`], not as an error.
  fn insert_vote(
    &self,
    input: VotePayload,
  ) -> impl Future<Output = Result<VoteInsert, Self::Error>> + Send + '_;

  /// Number of stored vote rows for a feature. Always recomputed, never
  /// cached or denormalised.
  fn count_votes(
    &self,
    feature_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Whether a vote row exists for (feature_id, email). Used as the
  /// intake's fast-path precondition; the UNIQUE constraint remains the
  /// authority.
  fn has_voted<'a>(
    &'a self,
    feature_id: Uuid,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Verification ledger ───────────────────────────────────────────────

  /// Persist a pending ledger entry; the store assigns id and `created_at`
  /// and initialises `consumed = false`.
  fn insert_verification(
    &self,
    input: NewVerification,
  ) -> impl Future<Output = Result<VerificationEntry, Self::Error>> + Send + '_;

  /// Atomically consume the one pending entry matching (email, code, kind)
  /// whose `expires_at` is still in the future, and return it. Returns
  /// `None` when no such entry exists — already consumed, expired, wrong
  /// code and wrong kind are indistinguishable by design.
  ///
  /// Two concurrent calls for the same entry must not both succeed: the
  /// mark-consumed step has to be a storage-level conditional update, not a
  /// read followed by a write.
  fn consume_verification<'a>(
    &'a self,
    email: &'a str,
    code: &'a str,
    kind: ActionKind,
  ) -> impl Future<Output = Result<Option<VerificationEntry>, Self::Error>> + Send + 'a;
}
