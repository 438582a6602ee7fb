//! [`SqliteStore`] — the SQLite implementation of [`ShowcaseStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vitrina_core::{
  feature::{Feature, FeatureWithVotes, Vote, VoteInsert},
  project::{Comment, NewProject, Project, slugify},
  store::ShowcaseStore,
  task::{NewTask, Task, TaskUpdate},
  verification::{ActionKind, CommentPayload, FeaturePayload, NewVerification,
                 VerificationEntry, VotePayload},
};

use crate::{
  Error, Result,
  encode::{RawComment, RawEntry, RawFeature, RawProject, RawTask, RawVote,
           encode_dt, encode_kind, encode_status, encode_tags, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vitrina showcase store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProject> {
  Ok(RawProject {
    project_id:  row.get(0)?,
    slug:        row.get(1)?,
    title:       row.get(2)?,
    description: row.get(3)?,
    image_url:   row.get(4)?,
    project_url: row.get(5)?,
    tags:        row.get(6)?,
    views:       row.get(7)?,
    created_at:  row.get(8)?,
    updated_at:  row.get(9)?,
  })
}

fn task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTask> {
  Ok(RawTask {
    task_id:      row.get(0)?,
    project_id:   row.get(1)?,
    title:        row.get(2)?,
    description:  row.get(3)?,
    status:       row.get(4)?,
    ordering:     row.get(5)?,
    completed_at: row.get(6)?,
    created_at:   row.get(7)?,
  })
}

fn comment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawComment> {
  Ok(RawComment {
    comment_id: row.get(0)?,
    project_id: row.get(1)?,
    name:       row.get(2)?,
    email:      row.get(3)?,
    message:    row.get(4)?,
    created_at: row.get(5)?,
  })
}

fn feature_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFeature> {
  Ok(RawFeature {
    feature_id:  row.get(0)?,
    project_id:  row.get(1)?,
    title:       row.get(2)?,
    description: row.get(3)?,
    user_name:   row.get(4)?,
    user_email:  row.get(5)?,
    created_at:  row.get(6)?,
  })
}

fn vote_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawVote> {
  Ok(RawVote {
    vote_id:    row.get(0)?,
    feature_id: row.get(1)?,
    user_name:  row.get(2)?,
    user_email: row.get(3)?,
    created_at: row.get(4)?,
  })
}

fn entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
  Ok(RawEntry {
    entry_id:   row.get(0)?,
    email:      row.get(1)?,
    code:       row.get(2)?,
    kind:       row.get(3)?,
    payload:    row.get(4)?,
    created_at: row.get(5)?,
    expires_at: row.get(6)?,
    consumed:   row.get(7)?,
  })
}

const PROJECT_COLS: &str =
  "project_id, slug, title, description, image_url, project_url, tags, \
   views, created_at, updated_at";

const TASK_COLS: &str =
  "task_id, project_id, title, description, status, ordering, completed_at, \
   created_at";

// ─── ShowcaseStore impl ──────────────────────────────────────────────────────

impl ShowcaseStore for SqliteStore {
  type Error = Error;

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn add_project(&self, input: NewProject) -> Result<Project> {
    let now = Utc::now();
    let project = Project {
      id:          Uuid::new_v4(),
      slug:        slugify(&input.title),
      title:       input.title,
      description: input.description,
      image_url:   input.image_url,
      project_url: input.project_url,
      tags:        input.tags,
      views:       0,
      created_at:  now,
      updated_at:  now,
    };

    let id_str   = encode_uuid(project.id);
    let at_str   = encode_dt(now);
    let tags_str = encode_tags(&project.tags)?;
    let p        = project.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (
             project_id, slug, title, description, image_url, project_url,
             tags, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str,
            p.slug,
            p.title,
            p.description,
            p.image_url,
            p.project_url,
            tags_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(project)
  }

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROJECT_COLS} FROM projects WHERE project_id = ?1"),
            rusqlite::params![id_str],
            project_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn list_projects(&self) -> Result<Vec<Project>> {
    let raws: Vec<RawProject> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROJECT_COLS} FROM projects ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], project_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProject::into_project).collect()
  }

  async fn update_project(
    &self,
    id:    Uuid,
    input: NewProject,
  ) -> Result<Option<Project>> {
    let id_str   = encode_uuid(id);
    let slug     = slugify(&input.title);
    let at_str   = encode_dt(Utc::now());
    let tags_str = encode_tags(&input.tags)?;

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE projects
           SET slug = ?2, title = ?3, description = ?4, image_url = ?5,
               project_url = ?6, tags = ?7, updated_at = ?8
           WHERE project_id = ?1",
          rusqlite::params![
            id_str,
            slug,
            input.title,
            input.description,
            input.image_url,
            input.project_url,
            tags_str,
            at_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_project(id).await
  }

  async fn delete_project(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM projects WHERE project_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn increment_views(&self, slug: &str) -> Result<Option<i64>> {
    let slug = slug.to_owned();

    let views: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "UPDATE projects SET views = views + 1 WHERE slug = ?1
             RETURNING views",
            rusqlite::params![slug],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(views)
  }

  // ── Tasks ─────────────────────────────────────────────────────────────────

  async fn add_task(&self, project_id: Uuid, input: NewTask) -> Result<Task> {
    let task = Task {
      id:           Uuid::new_v4(),
      project_id,
      title:        input.title,
      description:  input.description,
      status:       input.status,
      order:        input.order,
      completed_at: None,
      created_at:   Utc::now(),
    };

    let id_str      = encode_uuid(task.id);
    let project_str = encode_uuid(project_id);
    let status_str  = encode_status(task.status);
    let at_str      = encode_dt(task.created_at);
    let t           = task.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasks (
             task_id, project_id, title, description, status, ordering, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            project_str,
            t.title,
            t.description,
            status_str,
            t.order,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(task)
  }

  async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>> {
    let project_str = encode_uuid(project_id);

    let raws: Vec<RawTask> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TASK_COLS} FROM tasks
           WHERE project_id = ?1
           ORDER BY ordering ASC, created_at ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![project_str], task_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTask::into_task).collect()
  }

  async fn update_task(
    &self,
    id:    Uuid,
    input: TaskUpdate,
  ) -> Result<Option<Task>> {
    let id_str        = encode_uuid(id);
    let status_str    = encode_status(input.status);
    let completed_str = input.completed_at.map(encode_dt);

    let raw: Option<RawTask> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE tasks
               SET title = ?2, description = ?3, status = ?4, ordering = ?5,
                   completed_at = ?6
               WHERE task_id = ?1
               RETURNING {TASK_COLS}"
            ),
            rusqlite::params![
              id_str,
              input.title,
              input.description,
              status_str,
              input.order,
              completed_str,
            ],
            task_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTask::into_task).transpose()
  }

  async fn delete_task(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM tasks WHERE task_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Site stats ────────────────────────────────────────────────────────────

  async fn site_visits(&self) -> Result<u64> {
    let visits: Option<i64> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT visits FROM site_stats WHERE stats_id = 1",
            [],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(visits.unwrap_or(0) as u64)
  }

  async fn increment_site_visits(&self) -> Result<u64> {
    // Upsert keeps this a single round-trip whether or not the counter row
    // exists yet.
    let visits: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "INSERT INTO site_stats (stats_id, visits) VALUES (1, 1)
           ON CONFLICT (stats_id) DO UPDATE SET visits = visits + 1
           RETURNING visits",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(visits as u64)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn insert_comment(&self, input: CommentPayload) -> Result<Comment> {
    let comment = Comment {
      id:         Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      message:    input.message,
      project_id: input.project_id,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(comment.id);
    let project_str = encode_uuid(comment.project_id);
    let at_str      = encode_dt(comment.created_at);
    let c           = comment.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (comment_id, project_id, name, email, message, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, project_str, c.name, c.email, c.message, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn list_comments(&self, project_id: Uuid) -> Result<Vec<Comment>> {
    let project_str = encode_uuid(project_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, project_id, name, email, message, created_at
           FROM comments
           WHERE project_id = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![project_str], comment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Features ──────────────────────────────────────────────────────────────

  async fn insert_feature(&self, input: FeaturePayload) -> Result<Feature> {
    let feature = Feature {
      id:          Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      user_name:   input.user_name,
      user_email:  input.user_email,
      project_id:  input.project_id,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(feature.id);
    let project_str = encode_uuid(feature.project_id);
    let at_str      = encode_dt(feature.created_at);
    let f           = feature.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO features (
             feature_id, project_id, title, description, user_name, user_email, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            project_str,
            f.title,
            f.description,
            f.user_name,
            f.user_email,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(feature)
  }

  async fn get_feature(&self, id: Uuid) -> Result<Option<Feature>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFeature> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT feature_id, project_id, title, description, user_name,
                    user_email, created_at
             FROM features WHERE feature_id = ?1",
            rusqlite::params![id_str],
            feature_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawFeature::into_feature).transpose()
  }

  async fn list_features(
    &self,
    project_id: Uuid,
  ) -> Result<Vec<FeatureWithVotes>> {
    let project_str = encode_uuid(project_id);

    let raws: Vec<(RawFeature, Vec<RawVote>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT f.feature_id, f.project_id, f.title, f.description,
                  f.user_name, f.user_email, f.created_at
           FROM features f
           LEFT JOIN votes v ON v.feature_id = f.feature_id
           WHERE f.project_id = ?1
           GROUP BY f.feature_id
           ORDER BY COUNT(v.vote_id) DESC, f.created_at DESC",
        )?;
        let features = stmt
          .query_map(rusqlite::params![project_str], feature_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut vote_stmt = conn.prepare(
          "SELECT vote_id, feature_id, user_name, user_email, created_at
           FROM votes
           WHERE feature_id = ?1
           ORDER BY created_at ASC",
        )?;

        let mut out = Vec::with_capacity(features.len());
        for feature in features {
          let votes = vote_stmt
            .query_map(rusqlite::params![feature.feature_id], vote_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          out.push((feature, votes));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(feature, votes)| {
        Ok(FeatureWithVotes {
          feature: feature.into_feature()?,
          votes:   votes
            .into_iter()
            .map(RawVote::into_vote)
            .collect::<Result<_>>()?,
        })
      })
      .collect()
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn insert_vote(&self, input: VotePayload) -> Result<VoteInsert> {
    let vote = Vote {
      id:         Uuid::new_v4(),
      user_name:  input.user_name,
      user_email: input.user_email,
      feature_id: input.feature_id,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(vote.id);
    let feature_str = encode_uuid(vote.feature_id);
    let at_str      = encode_dt(vote.created_at);
    let v           = vote.clone();

    let created: bool = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO votes (vote_id, feature_id, user_name, user_email, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, feature_str, v.user_name, v.user_email, at_str],
        );
        match result {
          Ok(_) => Ok(true),
          // A racing second vote trips the (feature_id, user_email)
          // constraint; every other failure propagates.
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(if created {
      VoteInsert::Created(vote)
    } else {
      VoteInsert::Duplicate
    })
  }

  async fn count_votes(&self, feature_id: Uuid) -> Result<u64> {
    let feature_str = encode_uuid(feature_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM votes WHERE feature_id = ?1",
          rusqlite::params![feature_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn has_voted(&self, feature_id: Uuid, email: &str) -> Result<bool> {
    let feature_str = encode_uuid(feature_id);
    let email       = email.to_owned();

    let voted: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM votes WHERE feature_id = ?1 AND user_email = ?2",
              rusqlite::params![feature_str, email],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(voted)
  }

  // ── Verification ledger ───────────────────────────────────────────────────

  async fn insert_verification(
    &self,
    input: NewVerification,
  ) -> Result<VerificationEntry> {
    let entry = VerificationEntry {
      id:         Uuid::new_v4(),
      email:      input.email,
      code:       input.code,
      kind:       input.payload.kind(),
      payload:    input.payload,
      created_at: Utc::now(),
      expires_at: input.expires_at,
      consumed:   false,
    };

    let id_str      = encode_uuid(entry.id);
    let kind_str    = encode_kind(entry.kind).to_owned();
    let payload_str = entry.payload.to_json()?.to_string();
    let created_str = encode_dt(entry.created_at);
    let expires_str = encode_dt(entry.expires_at);
    let email       = entry.email.clone();
    let code        = entry.code.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO verification_codes (
             entry_id, email, code, kind, payload, created_at, expires_at, consumed
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
          rusqlite::params![
            id_str,
            email,
            code,
            kind_str,
            payload_str,
            created_str,
            expires_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn consume_verification(
    &self,
    email: &str,
    code:  &str,
    kind:  ActionKind,
  ) -> Result<Option<VerificationEntry>> {
    let email    = email.to_owned();
    let code     = code.to_owned();
    let kind_str = encode_kind(kind).to_owned();
    let now_str  = encode_dt(Utc::now());

    // Single conditional UPDATE: the RETURNING row doubles as the success
    // signal, so two racing calls cannot both consume the same entry. The
    // subselect pins the update to one row even if duplicate codes exist.
    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "UPDATE verification_codes
             SET consumed = 1
             WHERE entry_id = (
               SELECT entry_id FROM verification_codes
               WHERE email = ?1 AND code = ?2 AND kind = ?3
                 AND consumed = 0 AND expires_at > ?4
               LIMIT 1
             )
             RETURNING entry_id, email, code, kind, payload,
                       created_at, expires_at, consumed",
            rusqlite::params![email, code, kind_str, now_str],
            entry_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }
}
