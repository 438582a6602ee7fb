//! The generic verification flow — request intake and action dispatch.
//!
//! One component parameterised by the action payload replaces the three
//! near-identical request/verify pipelines: every gated write follows
//! intake → ledger entry → out-of-band code → dispatch → domain row.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand_core::OsRng;

use crate::{
  FlowError, Result, code,
  feature::{FeatureWithVotes, Vote, VoteInsert},
  mailer::Mailer,
  project::Comment,
  store::ShowcaseStore,
  verification::{ActionKind, ActionPayload, CODE_TTL_MINUTES, NewVerification},
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The domain record materialised by a successful verification, returned so
/// the caller can update its view without a second fetch.
#[derive(Debug)]
pub enum VerifiedAction {
  Comment(Comment),
  Feature(FeatureWithVotes),
  Vote { vote: Vote, vote_count: u64 },
}

// ─── Flow ────────────────────────────────────────────────────────────────────

/// Request intake and action dispatch over any store and mailer.
///
/// Cloning is cheap — both collaborators are reference-counted.
pub struct VerificationFlow<S, M> {
  store:  Arc<S>,
  mailer: Arc<M>,
}

impl<S, M> Clone for VerificationFlow<S, M> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), mailer: Arc::clone(&self.mailer) }
  }
}

impl<S, M> VerificationFlow<S, M>
where
  S: ShowcaseStore,
  M: Mailer,
{
  pub fn new(store: Arc<S>, mailer: Arc<M>) -> Self {
    Self { store, mailer }
  }

  /// Intake: validate `payload`, mint a code, persist the ledger entry and
  /// hand the code to the mailer. The response to the caller never carries
  /// the code.
  ///
  /// The entry is persisted before the send is attempted; a delivery
  /// failure therefore leaves an orphaned entry that expires naturally.
  pub async fn request(&self, payload: ActionPayload) -> Result<()> {
    payload.validate()?;
    self.check_preconditions(&payload).await?;

    let code = code::generate(&mut OsRng);
    let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

    let entry = self
      .store
      .insert_verification(NewVerification {
        email: payload.email().to_owned(),
        code: code.clone(),
        payload,
        expires_at,
      })
      .await
      .map_err(FlowError::store)?;

    tracing::info!(
      kind = entry.kind.as_str(),
      entry_id = %entry.id,
      "verification code issued"
    );

    if let Err(e) = self
      .mailer
      .send_verification(&entry.email, entry.kind, &code)
      .await
    {
      // The entry stays in the ledger and expires on its own.
      tracing::warn!(entry_id = %entry.id, error = %e, "code delivery failed");
      return Err(e.into());
    }

    Ok(())
  }

  /// Dispatch: exchange a valid (email, code, kind) tuple for the
  /// materialised domain record. Consumption is atomic, so one code creates
  /// at most one row; any resubmission fails with
  /// [`FlowError::InvalidOrExpiredCode`].
  pub async fn verify(
    &self,
    email: &str,
    code: &str,
    kind: ActionKind,
  ) -> Result<VerifiedAction> {
    if email.trim().is_empty() || code.trim().is_empty() {
      return Err(FlowError::Validation(
        "email and code are required".to_owned(),
      ));
    }

    let entry = self
      .store
      .consume_verification(email, code, kind)
      .await
      .map_err(FlowError::store)?
      .ok_or(FlowError::InvalidOrExpiredCode)?;

    let action = match entry.payload {
      ActionPayload::Comment(p) => {
        let comment =
          self.store.insert_comment(p).await.map_err(FlowError::store)?;
        VerifiedAction::Comment(comment)
      }
      ActionPayload::Feature(p) => {
        let feature =
          self.store.insert_feature(p).await.map_err(FlowError::store)?;
        VerifiedAction::Feature(FeatureWithVotes { feature, votes: vec![] })
      }
      ActionPayload::Vote(p) => {
        let feature_id = p.feature_id;
        match self.store.insert_vote(p).await.map_err(FlowError::store)? {
          VoteInsert::Created(vote) => {
            let vote_count = self
              .store
              .count_votes(feature_id)
              .await
              .map_err(FlowError::store)?;
            VerifiedAction::Vote { vote, vote_count }
          }
          // Both codes of a double-requested vote raced through intake;
          // the constraint catches the second one here.
          VoteInsert::Duplicate => return Err(FlowError::DuplicateVote),
        }
      }
    };

    tracing::info!(kind = kind.as_str(), "verified action materialised");
    Ok(action)
  }

  /// Target-existence and duplicate-vote checks. The duplicate check is a
  /// fast path only; the insert-time constraint is the authority.
  async fn check_preconditions(&self, payload: &ActionPayload) -> Result<()> {
    match payload {
      ActionPayload::Comment(p) => {
        self.require_project(p.project_id).await
      }
      ActionPayload::Feature(p) => {
        self.require_project(p.project_id).await
      }
      ActionPayload::Vote(p) => {
        let feature = self
          .store
          .get_feature(p.feature_id)
          .await
          .map_err(FlowError::store)?;
        if feature.is_none() {
          return Err(FlowError::NotFound(format!(
            "feature {}",
            p.feature_id
          )));
        }
        let voted = self
          .store
          .has_voted(p.feature_id, &p.user_email)
          .await
          .map_err(FlowError::store)?;
        if voted {
          return Err(FlowError::DuplicateVote);
        }
        Ok(())
      }
    }
  }

  async fn require_project(&self, id: uuid::Uuid) -> Result<()> {
    match self.store.get_project(id).await.map_err(FlowError::store)? {
      Some(_) => Ok(()),
      None => Err(FlowError::NotFound(format!("project {id}"))),
    }
  }
}
