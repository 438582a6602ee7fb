//! Error types for `vitrina-core`.

use thiserror::Error;

/// The outbound-delivery collaborator failed (or timed out).
#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Errors surfaced by the verification flow.
///
/// Every variant is recovered at the request boundary and turned into a
/// structured error response; none should crash the process.
#[derive(Debug, Error)]
pub enum FlowError {
  /// A required field is missing or empty.
  #[error("{0}")]
  Validation(String),

  /// A vote for this (feature, email) pair already exists.
  #[error("you have already voted for this feature")]
  DuplicateVote,

  /// No matching unconsumed, unexpired ledger entry. Deliberately does not
  /// say whether the code was wrong, already used, or expired.
  #[error("invalid or expired code")]
  InvalidOrExpiredCode,

  /// The target project or feature does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  Delivery(#[from] DeliveryError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FlowError {
  /// Wrap a backend-specific store error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = FlowError> = std::result::Result<T, E>;
