//! The outbound-delivery trait.
//!
//! Transport is a black box: SMTP, a transactional HTTP API, or a test
//! recorder. The flow only needs `send(to, kind, code) -> ok/fail`.

use std::future::Future;

use crate::{error::DeliveryError, verification::ActionKind};

/// Delivers outbound mail: verification codes and contact-form messages.
///
/// For codes, `kind` selects the message wording; the reference deployment
/// uses a single template for all three kinds, so implementations may ignore
/// it.
pub trait Mailer: Send + Sync {
  fn send_verification<'a>(
    &'a self,
    to: &'a str,
    kind: ActionKind,
    code: &'a str,
  ) -> impl Future<Output = Result<(), DeliveryError>> + Send + 'a;

  /// Relay a contact-form message to the site owner and send a receipt back
  /// to `reply_to`.
  fn send_contact<'a>(
    &'a self,
    name: &'a str,
    reply_to: &'a str,
    message: &'a str,
  ) -> impl Future<Output = Result<(), DeliveryError>> + Send + 'a;
}
