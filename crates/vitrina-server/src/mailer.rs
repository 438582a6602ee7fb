//! HTTP transactional-email mailer.
//!
//! Posts to a Brevo-compatible `POST /v3/smtp/email` endpoint. Any failure
//! (connect, timeout, non-2xx) surfaces as a [`DeliveryError`]; the caller
//! decides what that means for the request in flight.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrina_core::{DeliveryError, mailer::Mailer, verification::ActionKind};

/// Mailer settings, deserialised from the `mail` table of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
  /// Base endpoint, e.g. `https://api.brevo.com/v3/smtp/email`.
  pub api_url:       String,
  pub api_key:       String,
  pub sender_email:  String,
  pub sender_name:   String,
  /// Where contact-form messages are forwarded.
  pub contact_email: String,
  /// Per-send deadline in seconds.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:  u64,
}

fn default_timeout_secs() -> u64 {
  10
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmailAddress<'a> {
  email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
  sender:       Sender<'a>,
  to:           Vec<EmailAddress<'a>>,
  subject:      &'a str,
  text_content: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  reply_to:     Option<EmailAddress<'a>>,
}

#[derive(Debug, Serialize)]
struct Sender<'a> {
  email: &'a str,
  name:  &'a str,
}

// ─── Message wording ─────────────────────────────────────────────────────────

fn subject(kind: ActionKind) -> &'static str {
  match kind {
    ActionKind::Comment => "Confirm your comment",
    ActionKind::Feature => "Confirm your feature request",
    ActionKind::Vote => "Confirm your vote",
  }
}

fn text_body(kind: ActionKind, code: &str) -> String {
  let action = match kind {
    ActionKind::Comment => "post your comment",
    ActionKind::Feature => "submit your feature request",
    ActionKind::Vote => "cast your vote",
  };
  format!(
    "Your verification code is {code}.\n\n\
     Enter it within 10 minutes to {action}. If you did not request this, \
     you can ignore this email."
  )
}

fn contact_forward_body(name: &str, reply_to: &str, message: &str) -> String {
  format!("From: {name} <{reply_to}>\n\n{message}")
}

fn contact_receipt_body(name: &str) -> String {
  format!(
    "Hi {name},\n\nYour message was received. Expect a reply at this \
     address soon."
  )
}

// ─── Mailer ──────────────────────────────────────────────────────────────────

/// Sends verification codes and contact messages through an HTTP email API.
pub struct HttpMailer {
  client:  reqwest::Client,
  config:  MailConfig,
  timeout: Duration,
}

impl HttpMailer {
  pub fn new(config: MailConfig) -> Self {
    Self {
      client: reqwest::Client::new(),
      timeout: Duration::from_secs(config.timeout_secs),
      config,
    }
  }

  async fn post(
    &self,
    to: &str,
    subject: &str,
    text: &str,
    reply_to: Option<&str>,
  ) -> Result<(), DeliveryError> {
    let body = SendEmailBody {
      sender: Sender {
        email: &self.config.sender_email,
        name:  &self.config.sender_name,
      },
      to: vec![EmailAddress { email: to }],
      subject,
      text_content: text,
      reply_to: reply_to.map(|email| EmailAddress { email }),
    };

    let response = self
      .client
      .post(&self.config.api_url)
      .header("api-key", &self.config.api_key)
      .header("accept", "application/json")
      .json(&body)
      .send()
      .await
      .map_err(|e| DeliveryError(format!("email api unreachable: {e}")))?;

    let status = response.status();
    if status.is_success() {
      return Ok(());
    }

    // The response body may carry a useful rejection reason; the code
    // itself never appears in it, so logging is safe upstream.
    let detail = response.text().await.unwrap_or_default();
    Err(DeliveryError(format!(
      "email api rejected send (status={status}): {detail}"
    )))
  }

  async fn post_with_deadline(
    &self,
    to: &str,
    subject: &str,
    text: &str,
    reply_to: Option<&str>,
  ) -> Result<(), DeliveryError> {
    match tokio::time::timeout(self.timeout, self.post(to, subject, text, reply_to))
      .await
    {
      Ok(result) => result,
      Err(_) => Err(DeliveryError(format!(
        "email api timed out after {}s",
        self.timeout.as_secs()
      ))),
    }
  }
}

impl Mailer for HttpMailer {
  async fn send_verification(
    &self,
    to: &str,
    kind: ActionKind,
    code: &str,
  ) -> Result<(), DeliveryError> {
    self
      .post_with_deadline(to, subject(kind), &text_body(kind, code), None)
      .await
  }

  async fn send_contact(
    &self,
    name: &str,
    reply_to: &str,
    message: &str,
  ) -> Result<(), DeliveryError> {
    // Forward to the site owner first; the receipt is best-effort on top.
    self
      .post_with_deadline(
        &self.config.contact_email,
        "New contact message",
        &contact_forward_body(name, reply_to, message),
        Some(reply_to),
      )
      .await?;
    self
      .post_with_deadline(
        reply_to,
        "Your message was received",
        &contact_receipt_body(name),
        None,
      )
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn body_carries_code_and_deadline() {
    let body = text_body(ActionKind::Vote, "042137");
    assert!(body.contains("042137"));
    assert!(body.contains("10 minutes"));
    assert!(body.contains("cast your vote"));
  }

  #[test]
  fn subject_varies_by_kind() {
    assert_ne!(subject(ActionKind::Comment), subject(ActionKind::Vote));
  }

  #[test]
  fn wire_body_is_camel_case() {
    let body = SendEmailBody {
      sender:       Sender { email: "no-reply@x.com", name: "Vitrina" },
      to:           vec![EmailAddress { email: "ana@x.com" }],
      subject:      "Confirm your vote",
      text_content: "code",
      reply_to:     None,
    };
    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("textContent").is_some());
    assert_eq!(json["to"][0]["email"], "ana@x.com");
    // An absent reply-to is omitted, not null.
    assert!(json.get("replyTo").is_none());
  }

  #[test]
  fn contact_forward_names_the_sender() {
    let body = contact_forward_body("Ana", "ana@x.com", "hola");
    assert!(body.contains("Ana <ana@x.com>"));
    assert!(body.ends_with("hola"));
  }
}
