//! Contact-form endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/contact` | Body: [`ContactBody`]; relays through the mailer |
//!
//! Nothing is persisted: the message goes straight to the mailer, which
//! forwards it to the site owner and sends a receipt to the sender.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;
use vitrina_core::{mailer::Mailer, store::ShowcaseStore};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ContactBody {
  pub name:    String,
  pub email:   String,
  pub message: String,
}

/// Shallow shape check: one `@` with a non-empty local part and a dotted
/// domain. Deliverability is the mailer's problem.
fn plausible_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !local.contains(char::is_whitespace)
    && !domain.contains(char::is_whitespace)
    && !domain.contains('@')
    && domain.split_once('.').is_some_and(|(host, tld)| {
      !host.is_empty() && !tld.is_empty()
    })
}

/// `POST /contact`
pub async fn send<S, M>(
  State(state): State<AppState<S, M>>,
  Json(body): Json<ContactBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ShowcaseStore,
  M: Mailer,
{
  for (value, field) in [
    (&body.name, "name"),
    (&body.email, "email"),
    (&body.message, "message"),
  ] {
    if value.trim().is_empty() {
      return Err(ApiError::BadRequest(format!("{field} is required")));
    }
  }
  if !plausible_email(&body.email) {
    return Err(ApiError::BadRequest("invalid email".to_owned()));
  }

  state
    .mailer
    .send_contact(&body.name, &body.email, &body.message)
    .await
    .map_err(|e| ApiError::Delivery(e.to_string()))?;

  Ok(Json(json!({ "success": true, "message": "message sent" })))
}

#[cfg(test)]
mod tests {
  use super::plausible_email;

  #[test]
  fn accepts_ordinary_addresses() {
    assert!(plausible_email("ana@x.com"));
    assert!(plausible_email("ana+tag@mail.example.org"));
  }

  #[test]
  fn rejects_malformed_addresses() {
    assert!(!plausible_email("ana"));
    assert!(!plausible_email("ana@"));
    assert!(!plausible_email("ana@nodot"));
    assert!(!plausible_email("ana@.com"));
    assert!(!plausible_email("a na@x.com"));
    assert!(!plausible_email("ana@@x.com"));
  }
}
