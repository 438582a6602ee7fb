//! JSON REST API for Vitrina.
//!
//! Exposes an axum [`Router`] backed by any
//! [`vitrina_core::store::ShowcaseStore`] and
//! [`vitrina_core::mailer::Mailer`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vitrina_api::api_router(store.clone(), mailer.clone()))
//! ```

pub mod comments;
pub mod contact;
pub mod error;
pub mod features;
pub mod projects;
pub mod stats;
pub mod tasks;
pub mod votes;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use vitrina_core::{flow::VerificationFlow, mailer::Mailer, store::ShowcaseStore};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers: the raw store for reads and
/// admin writes, the verification flow for every gated write, and the mailer
/// for the contact form.
pub struct AppState<S, M> {
  pub store:  Arc<S>,
  pub flow:   VerificationFlow<S, M>,
  pub mailer: Arc<M>,
}

impl<S, M> Clone for AppState<S, M> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      flow:   self.flow.clone(),
      mailer: Arc::clone(&self.mailer),
    }
  }
}

// ─── Shared bodies ───────────────────────────────────────────────────────────

/// JSON body accepted by every `/…/verify` endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyBody {
  pub email: String,
  pub code:  String,
}

/// Success acknowledgement for `/…/request` endpoints. Never carries the
/// code itself.
pub(crate) fn code_sent() -> Json<serde_json::Value> {
  Json(serde_json::json!({
    "success": true,
    "message": "verification code sent to your email",
  }))
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store` and `mailer`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, M>(store: Arc<S>, mailer: Arc<M>) -> Router<()>
where
  S: ShowcaseStore + 'static,
  M: Mailer + 'static,
{
  let state = AppState {
    flow:   VerificationFlow::new(Arc::clone(&store), Arc::clone(&mailer)),
    store,
    mailer,
  };

  Router::new()
    // Projects (admin CRUD + public reads)
    .route(
      "/projects",
      get(projects::list::<S, M>).post(projects::create::<S, M>),
    )
    .route(
      "/projects/{id}",
      get(projects::get_one::<S, M>)
        .put(projects::update_one::<S, M>)
        .delete(projects::delete_one::<S, M>),
    )
    // The path segment is the slug here, not the id; it keeps the `{id}`
    // name because sibling routes already claim it for this position.
    .route("/projects/{id}/view", post(projects::count_view::<S, M>))
    // Tasks (admin roadmap)
    .route(
      "/projects/{id}/tasks",
      get(tasks::list::<S, M>).post(tasks::create::<S, M>),
    )
    .route(
      "/tasks/{id}",
      put(tasks::update_one::<S, M>).delete(tasks::delete_one::<S, M>),
    )
    // Comments
    .route(
      "/projects/{id}/comments",
      get(comments::list::<S, M>).post(comments::direct_create_disabled),
    )
    .route(
      "/projects/{id}/comments/request",
      post(comments::request::<S, M>),
    )
    .route("/comments/verify", post(comments::verify::<S, M>))
    // Features
    .route(
      "/projects/{id}/features",
      get(features::list::<S, M>).post(features::direct_create_disabled),
    )
    .route(
      "/projects/{id}/features/request",
      post(features::request::<S, M>),
    )
    .route("/features/verify", post(features::verify::<S, M>))
    // Votes
    .route("/features/{id}/vote", post(votes::direct_create_disabled))
    .route("/features/{id}/vote/request", post(votes::request::<S, M>))
    .route("/votes/verify", post(votes::verify::<S, M>))
    // Site-wide concerns
    .route("/site-stats", get(stats::get::<S, M>).post(stats::record::<S, M>))
    .route("/contact", post(contact::send::<S, M>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use vitrina_core::{
    DeliveryError, mailer::Mailer, verification::ActionKind,
  };
  use vitrina_store_sqlite::SqliteStore;

  use super::api_router;

  // ── Test mailer ─────────────────────────────────────────────────────────────

  /// Records every send; optionally fails after recording, so tests can
  /// still read the code that would have gone out.
  struct RecordingMailer {
    sent:     Mutex<Vec<(String, ActionKind, String)>>,
    contacts: Mutex<Vec<(String, String, String)>>,
    fail:     AtomicBool,
  }

  impl RecordingMailer {
    fn new() -> Self {
      Self {
        sent:     Mutex::new(Vec::new()),
        contacts: Mutex::new(Vec::new()),
        fail:     AtomicBool::new(false),
      }
    }

    fn last_code(&self) -> String {
      self.sent.lock().unwrap().last().expect("a code was sent").2.clone()
    }

    fn last_kind(&self) -> ActionKind {
      self.sent.lock().unwrap().last().expect("a code was sent").1
    }
  }

  impl Mailer for RecordingMailer {
    async fn send_verification(
      &self,
      to: &str,
      kind: ActionKind,
      code: &str,
    ) -> Result<(), DeliveryError> {
      self
        .sent
        .lock()
        .unwrap()
        .push((to.to_owned(), kind, code.to_owned()));
      if self.fail.load(Ordering::SeqCst) {
        Err(DeliveryError("smtp relay unreachable".to_owned()))
      } else {
        Ok(())
      }
    }

    async fn send_contact(
      &self,
      name: &str,
      reply_to: &str,
      message: &str,
    ) -> Result<(), DeliveryError> {
      if self.fail.load(Ordering::SeqCst) {
        return Err(DeliveryError("smtp relay unreachable".to_owned()));
      }
      self.contacts.lock().unwrap().push((
        name.to_owned(),
        reply_to.to_owned(),
        message.to_owned(),
      ));
      Ok(())
    }
  }

  // ── Harness ─────────────────────────────────────────────────────────────────

  async fn setup() -> (axum::Router, Arc<RecordingMailer>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let mailer = Arc::new(RecordingMailer::new());
    (api_router(store, Arc::clone(&mailer)), mailer)
  }

  async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
      })
      .unwrap();

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  async fn create_project(router: &axum::Router) -> Uuid {
    let (status, body) = send(
      router,
      "POST",
      "/projects",
      Some(json!({
        "title": "Inventory Manager",
        "description": "stock tracking",
        "imageUrl": "https://example.com/cover.png",
        "projectUrl": "https://example.com/repo",
        "tags": ["rust"],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["id"].as_str().unwrap().parse().unwrap()
  }

  /// Drive a feature through the full request/verify flow and return its id.
  async fn create_feature(
    router: &axum::Router,
    mailer: &RecordingMailer,
    project_id: Uuid,
  ) -> Uuid {
    let (status, _) = send(
      router,
      "POST",
      &format!("/projects/{project_id}/features/request"),
      Some(json!({
        "title": "Dark mode",
        "description": "please",
        "userName": "Ana",
        "userEmail": "ana@x.com",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code = mailer.last_code();
    let (status, body) = send(
      router,
      "POST",
      "/features/verify",
      Some(json!({ "email": "ana@x.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    body["id"].as_str().unwrap().parse().unwrap()
  }

  // ── Comment flow ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn comment_end_to_end() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;

    let (status, body) = send(
      &router,
      "POST",
      &format!("/projects/{project_id}/comments/request"),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    // The acknowledgement never leaks the code.
    assert!(body.get("code").is_none());
    assert_eq!(mailer.last_kind(), ActionKind::Comment);

    let code = mailer.last_code();
    assert_eq!(code.len(), 6);
    assert!(code.bytes().all(|b| b.is_ascii_digit()));

    let (status, comment) = send(
      &router,
      "POST",
      "/comments/verify",
      Some(json!({ "email": "ana@x.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {comment}");
    assert_eq!(comment["name"], json!("Ana"));
    assert_eq!(comment["message"], json!("hi"));
    // Wire shape is camelCase.
    assert_eq!(
      comment["projectId"].as_str().unwrap(),
      project_id.to_string()
    );
    assert!(comment["createdAt"].is_string());

    let (status, comments) = send(
      &router,
      "GET",
      &format!("/projects/{project_id}/comments"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn unknown_code_verifies_to_error_with_no_side_effects() {
    let (router, _mailer) = setup().await;
    let project_id = create_project(&router).await;

    let (status, body) = send(
      &router,
      "POST",
      "/comments/verify",
      Some(json!({ "email": "ana@x.com", "code": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid or expired code"));

    let (_, comments) = send(
      &router,
      "GET",
      &format!("/projects/{project_id}/comments"),
      None,
    )
    .await;
    assert!(comments.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn code_cannot_be_verified_twice() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;

    send(
      &router,
      "POST",
      &format!("/projects/{project_id}/comments/request"),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;
    let code = mailer.last_code();
    let verify = json!({ "email": "ana@x.com", "code": code });

    let (status, _) =
      send(&router, "POST", "/comments/verify", Some(verify.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
      send(&router, "POST", "/comments/verify", Some(verify)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid or expired code"));

    // Still exactly one comment.
    let (_, comments) = send(
      &router,
      "GET",
      &format!("/projects/{project_id}/comments"),
      None,
    )
    .await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn code_is_bound_to_its_kind() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;

    send(
      &router,
      "POST",
      &format!("/projects/{project_id}/comments/request"),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;
    let code = mailer.last_code();

    // A comment code submitted to the vote endpoint reads as invalid.
    let (status, body) = send(
      &router,
      "POST",
      "/votes/verify",
      Some(json!({ "email": "ana@x.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid or expired code"));
  }

  #[tokio::test]
  async fn missing_fields_are_rejected() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;

    let (status, body) = send(
      &router,
      "POST",
      &format!("/projects/{project_id}/comments/request"),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("message"));
    assert!(mailer.sent.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn request_for_missing_project_is_404() {
    let (router, _mailer) = setup().await;

    let (status, _) = send(
      &router,
      "POST",
      &format!("/projects/{}/comments/request", Uuid::new_v4()),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn direct_comment_post_is_forbidden() {
    let (router, _mailer) = setup().await;
    let project_id = create_project(&router).await;

    let (status, _) = send(
      &router,
      "POST",
      &format!("/projects/{project_id}/comments"),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  // ── Vote flow ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn vote_end_to_end_returns_count() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;
    let feature_id = create_feature(&router, &mailer, project_id).await;

    let (status, _) = send(
      &router,
      "POST",
      &format!("/features/{feature_id}/vote/request"),
      Some(json!({ "userName": "Bea", "userEmail": "bea@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code = mailer.last_code();
    let (status, body) = send(
      &router,
      "POST",
      "/votes/verify",
      Some(json!({ "email": "bea@x.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["voteCount"], json!(1));
    assert_eq!(body["vote"]["userName"], json!("Bea"));
    assert_eq!(
      body["vote"]["featureId"].as_str().unwrap(),
      feature_id.to_string()
    );
  }

  #[tokio::test]
  async fn second_vote_request_is_rejected_early() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;
    let feature_id = create_feature(&router, &mailer, project_id).await;
    let vote_req = json!({ "userName": "Bea", "userEmail": "bea@x.com" });
    let uri = format!("/features/{feature_id}/vote/request");

    send(&router, "POST", &uri, Some(vote_req.clone())).await;
    let code = mailer.last_code();
    send(
      &router,
      "POST",
      "/votes/verify",
      Some(json!({ "email": "bea@x.com", "code": code })),
    )
    .await;

    // A vote row now exists, so the precondition fires.
    let (status, body) = send(&router, "POST", &uri, Some(vote_req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
      body["error"],
      json!("you have already voted for this feature")
    );
  }

  #[tokio::test]
  async fn racing_double_request_cannot_double_vote() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;
    let feature_id = create_feature(&router, &mailer, project_id).await;
    let vote_req = json!({ "userName": "Bea", "userEmail": "bea@x.com" });
    let uri = format!("/features/{feature_id}/vote/request");

    // Both requests pass the precondition: no vote row exists yet.
    send(&router, "POST", &uri, Some(vote_req.clone())).await;
    let first_code = mailer.last_code();
    send(&router, "POST", &uri, Some(vote_req)).await;
    let second_code = mailer.last_code();

    let (status, _) = send(
      &router,
      "POST",
      "/votes/verify",
      Some(json!({ "email": "bea@x.com", "code": first_code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The second code consumes fine but the insert hits the UNIQUE
    // constraint; the displayed count stays at 1.
    let (status, body) = send(
      &router,
      "POST",
      "/votes/verify",
      Some(json!({ "email": "bea@x.com", "code": second_code })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
      body["error"],
      json!("you have already voted for this feature")
    );

    let (_, features) = send(
      &router,
      "GET",
      &format!("/projects/{project_id}/features"),
      None,
    )
    .await;
    assert_eq!(features[0]["votes"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn direct_vote_post_is_forbidden() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;
    let feature_id = create_feature(&router, &mailer, project_id).await;

    let (status, body) = send(
      &router,
      "POST",
      &format!("/features/{feature_id}/vote"),
      Some(json!({ "userName": "Bea", "userEmail": "bea@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn vote_request_for_missing_feature_is_404() {
    let (router, _mailer) = setup().await;

    let (status, _) = send(
      &router,
      "POST",
      &format!("/features/{}/vote/request", Uuid::new_v4()),
      Some(json!({ "userName": "Bea", "userEmail": "bea@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Feature flow ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn feature_verify_returns_feature_with_empty_votes() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;

    send(
      &router,
      "POST",
      &format!("/projects/{project_id}/features/request"),
      Some(json!({
        "title": "Dark mode",
        "description": "please",
        "userName": "Ana",
        "userEmail": "ana@x.com",
      })),
    )
    .await;

    let code = mailer.last_code();
    let (status, body) = send(
      &router,
      "POST",
      "/features/verify",
      Some(json!({ "email": "ana@x.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["title"], json!("Dark mode"));
    assert_eq!(body["userName"], json!("Ana"));
    assert!(body["votes"].as_array().unwrap().is_empty());
  }

  // ── Delivery failure ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delivery_failure_surfaces_but_entry_survives() {
    let (router, mailer) = setup().await;
    let project_id = create_project(&router).await;

    mailer.fail.store(true, Ordering::SeqCst);
    let (status, body) = send(
      &router,
      "POST",
      &format!("/projects/{project_id}/comments/request"),
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY, "body: {body}");

    // The ledger entry was persisted before the send was attempted, so the
    // code the mailer saw still verifies.
    let code = mailer.last_code();
    let (status, _) = send(
      &router,
      "POST",
      "/comments/verify",
      Some(json!({ "email": "ana@x.com", "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  // ── Project CRUD ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn project_crud_roundtrip() {
    let (router, _mailer) = setup().await;
    let project_id = create_project(&router).await;

    let (status, body) =
      send(&router, "GET", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], json!("inventory-manager"));
    assert!(body["comments"].as_array().unwrap().is_empty());

    let (status, body) = send(
      &router,
      "PUT",
      &format!("/projects/{project_id}"),
      Some(json!({
        "title": "Inventory Manager Pro",
        "description": "stock tracking",
        "imageUrl": "https://example.com/cover.png",
        "projectUrl": "https://example.com/repo",
        "tags": ["rust", "sqlite"],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], json!("inventory-manager-pro"));

    let (status, _) =
      send(&router, "DELETE", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) =
      send(&router, "GET", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Tasks ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn task_crud_roundtrip() {
    let (router, _mailer) = setup().await;
    let project_id = create_project(&router).await;
    let tasks_uri = format!("/projects/{project_id}/tasks");

    let (status, second) = send(
      &router,
      "POST",
      &tasks_uri,
      Some(json!({ "title": "Wire it up", "order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {second}");
    assert_eq!(second["status"], json!("pending"));

    let (status, first) = send(
      &router,
      "POST",
      &tasks_uri,
      Some(json!({ "title": "Design", "order": 0, "status": "in-progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Listed by explicit order, not creation time.
    let (status, tasks) = send(&router, "GET", &tasks_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tasks[0]["id"], first["id"]);
    assert_eq!(tasks[1]["id"], second["id"]);

    let task_id = first["id"].as_str().unwrap();
    let (status, updated) = send(
      &router,
      "PUT",
      &format!("/tasks/{task_id}"),
      Some(json!({
        "title": "Design",
        "status": "completed",
        "order": 0,
        "completedAt": "2026-08-23T10:00:00Z",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {updated}");
    assert_eq!(updated["status"], json!("completed"));
    assert!(updated["completedAt"].is_string());

    let (status, _) =
      send(&router, "DELETE", &format!("/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, tasks) = send(&router, "GET", &tasks_uri, None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn task_without_title_is_rejected() {
    let (router, _mailer) = setup().await;
    let project_id = create_project(&router).await;

    let (status, body) = send(
      &router,
      "POST",
      &format!("/projects/{project_id}/tasks"),
      Some(json!({ "title": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));
  }

  #[tokio::test]
  async fn task_for_missing_project_is_404() {
    let (router, _mailer) = setup().await;

    let (status, _) = send(
      &router,
      "POST",
      &format!("/projects/{}/tasks", Uuid::new_v4()),
      Some(json!({ "title": "Orphan" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
      &router,
      "DELETE",
      &format!("/tasks/{}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── View and visit counters ─────────────────────────────────────────────────

  #[tokio::test]
  async fn project_views_count_by_slug() {
    let (router, _mailer) = setup().await;
    create_project(&router).await;

    let (status, body) =
      send(&router, "POST", "/projects/inventory-manager/view", None).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["views"], json!(1));

    let (_, body) =
      send(&router, "POST", "/projects/inventory-manager/view", None).await;
    assert_eq!(body["views"], json!(2));

    let (status, _) =
      send(&router, "POST", "/projects/no-such-slug/view", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn site_stats_report_and_record_visits() {
    let (router, _mailer) = setup().await;

    let (status, body) = send(&router, "GET", "/site-stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visits"], json!(0));

    let (_, body) = send(&router, "POST", "/site-stats", None).await;
    assert_eq!(body["visits"], json!(1));

    let (_, body) = send(&router, "GET", "/site-stats", None).await;
    assert_eq!(body["visits"], json!(1));
  }

  // ── Contact ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn contact_relays_message_through_mailer() {
    let (router, mailer) = setup().await;

    let (status, body) = send(
      &router,
      "POST",
      "/contact",
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hola" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["success"], json!(true));

    let contacts = mailer.contacts.lock().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0], ("Ana".into(), "ana@x.com".into(), "hola".into()));
  }

  #[tokio::test]
  async fn contact_rejects_bad_input() {
    let (router, mailer) = setup().await;

    let (status, _) = send(
      &router,
      "POST",
      "/contact",
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
      &router,
      "POST",
      "/contact",
      Some(json!({ "name": "Ana", "email": "not-an-email", "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid email"));

    assert!(mailer.contacts.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn contact_delivery_failure_is_502() {
    let (router, mailer) = setup().await;
    mailer.fail.store(true, Ordering::SeqCst);

    let (status, _) = send(
      &router,
      "POST",
      "/contact",
      Some(json!({ "name": "Ana", "email": "ana@x.com", "message": "hola" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
  }

  #[tokio::test]
  async fn get_missing_project_is_404() {
    let (router, _mailer) = setup().await;
    let (status, body) =
      send(&router, "GET", &format!("/projects/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }
}
