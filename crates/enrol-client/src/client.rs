//! Async HTTP client wrapping the user/subject REST API.

use std::time::Duration;

use enrol_core::{
  entity::{Subject, SubjectId, User, UserId},
  service::{AssignmentService, UserUpdate},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::{
  Error, Result,
  wire::{
    AssignBody, LoginBody, LoginResponse, SubjectBody, SubjectEnvelope, UserEnvelope,
    UsersEnvelope, WireSubject,
  },
};

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Service root including any path prefix, e.g. `http://localhost:8000/api`.
  pub base_url: String,
  /// Bearer token. Empty means requests go out unauthenticated.
  pub token:    String,
}

/// Async HTTP client for the backend REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  async fn send(&self, req: RequestBuilder, endpoint: &str) -> Result<Response> {
    debug!(endpoint, "sending request");
    let resp = self.auth(req).send().await?;
    match resp.status() {
      s if s.is_success() => Ok(resp),
      StatusCode::UNAUTHORIZED => {
        warn!(endpoint, "backend rejected credentials");
        Err(Error::Unauthorized {
          endpoint: endpoint.to_owned(),
        })
      }
      status => Err(Error::Status {
        endpoint: endpoint.to_owned(),
        status,
      }),
    }
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /login` — exchange credentials for a bearer token.
  pub async fn login(&self, email: &str, password: &str) -> Result<String> {
    let req = self
      .client
      .post(self.url("/login"))
      .json(&LoginBody { email, password });
    let resp = self.send(req, "POST /login").await?;
    let body: LoginResponse = resp.json().await?;
    Ok(body.access_token)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /users/subjects`
  pub async fn list_users_with_subjects(&self) -> Result<Vec<User>> {
    let resp = self
      .send(self.client.get(self.url("/users/subjects")), "GET /users/subjects")
      .await?;
    let envelope: UsersEnvelope = resp.json().await?;
    Ok(envelope.into_users())
  }

  /// `GET /user/{id}/subjects` — one user with their subjects, or `None`
  /// when the backend returns no user.
  pub async fn fetch_user_subjects(&self, user_id: UserId) -> Result<Option<User>> {
    let path = format!("/user/{user_id}/subjects");
    let resp = self
      .send(self.client.get(self.url(&path)), &format!("GET {path}"))
      .await?;
    let envelope: UserEnvelope = resp.json().await?;
    Ok(envelope.into_user())
  }

  /// `POST /user/{id}/subjects`
  pub async fn assign_subjects(&self, user_id: UserId, update: &UserUpdate) -> Result<()> {
    let path = format!("/user/{user_id}/subjects");
    let req = self
      .client
      .post(self.url(&path))
      .json(&AssignBody::from(update));
    self.send(req, &format!("POST {path}")).await?;
    Ok(())
  }

  /// `DELETE /user/{id}/subjects`
  pub async fn remove_subjects(&self, user_id: UserId) -> Result<()> {
    let path = format!("/user/{user_id}/subjects");
    self
      .send(self.client.delete(self.url(&path)), &format!("DELETE {path}"))
      .await?;
    Ok(())
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  /// `GET /subjects`
  pub async fn list_subjects(&self) -> Result<Vec<Subject>> {
    let resp = self
      .send(self.client.get(self.url("/subjects")), "GET /subjects")
      .await?;
    let subjects: Vec<WireSubject> = resp.json().await?;
    Ok(subjects.into_iter().map(Subject::from).collect())
  }

  /// `POST /subject` — returns the created subject.
  pub async fn create_subject(&self, name: &str, description: &str) -> Result<Subject> {
    let req = self
      .client
      .post(self.url("/subject"))
      .json(&SubjectBody::new(name, description));
    let resp = self.send(req, "POST /subject").await?;
    let envelope: SubjectEnvelope = resp.json().await?;
    Ok(envelope.subject.into())
  }

  /// `PUT /subjects/update/{id}` — full replace of name and description.
  pub async fn update_subject(
    &self,
    subject_id: SubjectId,
    name: &str,
    description: &str,
  ) -> Result<()> {
    let path = format!("/subjects/update/{subject_id}");
    let req = self
      .client
      .put(self.url(&path))
      .json(&SubjectBody::new(name, description));
    self.send(req, &format!("PUT {path}")).await?;
    Ok(())
  }

  /// `DELETE /subjects/delete/{id}`
  pub async fn delete_subject(&self, subject_id: SubjectId) -> Result<()> {
    let path = format!("/subjects/delete/{subject_id}");
    self
      .send(self.client.delete(self.url(&path)), &format!("DELETE {path}"))
      .await?;
    Ok(())
  }
}

// ─── AssignmentService impl ─────────────────────────────────────────────────

impl AssignmentService for ApiClient {
  type Error = Error;

  async fn fetch_users_with_subjects(&self) -> Result<Vec<User>> {
    self.list_users_with_subjects().await
  }

  async fn fetch_all_subjects(&self) -> Result<Vec<Subject>> { self.list_subjects().await }

  async fn update_user_assignment(&self, user_id: UserId, update: UserUpdate) -> Result<()> {
    self.assign_subjects(user_id, &update).await
  }

  async fn delete_user_assignment(&self, user_id: UserId) -> Result<()> {
    self.remove_subjects(user_id).await
  }
}
