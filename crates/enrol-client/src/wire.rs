//! Backend JSON shapes and their mapping onto core entities.
//!
//! The service names a subject's title `subject_name` and wraps the user
//! listing in a `{"user": [...]}` envelope; both quirks stay in this module.

use enrol_core::{
  entity::{Subject, SubjectId, SubjectRef, User, UserId},
  service::UserUpdate,
};
use serde::{Deserialize, Serialize};

// ─── Responses ───────────────────────────────────────────────────────────────

/// `GET /users/subjects` body. A missing or null `user` means no users.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersEnvelope {
  #[serde(default)]
  user: Option<Vec<WireUser>>,
}

impl UsersEnvelope {
  pub(crate) fn into_users(self) -> Vec<User> {
    self
      .user
      .unwrap_or_default()
      .into_iter()
      .map(User::from)
      .collect()
  }
}

/// `GET /user/{id}/subjects` body: a single user under the same key.
#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
  #[serde(default)]
  user: Option<WireUser>,
}

impl UserEnvelope {
  pub(crate) fn into_user(self) -> Option<User> { self.user.map(User::from) }
}

#[derive(Debug, Deserialize)]
struct WireUser {
  id:       UserId,
  #[serde(default)]
  name:     Option<String>,
  #[serde(default)]
  email:    Option<String>,
  #[serde(default)]
  subjects: Option<Vec<WireSubject>>,
}

impl From<WireUser> for User {
  fn from(w: WireUser) -> Self {
    User {
      id:       w.id,
      name:     w.name.unwrap_or_default(),
      email:    w.email.unwrap_or_default(),
      subjects: w
        .subjects
        .unwrap_or_default()
        .into_iter()
        .map(SubjectRef::from)
        .collect(),
    }
  }
}

/// A subject as the backend serialises it, both in the catalogue and when
/// embedded in a user.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSubject {
  id:           SubjectId,
  #[serde(default)]
  subject_name: Option<String>,
  #[serde(default)]
  description:  Option<String>,
}

impl From<WireSubject> for Subject {
  fn from(w: WireSubject) -> Self {
    Subject {
      id:          w.id,
      name:        w.subject_name.unwrap_or_default(),
      description: w.description.unwrap_or_default(),
    }
  }
}

/// `POST /subject` body: the created subject under `subject`.
#[derive(Debug, Deserialize)]
pub(crate) struct SubjectEnvelope {
  pub(crate) subject: WireSubject,
}

/// `POST /login` body.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
  pub(crate) access_token: String,
}

impl From<WireSubject> for SubjectRef {
  fn from(w: WireSubject) -> Self { Subject::from(w).to_ref() }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// `POST /user/{id}/subjects` body: `{"user": {"name", "email", "subjects"}}`.
#[derive(Debug, Serialize)]
pub(crate) struct AssignBody<'a> {
  user: AssignUser<'a>,
}

#[derive(Debug, Serialize)]
struct AssignUser<'a> {
  name:     &'a str,
  email:    &'a str,
  subjects: &'a [SubjectId],
}

impl<'a> From<&'a UserUpdate> for AssignBody<'a> {
  fn from(u: &'a UserUpdate) -> Self {
    AssignBody {
      user: AssignUser {
        name:     &u.name,
        email:    &u.email,
        subjects: &u.subject_ids,
      },
    }
  }
}

/// Create/update body for a catalogue subject.
#[derive(Debug, Serialize)]
pub(crate) struct SubjectBody<'a> {
  subject_name: &'a str,
  description:  &'a str,
}

impl<'a> SubjectBody<'a> {
  pub(crate) fn new(name: &'a str, description: &'a str) -> Self {
    Self {
      subject_name: name,
      description,
    }
  }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
  pub(crate) email:    &'a str,
  pub(crate) password: &'a str,
}
