//! Users, subjects, and the references that link them.
//!
//! Both entities are owned by the backend; the console only ever holds read
//! copies. The user↔subject assignment is not a separate graph: it is the
//! ordered list of [`SubjectRef`]s embedded in each [`User`].

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque backend identity of a user.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Opaque backend identity of a subject.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubjectId(pub u64);

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

impl fmt::Display for SubjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

// ─── Subjects ────────────────────────────────────────────────────────────────

/// A subject as listed in the backend catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
  pub id:          SubjectId,
  pub name:        String,
  pub description: String,
}

impl Subject {
  pub fn to_ref(&self) -> SubjectRef {
    SubjectRef {
      id:          self.id,
      name:        self.name.clone(),
      description: self.description.clone(),
    }
  }
}

/// A reference to a subject as it appears inside an assignment list.
///
/// Identity is carried by `id` alone; `name` and `description` are display
/// data and may be empty when a reference was built from an id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRef {
  pub id:          SubjectId,
  pub name:        String,
  pub description: String,
}

impl SubjectRef {
  pub fn new(id: SubjectId, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      description: String::new(),
    }
  }

  /// A reference carrying identity only.
  pub fn bare(id: SubjectId) -> Self { Self::new(id, "") }
}

impl From<&Subject> for SubjectRef {
  fn from(subject: &Subject) -> Self { subject.to_ref() }
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// A user together with their assigned subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id:       UserId,
  pub name:     String,
  pub email:    String,
  pub subjects: Vec<SubjectRef>,
}

impl User {
  pub fn has_subject(&self, id: SubjectId) -> bool {
    self.subjects.iter().any(|s| s.id == id)
  }
}
