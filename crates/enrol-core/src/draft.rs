//! Draft editing sessions.
//!
//! A [`Draft`] is a working copy of one user's editable fields together with
//! the baseline it was opened from. The baseline is fixed at [`Draft::open`]
//! and never changes afterwards; only the live fields move.
//!
//! [`DraftEditor`] enforces the single-session rule: opening a new draft
//! discards whatever was open before.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
  change,
  entity::{SubjectId, SubjectRef, User, UserId},
  selection::normalize,
  service::UserUpdate,
  validate::{self, ValidationErrors},
};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The editable triple of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
  pub name:     String,
  pub email:    String,
  pub subjects: Vec<SubjectRef>,
}

impl Fields {
  pub fn from_user(user: &User) -> Self {
    Self {
      name:     user.name.clone(),
      email:    user.email.clone(),
      subjects: normalize(user.subjects.iter().cloned()),
    }
  }

  /// Subject identities in selection order.
  pub fn subject_ids(&self) -> Vec<SubjectId> { self.subjects.iter().map(|s| s.id).collect() }

  pub(crate) fn subject_id_set(&self) -> BTreeSet<SubjectId> {
    self.subjects.iter().map(|s| s.id).collect()
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Draft {
  user_id:  UserId,
  fields:   Fields,
  baseline: Fields,
}

impl Draft {
  /// Snapshot `user` as both the live fields and the baseline.
  pub fn open(user: &User) -> Self {
    let baseline = Fields::from_user(user);
    Self {
      user_id: user.id,
      fields: baseline.clone(),
      baseline,
    }
  }

  pub fn user_id(&self) -> UserId { self.user_id }

  pub fn fields(&self) -> &Fields { &self.fields }

  pub fn baseline(&self) -> &Fields { &self.baseline }

  pub fn set_name(&mut self, name: impl Into<String>) { self.fields.name = name.into(); }

  pub fn set_email(&mut self, email: impl Into<String>) { self.fields.email = email.into(); }

  /// Replace the selection. Duplicates are removed, first occurrence wins.
  pub fn set_subjects<I>(&mut self, selection: I)
  where
    I: IntoIterator<Item = SubjectRef>,
  {
    self.fields.subjects = normalize(selection);
  }

  /// Append `subject` to the selection unless its id is already present.
  pub fn add_subject(&mut self, subject: SubjectRef) {
    let selection: Vec<_> = self
      .fields
      .subjects
      .iter()
      .cloned()
      .chain(std::iter::once(subject))
      .collect();
    self.set_subjects(selection);
  }

  /// Remove `id` from the selection. Returns whether it was present.
  pub fn remove_subject(&mut self, id: SubjectId) -> bool {
    let before = self.fields.subjects.len();
    let selection: Vec<_> = self
      .fields
      .subjects
      .iter()
      .filter(|s| s.id != id)
      .cloned()
      .collect();
    self.set_subjects(selection);
    self.fields.subjects.len() != before
  }

  /// Whether the live fields differ from the baseline. See [`change::is_dirty`].
  pub fn is_dirty(&self) -> bool { change::is_dirty(self) }

  pub fn validate(&self) -> ValidationErrors { validate::validate(&self.fields) }

  /// Valid and dirty: the only state in which a commit may proceed.
  pub fn is_committable(&self) -> bool { self.is_dirty() && self.validate().is_empty() }

  /// Build the full-replace payload for this draft.
  pub fn to_update(&self) -> UserUpdate {
    UserUpdate {
      name:        self.fields.name.trim().to_owned(),
      email:       self.fields.email.trim().to_owned(),
      subject_ids: self.fields.subject_ids(),
    }
  }
}

// ─── Editor ──────────────────────────────────────────────────────────────────

/// Holds at most one open [`Draft`].
#[derive(Debug, Default)]
pub struct DraftEditor {
  current: Option<Draft>,
}

impl DraftEditor {
  pub fn new() -> Self { Self::default() }

  /// Open a draft for `user`, discarding any draft already open.
  pub fn open(&mut self, user: &User) -> &mut Draft {
    if let Some(previous) = self.current.take() {
      debug!(
        user_id = %previous.user_id,
        dirty = previous.is_dirty(),
        "discarding open draft"
      );
    }
    debug!(user_id = %user.id, "opening draft");
    self.current.insert(Draft::open(user))
  }

  /// Discard the open draft, if any, and return it.
  pub fn close(&mut self) -> Option<Draft> {
    let draft = self.current.take();
    if let Some(d) = &draft {
      debug!(user_id = %d.user_id, "closing draft");
    }
    draft
  }

  pub fn is_open(&self) -> bool { self.current.is_some() }

  pub fn draft(&self) -> Option<&Draft> { self.current.as_ref() }

  pub fn draft_mut(&mut self) -> Option<&mut Draft> { self.current.as_mut() }
}
