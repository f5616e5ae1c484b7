//! [`EntityCache`] — the last server-confirmed users and subjects.
//!
//! The cache is replaced wholesale on every load. The only partial mutation
//! is [`EntityCache::remove_user`], used by the optimistic delete path.

use crate::entity::{Subject, SubjectId, User, UserId};

#[derive(Debug, Clone, Default)]
pub struct EntityCache {
  users:    Vec<User>,
  subjects: Vec<Subject>,
  loaded:   bool,
}

impl EntityCache {
  pub fn new() -> Self { Self::default() }

  /// Replace both collections with fresh server snapshots.
  pub fn replace(&mut self, users: Vec<User>, subjects: Vec<Subject>) {
    self.users = users;
    self.subjects = subjects;
    self.loaded = true;
  }

  /// Drop one user without a round trip. Returns the removed entry.
  pub fn remove_user(&mut self, id: UserId) -> Option<User> {
    let idx = self.users.iter().position(|u| u.id == id)?;
    Some(self.users.remove(idx))
  }

  /// `true` once a load has succeeded at least once.
  pub fn is_loaded(&self) -> bool { self.loaded }

  pub fn users(&self) -> &[User] { &self.users }

  pub fn subjects(&self) -> &[Subject] { &self.subjects }

  pub fn user(&self, id: UserId) -> Option<&User> {
    self.users.iter().find(|u| u.id == id)
  }

  pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
    self.subjects.iter().find(|s| s.id == id)
  }

  pub fn contains_user(&self, id: UserId) -> bool { self.user(id).is_some() }
}
