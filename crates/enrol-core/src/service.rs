//! Collaborator traits: the backend service and the operator.
//!
//! Both are implemented outside this crate (`enrol-client` provides the HTTP
//! backend, `enrol-cli` the terminal operator). The core depends on these
//! abstractions only.

use std::future::Future;

use crate::entity::{Subject, SubjectId, User, UserId};

// ─── Payloads ────────────────────────────────────────────────────────────────

/// The complete target state of one user's editable fields.
///
/// Always a full replace: every field is sent, never a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
  pub name:        String,
  pub email:       String,
  pub subject_ids: Vec<SubjectId>,
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// Abstraction over the remote user/subject service.
///
/// All methods return `Send` futures so a console can be driven from a
/// multi-threaded tokio runtime. Request timeouts are the implementor's
/// responsibility; callers never retry.
pub trait AssignmentService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every user, each with its assigned subjects embedded.
  fn fetch_users_with_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// The full subject catalogue.
  fn fetch_all_subjects(
    &self,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Replace the user's name, email and subject assignment with `update`.
  fn update_user_assignment(
    &self,
    user_id: UserId,
    update: UserUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the user's assignment record.
  fn delete_user_assignment(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Operator ────────────────────────────────────────────────────────────────

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
}

/// The human at the console: confirms destructive actions and receives
/// feedback.
pub trait Operator: Send + Sync {
  /// Ask for explicit confirmation. `false` aborts the action.
  fn confirm_destructive<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = bool> + Send + 'a;

  fn notify(&self, kind: NoticeKind, message: &str);
}
