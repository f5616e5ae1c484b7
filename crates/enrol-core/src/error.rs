//! Error types for `enrol-core`.

use thiserror::Error;

use crate::{entity::UserId, validate::ValidationErrors};

#[derive(Debug, Error)]
pub enum Error {
  /// The draft failed local validation; nothing was sent.
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// The draft matches its baseline, so there is nothing to save.
  #[error("no changes to save")]
  Unchanged,

  #[error("no editor is open")]
  NoDraft,

  /// The user is no longer in the cache (e.g. removed by another session).
  #[error("user {0} is no longer present")]
  StaleReference(UserId),

  /// Any failure reported by the backend collaborator.
  #[error("network error: {0}")]
  Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn network<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Network(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
