//! Error type for `enrol-client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The backend rejected the bearer token (missing or expired).
  #[error("unauthorized: {endpoint}")]
  Unauthorized { endpoint: String },

  #[error("{endpoint} → {status}")]
  Status {
    endpoint: String,
    status:   StatusCode,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
