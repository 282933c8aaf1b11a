//! Errors raised while talking to the hosted model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The API answered with a non-success status.
  #[error("model API returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("model response had no choices")]
  EmptyResponse,

  #[error("tool task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = AgentError> = std::result::Result<T, E>;
