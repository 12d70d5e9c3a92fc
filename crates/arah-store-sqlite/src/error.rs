//! Error type for `arah-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain-level failures (unknown IDs, rule-set conflicts, invalid
  /// certainty factors) surface through the core error type.
  #[error(transparent)]
  Core(#[from] arah_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
