pub mod company;
pub mod job;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::sql::SqlError;

pub use company::{Company, CompanyDetail, CompanyFilter, CompanyPatch, NewCompany};
pub use job::{Job, JobFilter, JobPatch, NewJob};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<SqlError> for ModelError {
    fn from(err: SqlError) -> Self {
        ModelError::Invalid(err.to_string())
    }
}

/// Distinguishes an absent field from an explicit JSON null on patch
/// payloads: absent deserializes to `None` (via `#[serde(default)]`),
/// `null` to `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
