//! Auth Errors

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown, revoked, malformed or mismatched token. Callers see one answer.
    #[error("api token not recognised")]
    NotFound,

    #[error("api token lookup failed")]
    Sql(#[from] Error),
}
