//! Auth data models.

use uuid::Uuid;

use crate::{
    auth::ApiTokenVersion,
    domain::customers::records::{CustomerUuid, Role},
};

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub customer: CustomerUuid,
    pub role: Role,
}

impl Session {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// API token data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    /// Customer that owns this API token.
    pub customer_uuid: CustomerUuid,

    /// Owner's role.
    pub role: Role,

    /// Token format/hash version.
    pub version: ApiTokenVersion,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewApiToken {
    pub uuid: Uuid,
    pub customer_uuid: CustomerUuid,
    pub version: ApiTokenVersion,
    pub token_hash: String,
}
