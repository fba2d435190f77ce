//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};

use crate::{
    auth::{
        ApiToken, AuthServiceError, Session, models::NewApiToken, repository::PgAuthRepository,
    },
    database::Db,
    domain::customers::records::CustomerUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }
}

/// Generates a token for `customer` and the row to store for it.
pub(crate) fn issue_api_token(customer: CustomerUuid) -> (String, NewApiToken) {
    let token = ApiToken::generate();

    let record = NewApiToken {
        uuid: token.id,
        customer_uuid: customer,
        version: token.version,
        token_hash: token.verifier(customer),
    };

    (token.to_string(), record)
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Session, AuthServiceError> {
        let parsed_token = bearer_token.parse::<ApiToken>().map_err(|error| {
            debug!(%error, "rejecting bearer token");

            AuthServiceError::NotFound
        })?;

        let mut tx = self.db.begin().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, parsed_token.id, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed_token.version
            || parsed_token.verifier(token.customer_uuid) != token.token_hash
        {
            return Err(AuthServiceError::NotFound);
        }

        tx.commit().await?;

        // Auth success does not depend on the bookkeeping write.
        let touched: Result<(), sqlx::Error> = async {
            let mut tx = self.db.begin().await?;

            self.repository
                .touch_api_token(&mut tx, parsed_token.id)
                .await?;

            tx.commit().await
        }
        .await;

        if let Err(error) = touched {
            warn!(%error, "failed to record api token use");
        }

        Ok(Session {
            customer: token.customer_uuid,
            role: token.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves a bearer token to the session of the customer that owns it.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Session, AuthServiceError>;
}
