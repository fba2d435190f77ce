//! Customers service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::{issue_api_token, repository::PgAuthRepository},
    database::Db,
    domain::customers::{
        data::{IssuedCustomer, NewCustomer},
        errors::CustomersServiceError,
        records::{CustomerRecord, CustomerUuid},
        repository::PgCustomersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    repository: PgCustomersRepository,
    tokens: PgAuthRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
            tokens: PgAuthRepository::new(),
        }
    }
}

#[async_trait]
impl CustomersService for PgCustomersService {
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<IssuedCustomer, CustomersServiceError> {
        if customer.name.trim().is_empty() {
            return Err(CustomersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_customer(&mut tx, &customer).await?;

        let (token, record) = issue_api_token(created.uuid);

        self.tokens.create_api_token(&mut tx, &record).await?;

        tx.commit().await?;

        Ok(IssuedCustomer {
            customer: created,
            token,
        })
    }

    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        let mut tx = self.db.begin().await?;

        let customer = self.repository.get_customer(&mut tx, customer).await?;

        tx.commit().await?;

        Ok(customer)
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Creates a customer and issues its first API token.
    async fn create_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<IssuedCustomer, CustomersServiceError>;

    /// Retrieve a single customer.
    async fn get_customer(
        &self,
        customer: CustomerUuid,
    ) -> Result<CustomerRecord, CustomersServiceError>;
}
