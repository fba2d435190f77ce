//! Customers Data

use crate::domain::customers::records::{CustomerRecord, CustomerUuid, Role};

/// New Customer Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub role: Role,
}

/// A created customer with its one-time API token.
#[derive(Debug, Clone)]
pub struct IssuedCustomer {
    pub customer: CustomerRecord,
    pub token: String,
}
