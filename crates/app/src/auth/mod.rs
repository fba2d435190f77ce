//! Authentication

mod errors;
mod models;
pub(crate) mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::*;
