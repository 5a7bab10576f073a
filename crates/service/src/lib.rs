//! Service layer providing the store's business operations on top of models.
//! - Separates business logic from data access behind repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod access;
pub mod auth;
pub mod business;
pub mod errors;
pub mod mail;
pub mod mock;
pub mod pagination;
pub mod product;
pub mod repo;
pub mod runtime;
pub mod storage;
