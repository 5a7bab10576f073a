//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, token validation and email verification live here.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use service::AuthService;
