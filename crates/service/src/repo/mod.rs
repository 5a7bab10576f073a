//! Database-backed implementations of the repository traits.

pub mod seaorm;

pub use seaorm::SeaOrmStore;
