//! File-backed storage for uploaded images.
//!
//! Uploads land under `{static_dir}/images` with random names and are
//! resized before they are written.

pub mod image_store;

pub use image_store::{ImageStore, MediaError};
