//! Storage crate: session record persistence and repository abstractions.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – SessionRecord
//! - [`repository`] – Repository trait
//! - [`json_repo`] – JsonRepository (single JSON document on disk)

mod error;
mod json_repo;
mod models;
mod repository;


pub use error::{Result, StorageError};
pub use json_repo::JsonRepository;
pub use models::SessionRecord;
pub use repository::{Repository, Update};
