//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: Personal-record model (`Max`)
//! - `repository`: Repository trait for the user store

mod model;
mod repository;

// Re-export public API
pub use model::Max;
pub use repository::UserRepository;
