//! Storage module for database access and per-domain stores.

pub mod database;
pub mod gamification_store;
pub mod progress_store;
pub mod schema;

pub use database::{Database, DatabaseError};
pub use gamification_store::GamificationStore;
pub use progress_store::ProgressStore;
