//! Quote storage backed by a local SQLite database.
//!
//! The schema manager creates and versions the tables, the store exposes CRUD, search, and
//! statistics operations, and the seeder fills an empty vault with a curated collection.

mod error;
pub mod models;
pub mod schema;
pub mod seed;
mod store;

pub use error::StorageError;
pub use models::{NewQuote, Quote, QuoteUpdate, SearchFilter, Statistics, TagCount, TopEntry};
pub use seed::{SeedOutcome, seed_database};
pub use store::QuoteStore;
