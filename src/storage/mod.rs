//! SQLite storage for user accounts, favourite teams, and sessions.
//!
//! Scraped data is never stored; every scrape result lives only for the
//! request that produced it.

pub mod repository;
pub mod schema;

pub use repository::UserRepository;
pub use schema::create_tables;
