//! Test helpers
//!
//! An in-memory implementation of every repository trait, for exercising the
//! HTTP layer without a database.

mod memory;

pub use memory::InMemoryDatabase;
