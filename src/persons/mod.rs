//! Persons Module
//!
//! The phonebook's single collection and its HTTP surface.
//!
//! ## Core Concepts
//! - **Store**: `PersonStore` keeps records in a concurrent map, in insertion order,
//!   optionally writing a JSON snapshot after every mutation.
//! - **Validation**: request bodies are checked for required fields before the
//!   store is touched; the store then rejects blank values on its own.
//! - **Uniqueness**: names are unique by convention. The create handler checks for
//!   an existing name before inserting; the store does not enforce it.
//! - **Handlers**: axum handlers translate requests into store calls and map store
//!   failures onto `AppError` responses.

pub mod handlers;
pub mod protocol;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
