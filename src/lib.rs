//! Phonebook Library
//!
//! A contact list served over a small REST API, plus the client-side state that a
//! front end keeps in sync with it. The `phonebook` binary (`main.rs`) runs the
//! server; the `phonebook-ui` crate is a terminal front end built on `client`.
//!
//! ## Modules
//! - **`persons`**: the record store, request/response types and the axum handlers
//!   for `/api/persons` and `/info`.
//! - **`server`**: router assembly, request logging, CORS and the serve loop with
//!   graceful shutdown.
//! - **`error`**: `AppError`, the mapping from failures to HTTP status codes and
//!   `{error}` bodies.
//! - **`config`**: settings read from the environment at startup.
//! - **`client`**: the client state controller, its HTTP API binding and the
//!   transient notices.

pub mod client;
pub mod config;
pub mod error;
pub mod persons;
pub mod server;
