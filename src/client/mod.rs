//! Client State Module
//!
//! A local cache of the phonebook, kept in step with the API.
//!
//! ## Core Concepts
//! - **Controller**: the only way to change `ClientState`. Loads replace the whole
//!   list; creates, updates and deletes patch it from the server's response.
//! - **Duplicate names**: a create for a name already in the local list turns into
//!   an overwrite of that entry's number, after confirmation.
//! - **Notices**: one info and one error message at a time, each gone 5 seconds
//!   after it was shown.
//! - **Filter**: a case-insensitive substring match on names, computed on demand.
//!
//! Two intents are never coordinated: whichever response arrives last shapes the
//! local list until the next reload.

pub mod api;
pub mod notice;
pub mod state;
