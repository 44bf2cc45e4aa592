//! Persons HTTP Protocol
//!
//! Route paths of the phonebook API. The client builds its URLs from the same
//! constants the router registers.

/// Collection endpoint: list (GET) and create (POST).
pub const ENDPOINT_PERSONS: &str = "/api/persons";
/// Single-record endpoint: read (GET), update (PUT) and delete (DELETE).
pub const ENDPOINT_PERSON: &str = "/api/persons/:id";
/// Human-readable summary of the phonebook.
pub const ENDPOINT_INFO: &str = "/info";

/// Path of the record with the given id, relative to the server root.
pub fn person_path(id: &str) -> String {
    format!("{}/{}", ENDPOINT_PERSONS, id)
}
