//! Person Data Types
//!
//! Records kept by the store and the request/response bodies of the
//! `/api/persons` endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned identifier of a person.
///
/// Serialized as the hyphenated UUID string. Anything that does not parse as a
/// UUID is a malformed identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PersonId(pub Uuid);

impl PersonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PersonId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A single phonebook entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub number: String,
    pub id: PersonId,
}

/// Validated field values for an insert or an update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub number: String,
}

/// Body of `POST /api/persons` and `PUT /api/persons/:id`.
///
/// Both fields are required; `None`, `null` and `""` are all treated as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

impl PersonPayload {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }

    /// Checks the required fields, `name` first.
    pub fn validate(self) -> Result<NewPerson, MissingField> {
        let name = present(self.name).ok_or(MissingField::Name)?;
        let number = present(self.number).ok_or(MissingField::Number)?;
        Ok(NewPerson { name, number })
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Required payload field that was absent or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Name,
    Number,
}

impl MissingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingField::Name => "name",
            MissingField::Number => "number",
        }
    }
}

/// Error body shared by every failing JSON response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
