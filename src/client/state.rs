use std::future::Future;

use super::api::PersonsApi;
use super::notice::NoticeSlot;
use crate::persons::types::{Person, PersonId, PersonPayload};

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> impl Future<Output = bool> + Send;
}

/// Result of one user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded(usize),
    Created(Person),
    Updated(Person),
    Deleted(PersonId),
    Declined,
    Failed(String),
}

/// Everything the presentation layer renders.
///
/// Read-only outside this module; the `Controller` is the only writer.
#[derive(Debug, Default)]
pub struct ClientState {
    persons: Vec<Person>,
    filter: String,
    new_name: String,
    new_number: String,
    info: NoticeSlot,
    error: NoticeSlot,
}

impl ClientState {
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    pub fn new_number(&self) -> &str {
        &self.new_number
    }

    pub fn info(&self) -> Option<&str> {
        self.info.message()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.message()
    }

    /// Records whose name contains the filter, ignoring case.
    pub fn visible(&self) -> Vec<&Person> {
        filter_by_name(&self.persons, &self.filter)
    }
}

pub fn filter_by_name<'a>(persons: &'a [Person], query: &str) -> Vec<&'a Person> {
    let query = query.to_lowercase();
    persons
        .iter()
        .filter(|person| person.name.to_lowercase().contains(&query))
        .collect()
}

/// Keeps a `ClientState` in sync with the phonebook API.
pub struct Controller<A> {
    api: A,
    state: ClientState,
}

impl<A: PersonsApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ClientState::default(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.state.filter = filter.into();
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.state.new_name = name.into();
    }

    pub fn set_new_number(&mut self, number: impl Into<String>) {
        self.state.new_number = number.into();
    }

    /// Drops notices whose time is up.
    pub fn tick(&mut self) {
        self.state.info.clear_expired();
        self.state.error.clear_expired();
    }

    /// Replaces the local list with the server's.
    pub async fn load(&mut self) -> Outcome {
        match self.api.list().await {
            Ok(persons) => {
                let count = persons.len();
                self.state.persons = persons;
                self.state.info.show("Got initial phonebook entries");
                Outcome::Loaded(count)
            }
            Err(e) => {
                tracing::warn!("Failed to load persons: {}", e);
                self.fail(e.user_message())
            }
        }
    }

    /// Adds the entry from the form inputs, or offers to overwrite the number of
    /// an existing entry with the same name.
    pub async fn submit<C: Confirm>(&mut self, confirm: &mut C) -> Outcome {
        let name = self.state.new_name.clone();
        let payload = PersonPayload::new(name.clone(), self.state.new_number.clone());

        let existing = self
            .state
            .persons
            .iter()
            .find(|person| person.name == name)
            .map(|person| person.id);

        match existing {
            None => match self.api.create(&payload).await {
                Ok(person) => {
                    self.state.persons.push(person.clone());
                    self.clear_inputs();
                    self.state
                        .info
                        .show(format!("Created new entry for '{}'", name));
                    Outcome::Created(person)
                }
                Err(e) => {
                    tracing::warn!("Failed to create {}: {}", name, e);
                    self.fail(e.user_message())
                }
            },
            Some(id) => {
                let question = format!(
                    "{} is already added to phonebook, replace the old number with a new one?",
                    name
                );
                if !confirm.confirm(&question).await {
                    return Outcome::Declined;
                }

                match self.api.update(&id, &payload).await {
                    Ok(person) => {
                        if let Some(slot) = self.state.persons.iter_mut().find(|p| p.id == id) {
                            *slot = person.clone();
                        }
                        self.clear_inputs();
                        self.state
                            .info
                            .show(format!("Updated the number for '{}'", name));
                        Outcome::Updated(person)
                    }
                    Err(e) => {
                        tracing::warn!("Failed to update {}: {}", name, e);
                        self.fail(e.user_message())
                    }
                }
            }
        }
    }

    pub async fn delete<C: Confirm>(&mut self, id: &PersonId, confirm: &mut C) -> Outcome {
        let Some(name) = self
            .state
            .persons
            .iter()
            .find(|person| &person.id == id)
            .map(|person| person.name.clone())
        else {
            return self.fail(format!("no entry with id '{}'", id));
        };

        if !confirm.confirm(&format!("Delete {}?", name)).await {
            return Outcome::Declined;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.state.persons.retain(|person| &person.id != id);
                self.state
                    .info
                    .show(format!("Deleted the entry for '{}'", name));
                Outcome::Deleted(*id)
            }
            Err(e) => {
                tracing::warn!("Failed to delete {}: {}", name, e);
                self.fail(format!("the entry for '{}' could not be deleted", name))
            }
        }
    }

    fn clear_inputs(&mut self) {
        self.state.new_name.clear();
        self.state.new_number.clear();
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.state.error.show(message.clone());
        Outcome::Failed(message)
    }
}
