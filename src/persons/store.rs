use super::types::{NewPerson, Person, PersonId};

use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("person '{0}' not found")]
    NotFound(PersonId),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
}

struct StoredPerson {
    seq: u64,
    person: Person,
}

struct Snapshot {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// The person collection.
///
/// Records live in a concurrent map keyed by id. A monotonically increasing
/// sequence number per record keeps `find_all` in insertion order. When opened
/// on a data file, every mutation rewrites the JSON snapshot before returning;
/// if that write fails the mutation is rolled back in memory. Mutations hold the
/// snapshot lock from the in-memory change until the write completes, so a
/// snapshot never contains a change that is later rolled back.
pub struct PersonStore {
    records: DashMap<PersonId, StoredPerson>,
    next_seq: AtomicU64,
    snapshot: Option<Snapshot>,
}

impl PersonStore {
    pub fn in_memory() -> Self {
        Self {
            records: DashMap::new(),
            next_seq: AtomicU64::new(0),
            snapshot: None,
        }
    }

    /// Opens a store backed by `path`. A missing file starts an empty phonebook.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let persons: Vec<Person> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No snapshot at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let store = Self {
            records: DashMap::new(),
            next_seq: AtomicU64::new(0),
            snapshot: Some(Snapshot {
                path,
                write_lock: Mutex::new(()),
            }),
        };
        for person in persons {
            let seq = store.next_seq();
            store.records.insert(person.id, StoredPerson { seq, person });
        }

        tracing::info!("Loaded {} persons from snapshot", store.count());
        Ok(store)
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn find_all(&self) -> Vec<Person> {
        let mut entries: Vec<(u64, Person)> = self
            .records
            .iter()
            .map(|entry| (entry.value().seq, entry.value().person.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, person)| person).collect()
    }

    pub fn find_by_id(&self, id: &PersonId) -> Option<Person> {
        self.records.get(id).map(|entry| entry.person.clone())
    }

    pub fn find_by_name(&self, name: &str) -> Option<Person> {
        self.records
            .iter()
            .find(|entry| entry.value().person.name == name)
            .map(|entry| entry.value().person.clone())
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub async fn insert(&self, new: NewPerson) -> Result<Person, StoreError> {
        validate(&new)?;
        let _guard = self.lock_snapshot().await;

        let person = Person {
            name: new.name,
            number: new.number,
            id: PersonId::new(),
        };
        let seq = self.next_seq();
        self.records.insert(
            person.id,
            StoredPerson {
                seq,
                person: person.clone(),
            },
        );

        if let Err(e) = self.persist().await {
            self.records.remove(&person.id);
            return Err(e);
        }

        tracing::debug!("Inserted person {}", person.id);
        Ok(person)
    }

    pub async fn update(&self, id: &PersonId, new: NewPerson) -> Result<Person, StoreError> {
        validate(&new)?;
        let _guard = self.lock_snapshot().await;

        let (previous, updated) = {
            let mut entry = self
                .records
                .get_mut(id)
                .ok_or(StoreError::NotFound(*id))?;
            let previous = entry.person.clone();
            entry.person.name = new.name;
            entry.person.number = new.number;
            (previous, entry.person.clone())
        };

        if let Err(e) = self.persist().await {
            if let Some(mut entry) = self.records.get_mut(id) {
                entry.person = previous;
            }
            return Err(e);
        }

        tracing::debug!("Updated person {}", id);
        Ok(updated)
    }

    /// Removes the person if present. Removing an unknown id is not an error.
    pub async fn remove(&self, id: &PersonId) -> Result<Option<Person>, StoreError> {
        let _guard = self.lock_snapshot().await;
        let Some((_, removed)) = self.records.remove(id) else {
            return Ok(None);
        };

        if let Err(e) = self.persist().await {
            let person = removed.person.clone();
            self.records.insert(*id, removed);
            tracing::warn!("Restored person {} after failed snapshot", person.id);
            return Err(e);
        }

        tracing::debug!("Removed person {}", id);
        Ok(Some(removed.person))
    }

    async fn lock_snapshot(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.snapshot {
            Some(snapshot) => Some(snapshot.write_lock.lock().await),
            None => None,
        }
    }

    /// Writes the current records to disk. Callers hold the snapshot lock.
    async fn persist(&self) -> Result<(), StoreError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(&self.find_all())?;

        let tmp_path = snapshot.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &snapshot.path).await?;
        Ok(())
    }
}

impl Default for PersonStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn validate(new: &NewPerson) -> Result<(), StoreError> {
    if new.name.trim().is_empty() {
        return Err(StoreError::Validation("name must not be blank".to_string()));
    }
    if new.number.trim().is_empty() {
        return Err(StoreError::Validation(
            "number must not be blank".to_string(),
        ));
    }
    Ok(())
}
