//! Persons Module Tests
//!
//! Validates the record store and the request handlers without a network.
//!
//! ## Test Scopes
//! - **Payloads**: required-field checks run before any store access.
//! - **PersonStore**: insertion order, updates, idempotent removal, snapshots.
//! - **Handlers**: status codes and bodies for each endpoint, called directly.
//!
//! *Note: routing, the fallback and the full HTTP round trip are covered in `tests/api.rs`.*

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::persons::handlers::*;
    use crate::persons::store::{PersonStore, StoreError};
    use crate::persons::types::{MissingField, NewPerson, PersonId, PersonPayload};
    use axum::extract::Path;
    use axum::extract::rejection::JsonRejection;
    use axum::http::StatusCode;
    use axum::{Extension, Json};
    use std::sync::Arc;

    fn new_person(name: &str, number: &str) -> NewPerson {
        NewPerson {
            name: name.to_string(),
            number: number.to_string(),
        }
    }

    fn payload(name: &str, number: &str) -> Result<Json<PersonPayload>, JsonRejection> {
        Ok(Json(PersonPayload::new(name, number)))
    }

    // ============================================================
    // PAYLOAD TESTS
    // ============================================================

    #[test]
    fn test_payload_requires_name_first() {
        let result = PersonPayload::default().validate();
        assert_eq!(result, Err(MissingField::Name));
    }

    #[test]
    fn test_payload_empty_number_is_missing() {
        let result = PersonPayload::new("Ada", "").validate();
        assert_eq!(result, Err(MissingField::Number));
    }

    #[test]
    fn test_payload_accepts_null_fields_as_missing() {
        let payload: PersonPayload =
            serde_json::from_str(r#"{"name": null, "number": "123"}"#).unwrap();
        assert_eq!(payload.validate(), Err(MissingField::Name));
    }

    #[test]
    fn test_person_json_shape() {
        let id = PersonId::new();
        let person = crate::persons::types::Person {
            name: "Ada".to_string(),
            number: "123".to_string(),
            id,
        };

        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["number"], "123");
        assert_eq!(json["id"], id.to_string());
    }

    #[test]
    fn test_person_id_rejects_garbage() {
        assert!("not-an-id".parse::<PersonId>().is_err());
        assert!("".parse::<PersonId>().is_err());
    }

    // ============================================================
    // STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_store_insert_assigns_distinct_id() {
        let store = PersonStore::in_memory();

        let person = store.insert(new_person("Ada", "123")).await.unwrap();

        let id = person.id.to_string();
        assert!(!id.is_empty());
        assert_ne!(id, person.name);
        assert_ne!(id, person.number);
        assert_eq!(store.find_by_id(&person.id), Some(person));
    }

    #[tokio::test]
    async fn test_store_keeps_insertion_order() {
        let store = PersonStore::in_memory();
        for name in ["Arto Hellas", "Ada Lovelace", "Dan Abramov", "Mary Poppendieck"] {
            store.insert(new_person(name, "040-123456")).await.unwrap();
        }

        let names: Vec<String> = store.find_all().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["Arto Hellas", "Ada Lovelace", "Dan Abramov", "Mary Poppendieck"]
        );
    }

    #[tokio::test]
    async fn test_store_update_keeps_id_and_position() {
        let store = PersonStore::in_memory();
        let first = store.insert(new_person("Arto", "1")).await.unwrap();
        store.insert(new_person("Mary", "2")).await.unwrap();

        let updated = store
            .update(&first.id, new_person("Arto", "999"))
            .await
            .unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.number, "999");
        assert_eq!(store.find_all()[0], updated);
    }

    #[tokio::test]
    async fn test_store_update_unknown_id() {
        let store = PersonStore::in_memory();
        let id = PersonId::new();

        let result = store.update(&id, new_person("Ghost", "0")).await;
        assert!(matches!(result, Err(StoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_store_rejects_blank_fields() {
        let store = PersonStore::in_memory();

        let result = store.insert(new_person("   ", "123")).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_store_remove_is_idempotent() {
        let store = PersonStore::in_memory();
        let person = store.insert(new_person("Dan", "3")).await.unwrap();

        assert_eq!(store.remove(&person.id).await.unwrap(), Some(person.clone()));
        assert_eq!(store.remove(&person.id).await.unwrap(), None);
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_store_find_by_name_is_exact() {
        let store = PersonStore::in_memory();
        store.insert(new_person("Ada", "1")).await.unwrap();

        assert!(store.find_by_name("Ada").is_some());
        assert!(store.find_by_name("ada").is_none());
        assert!(store.find_by_name("Ad").is_none());
    }

    #[tokio::test]
    async fn test_store_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persons.json");

        let ada_id = {
            let store = PersonStore::open(&path).await.unwrap();
            let ada = store.insert(new_person("Ada", "123")).await.unwrap();
            let dan = store.insert(new_person("Dan", "456")).await.unwrap();
            store.update(&ada.id, new_person("Ada", "789")).await.unwrap();
            store.remove(&dan.id).await.unwrap();
            ada.id
        };

        let reopened = PersonStore::open(&path).await.unwrap();
        assert_eq!(reopened.count(), 1);

        let ada = reopened.find_by_id(&ada_id).unwrap();
        assert_eq!(ada.number, "789");
    }

    #[tokio::test]
    async fn test_store_open_rejects_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persons.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = PersonStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Snapshot(_))));
    }

    #[tokio::test]
    async fn test_store_failed_snapshot_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();

        let store = PersonStore::open(sub.join("persons.json")).await.unwrap();
        let ada = store.insert(new_person("Ada", "1")).await.unwrap();
        std::fs::remove_dir_all(&sub).unwrap();

        let err = store.insert(new_person("Dan", "2")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.count(), 1);
        assert!(store.find_by_name("Dan").is_none());

        let err = store.update(&ada.id, new_person("Ada", "999")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert_eq!(store.find_by_id(&ada.id).unwrap().number, "1");

        let err = store.remove(&ada.id).await.unwrap_err();
        assert_eq!(store.count(), 1);
        let names: Vec<String> = store.find_all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Ada"]);

        assert_eq!(AppError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_store_concurrent_writes_all_reach_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persons.json");
        let store = Arc::new(PersonStore::open(&path).await.unwrap());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(new_person(&format!("Person {i}"), "1"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let reopened = PersonStore::open(&path).await.unwrap();
        assert_eq!(reopened.count(), 16);
        assert_eq!(reopened.find_all(), store.find_all());
    }

    // ============================================================
    // HANDLER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let store = Arc::new(PersonStore::in_memory());

        let Json(created) = handle_create(Extension(store.clone()), payload("Ada", "123"))
            .await
            .unwrap();
        let Json(fetched) = handle_get(Extension(store), Path(created.id.to_string()))
            .await
            .unwrap();

        assert_eq!(fetched.name, "Ada");
        assert_eq!(fetched.number, "123");
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_create_missing_field_leaves_store_untouched() {
        let store = Arc::new(PersonStore::in_memory());

        let result = handle_create(Extension(store.clone()), payload("", "123")).await;
        assert!(matches!(result, Err(AppError::MissingField(MissingField::Name))));

        let result = handle_create(Extension(store.clone()), payload("Ada", "")).await;
        let err = result.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "number missing");

        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_rejected() {
        let store = Arc::new(PersonStore::in_memory());
        let Json(mary) = handle_create(Extension(store.clone()), payload("Mary", "555"))
            .await
            .unwrap();
        assert_eq!(mary.number, "555");

        let err = handle_create(Extension(store.clone()), payload("Mary", "777"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Person 'Mary' already exists");
        assert_eq!(store.count(), 1);
        assert_eq!(store.find_by_name("Mary").unwrap().number, "555");
    }

    #[tokio::test]
    async fn test_create_blank_name_surfaces_validator_message() {
        let store = Arc::new(PersonStore::in_memory());

        let err = handle_create(Extension(store.clone()), payload("  ", "123"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "validation failed: name must not be blank");
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_get_malformed_and_unknown_ids() {
        let store = Arc::new(PersonStore::in_memory());

        let err = handle_get(Extension(store.clone()), Path("123abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformattedId));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = handle_get(Extension(store), Path(PersonId::new().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = Arc::new(PersonStore::in_memory());
        let id = PersonId::new();

        let err = handle_update(
            Extension(store.clone()),
            Path(id.to_string()),
            payload("Ghost", "0"),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), format!("person '{}' not found", id));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_update_checks_fields_before_id() {
        let store = Arc::new(PersonStore::in_memory());

        let err = handle_update(
            Extension(store),
            Path("bogus".to_string()),
            payload("Ada", ""),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::MissingField(MissingField::Number)));
    }

    #[tokio::test]
    async fn test_update_malformed_id_with_valid_body() {
        let store = Arc::new(PersonStore::in_memory());
        store.insert(new_person("Ada", "1")).await.unwrap();

        let err = handle_update(
            Extension(store.clone()),
            Path("123abc".to_string()),
            payload("Ada", "1"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::MalformattedId));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "malformatted id");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_no_content() {
        let store = Arc::new(PersonStore::in_memory());
        store.insert(new_person("Ada", "1")).await.unwrap();

        let status = handle_delete(Extension(store.clone()), Path(PersonId::new().to_string()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = Arc::new(PersonStore::in_memory());
        let person = store.insert(new_person("Dan", "3")).await.unwrap();

        let status = handle_delete(Extension(store.clone()), Path(person.id.to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = handle_get(Extension(store), Path(person.id.to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_list_returns_everything() {
        let store = Arc::new(PersonStore::in_memory());
        store.insert(new_person("Arto", "1")).await.unwrap();
        store.insert(new_person("Mary", "2")).await.unwrap();

        let Json(persons) = handle_list(Extension(store)).await;
        assert_eq!(persons.len(), 2);
    }

    #[tokio::test]
    async fn test_info_reports_count() {
        let store = Arc::new(PersonStore::in_memory());
        store.insert(new_person("Arto", "1")).await.unwrap();
        store.insert(new_person("Mary", "2")).await.unwrap();

        let html = handle_info(Extension(store)).await.0;
        assert!(html.starts_with("<p>Phonebook has info for 2 people</br></br>"));
        assert!(html.ends_with("</p>"));
    }
}
