use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;

use super::store::PersonStore;
use super::types::{Person, PersonId, PersonPayload};
use crate::error::AppError;

type Payload = Result<Json<PersonPayload>, JsonRejection>;

fn parse_id(raw: &str) -> Result<PersonId, AppError> {
    raw.parse().map_err(|e| {
        tracing::debug!("Rejecting id {:?}: {}", raw, e);
        AppError::MalformattedId
    })
}

fn read_payload(payload: Payload) -> Result<PersonPayload, AppError> {
    payload.map(|Json(body)| body).map_err(|e| {
        tracing::debug!("Failed to parse person payload: {}", e);
        AppError::MalformedPayload
    })
}

pub async fn handle_list(Extension(store): Extension<Arc<PersonStore>>) -> Json<Vec<Person>> {
    Json(store.find_all())
}

pub async fn handle_get(
    Extension(store): Extension<Arc<PersonStore>>,
    Path(id): Path<String>,
) -> Result<Json<Person>, AppError> {
    let id = parse_id(&id)?;
    store.find_by_id(&id).map(Json).ok_or(AppError::NotFound)
}

pub async fn handle_create(
    Extension(store): Extension<Arc<PersonStore>>,
    payload: Payload,
) -> Result<Json<Person>, AppError> {
    let new = read_payload(payload)?.validate()?;

    if store.find_by_name(&new.name).is_some() {
        return Err(AppError::DuplicateName(new.name));
    }

    let person = store.insert(new).await?;
    tracing::info!("Created person {} ({})", person.id, person.name);
    Ok(Json(person))
}

pub async fn handle_update(
    Extension(store): Extension<Arc<PersonStore>>,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<Person>, AppError> {
    let new = read_payload(payload)?.validate()?;
    let id = parse_id(&id)?;

    let person = store.update(&id, new).await?;
    tracing::info!("Updated person {} ({})", person.id, person.name);
    Ok(Json(person))
}

pub async fn handle_delete(
    Extension(store): Extension<Arc<PersonStore>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;

    match store.remove(&id).await? {
        Some(person) => tracing::info!("Deleted person {} ({})", person.id, person.name),
        None => tracing::debug!("Delete of unknown person {}", id),
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_info(Extension(store): Extension<Arc<PersonStore>>) -> Html<String> {
    let now = chrono::Local::now().format("%a %b %d %Y %H:%M:%S GMT%z");
    Html(format!(
        "<p>Phonebook has info for {} people</br></br>{}</p>",
        store.count(),
        now
    ))
}

pub async fn handle_unknown_endpoint() -> AppError {
    AppError::UnknownEndpoint
}
