use std::future::Future;

use reqwest::Response;
use thiserror::Error;

use crate::persons::protocol::{ENDPOINT_PERSONS, person_path};
use crate::persons::types::{ErrorBody, Person, PersonId, PersonPayload};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected {
                status,
                message: None,
            } => format!("request failed with status {status}"),
            ApiError::Transport(e) if e.is_decode() => {
                "unexpected response from the phonebook server".to_string()
            }
            ApiError::Transport(_) => "could not reach the phonebook server".to_string(),
        }
    }
}

/// Remote operations the client state controller depends on.
pub trait PersonsApi {
    fn list(&self) -> impl Future<Output = Result<Vec<Person>, ApiError>> + Send;

    fn create(
        &self,
        payload: &PersonPayload,
    ) -> impl Future<Output = Result<Person, ApiError>> + Send;

    fn update(
        &self,
        id: &PersonId,
        payload: &PersonPayload,
    ) -> impl Future<Output = Result<Person, ApiError>> + Send;

    fn delete(&self, id: &PersonId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// `PersonsApi` over HTTP against a running phonebook server.
#[derive(Clone)]
pub struct HttpPersonsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPersonsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.json::<ErrorBody>().await.ok().map(|b| b.error);
    tracing::debug!("Request failed with {}: {:?}", status, message);
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl PersonsApi for HttpPersonsApi {
    async fn list(&self) -> Result<Vec<Person>, ApiError> {
        let response = self.client.get(self.url(ENDPOINT_PERSONS)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create(&self, payload: &PersonPayload) -> Result<Person, ApiError> {
        let response = self
            .client
            .post(self.url(ENDPOINT_PERSONS))
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update(&self, id: &PersonId, payload: &PersonPayload) -> Result<Person, ApiError> {
        let response = self
            .client
            .put(self.url(&person_path(&id.to_string())))
            .json(payload)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, id: &PersonId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&person_path(&id.to_string())))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
