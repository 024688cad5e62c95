use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::adapters::ErrorBody;
use crate::client::{ClientError, TodoApi};
use crate::config::ClientConfig;
use crate::core::{Todo, TodoId, TodoPatch};

/// HTTP client for the `/api/todos` endpoints.
#[derive(Clone)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
}

impl TodoClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn todos_url(&self) -> String {
        format!("{}/api/todos", self.base_url)
    }

    fn todo_url(&self, id: &TodoId) -> String {
        format!("{}/api/todos/{}", self.base_url, id)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Turns a non-success response into `ClientError::Status`, preferring the
/// server's own error message when the body carries one.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

async fn expect_no_content(response: Response) -> Result<(), ClientError> {
    let response = check(response).await?;
    if response.status() != StatusCode::NO_CONTENT {
        return Err(ClientError::Decode(format!(
            "expected 204, got {}",
            response.status()
        )));
    }
    Ok(())
}

#[async_trait]
impl TodoApi for TodoClient {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.http.get(self.todos_url()).send().await?;
        decode(response).await
    }

    async fn create(&self, text: &str) -> Result<Todo, ClientError> {
        let response = self
            .http
            .post(self.todos_url())
            .json(&json!({ "text": text }))
            .send()
            .await?;
        decode(response).await
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError> {
        let response = self.http.patch(self.todo_url(id)).json(patch).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ClientError> {
        let response = self.http.delete(self.todo_url(id)).send().await?;
        expect_no_content(response).await
    }

    async fn delete_all(&self) -> Result<(), ClientError> {
        let response = self.http.delete(self.todos_url()).send().await?;
        expect_no_content(response).await
    }
}
