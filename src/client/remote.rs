use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::client::{ClientError, TodoSource};
use crate::models::{CreateTodo, DeleteResult, DeleteTodo, Health, Todo, ToggleTodo, UpdateTodo};

/// Calls the server's `/rpc/{name}` endpoints.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}/rpc/{}", self.base_url, name)
    }

    async fn query<T: DeserializeOwned>(&self, name: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(self.url(name))
            .send()
            .await
            .map_err(|e| ClientError::Connectivity(e.to_string()))?;
        read_response(resp).await
    }

    async fn mutate<I, T>(&self, name: &str, input: &I) -> Result<T, ClientError>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(name))
            .json(input)
            .send()
            .await
            .map_err(|e| ClientError::Connectivity(e.to_string()))?;
        read_response(resp).await
    }

    pub async fn healthcheck(&self) -> Result<Health, ClientError> {
        self.query("healthcheck").await
    }

    pub async fn get(&self, id: i64) -> Result<Todo, ClientError> {
        self.query(&format!("getTodo?id={id}")).await
    }
}

impl TodoSource for RemoteSource {
    async fn list(&mut self) -> Result<Vec<Todo>, ClientError> {
        self.query("getTodos").await
    }

    async fn create(&mut self, input: &CreateTodo) -> Result<Todo, ClientError> {
        self.mutate("createTodo", input).await
    }

    async fn update(&mut self, input: &UpdateTodo) -> Result<Todo, ClientError> {
        self.mutate("updateTodo", input).await
    }

    async fn toggle(&mut self, input: ToggleTodo) -> Result<Todo, ClientError> {
        self.mutate("toggleTodo", &input).await
    }

    async fn delete(&mut self, input: DeleteTodo) -> Result<DeleteResult, ClientError> {
        self.mutate("deleteTodo", &input).await
    }
}

async fn read_response<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.to_string());

    Err(match status {
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}
