use crate::client::ClientError;
use crate::models::{CreateTodo, DeleteResult, DeleteTodo, Todo, ToggleTodo, UpdateTodo};

/// The five todo operations, wherever the data lives.
#[allow(async_fn_in_trait)]
pub trait TodoSource {
    async fn list(&mut self) -> Result<Vec<Todo>, ClientError>;

    async fn create(&mut self, input: &CreateTodo) -> Result<Todo, ClientError>;

    async fn update(&mut self, input: &UpdateTodo) -> Result<Todo, ClientError>;

    async fn toggle(&mut self, input: ToggleTodo) -> Result<Todo, ClientError>;

    async fn delete(&mut self, input: DeleteTodo) -> Result<DeleteResult, ClientError>;
}
