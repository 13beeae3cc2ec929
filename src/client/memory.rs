use crate::client::{ClientError, TodoSource};
use crate::models::{
    now_millis, CreateTodo, DeleteResult, DeleteTodo, Todo, ToggleTodo, UpdateTodo,
};

const DAY_MS: i64 = 86_400_000;

/// Todos kept only in process memory. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct MemorySource {
    todos: Vec<Todo>,
    next_id: i64,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self {
            todos: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three illustrative entries; the next created todo gets id 4.
    pub fn demo() -> Self {
        let now = now_millis();
        let todos = vec![
            Todo {
                id: 1,
                title: "Welcome to your Todo App!".to_string(),
                description: Some(
                    "This is a sample todo to get you started. You can edit or delete it."
                        .to_string(),
                ),
                completed: false,
                created_at: now,
                updated_at: now,
            },
            Todo {
                id: 2,
                title: "Try creating a new todo".to_string(),
                description: Some("Use the form above to add your own tasks".to_string()),
                completed: false,
                created_at: now - DAY_MS,
                updated_at: now - DAY_MS,
            },
            Todo {
                id: 3,
                title: "Mark todos as complete".to_string(),
                description: Some("Click the checkbox to mark tasks as done".to_string()),
                completed: true,
                created_at: now - 2 * DAY_MS,
                updated_at: now,
            },
        ];

        Self { todos, next_id: 4 }
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Todo, ClientError> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ClientError::NotFound)
    }
}

fn require_title(title: &str) -> Result<(), ClientError> {
    if title.trim().is_empty() {
        return Err(ClientError::Validation("Title cannot be empty".to_string()));
    }
    Ok(())
}

impl TodoSource for MemorySource {
    async fn list(&mut self) -> Result<Vec<Todo>, ClientError> {
        let mut todos = self.todos.clone();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn create(&mut self, input: &CreateTodo) -> Result<Todo, ClientError> {
        require_title(&input.title)?;

        let now = now_millis();
        let todo = Todo {
            id: self.next_id,
            title: input.title.clone(),
            description: input.description.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.next_id += 1;
        self.todos.insert(0, todo.clone());
        Ok(todo)
    }

    async fn update(&mut self, input: &UpdateTodo) -> Result<Todo, ClientError> {
        if let Some(title) = &input.title {
            require_title(title)?;
        }

        let todo = self.find_mut(input.id)?;
        input.apply(todo, now_millis());
        Ok(todo.clone())
    }

    async fn toggle(&mut self, input: ToggleTodo) -> Result<Todo, ClientError> {
        self.update(&UpdateTodo {
            id: input.id,
            completed: Some(input.completed),
            ..Default::default()
        })
        .await
    }

    async fn delete(&mut self, input: DeleteTodo) -> Result<DeleteResult, ClientError> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != input.id);
        Ok(DeleteResult {
            success: self.todos.len() < before,
        })
    }
}
