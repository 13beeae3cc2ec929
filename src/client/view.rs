use tracing::{debug, info, warn};

use crate::client::{ClientError, MemorySource, RemoteSource, TodoSource};
use crate::models::{CreateTodo, DeleteResult, DeleteTodo, Todo, ToggleTodo, UpdateTodo};

pub const DEMO_MODE_BANNER: &str =
    "Backend not available - running in demo mode. Your changes will not be saved.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => todo.is_active(),
            Filter::Completed => !todo.is_active(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Where the view's calls go. Chosen by the first [`TodoView::load`].
#[derive(Debug)]
pub enum Source<R> {
    Remote(R),
    Demo(MemorySource),
}

impl<R: TodoSource> TodoSource for Source<R> {
    async fn list(&mut self) -> Result<Vec<Todo>, ClientError> {
        match self {
            Source::Remote(remote) => remote.list().await,
            Source::Demo(memory) => memory.list().await,
        }
    }

    async fn create(&mut self, input: &CreateTodo) -> Result<Todo, ClientError> {
        match self {
            Source::Remote(remote) => remote.create(input).await,
            Source::Demo(memory) => memory.create(input).await,
        }
    }

    async fn update(&mut self, input: &UpdateTodo) -> Result<Todo, ClientError> {
        match self {
            Source::Remote(remote) => remote.update(input).await,
            Source::Demo(memory) => memory.update(input).await,
        }
    }

    async fn toggle(&mut self, input: ToggleTodo) -> Result<Todo, ClientError> {
        match self {
            Source::Remote(remote) => remote.toggle(input).await,
            Source::Demo(memory) => memory.toggle(input).await,
        }
    }

    async fn delete(&mut self, input: DeleteTodo) -> Result<DeleteResult, ClientError> {
        match self {
            Source::Remote(remote) => remote.delete(input).await,
            Source::Demo(memory) => memory.delete(input).await,
        }
    }
}

/// The todos on screen plus the transient error message.
///
/// Results are applied only after a call returns; a failed call leaves the
/// held todos untouched and records a message instead.
#[derive(Debug)]
pub struct TodoView<R = RemoteSource> {
    source: Source<R>,
    todos: Vec<Todo>,
    error: Option<String>,
}

impl<R: TodoSource> TodoView<R> {
    pub fn new(remote: R) -> Self {
        Self {
            source: Source::Remote(remote),
            todos: Vec::new(),
            error: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.source, Source::Demo(_))
    }

    pub fn active(&self) -> impl Iterator<Item = &Todo> {
        self.visible(Filter::Active)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Todo> {
        self.visible(Filter::Completed)
    }

    pub fn visible(&self, filter: Filter) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(move |t| filter.matches(t))
    }

    pub fn stats(&self) -> Stats {
        let active = self.active().count();
        Stats {
            total: self.todos.len(),
            active,
            completed: self.todos.len() - active,
        }
    }

    /// Fetches the list. An unreachable or empty backend switches to demo data.
    pub async fn load(&mut self) {
        self.error = None;
        let remote = !self.is_offline();

        match self.source.list().await {
            Ok(todos) if todos.is_empty() && remote => {
                info!("backend returned no todos, switching to demo mode");
                self.enter_demo_mode().await;
            }
            Ok(todos) => self.todos = todos,
            Err(ClientError::Connectivity(reason)) if remote => {
                warn!(%reason, "backend not available, switching to demo mode");
                self.enter_demo_mode().await;
                self.error = Some(DEMO_MODE_BANNER.to_string());
            }
            Err(err) => self.fail("Failed to load todos. Please try again.", err),
        }
    }

    async fn enter_demo_mode(&mut self) {
        let mut memory = MemorySource::demo();
        self.todos = memory.list().await.unwrap_or_default();
        self.source = Source::Demo(memory);
    }

    fn fail(&mut self, message: &str, err: ClientError) {
        warn!(error = %err, "{message}");
        self.error = Some(message.to_string());
    }

    fn replace(&mut self, updated: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }

    pub async fn create(&mut self, input: CreateTodo) {
        if input.title.trim().is_empty() {
            debug!("ignoring create with blank title");
            return;
        }

        self.error = None;
        match self.source.create(&input).await {
            Ok(todo) => self.todos.insert(0, todo),
            Err(err) => self.fail("Failed to create todo. Please try again.", err),
        }
    }

    pub async fn toggle(&mut self, id: i64, completed: bool) {
        self.error = None;
        match self.source.toggle(ToggleTodo { id, completed }).await {
            Ok(todo) => self.replace(todo),
            Err(err) => self.fail("Failed to update todo. Please try again.", err),
        }
    }

    pub async fn update(&mut self, input: UpdateTodo) {
        if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            debug!(id = input.id, "ignoring update with blank title");
            return;
        }

        self.error = None;
        match self.source.update(&input).await {
            Ok(todo) => self.replace(todo),
            Err(err) => self.fail("Failed to update todo. Please try again.", err),
        }
    }

    /// The row is dropped from the view whether or not the source still had it.
    pub async fn delete(&mut self, id: i64) {
        self.error = None;
        match self.source.delete(DeleteTodo { id }).await {
            Ok(result) => {
                if !result.success {
                    debug!(id, "todo was already gone");
                }
                self.todos.retain(|t| t.id != id);
            }
            Err(err) => self.fail("Failed to delete todo. Please try again.", err),
        }
    }
}
