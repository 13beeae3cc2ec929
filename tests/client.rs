use std::sync::Arc;

use tokio::net::TcpListener;

use tasklist::client::{
    ClientError, Filter, RemoteSource, Stats, TodoSource, TodoView, DEMO_MODE_BANNER,
};
use tasklist::models::{
    CreateTodo, DeleteResult, DeleteTodo, Todo, ToggleTodo, UpdateTodo,
};
use tasklist::{create_app, db, AppState};

async fn spawn_server() -> String {
    let db = db::open_in_memory().expect("Failed to create in-memory database");
    let app = create_app(AppState {
        db,
        base_path: Arc::new(String::new()),
    });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// An address nothing listens on.
async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    addr
}

fn create(title: &str) -> CreateTodo {
    CreateTodo {
        title: title.to_string(),
        description: None,
    }
}

/// Serves a fixed list and rejects every mutation with a server error.
struct BrokenBackend {
    todos: Vec<Todo>,
}

impl BrokenBackend {
    fn failure() -> ClientError {
        ClientError::Server {
            status: 500,
            message: "database error: disk I/O error".to_string(),
        }
    }
}

impl TodoSource for BrokenBackend {
    async fn list(&mut self) -> Result<Vec<Todo>, ClientError> {
        Ok(self.todos.clone())
    }

    async fn create(&mut self, _input: &CreateTodo) -> Result<Todo, ClientError> {
        Err(Self::failure())
    }

    async fn update(&mut self, _input: &UpdateTodo) -> Result<Todo, ClientError> {
        Err(Self::failure())
    }

    async fn toggle(&mut self, _input: ToggleTodo) -> Result<Todo, ClientError> {
        Err(Self::failure())
    }

    async fn delete(&mut self, _input: DeleteTodo) -> Result<DeleteResult, ClientError> {
        Err(Self::failure())
    }
}

/// Answers every call, including `list`, with the same error.
struct FailingBackend {
    error: ClientError,
}

impl TodoSource for FailingBackend {
    async fn list(&mut self) -> Result<Vec<Todo>, ClientError> {
        Err(self.error.clone())
    }

    async fn create(&mut self, _input: &CreateTodo) -> Result<Todo, ClientError> {
        Err(self.error.clone())
    }

    async fn update(&mut self, _input: &UpdateTodo) -> Result<Todo, ClientError> {
        Err(self.error.clone())
    }

    async fn toggle(&mut self, _input: ToggleTodo) -> Result<Todo, ClientError> {
        Err(self.error.clone())
    }

    async fn delete(&mut self, _input: DeleteTodo) -> Result<DeleteResult, ClientError> {
        Err(self.error.clone())
    }
}

#[tokio::test]
async fn remote_source_round_trips_operations() {
    let addr = spawn_server().await;
    let mut remote = RemoteSource::new(&addr);

    let health = remote.healthcheck().await.unwrap();
    assert_eq!(health.status, "ok");

    let created = remote
        .create(&CreateTodo {
            title: "Buy milk".to_string(),
            description: Some("oat".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(remote.get(created.id).await.unwrap(), created);

    let cleared = remote
        .update(&UpdateTodo {
            id: created.id,
            description: Some(None),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.title, "Buy milk");

    let err = remote
        .toggle(ToggleTodo {
            id: 9999,
            completed: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::NotFound);

    let err = remote.create(&create(" ")).await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Validation("Title cannot be empty".to_string())
    );

    let result = remote.delete(DeleteTodo { id: created.id }).await.unwrap();
    assert!(result.success);
    let result = remote.delete(DeleteTodo { id: created.id }).await.unwrap();
    assert!(!result.success);
}

#[tokio::test]
async fn unreachable_backend_switches_to_demo_mode() {
    let mut view = TodoView::new(RemoteSource::new(&dead_address().await));
    view.load().await;

    assert!(view.is_offline());
    assert_eq!(view.error(), Some(DEMO_MODE_BANNER));
    assert_eq!(view.todos().len(), 3);
    assert_eq!(
        view.stats(),
        Stats {
            total: 3,
            active: 2,
            completed: 1
        }
    );

    view.create(create("Offline task")).await;
    assert_eq!(view.error(), None);
    assert_eq!(view.todos()[0].id, 4);
    assert_eq!(view.todos()[0].title, "Offline task");

    view.toggle(4, true).await;
    assert!(view.todos()[0].completed);

    view.delete(1).await;
    assert!(view.todos().iter().all(|t| t.id != 1));
    assert_eq!(view.todos().len(), 3);
}

#[tokio::test]
async fn empty_backend_switches_to_demo_mode_without_banner() {
    let addr = spawn_server().await;
    let mut view = TodoView::new(RemoteSource::new(&addr));
    view.load().await;

    assert!(view.is_offline());
    assert_eq!(view.error(), None);
    assert_eq!(view.todos().len(), 3);

    // Demo edits never reach the server
    view.create(create("Local only")).await;
    let remote_todos = RemoteSource::new(&addr).list().await.unwrap();
    assert!(remote_todos.is_empty());
}

#[tokio::test]
async fn connected_view_applies_server_results() {
    let addr = spawn_server().await;
    let mut seed = RemoteSource::new(&addr);
    seed.create(&create("Existing")).await.unwrap();

    let mut view = TodoView::new(RemoteSource::new(&addr));
    view.load().await;
    assert!(!view.is_offline());
    assert_eq!(view.todos().len(), 1);

    view.create(create("Fix bike")).await;
    assert_eq!(view.todos()[0].title, "Fix bike");
    let id = view.todos()[0].id;

    view.toggle(id, true).await;
    assert_eq!(view.completed().map(|t| t.id).collect::<Vec<_>>(), vec![id]);
    assert_eq!(view.active().count(), 1);

    view.update(UpdateTodo {
        id,
        title: Some("Fix bike tyre".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(view.todos()[0].title, "Fix bike tyre");
    assert!(view.todos()[0].completed);

    let fresh = seed.list().await.unwrap();
    assert_eq!(fresh, view.todos());

    view.delete(id).await;
    assert_eq!(view.todos().len(), 1);
    assert_eq!(view.visible(Filter::Completed).count(), 0);
}

#[tokio::test]
async fn not_found_surfaces_message_and_keeps_state() {
    let addr = spawn_server().await;
    RemoteSource::new(&addr)
        .create(&create("Only one"))
        .await
        .unwrap();

    let mut view = TodoView::new(RemoteSource::new(&addr));
    view.load().await;
    let before = view.todos().to_vec();

    view.toggle(9999, true).await;
    assert_eq!(view.error(), Some("Failed to update todo. Please try again."));
    assert_eq!(view.todos(), before.as_slice());

    // The next action clears the message
    view.toggle(before[0].id, true).await;
    assert_eq!(view.error(), None);
}

#[tokio::test]
async fn failed_mutations_keep_view_state() {
    let todo = Todo {
        id: 1,
        title: "Pay rent".to_string(),
        description: None,
        completed: false,
        created_at: 1_000,
        updated_at: 1_000,
    };
    let mut view = TodoView::new(BrokenBackend {
        todos: vec![todo.clone()],
    });
    view.load().await;
    assert!(!view.is_offline());

    view.create(create("Never stored")).await;
    assert_eq!(view.error(), Some("Failed to create todo. Please try again."));

    view.delete(1).await;
    assert_eq!(view.error(), Some("Failed to delete todo. Please try again."));

    view.update(UpdateTodo {
        id: 1,
        completed: Some(true),
        ..Default::default()
    })
    .await;
    assert_eq!(view.error(), Some("Failed to update todo. Please try again."));

    assert_eq!(view.todos(), &[todo]);
}

#[tokio::test]
async fn blank_titles_are_ignored_without_a_call() {
    let mut view = TodoView::new(BrokenBackend {
        todos: vec![Todo {
            id: 1,
            title: "Pay rent".to_string(),
            description: None,
            completed: false,
            created_at: 1_000,
            updated_at: 1_000,
        }],
    });
    view.load().await;

    view.create(create("   ")).await;
    view.update(UpdateTodo {
        id: 1,
        title: Some(String::new()),
        ..Default::default()
    })
    .await;

    // BrokenBackend would have produced an error message had it been called
    assert_eq!(view.error(), None);
    assert_eq!(view.todos().len(), 1);
}

#[tokio::test]
async fn server_error_on_load_stays_connected() {
    let mut view = TodoView::new(FailingBackend {
        error: BrokenBackend::failure(),
    });
    view.load().await;

    assert!(!view.is_offline());
    assert_eq!(view.error(), Some("Failed to load todos. Please try again."));
    assert!(view.todos().is_empty());
}

#[tokio::test]
async fn undecodable_list_on_load_stays_connected() {
    let mut view = TodoView::new(FailingBackend {
        error: ClientError::Decode("expected value at line 1 column 1".to_string()),
    });
    view.load().await;

    assert!(!view.is_offline());
    assert_eq!(view.error(), Some("Failed to load todos. Please try again."));
    assert!(view.todos().is_empty());
}
