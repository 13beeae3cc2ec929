use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// A stored todo. Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Todo {
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update. `description` distinguishes "absent" (`None`) from
/// "explicitly null" (`Some(None)`); `title` and `completed` may be absent
/// but never null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub id: i64,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    /// Applies the present fields to `todo` and refreshes `updated_at`.
    pub fn apply(&self, todo: &mut Todo, now: i64) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = next_updated_at(todo.updated_at, now);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleTodo {
    pub id: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeleteTodo {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TodoId {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: i64,
}

/// A field that is present in the payload decodes to `Some`. Whether null is
/// accepted is up to `T`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// `updated_at` must move forward on every write, even within one millisecond.
pub fn next_updated_at(previous: i64, now: i64) -> i64 {
    now.max(previous + 1)
}
