//! Client side of the todo RPC surface.
//!
//! `TodoView` holds what the user sees. It talks to a [`TodoSource`], which is
//! either a [`RemoteSource`] calling the server or a [`MemorySource`] seeded
//! with demo entries when the server cannot be used.

mod memory;
mod remote;
mod source;
mod view;

pub use memory::MemorySource;
pub use remote::RemoteSource;
pub use source::TodoSource;
pub use view::{Filter, Source, Stats, TodoView, DEMO_MODE_BANNER};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The server could not be reached at all.
    Connectivity(String),
    NotFound,
    Validation(String),
    Server { status: u16, message: String },
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Connectivity(msg) => write!(f, "backend unreachable: {msg}"),
            ClientError::NotFound => write!(f, "todo not found"),
            ClientError::Validation(msg) => write!(f, "invalid input: {msg}"),
            ClientError::Server { status, message } => write!(f, "HTTP {status}: {message}"),
            ClientError::Decode(msg) => write!(f, "could not decode response: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}
