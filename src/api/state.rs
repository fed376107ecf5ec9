//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{Database, UserRepository};

/// Application state shared across handlers.
///
/// The repository is held behind a trait object so tests can swap in
/// the in-memory implementation.
#[derive(Clone)]
pub struct AppState {
    /// User repository
    pub users: Arc<dyn UserRepository>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
}

impl AppState {
    /// Create new application state with an injected repository.
    pub fn new(users: Arc<dyn UserRepository>, database: Arc<Database>) -> Self {
        Self { users, database }
    }
}
