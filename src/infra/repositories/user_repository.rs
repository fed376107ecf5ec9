//! User repository: the five data-access operations.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tokio::sync::RwLock;

use super::entities::user::{ActiveModel, Column, Entity as UserEntity};
use crate::domain::{User, UserPayload};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
///
/// Each operation maps a (store handle, input) pair to a typed result.
/// No operation retries, batches, or paginates, and none is transactional
/// with any other.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; the store assigns the id.
    async fn create(&self, payload: UserPayload) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Overwrite every field of the record at `id` with `payload`.
    ///
    /// Zero rows affected is not an error: updating an absent id succeeds
    /// silently, matching the delete semantics below.
    async fn update(&self, id: i64, payload: UserPayload) -> AppResult<()>;

    /// Delete the record at `id`. Idempotent: absent ids succeed.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Return every record. An empty store yields an empty vec.
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Classify store errors: unique violations become conflicts, everything
/// else stays a backend error.
fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Email"),
        _ => AppError::Database(err),
    }
}

/// Concrete implementation of `UserRepository` backed by SeaORM.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, payload: UserPayload) -> AppResult<User> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(payload.name),
            email: Set(payload.email),
            age: Set(payload.age),
        };

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn update(&self, id: i64, payload: UserPayload) -> AppResult<()> {
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(payload.name),
            email: Set(payload.email),
            age: Set(payload.age),
        };

        // update_many with an id filter keeps "zero rows affected" a success
        UserEntity::update_many()
            .set(active_model)
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::info!(user_id = id, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}

/// In-memory implementation of `UserRepository` (for development/testing).
///
/// Enforces the same constraints the database does: assigned ids and a
/// unique email across all records.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(0)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, payload: UserPayload) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == payload.email) {
            return Err(AppError::conflict("Email"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id,
            name: payload.name,
            email: payload.email,
            age: payload.age,
        };
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn update(&self, id: i64, payload: UserPayload) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.id != id && u.email == payload.email)
        {
            return Err(AppError::conflict("Email"));
        }

        // Absent ids are a silent no-op, like "zero rows affected"
        if let Some(user) = users.get_mut(&id) {
            user.name = payload.name;
            user.email = payload.email;
            user.age = payload.age;
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut users = self.users.write().await;
        users.remove(&id);
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.id);
        Ok(result)
    }
}
