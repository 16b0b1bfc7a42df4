use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::{NewUser, User, UserId};

/// Failures surfaced by a persistence gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A staged row broke a unique index; nothing from the commit was applied.
    #[error("unique constraint violated: {detail}")]
    UniqueViolation { detail: String },

    /// A staged update or delete targeted a row that is gone; nothing from the
    /// commit was applied.
    #[error("user {id} no longer exists")]
    RowMissing { id: UserId },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// A change recorded by `add`/`update`/`remove`, applied on `commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    Insert(NewUser),
    Update(User),
    Delete(User),
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Rows inserted, updated or deleted by the commit.
    pub rows_affected: u64,
    /// Inserted rows carrying their store-assigned ids, in staging order.
    pub inserted: Vec<User>,
}

/// Shared entry point to the user store.
///
/// Each call to `open` hands out an independent unit of work, so one store can
/// back any number of concurrent requests.
pub trait UsersStore: Send + Sync {
    fn open(&self) -> Box<dyn UsersGateway>;
}

/// Port for the domain layer: a unit of work over the `users` table.
/// Object-safe and async-friendly via `async_trait`.
///
/// Reads go straight to the committed state and are never staged. Writes are
/// staged locally and only become durable through `commit`.
#[async_trait]
pub trait UsersGateway: Send + Sync {
    /// Every committed row, in store order.
    async fn list_all(&self) -> Result<Vec<User>, GatewayError>;
    /// Point lookup by primary key.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, GatewayError>;
    /// Stage a new row. Its id is known only after `commit`.
    fn add(&mut self, user: NewUser);
    /// Stage a full overwrite of the row identified by `user.id`.
    fn update(&mut self, user: User);
    /// Stage deletion of the row identified by `user.id`.
    fn remove(&mut self, user: User);
    /// Number of staged, uncommitted changes.
    fn pending(&self) -> usize;
    /// Apply all staged changes atomically. Staging is cleared either way.
    /// An update or delete whose row is already gone fails with `RowMissing`.
    async fn commit(&mut self) -> Result<CommitReport, GatewayError>;
}
