//! SeaORM-backed implementation of the users gateway port.
//!
//! `SeaOrmUsersStore` is generic over `C: ConnectionTrait + TransactionTrait`,
//! so it can be built from a `DatabaseConnection` (cheap cloneable pool
//! handle). Every `open()` yields a gateway with its own staging list; a
//! commit runs all staged statements inside one database transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use tracing::{debug, warn};

use crate::contract::model::{NewUser, User, UserId};
use crate::domain::repo::{CommitReport, GatewayError, StagedChange, UsersGateway, UsersStore};
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

/// Shared store handle; hands out one gateway per unit of work.
#[derive(Clone)]
pub struct SeaOrmUsersStore<C>
where
    C: ConnectionTrait + TransactionTrait + Clone + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersStore<C>
where
    C: ConnectionTrait + TransactionTrait + Clone + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

impl<C> UsersStore for SeaOrmUsersStore<C>
where
    C: ConnectionTrait + TransactionTrait + Clone + Send + Sync + 'static,
{
    fn open(&self) -> Box<dyn UsersGateway> {
        Box::new(SeaOrmUsersGateway::new(self.conn.clone()))
    }
}

/// SeaORM unit of work over the `users` table.
pub struct SeaOrmUsersGateway<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
    staged: Vec<StagedChange>,
}

impl<C> SeaOrmUsersGateway<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            staged: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl<C> UsersGateway for SeaOrmUsersGateway<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_all(&self) -> Result<Vec<User>, GatewayError> {
        let rows = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    fn add(&mut self, user: NewUser) {
        self.staged.push(StagedChange::Insert(user));
    }

    fn update(&mut self, user: User) {
        self.staged.push(StagedChange::Update(user));
    }

    fn remove(&mut self, user: User) {
        self.staged.push(StagedChange::Delete(user));
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }

    async fn commit(&mut self) -> Result<CommitReport, GatewayError> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(CommitReport::default());
        }
        debug!("Committing {} staged user changes", staged.len());

        // Dropping `txn` on any early return rolls the whole batch back.
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| classify(e, "begin transaction failed"))?;

        let mut report = CommitReport::default();
        for change in staged {
            match change {
                StagedChange::Insert(u) => {
                    let m = UserAM {
                        id: NotSet,
                        forename: Set(u.forename),
                        surname: Set(u.surname),
                        email: Set(u.email),
                        date_of_birth: Set(u.date_of_birth),
                        is_active: Set(u.is_active),
                    };
                    let inserted = m
                        .insert(&txn)
                        .await
                        .map_err(|e| classify(e, "insert failed"))?;
                    report.inserted.push(inserted.into());
                    report.rows_affected += 1;
                }
                StagedChange::Update(u) => {
                    let id = u.id;
                    // Full overwrite of every column except the key
                    let m = UserAM {
                        id: Set(u.id),
                        forename: Set(u.forename),
                        surname: Set(u.surname),
                        email: Set(u.email),
                        date_of_birth: Set(u.date_of_birth),
                        is_active: Set(u.is_active),
                    };
                    match m.update(&txn).await {
                        Ok(_) => report.rows_affected += 1,
                        Err(DbErr::RecordNotUpdated) => {
                            warn!(user_id = id, "update target vanished before commit");
                            return Err(GatewayError::RowMissing { id });
                        }
                        Err(e) => return Err(classify(e, "update failed")),
                    }
                }
                StagedChange::Delete(u) => {
                    let res = UserEntity::delete_by_id(u.id)
                        .exec(&txn)
                        .await
                        .map_err(|e| classify(e, "delete failed"))?;
                    if res.rows_affected == 0 {
                        warn!(user_id = u.id, "delete target vanished before commit");
                        return Err(GatewayError::RowMissing { id: u.id });
                    }
                    report.rows_affected += res.rows_affected;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| classify(e, "commit failed"))?;

        debug!("Commit applied, rows_affected={}", report.rows_affected);
        Ok(report)
    }
}

/// Turn a SeaORM error into a gateway error, singling out unique index hits.
fn classify(err: DbErr, what: &'static str) -> GatewayError {
    if is_unique_violation(&err) {
        warn!("{what}: unique constraint violated");
        return GatewayError::UniqueViolation {
            detail: err.to_string(),
        };
    }
    GatewayError::Store(anyhow::Error::new(err).context(what))
}

/// Unique violation across backends: SeaORM's own classification first, then
/// SQLSTATE codes (Postgres 23505, SQLite 2067, MySQL 1062) and driver text.
fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    let msg = err.to_string();
    ["23505", "2067", "1062"].iter().any(|c| msg.contains(c))
        || msg.to_lowercase().contains("unique constraint failed")
}
