#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use user_management::contract::model::{NewUser, User, UserId};
use user_management::domain::repo::{
    CommitReport, GatewayError, StagedChange, UsersGateway, UsersStore,
};
use user_management::domain::service::{Service, ServiceConfig};
use user_management::infra::storage::migrations::Migrator;
use user_management::infra::storage::SeaOrmUsersStore;

/// Fresh, migrated in-memory SQLite database for each test.
/// A single pooled connection keeps every query on the same memory database.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn create_test_store(db: &DatabaseConnection) -> SeaOrmUsersStore<DatabaseConnection> {
    SeaOrmUsersStore::new(db.clone())
}

pub fn create_test_service(db: &DatabaseConnection) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(create_test_store(db)),
        ServiceConfig::default(),
    ))
}

pub fn new_user(forename: &str, surname: &str, email: &str, is_active: bool) -> NewUser {
    NewUser {
        forename: forename.to_string(),
        surname: surname.to_string(),
        email: email.to_string(),
        date_of_birth: None,
        is_active,
    }
}

/// Insert rows straight through the gateway, bypassing service rules.
pub async fn seed(db: &DatabaseConnection, users: Vec<NewUser>) -> Vec<User> {
    let mut gateway = create_test_store(db).open();
    for u in users {
        gateway.add(u);
    }
    gateway.commit().await.expect("seed commit failed").inserted
}

pub async fn all_rows(db: &DatabaseConnection) -> Vec<User> {
    create_test_store(db)
        .open()
        .list_all()
        .await
        .expect("list_all failed")
}

/// Minimal in-memory store for tests that do not need SQL.
/// Emails are unique across rows, checked at commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<MemoryRows>>,
}

#[derive(Default)]
struct MemoryRows {
    next_id: UserId,
    users: Vec<User>,
}

impl MemoryStore {
    pub fn with_users(users: Vec<NewUser>) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for u in users {
                rows.next_id += 1;
                let id = rows.next_id;
                rows.users.push(u.with_id(id));
            }
        }
        store
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.rows.lock().unwrap().users.clone()
    }
}

impl UsersStore for MemoryStore {
    fn open(&self) -> Box<dyn UsersGateway> {
        Box::new(MemoryGateway {
            rows: self.rows.clone(),
            staged: Vec::new(),
        })
    }
}

struct MemoryGateway {
    rows: Arc<Mutex<MemoryRows>>,
    staged: Vec<StagedChange>,
}

#[async_trait]
impl UsersGateway for MemoryGateway {
    async fn list_all(&self) -> Result<Vec<User>, GatewayError> {
        Ok(self.rows.lock().unwrap().users.clone())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
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
        let mut guard = self.rows.lock().unwrap();

        // Work on a copy so a failed commit leaves the rows untouched
        let mut next_id = guard.next_id;
        let mut users = guard.users.clone();
        let mut report = CommitReport::default();

        for change in staged {
            match change {
                StagedChange::Insert(u) => {
                    next_id += 1;
                    let user = u.with_id(next_id);
                    report.inserted.push(user.clone());
                    users.push(user);
                    report.rows_affected += 1;
                }
                StagedChange::Update(u) => {
                    let Some(row) = users.iter_mut().find(|r| r.id == u.id) else {
                        return Err(GatewayError::RowMissing { id: u.id });
                    };
                    *row = u;
                    report.rows_affected += 1;
                }
                StagedChange::Delete(u) => {
                    let before = users.len();
                    users.retain(|r| r.id != u.id);
                    if users.len() == before {
                        return Err(GatewayError::RowMissing { id: u.id });
                    }
                    report.rows_affected += 1;
                }
            }
        }

        for (i, a) in users.iter().enumerate() {
            if users[i + 1..].iter().any(|b| b.email == a.email) {
                return Err(GatewayError::UniqueViolation {
                    detail: format!("duplicate email {}", a.email),
                });
            }
        }

        guard.next_id = next_id;
        guard.users = users;
        Ok(report)
    }
}
