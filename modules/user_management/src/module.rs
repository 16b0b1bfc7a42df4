use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::UsersConfig;
use crate::contract::client::UsersApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::SeaOrmUsersStore;

/// Module name used as the key of its section in the `modules` config bag.
pub const MODULE_NAME: &str = "user_management";

/// Wires the SeaORM store, the domain service and its REST routes together.
#[derive(Clone)]
pub struct UserManagement {
    service: Arc<Service>,
}

impl UserManagement {
    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running user_management database migrations");
        Migrator::up(db, None).await?;
        info!("Users database migrations completed successfully");
        Ok(())
    }

    /// Build the module on top of an already migrated connection.
    pub fn init(db: DatabaseConnection, cfg: &UsersConfig) -> Self {
        info!("Initializing user_management module");
        debug!(
            "Loaded user_management config: max_name_length={}, max_email_length={}",
            cfg.max_name_length, cfg.max_email_length
        );

        // DatabaseConnection is a cheap cloneable pool handle
        let store = SeaOrmUsersStore::new(db);
        let service = Service::new(Arc::new(store), ServiceConfig::from(cfg));

        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other crates.
    pub fn client(&self) -> Arc<dyn UsersApi> {
        Arc::new(UsersLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering user_management REST routes");
        routes::register_routes(router, self.service.clone())
    }
}
