use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::UsersApi,
    error::UsersError,
    model::{NewUser, User, UserId},
};
use crate::domain::service::Service;

/// Local implementation of the UsersApi trait that delegates to the domain service
pub struct UsersLocalClient {
    service: Arc<Service>,
}

impl UsersLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersApi for UsersLocalClient {
    async fn list_users(&self, is_active: Option<bool>) -> Result<Vec<User>, UsersError> {
        self.service
            .list_users(is_active)
            .await
            .map_err(UsersError::from)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, UsersError> {
        self.service.get_user(id).await.map_err(UsersError::from)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError> {
        self.service
            .create_user(new_user)
            .await
            .map_err(UsersError::from)
    }

    async fn update_user(&self, user: User) -> Result<bool, UsersError> {
        self.service.update_user(user).await.map_err(UsersError::from)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, UsersError> {
        self.service.delete_user(id).await.map_err(UsersError::from)
    }
}
