use async_trait::async_trait;

use crate::contract::{
    error::UsersError,
    model::{NewUser, User, UserId},
};

/// Public API trait for the user_management module that other crates can use
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// List users ordered by surname then forename, optionally filtered by
    /// activation state.
    async fn list_users(&self, is_active: Option<bool>) -> Result<Vec<User>, UsersError>;

    /// Get a user by id; `None` when no row matches.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, UsersError>;

    /// Create a new user and return it with its assigned id.
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError>;

    /// Replace the editable fields of an existing user. `false` if the id is unknown.
    async fn update_user(&self, user: User) -> Result<bool, UsersError>;

    /// Delete a user by id. `false` if the id is unknown.
    async fn delete_user(&self, id: UserId) -> Result<bool, UsersError>;
}
