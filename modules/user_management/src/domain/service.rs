use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, User, UserId};
use crate::domain::error::DomainError;
use crate::domain::repo::{GatewayError, UsersStore};

/// Domain service with business rules for user management.
/// Depends only on the store port, not on infra types.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn UsersStore>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_email_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 100,
            max_email_length: 256,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(store: Arc<dyn UsersStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// All users ordered by surname, then forename. `is_active` narrows the
    /// result to one activation state when set.
    #[instrument(name = "user_management.service.list_users", skip(self), fields(is_active = ?is_active))]
    pub async fn list_users(&self, is_active: Option<bool>) -> Result<Vec<User>, DomainError> {
        debug!("Listing users");

        let gateway = self.store.open();
        let mut users = gateway.list_all().await?;

        if let Some(active) = is_active {
            users.retain(|u| u.is_active == active);
        }
        users.sort_by(|a, b| {
            a.surname
                .cmp(&b.surname)
                .then_with(|| a.forename.cmp(&b.forename))
        });

        debug!("Successfully listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "user_management.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, DomainError> {
        debug!("Getting user by id");

        let user = self.store.open().find_by_id(id).await?;
        if user.is_none() {
            debug!("No user with this id");
        }
        Ok(user)
    }

    #[instrument(
        name = "user_management.service.create_user",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create_user(&self, mut new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        // New users always start active.
        if !new_user.is_active {
            new_user.is_active = true;
        }

        self.validate_fields(&new_user.forename, &new_user.surname, &new_user.email)?;

        let email = new_user.email.clone();
        let mut gateway = self.store.open();
        gateway.add(new_user);
        let report = gateway
            .commit()
            .await
            .map_err(|e| DomainError::from_commit(e, &email))?;

        let user = report
            .inserted
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::database("commit returned no inserted row"))?;

        info!("Successfully created user with id={}", user.id);
        Ok(user)
    }

    /// Overwrite forename, surname, email, is_active and date_of_birth of the
    /// stored user with the values from `user`. The id is never changed.
    #[instrument(
        name = "user_management.service.update_user",
        skip(self, user),
        fields(user_id = user.id)
    )]
    pub async fn update_user(&self, user: User) -> Result<bool, DomainError> {
        info!("Updating user");

        let mut gateway = self.store.open();
        let Some(mut existing) = gateway.find_by_id(user.id).await? else {
            debug!("User not found, nothing to update");
            return Ok(false);
        };

        self.validate_fields(&user.forename, &user.surname, &user.email)?;

        existing.forename = user.forename;
        existing.surname = user.surname;
        existing.email = user.email;
        existing.is_active = user.is_active;
        existing.date_of_birth = user.date_of_birth;

        let email = existing.email.clone();
        gateway.update(existing);
        match gateway.commit().await {
            Ok(_) => {}
            Err(GatewayError::RowMissing { .. }) => {
                debug!("User deleted before commit, nothing to update");
                return Ok(false);
            }
            Err(e) => return Err(DomainError::from_commit(e, &email)),
        }

        info!("Successfully updated user");
        Ok(true)
    }

    #[instrument(name = "user_management.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: UserId) -> Result<bool, DomainError> {
        info!("Deleting user");

        let mut gateway = self.store.open();
        let Some(existing) = gateway.find_by_id(id).await? else {
            debug!("User not found, nothing to delete");
            return Ok(false);
        };

        gateway.remove(existing);
        match gateway.commit().await {
            Ok(_) => {}
            Err(GatewayError::RowMissing { .. }) => {
                debug!("User deleted before commit, nothing to delete");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }

        info!("Successfully deleted user");
        Ok(true)
    }

    // --- validation helpers ---

    fn validate_fields(&self, forename: &str, surname: &str, email: &str) -> Result<(), DomainError> {
        validate_required("forename", forename, self.config.max_name_length)?;
        validate_required("surname", surname, self.config.max_name_length)?;
        validate_required("email", email, self.config.max_email_length)?;
        Ok(())
    }
}

fn validate_required(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(
            field,
            format!("too long: {} characters (max: {})", len, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_rejects_blank() {
        let err = validate_required("forename", "   ", 100).unwrap_err();
        match err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, "forename");
                assert_eq!(message, "is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn required_field_counts_characters_not_bytes() {
        // 100 two-byte characters are within a 100 character limit
        let name = "é".repeat(100);
        assert!(validate_required("surname", &name, 100).is_ok());

        let name = "é".repeat(101);
        assert!(validate_required("surname", &name, 100).is_err());
    }

    #[test]
    fn email_limit_is_independent_of_name_limit() {
        let config = ServiceConfig::default();
        let email = format!("{}@example.com", "a".repeat(200));
        assert!(validate_required("email", &email, config.max_email_length).is_ok());
        assert!(validate_required("forename", &email, config.max_name_length).is_err());
    }
}
