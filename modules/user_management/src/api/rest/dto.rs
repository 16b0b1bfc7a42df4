use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{NewUser, User, UserId};

/// REST DTO for user representation with serde/utoipa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReq {
    pub forename: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Ignored when false: new users always start active.
    #[serde(default)]
    pub is_active: bool,
}

/// REST DTO for replacing the editable fields of a user.
/// `id` must match the id in the request path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserReq {
    pub id: UserId,
    pub forename: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
}

/// REST DTO for user list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListDto {
    pub items: Vec<UserDto>,
}

/// Query parameters of `GET /users`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Only users in this activation state; omit for all users.
    #[serde(rename = "isActive")]
    #[param(rename = "isActive")]
    pub is_active: Option<bool>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            forename: user.forename,
            surname: user.surname,
            email: user.email,
            date_of_birth: user.date_of_birth,
            is_active: user.is_active,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            forename: req.forename,
            surname: req.surname,
            email: req.email,
            date_of_birth: req.date_of_birth,
            is_active: req.is_active,
        }
    }
}

impl From<UpdateUserReq> for User {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            id: req.id,
            forename: req.forename,
            surname: req.surname,
            email: req.email,
            date_of_birth: req.date_of_birth,
            is_active: req.is_active,
        }
    }
}
