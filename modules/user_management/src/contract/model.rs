use chrono::NaiveDate;

/// Store-assigned primary key of a user row.
pub type UserId = i64;

/// Pure user model for in-process communication (no serde/utoipa).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
}

/// Data for creating a new user. The id is assigned by the store on commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
}

impl NewUser {
    /// Attach a store-assigned id, producing the persisted shape.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            forename: self.forename,
            surname: self.surname,
            email: self.email,
            date_of_birth: self.date_of_birth,
            is_active: self.is_active,
        }
    }
}
