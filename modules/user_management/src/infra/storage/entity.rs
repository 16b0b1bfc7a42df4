use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use crate::contract::model::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub forename: String,
    pub surname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            forename: m.forename,
            surname: m.surname,
            email: m.email,
            date_of_birth: m.date_of_birth,
            is_active: m.is_active,
        }
    }
}
