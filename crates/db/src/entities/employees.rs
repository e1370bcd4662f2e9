//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::Location;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub home_location: Location,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::pto_balances::Entity")]
    PtoBalances,
    #[sea_orm(has_many = "super::time_off_requests::Entity")]
    TimeOffRequests,
}

impl Related<super::pto_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PtoBalances.def()
    }
}

impl Related<super::time_off_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeOffRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
