//! Plan entity - A subscribable product offering.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plan database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    /// Unique identifier for the plan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Plan name, 3 to 50 characters
    pub name: String,
    /// Price in cents, if the plan is priced
    pub price: Option<i64>,
    /// Description, at most 255 characters
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One plan has many customer subscriptions
    #[sea_orm(has_many = "super::customer_plan::Entity")]
    CustomerPlans,
}

impl Related<super::customer_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerPlans.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_plan::Relation::Customer.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_plan::Relation::Plan.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
