//! Customer-plan association - One subscription edge between a customer and a plan.
//!
//! The composite primary key `(customer_id, plan_id)` rejects duplicate edges.
//! `status` is chosen when the edge is created and never changed by the service.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription status stored on each edge
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Association database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_plans")]
pub struct Model {
    /// Subscribing customer
    #[sea_orm(primary_key, auto_increment = false)]
    pub customer_id: i64,
    /// Subscribed plan
    #[sea_orm(primary_key, auto_increment = false)]
    pub plan_id: i64,
    /// Whether the subscription is active
    pub status: PlanStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each edge belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// Each edge belongs to one plan
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id"
    )]
    Plan,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
