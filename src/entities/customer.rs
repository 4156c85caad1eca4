//! Customer entity - A billed party.
//!
//! Customers own transactions and subscribe to plans through the
//! `customer_plans` association table. Email addresses are unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, 3 to 50 characters
    pub name: String,
    /// Optional free-form description, at most 255 characters
    pub description: Option<String>,
    /// Age in years, 1 to 149
    pub age: i32,
    /// Contact email, unique across all customers
    #[sea_orm(unique)]
    pub email: String,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One customer has many plan subscriptions
    #[sea_orm(has_many = "super::customer_plan::Entity")]
    CustomerPlans,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::customer_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerPlans.def()
    }
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_plan::Relation::Plan.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_plan::Relation::Customer.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
