//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod customer;
pub mod customer_plan;
pub mod plan;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use customer_plan::{
    Column as CustomerPlanColumn, Entity as CustomerPlan, Model as CustomerPlanModel, PlanStatus,
};
pub use plan::{Column as PlanColumn, Entity as Plan, Model as PlanModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
