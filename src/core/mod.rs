//! Core business logic - framework-agnostic services over the entities.

/// Generic CRUD service shared by every entity
pub mod repository;

/// Customer service with email uniqueness and plan subscriptions
pub mod customer;

/// Plan service
pub mod plan;

/// Transaction service with per-customer listing and totals
pub mod transaction;

pub use customer::CustomerService;
pub use plan::PlanService;
pub use transaction::{CUSTOMER_TRANSACTION_CAP, TransactionService};

/// The set of services shared by every request handler
#[derive(Default)]
pub struct Services {
    pub customers: CustomerService,
    pub plans: PlanService,
    pub transactions: TransactionService,
}
