//! Request and response shapes that are not database rows.
//!
//! `*Create` types carry every required field and validate with `validator`;
//! `*Update` types wrap each field in [`Patch`] so a PATCH body only writes the
//! keys it names.

pub mod customer;
pub mod invoice;
pub mod page;
pub mod patch;
pub mod plan;
pub mod transaction;

pub use customer::{CustomerCreate, CustomerUpdate, CustomerWithPlans, SubscribedPlan};
pub use invoice::{Invoice, total_amount};
pub use page::Page;
pub use patch::Patch;
pub use plan::{PlanCreate, PlanUpdate};
pub use transaction::{TransactionCreate, TransactionUpdate};
