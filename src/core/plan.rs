//! Plan business logic. Plans carry no rules beyond field validation, so the
//! service is the generic CRUD service itself.

use super::repository::CrudService;
use crate::{
    entities::plan,
    models::{PlanCreate, PlanUpdate},
};

/// Plan service
pub type PlanService = CrudService<plan::ActiveModel, PlanCreate, PlanUpdate>;

impl Default for PlanService {
    fn default() -> Self {
        Self::new("Plan")
    }
}
