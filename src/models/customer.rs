//! Customer input shapes and the customer-with-plans view.

use super::Patch;
use crate::{
    core::repository::{CreateInput, UpdateInput},
    entities::{PlanStatus, customer, plan},
    errors::Result,
    validation::FieldChecks,
};
use sea_orm::{IntoActiveModel, NotSet, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /customers`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CustomerCreate {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 149, message = "must be between 1 and 149"))]
    pub age: i32,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

impl IntoActiveModel<customer::ActiveModel> for CustomerCreate {
    fn into_active_model(self) -> customer::ActiveModel {
        customer::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            description: Set(self.description),
            age: Set(self.age),
            email: Set(self.email),
        }
    }
}

impl CreateInput<customer::ActiveModel> for CustomerCreate {
    fn check(&self) -> Result<()> {
        self.validate().map_err(Into::into)
    }
}

/// Body of `PATCH /customers/{id}`. Only supplied keys are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerUpdate {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
    #[serde(default)]
    pub email: Patch<String>,
}

impl UpdateInput<customer::ActiveModel> for CustomerUpdate {
    fn check(&self) -> Result<()> {
        let mut checks = FieldChecks::default();
        checks.not_null("name", &self.name);
        checks.not_null("age", &self.age);
        checks.not_null("email", &self.email);
        if let Some(name) = self.name.value() {
            checks.length("name", name, 3, 50);
        }
        if let Some(description) = self.description.value() {
            checks.length("description", description, 0, 255);
        }
        if let Some(age) = self.age.value() {
            checks.range("age", i64::from(*age), 1, 149);
        }
        if let Some(email) = self.email.value() {
            checks.email("email", email);
        }
        checks.finish()
    }

    fn apply_to(self, model: &mut customer::ActiveModel) {
        if let Some(name) = self.name.into_value() {
            model.name = Set(name);
        }
        if let Some(description) = self.description.into_nullable() {
            model.description = Set(description);
        }
        if let Some(age) = self.age.into_value() {
            model.age = Set(age);
        }
        if let Some(email) = self.email.into_value() {
            model.email = Set(email);
        }
    }
}

/// A plan as seen from one of its subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribedPlan {
    #[serde(flatten)]
    pub plan: plan::Model,
    pub status: PlanStatus,
}

/// A customer with its current subscriptions loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerWithPlans {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub plans: Vec<SubscribedPlan>,
}
