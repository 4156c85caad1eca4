//! Transaction input shapes.

use super::Patch;
use crate::{
    core::repository::{CreateInput, UpdateInput},
    entities::transaction,
    errors::Result,
    validation::FieldChecks,
};
use sea_orm::{IntoActiveModel, NotSet, Set};
use serde::Deserialize;
use validator::Validate;

/// Body of `POST /transactions`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct TransactionCreate {
    /// Amount in cents
    pub amount: i64,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub description: String,
    pub customer_id: i64,
}

impl IntoActiveModel<transaction::ActiveModel> for TransactionCreate {
    fn into_active_model(self) -> transaction::ActiveModel {
        transaction::ActiveModel {
            id: NotSet,
            amount: Set(self.amount),
            description: Set(self.description),
            customer_id: Set(self.customer_id),
        }
    }
}

impl CreateInput<transaction::ActiveModel> for TransactionCreate {
    fn check(&self) -> Result<()> {
        self.validate().map_err(Into::into)
    }
}

/// Body of `PATCH /transactions/{id}`. The owning customer cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default)]
    pub amount: Patch<i64>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl UpdateInput<transaction::ActiveModel> for TransactionUpdate {
    fn check(&self) -> Result<()> {
        let mut checks = FieldChecks::default();
        checks.not_null("amount", &self.amount);
        checks.not_null("description", &self.description);
        if let Some(description) = self.description.value() {
            checks.length("description", description, 0, 255);
        }
        checks.finish()
    }

    fn apply_to(self, model: &mut transaction::ActiveModel) {
        if let Some(amount) = self.amount.into_value() {
            model.amount = Set(amount);
        }
        if let Some(description) = self.description.into_value() {
            model.description = Set(description);
        }
    }
}
