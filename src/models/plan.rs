//! Plan input shapes.

use super::Patch;
use crate::{
    core::repository::{CreateInput, UpdateInput},
    entities::plan,
    errors::Result,
    validation::FieldChecks,
};
use sea_orm::{IntoActiveModel, NotSet, Set};
use serde::Deserialize;
use validator::Validate;

/// Body of `POST /plans`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PlanCreate {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    pub name: String,
    /// Price in cents
    #[serde(default)]
    pub price: Option<i64>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub description: String,
}

impl IntoActiveModel<plan::ActiveModel> for PlanCreate {
    fn into_active_model(self) -> plan::ActiveModel {
        plan::ActiveModel {
            id: NotSet,
            name: Set(self.name),
            price: Set(self.price),
            description: Set(self.description),
        }
    }
}

impl CreateInput<plan::ActiveModel> for PlanCreate {
    fn check(&self) -> Result<()> {
        self.validate().map_err(Into::into)
    }
}

/// Body of `PATCH /plans/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlanUpdate {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub price: Patch<i64>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl UpdateInput<plan::ActiveModel> for PlanUpdate {
    fn check(&self) -> Result<()> {
        let mut checks = FieldChecks::default();
        checks.not_null("name", &self.name);
        checks.not_null("description", &self.description);
        if let Some(name) = self.name.value() {
            checks.length("name", name, 3, 50);
        }
        if let Some(description) = self.description.value() {
            checks.length("description", description, 0, 255);
        }
        checks.finish()
    }

    fn apply_to(self, model: &mut plan::ActiveModel) {
        if let Some(name) = self.name.into_value() {
            model.name = Set(name);
        }
        if let Some(price) = self.price.into_nullable() {
            model.price = Set(price);
        }
        if let Some(description) = self.description.into_value() {
            model.description = Set(description);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_price_can_be_cleared() {
        let update: PlanUpdate = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert!(update.check().is_ok());
        let mut model = plan::ActiveModel {
            price: Set(Some(999)),
            ..Default::default()
        };
        update.apply_to(&mut model);
        assert_eq!(model.price, Set(None));
    }

    #[test]
    fn test_description_is_required_on_create() {
        let parsed = serde_json::from_str::<PlanCreate>(r#"{"name": "Gold"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_short_name_rejected() {
        let input = PlanCreate {
            name: "Go".to_string(),
            price: Some(100),
            description: "Gold tier".to_string(),
        };
        assert!(matches!(input.check(), Err(Error::Validation { .. })));
    }
}
