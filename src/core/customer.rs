//! Customer business logic - CRUD plus email uniqueness and plan subscriptions.
//!
//! Creation checks the email up front and still relies on the unique column for
//! the window between that check and the insert. Subscribing and unsubscribing
//! run in one transaction each and return the customer with its plans reloaded.

use super::repository::{CreateInput, CrudService, finish};
use crate::{
    entities::{CustomerPlan, Plan, PlanStatus, customer, customer_plan},
    errors::{Error, Result},
    models::{CustomerCreate, CustomerUpdate, CustomerWithPlans, SubscribedPlan},
};
use sea_orm::{DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Customer service
pub struct CustomerService {
    crud: CrudService<customer::ActiveModel, CustomerCreate, CustomerUpdate>,
}

impl Default for CustomerService {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerService {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            crud: CrudService::new("Customer"),
        }
    }

    /// Fetches a customer by id, `None` if absent.
    pub async fn get<Db: ConnectionTrait>(
        &self,
        db: &Db,
        id: i64,
    ) -> Result<Option<customer::Model>> {
        self.crud.get(db, id).await
    }

    /// Fetches a customer by id or fails with `NotFound("Customer", id)`.
    pub async fn get_or_404<Db: ConnectionTrait>(&self, db: &Db, id: i64) -> Result<customer::Model> {
        self.crud.get_or_404(db, id).await
    }

    /// One page of customers in insertion order.
    pub async fn list(
        &self,
        db: &DatabaseConnection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<customer::Model>> {
        self.crud.list(db, skip, limit).await
    }

    /// Total number of customers.
    pub async fn count(&self, db: &DatabaseConnection) -> Result<u64> {
        self.crud.count(db).await
    }

    /// Applies a partial update. Changing the email to one already registered
    /// fails with `Conflict` from the unique column.
    pub async fn update(
        &self,
        db: &DatabaseConnection,
        customer: customer::Model,
        input: CustomerUpdate,
    ) -> Result<customer::Model> {
        self.crud.update(db, customer, input).await
    }

    /// Deleting a customer that still owns transactions or subscriptions fails
    /// with `Conflict`.
    pub async fn delete(&self, db: &DatabaseConnection, id: i64) -> Result<()> {
        self.crud.delete(db, id).await
    }

    /// Finds the customer registered under `email`.
    pub async fn get_by_email<Db: ConnectionTrait>(
        &self,
        db: &Db,
        email: &str,
    ) -> Result<Option<customer::Model>> {
        customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Creates a customer, rejecting an email that is already registered.
    ///
    /// The email lookup gives callers a readable message. Two requests that both
    /// pass the lookup are still separated by the unique column, and the loser
    /// gets `Conflict` as well.
    ///
    /// # Errors
    /// Returns `Validation` for bad fields, `Conflict` for a taken email, or a
    /// database error.
    pub async fn create(
        &self,
        db: &DatabaseConnection,
        input: CustomerCreate,
    ) -> Result<customer::Model> {
        input.check()?;
        if self.get_by_email(db, &input.email).await?.is_some() {
            return Err(Error::conflict(format!(
                "Customer with email '{}' already exists",
                input.email
            )));
        }
        self.crud.create(db, input).await
    }

    /// Subscribes a customer to a plan with the default status.
    ///
    /// The existence checks and the insert share one database transaction. The
    /// customer is reloaded with its plans after the commit, so the returned view
    /// includes the new subscription.
    ///
    /// # Arguments
    /// * `customer_id` - Subscribing customer
    /// * `plan_id` - Plan to subscribe to
    ///
    /// # Errors
    /// Returns `NotFound` for a missing customer or plan, `Conflict` if the
    /// subscription already exists, or a database error.
    pub async fn add_plan(
        &self,
        db: &DatabaseConnection,
        customer_id: i64,
        plan_id: i64,
    ) -> Result<CustomerWithPlans> {
        let txn = db.begin().await?;
        let result = self.attach(&txn, customer_id, plan_id).await;
        finish(txn, result).await?;

        info!("Added plan {} to customer {}", plan_id, customer_id);
        self.get_with_plans(db, customer_id).await
    }

    /// Removes a customer's subscription to a plan.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing customer or a missing
    /// `Customer-Plan relationship` (id `"{customer_id}-{plan_id}"`).
    pub async fn remove_plan(
        &self,
        db: &DatabaseConnection,
        customer_id: i64,
        plan_id: i64,
    ) -> Result<CustomerWithPlans> {
        let txn = db.begin().await?;
        let result = self.detach(&txn, customer_id, plan_id).await;
        finish(txn, result).await?;

        info!("Removed plan {} from customer {}", plan_id, customer_id);
        self.get_with_plans(db, customer_id).await
    }

    /// Loads a customer together with every plan it is subscribed to.
    pub async fn get_with_plans<Db: ConnectionTrait>(
        &self,
        db: &Db,
        customer_id: i64,
    ) -> Result<CustomerWithPlans> {
        let customer = self.get_or_404(db, customer_id).await?;
        let plans = CustomerPlan::find()
            .filter(customer_plan::Column::CustomerId.eq(customer_id))
            .order_by_asc(customer_plan::Column::PlanId)
            .find_also_related(Plan)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(edge, plan)| {
                plan.map(|plan| SubscribedPlan {
                    plan,
                    status: edge.status,
                })
            })
            .collect();
        Ok(CustomerWithPlans { customer, plans })
    }

    /// Lists a customer's subscription edges, optionally only those with `status`.
    pub async fn plans<Db: ConnectionTrait>(
        &self,
        db: &Db,
        customer_id: i64,
        status: Option<PlanStatus>,
    ) -> Result<Vec<customer_plan::Model>> {
        self.get_or_404(db, customer_id).await?;
        let mut query =
            CustomerPlan::find().filter(customer_plan::Column::CustomerId.eq(customer_id));
        if let Some(status) = status {
            query = query.filter(customer_plan::Column::Status.eq(status));
        }
        query
            .order_by_asc(customer_plan::Column::PlanId)
            .all(db)
            .await
            .map_err(Into::into)
    }

    async fn find_edge(
        txn: &DatabaseTransaction,
        customer_id: i64,
        plan_id: i64,
    ) -> Result<Option<customer_plan::Model>> {
        CustomerPlan::find_by_id((customer_id, plan_id))
            .one(txn)
            .await
            .map_err(Into::into)
    }

    async fn attach(&self, txn: &DatabaseTransaction, customer_id: i64, plan_id: i64) -> Result<()> {
        self.get_or_404(txn, customer_id).await?;
        Plan::find_by_id(plan_id)
            .one(txn)
            .await?
            .ok_or_else(|| Error::not_found("Plan", plan_id))?;

        if Self::find_edge(txn, customer_id, plan_id).await?.is_some() {
            return Err(Error::conflict("Customer already has this plan"));
        }

        let edge = customer_plan::ActiveModel {
            customer_id: Set(customer_id),
            plan_id: Set(plan_id),
            status: Set(PlanStatus::default()),
        };
        CustomerPlan::insert(edge)
            .exec(txn)
            .await
            .map_err(|e| Error::from_write(e, "Customer already has this plan"))?;
        Ok(())
    }

    async fn detach(&self, txn: &DatabaseTransaction, customer_id: i64, plan_id: i64) -> Result<()> {
        self.get_or_404(txn, customer_id).await?;
        if Self::find_edge(txn, customer_id, plan_id).await?.is_none() {
            return Err(Error::not_found(
                "Customer-Plan relationship",
                format!("{customer_id}-{plan_id}"),
            ));
        }
        CustomerPlan::delete_by_id((customer_id, plan_id))
            .exec(txn)
            .await?;
        Ok(())
    }
}
