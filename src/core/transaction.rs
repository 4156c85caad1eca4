//! Transaction business logic - CRUD plus per-customer listing and totals.
//!
//! A transaction always belongs to an existing customer. The owner is checked
//! before insert so a missing customer surfaces as `NotFound` rather than a
//! foreign-key failure.

use super::repository::{CreateInput, CrudService, insertion_order};
use crate::{
    entities::{Customer, transaction},
    errors::{Error, Result},
    models::{Invoice, Page, TransactionCreate, TransactionUpdate, total_amount},
};
use sea_orm::{PaginatorTrait, QuerySelect, prelude::*};

/// Upper bound on rows read when summing or invoicing a single customer.
pub const CUSTOMER_TRANSACTION_CAP: u64 = 100_000;

/// Transaction service
pub struct TransactionService {
    crud: CrudService<transaction::ActiveModel, TransactionCreate, TransactionUpdate>,
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionService {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            crud: CrudService::new("Transaction"),
        }
    }

    pub async fn get<Db: ConnectionTrait>(
        &self,
        db: &Db,
        id: i64,
    ) -> Result<Option<transaction::Model>> {
        self.crud.get(db, id).await
    }

    pub async fn get_or_404<Db: ConnectionTrait>(
        &self,
        db: &Db,
        id: i64,
    ) -> Result<transaction::Model> {
        self.crud.get_or_404(db, id).await
    }

    pub async fn list(
        &self,
        db: &DatabaseConnection,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<transaction::Model>> {
        self.crud.list(db, skip, limit).await
    }

    pub async fn count(&self, db: &DatabaseConnection) -> Result<u64> {
        self.crud.count(db).await
    }

    pub async fn update(
        &self,
        db: &DatabaseConnection,
        transaction: transaction::Model,
        input: TransactionUpdate,
    ) -> Result<transaction::Model> {
        self.crud.update(db, transaction, input).await
    }

    pub async fn delete(&self, db: &DatabaseConnection, id: i64) -> Result<()> {
        self.crud.delete(db, id).await
    }

    /// Records a transaction for an existing customer.
    ///
    /// The owner is looked up first so a bad `customer_id` reads as
    /// `NotFound("Customer")` instead of a foreign-key failure.
    ///
    /// # Errors
    /// Returns `Validation`, `NotFound` for a missing customer, or a database error.
    pub async fn create(
        &self,
        db: &DatabaseConnection,
        input: TransactionCreate,
    ) -> Result<transaction::Model> {
        input.check()?;
        ensure_customer(db, input.customer_id).await?;
        self.crud.create(db, input).await
    }

    /// One page of a customer's transactions in insertion order.
    ///
    /// # Arguments
    /// * `customer_id` - Owner whose transactions are listed
    /// * `skip` - Rows to skip
    /// * `limit` - Page size, already validated by the caller
    pub async fn list_by_customer(
        &self,
        db: &DatabaseConnection,
        customer_id: i64,
        skip: u64,
        limit: u64,
    ) -> Result<Page<transaction::Model>> {
        ensure_customer(db, customer_id).await?;
        let query = transaction::Entity::find()
            .filter(transaction::Column::CustomerId.eq(customer_id));

        let total = query.clone().count(db).await?;
        let items = insertion_order(query)
            .offset(skip)
            .limit(limit)
            .all(db)
            .await?;
        Ok(Page::new(items, total, skip, limit))
    }

    /// Sum of every transaction amount recorded for a customer, in cents.
    ///
    /// Reads at most [`CUSTOMER_TRANSACTION_CAP`] rows.
    ///
    /// # Errors
    /// Returns `NotFound` for a missing customer and `AmountOverflow` when the
    /// amounts do not sum within `i64`.
    pub async fn customer_total(&self, db: &DatabaseConnection, customer_id: i64) -> Result<i64> {
        ensure_customer(db, customer_id).await?;
        let amounts: Vec<i64> = insertion_order(
            transaction::Entity::find().filter(transaction::Column::CustomerId.eq(customer_id)),
        )
        .select_only()
        .column(transaction::Column::Amount)
        .limit(CUSTOMER_TRANSACTION_CAP)
        .into_tuple()
        .all(db)
        .await?;
        total_amount(amounts)
    }

    /// Builds the invoice for a customer from its transactions.
    pub async fn invoice(&self, db: &DatabaseConnection, customer_id: i64) -> Result<Invoice> {
        let customer = Customer::find_by_id(customer_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::not_found("Customer", customer_id))?;
        let transactions = insertion_order(
            transaction::Entity::find().filter(transaction::Column::CustomerId.eq(customer_id)),
        )
        .limit(CUSTOMER_TRANSACTION_CAP)
        .all(db)
        .await?;
        Invoice::new(customer, transactions)
    }
}

async fn ensure_customer(db: &DatabaseConnection, customer_id: i64) -> Result<()> {
    if Customer::find_by_id(customer_id).one(db).await?.is_none() {
        return Err(Error::not_found("Customer", customer_id));
    }
    Ok(())
}
