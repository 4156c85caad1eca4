//! Invoice read-model. Built on demand, never persisted.

use crate::{
    entities::{customer, transaction},
    errors::{Error, Result},
};
use serde::Serialize;

/// A customer together with the transactions billed to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub customer: customer::Model,
    pub transactions: Vec<transaction::Model>,
    /// Sum of `transactions[*].amount`, in cents
    pub total: i64,
}

impl Invoice {
    /// Builds the invoice and computes its total.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the amounts do not sum within `i64`.
    pub fn new(customer: customer::Model, transactions: Vec<transaction::Model>) -> Result<Self> {
        let total = total_amount(transactions.iter().map(|t| t.amount))?;
        Ok(Self {
            customer,
            transactions,
            total,
        })
    }
}

/// Sums `amounts` in cents, failing instead of wrapping when the sum leaves `i64`.
pub fn total_amount<I>(amounts: I) -> Result<i64>
where
    I: IntoIterator<Item = i64>,
{
    amounts
        .into_iter()
        .try_fold(0_i64, i64::checked_add)
        .ok_or(Error::AmountOverflow)
}
