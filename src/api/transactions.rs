//! `/transactions` routes and the per-customer transaction views.

use super::{
    AppState,
    auth::AuthUser,
    extract::{PageParams, Payload},
    response::{ApiResponse, Deleted},
};
use crate::{
    entities::TransactionModel,
    errors::Result,
    models::{Invoice, Page, TransactionCreate, TransactionUpdate},
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction).get(list_transactions))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
        .route("/customers/:id/transactions", get(customer_transactions))
        .route("/customers/:id/transactions/total", get(customer_total))
        .route("/customers/:id/invoice", get(customer_invoice))
}

async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(input): Payload<TransactionCreate>,
) -> Result<(StatusCode, ApiResponse<TransactionModel>)> {
    let transaction = state.services.transactions.create(state.db(), input).await?;
    info!("Transaction created by {}: {}", user, transaction.id);
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Transaction created successfully", transaction),
    ))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<TransactionModel>> {
    let transaction = state.services.transactions.get_or_404(state.db(), id).await?;
    Ok(ApiResponse::ok(
        "Transaction retrieved successfully",
        transaction,
    ))
}

async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Payload(input): Payload<TransactionUpdate>,
) -> Result<ApiResponse<TransactionModel>> {
    let transactions = &state.services.transactions;
    let transaction = transactions.get_or_404(state.db(), id).await?;
    let updated = transactions.update(state.db(), transaction, input).await?;
    info!("Transaction {} updated by {}", id, user);
    Ok(ApiResponse::ok("Transaction updated successfully", updated))
}

async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Deleted>> {
    state.services.transactions.delete(state.db(), id).await?;
    info!("Transaction {} deleted by {}", id, user);
    Ok(ApiResponse::ok(
        "Transaction deleted successfully",
        Deleted { deleted_id: id },
    ))
}

async fn list_transactions(
    State(state): State<AppState>,
    page: PageParams,
) -> Result<ApiResponse<Page<TransactionModel>>> {
    let transactions = &state.services.transactions;
    let items = transactions.list(state.db(), page.skip, page.limit).await?;
    let total = transactions.count(state.db()).await?;
    Ok(ApiResponse::ok(
        "Transactions retrieved successfully",
        Page::new(items, total, page.skip, page.limit),
    ))
}

async fn customer_transactions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    page: PageParams,
) -> Result<ApiResponse<Page<TransactionModel>>> {
    let transactions = state
        .services
        .transactions
        .list_by_customer(state.db(), id, page.skip, page.limit)
        .await?;
    Ok(ApiResponse::ok(
        "Customer transactions retrieved successfully",
        transactions,
    ))
}

/// Body of `/customers/{id}/transactions/total`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerTotal {
    pub customer_id: i64,
    pub total_amount: i64,
    pub currency: &'static str,
}

async fn customer_total(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<CustomerTotal>> {
    let total_amount = state
        .services
        .transactions
        .customer_total(state.db(), id)
        .await?;
    Ok(ApiResponse::ok(
        "Customer transaction total calculated successfully",
        CustomerTotal {
            customer_id: id,
            total_amount,
            currency: "cents",
        },
    ))
}

async fn customer_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Invoice>> {
    let invoice = state.services.transactions.invoice(state.db(), id).await?;
    Ok(ApiResponse::ok("Invoice generated successfully", invoice))
}
