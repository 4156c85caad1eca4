//! `/customers` routes and the customer-plan subscription routes.

use super::{
    AppState,
    auth::AuthUser,
    extract::{PageParams, Params, Payload},
    response::{ApiResponse, Deleted},
};
use crate::{
    entities::{CustomerModel, CustomerPlanModel, PlanStatus},
    errors::Result,
    models::{CustomerCreate, CustomerUpdate, CustomerWithPlans, Page},
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", post(create_customer).get(list_customers))
        .route(
            "/customers/:id",
            get(get_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .route("/customers/:id/plans", get(list_customer_plans))
        .route(
            "/customers/:id/plans/:plan_id",
            post(add_plan).delete(remove_plan),
        )
}

async fn create_customer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(input): Payload<CustomerCreate>,
) -> Result<(StatusCode, ApiResponse<CustomerModel>)> {
    let customer = state.services.customers.create(state.db(), input).await?;
    info!("Customer created by {}: {}", user, customer.id);
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Customer created successfully", customer),
    ))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<CustomerModel>> {
    let customer = state.services.customers.get_or_404(state.db(), id).await?;
    Ok(ApiResponse::ok("Customer retrieved successfully", customer))
}

async fn update_customer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Payload(input): Payload<CustomerUpdate>,
) -> Result<ApiResponse<CustomerModel>> {
    let customers = &state.services.customers;
    let customer = customers.get_or_404(state.db(), id).await?;
    let updated = customers.update(state.db(), customer, input).await?;
    info!("Customer {} updated by {}", id, user);
    Ok(ApiResponse::ok("Customer updated successfully", updated))
}

async fn delete_customer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Deleted>> {
    state.services.customers.delete(state.db(), id).await?;
    info!("Customer {} deleted by {}", id, user);
    Ok(ApiResponse::ok(
        "Customer deleted successfully",
        Deleted { deleted_id: id },
    ))
}

async fn list_customers(
    State(state): State<AppState>,
    page: PageParams,
) -> Result<ApiResponse<Page<CustomerModel>>> {
    let customers = &state.services.customers;
    let items = customers.list(state.db(), page.skip, page.limit).await?;
    let total = customers.count(state.db()).await?;
    Ok(ApiResponse::ok(
        "Customers retrieved successfully",
        Page::new(items, total, page.skip, page.limit),
    ))
}

async fn add_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, plan_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, ApiResponse<CustomerWithPlans>)> {
    let customer = state.services.customers.add_plan(state.db(), id, plan_id).await?;
    info!("Plan {} added to customer {} by {}", plan_id, id, user);
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Plan added to customer successfully", customer),
    ))
}

async fn remove_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, plan_id)): Path<(i64, i64)>,
) -> Result<ApiResponse<CustomerWithPlans>> {
    let customer = state
        .services
        .customers
        .remove_plan(state.db(), id, plan_id)
        .await?;
    info!("Plan {} removed from customer {} by {}", plan_id, id, user);
    Ok(ApiResponse::ok(
        "Plan removed from customer successfully",
        customer,
    ))
}

#[derive(Debug, Deserialize)]
struct PlanFilter {
    #[serde(alias = "status_filter")]
    status: Option<PlanStatus>,
}

async fn list_customer_plans(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Params(filter): Params<PlanFilter>,
) -> Result<ApiResponse<Vec<CustomerPlanModel>>> {
    let plans = state
        .services
        .customers
        .plans(state.db(), id, filter.status)
        .await?;
    Ok(ApiResponse::ok("Customer plans retrieved successfully", plans))
}
