//! `/plans` routes.

use super::{
    AppState,
    auth::AuthUser,
    extract::{PageParams, Payload},
    response::{ApiResponse, Deleted},
};
use crate::{
    entities::PlanModel,
    errors::Result,
    models::{Page, PlanCreate, PlanUpdate},
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", post(create_plan).get(list_plans))
        .route(
            "/plans/:id",
            get(get_plan).patch(update_plan).delete(delete_plan),
        )
}

async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(input): Payload<PlanCreate>,
) -> Result<(StatusCode, ApiResponse<PlanModel>)> {
    let plan = state.services.plans.create(state.db(), input).await?;
    info!("Plan created by {}: {}", user, plan.id);
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Plan created successfully", plan),
    ))
}

async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<PlanModel>> {
    let plan = state.services.plans.get_or_404(state.db(), id).await?;
    Ok(ApiResponse::ok("Plan retrieved successfully", plan))
}

async fn update_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Payload(input): Payload<PlanUpdate>,
) -> Result<ApiResponse<PlanModel>> {
    let plans = &state.services.plans;
    let plan = plans.get_or_404(state.db(), id).await?;
    let updated = plans.update(state.db(), plan, input).await?;
    info!("Plan {} updated by {}", id, user);
    Ok(ApiResponse::ok("Plan updated successfully", updated))
}

async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Deleted>> {
    state.services.plans.delete(state.db(), id).await?;
    info!("Plan {} deleted by {}", id, user);
    Ok(ApiResponse::ok(
        "Plan deleted successfully",
        Deleted { deleted_id: id },
    ))
}

async fn list_plans(
    State(state): State<AppState>,
    page: PageParams,
) -> Result<ApiResponse<Page<PlanModel>>> {
    let plans = &state.services.plans;
    let items = plans.list(state.db(), page.skip, page.limit).await?;
    let total = plans.count(state.db()).await?;
    Ok(ApiResponse::ok(
        "Plans retrieved successfully",
        Page::new(items, total, page.skip, page.limit),
    ))
}
