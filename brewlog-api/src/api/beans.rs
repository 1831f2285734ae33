//! Bean collection handlers

use super::{server::AppContext, ApiError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use brewlog_common::cost::{derive_costs, CostDisplay};
use brewlog_common::models::{CoffeeBean, CoffeeBeanPatch, NewCoffeeBean};
use brewlog_common::query::{run_query, BeanFilter, SortDirection, SortField};
use brewlog_common::db;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Query parameters for GET /api/coffee-beans
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub roaster: Option<String>,
    pub rank: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

/// GET /api/coffee-beans - List the collection, filtered and sorted
pub async fn list_beans(
    State(ctx): State<AppContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CoffeeBean>>, ApiError> {
    let beans = db::beans::list_beans(&ctx.db_pool).await?;

    let filter = BeanFilter {
        roaster: params.roaster,
        rank: params.rank,
        search: params.search,
    };
    let result = run_query(&beans, &filter, params.sort, params.direction);

    Ok(Json(result))
}

/// POST /api/coffee-beans - Create a bean
pub async fn create_bean(
    State(ctx): State<AppContext>,
    Json(new): Json<NewCoffeeBean>,
) -> Result<(StatusCode, Json<CoffeeBean>), ApiError> {
    let bean = db::beans::create_bean(&ctx.db_pool, new).await?;
    info!(id = %bean.id, name = %bean.name, "Created coffee bean");

    Ok((StatusCode::CREATED, Json(bean)))
}

/// GET /api/coffee-beans/:id - Fetch one bean
pub async fn get_bean(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoffeeBean>, ApiError> {
    let bean = db::beans::get_bean(&ctx.db_pool, id).await?;
    Ok(Json(bean))
}

/// PUT /api/coffee-beans/:id - Partial update
pub async fn update_bean(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CoffeeBeanPatch>,
) -> Result<Json<CoffeeBean>, ApiError> {
    let bean = db::beans::update_bean(&ctx.db_pool, id, patch).await?;
    info!(id = %id, "Updated coffee bean");

    Ok(Json(bean))
}

/// DELETE /api/coffee-beans/:id
pub async fn delete_bean(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db::beans::delete_bean(&ctx.db_pool, id).await?;
    info!(id = %id, "Deleted coffee bean");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/coffee-beans/:id/repurchase - Record a repeat purchase
pub async fn record_repurchase(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoffeeBean>, ApiError> {
    let bean = db::beans::record_repurchase(&ctx.db_pool, id).await?;
    info!(id = %id, purchase_count = bean.purchase_count, "Recorded repurchase");

    Ok(Json(bean))
}

/// GET /api/coffee-beans/:id/costs - Derived cost figures for one bean
pub async fn get_bean_costs(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CostDisplay>, ApiError> {
    let bean = db::beans::get_bean(&ctx.db_pool, id).await?;
    let settings = db::settings::get_cost_settings(&ctx.db_pool).await?;

    Ok(Json(derive_costs(&bean, &settings).display()))
}
