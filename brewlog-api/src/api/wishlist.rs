//! Wishlist handlers

use super::{server::AppContext, ApiError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use brewlog_common::db;
use brewlog_common::models::{NewWishlistBean, WishlistBean, WishlistBeanPatch};
use tracing::info;
use uuid::Uuid;

/// GET /api/wishlist - List all wishlist entries
pub async fn list_wishlist(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<WishlistBean>>, ApiError> {
    let beans = db::wishlist::list_wishlist(&ctx.db_pool).await?;
    Ok(Json(beans))
}

/// POST /api/wishlist - Add a wishlist entry
pub async fn create_wishlist_bean(
    State(ctx): State<AppContext>,
    Json(new): Json<NewWishlistBean>,
) -> Result<(StatusCode, Json<WishlistBean>), ApiError> {
    let bean = db::wishlist::create_wishlist_bean(&ctx.db_pool, new).await?;
    info!(id = %bean.id, name = %bean.name, "Added wishlist bean");

    Ok((StatusCode::CREATED, Json(bean)))
}

/// PUT /api/wishlist/:id - Partial update
pub async fn update_wishlist_bean(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
    Json(patch): Json<WishlistBeanPatch>,
) -> Result<Json<WishlistBean>, ApiError> {
    let bean = db::wishlist::update_wishlist_bean(&ctx.db_pool, id, patch).await?;
    Ok(Json(bean))
}

/// DELETE /api/wishlist/:id
pub async fn delete_wishlist_bean(
    State(ctx): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    db::wishlist::delete_wishlist_bean(&ctx.db_pool, id).await?;
    info!(id = %id, "Deleted wishlist bean");

    Ok(StatusCode::NO_CONTENT)
}
