//! Item endpoints

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::db::repos::{Item, ItemRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ItemId;
use crate::http::server::AppState;
use crate::models::{ItemPatch, NewItem};

/// Item response. Field order is the wire order.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Plain confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        Self {
            id: i.id,
            name: i.name,
            description: i.description,
            price: i.price,
            created_at: iso8601(i.created_at),
            updated_at: iso8601(i.updated_at),
        }
    }
}

/// GET /api/items - list every item
async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = ItemRepo::new(&state.pool).list().await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /api/items/{id} - get a single item
async fn get_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = ItemRepo::new(&state.pool).get(id).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// POST /api/items - create a new item
async fn create_item(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let input = NewItem::from_json(&body)?;
    let item = ItemRepo::new(&state.pool).create(input).await?;

    tracing::info!(item_id = item.id, "item created");
    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// PUT /api/items/{id} - partially update an item
///
/// Existence is checked before the body, so an unknown id is always a 404.
async fn update_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
    body: Bytes,
) -> Result<Json<ItemResponse>, ApiError> {
    let repo = ItemRepo::new(&state.pool);
    repo.get(id).await?;

    let patch = ItemPatch::from_json(&body)?;
    if patch.is_empty() {
        tracing::debug!(item_id = id, "empty patch, refreshing updated_at only");
    }

    let item = repo.update(id, patch).await?;
    tracing::info!(item_id = id, "item updated");
    Ok(Json(ItemResponse::from(item)))
}

/// DELETE /api/items/{id} - remove an item
async fn delete_item(
    State(state): State<Arc<AppState>>,
    ItemId(id): ItemId,
) -> Result<Json<MessageResponse>, ApiError> {
    ItemRepo::new(&state.pool).delete(id).await?;

    tracing::info!(item_id = id, "item deleted");
    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
