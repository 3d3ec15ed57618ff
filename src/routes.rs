use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::backend::BackendService;
use crate::domain::{NewProduct, OrderRequest};
use crate::dtos::CreationResponse;
use crate::events::MessageBroker;
use crate::middleware::PageSize;
use crate::state::AppState;

pub async fn health() -> &'static str {
    "Ok"
}

#[derive(Deserialize)]
pub struct ListingQuery {
    // Passed through verbatim; the backend owns type validation here.
    #[serde(rename = "type", default = "default_product_type")]
    pub product_type: String,
}

fn default_product_type() -> String {
    String::from("gadget")
}

pub async fn find_available_products<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    Query(query): Query<ListingQuery>,
    Extension(page_size): Extension<PageSize>,
) -> Response
where
    B: BackendService + 'static,
    M: MessageBroker + 'static,
{
    let products = match state
        .backend
        .fetch_products(&query.product_type, page_size.0)
        .await
    {
        Ok(products) => products,
        Err(e) => return e.into_response(),
    };

    if let Err(e) = state.broker.publish_products(&products).await {
        return e.into_response();
    }

    (StatusCode::OK, Json(json!(products))).into_response()
}

pub async fn create_product<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    Json(payload): Json<Value>,
) -> Response
where
    B: BackendService + 'static,
    M: MessageBroker + 'static,
{
    let new_product = match NewProduct::from_value(&payload) {
        Ok(new_product) => new_product,
        Err(e) => return e.into_response(),
    };

    match state.backend.create_product(&new_product).await {
        Ok(id) => (StatusCode::CREATED, Json(json!(CreationResponse { id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_order<B, M>(
    State(state): State<Arc<AppState<B, M>>>,
    Json(payload): Json<Value>,
) -> Response
where
    B: BackendService + 'static,
    M: MessageBroker + 'static,
{
    let order_request = match OrderRequest::from_value(&payload) {
        Ok(order_request) => order_request,
        Err(e) => return e.into_response(),
    };

    match state.backend.create_order(&order_request).await {
        Ok(id) => (StatusCode::CREATED, Json(json!(CreationResponse { id }))).into_response(),
        Err(e) => e.into_response(),
    }
}
