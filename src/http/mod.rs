//! HTTP transport - maps the REST contract onto a `CatalogService`.
//!
//! Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health` - liveness check.
//! - `GET /plants` - list, with `search`, `category`, `inStock`, `sort`, `order`.
//! - `POST /plants` - create. `201` on success.
//! - `GET /plants/categories/list` - distinct categories with counts.
//! - `GET /plants/:id`, `PUT /plants/:id`, `DELETE /plants/:id`.
//!
//! All routes live under a configurable base path (`/api` by default).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use plant_catalog::{catalog::CatalogService, http, store::InMemoryPlantStore};
//!
//! let service = Arc::new(CatalogService::new(InMemoryPlantStore::new()));
//! let app = http::app(service, "/api");
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! ```

mod response;
pub mod validation;

use std::future::Future;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::catalog::{CatalogService, CategoryCount, ListParams, PlantFilter};
use crate::error::{CatalogError, FieldError, StoreError};
use crate::model::{NewPlant, Plant, PlantPatch};
use crate::store::PlantStore;

pub use response::{
    ApiResponse, DELETED_MESSAGE, NOT_FOUND_MESSAGE, SERVER_ERROR_MESSAGE, VALIDATION_MESSAGE,
};

type SharedService<S> = State<Arc<CatalogService<S>>>;

/// Build the `/plants` and `/health` routes, unprefixed.
pub fn router<S: PlantStore + 'static>(service: Arc<CatalogService<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/plants", get(list_handler::<S>).post(create_handler::<S>))
        .route("/plants/categories/list", get(categories_handler::<S>))
        .route(
            "/plants/:id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(service)
}

/// Mount the API under `base_path`. An empty or `/` base serves at the root.
pub fn app<S: PlantStore + 'static>(service: Arc<CatalogService<S>>, base_path: &str) -> Router {
    let base = base_path.trim_matches('/');
    if base.is_empty() {
        router(service)
    } else {
        Router::new().nest(&format!("/{base}"), router(service))
    }
}

/// Serve the API at `addr` until `shutdown` resolves.
pub async fn serve<S, F>(
    service: Arc<CatalogService<S>>,
    base_path: &str,
    addr: &str,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    S: PlantStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = app(service, base_path);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, base_path, "plant catalog listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// `GET /health`
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Plant catalog API is running",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

/// `GET /plants`
async fn list_handler<S: PlantStore + 'static>(
    State(service): SharedService<S>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Plant>>>, CatalogError> {
    // A query string that does not fit the parameter shape (a repeated key,
    // say) is a query the store cannot run.
    let Query(params) =
        params.map_err(|rejection| StoreError::InvalidQuery(rejection.body_text()))?;
    let filter = PlantFilter::from(&params);
    let plants = service.list(&filter).await?;
    Ok(Json(ApiResponse::list(plants)))
}

/// `GET /plants/:id`
async fn get_handler<S: PlantStore + 'static>(
    State(service): SharedService<S>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Plant>>, CatalogError> {
    let plant = service.get(&id).await?;
    Ok(Json(ApiResponse::data(plant)))
}

/// `POST /plants`
async fn create_handler<S: PlantStore + 'static>(
    State(service): SharedService<S>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, CatalogError> {
    let plant: NewPlant = checked_body(body)?;
    let saved = service.create(plant).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(saved))))
}

/// `PUT /plants/:id`
async fn update_handler<S: PlantStore + 'static>(
    State(service): SharedService<S>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<Plant>>, CatalogError> {
    let patch: PlantPatch = checked_body(body)?;
    let updated = service.update(&id, patch).await?;
    Ok(Json(ApiResponse::data(updated)))
}

/// `DELETE /plants/:id`
async fn delete_handler<S: PlantStore + 'static>(
    State(service): SharedService<S>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, CatalogError> {
    service.delete(&id).await?;
    Ok(Json(ApiResponse::message(DELETED_MESSAGE)))
}

/// `GET /plants/categories/list`
async fn categories_handler<S: PlantStore + 'static>(
    State(service): SharedService<S>,
) -> Result<Json<ApiResponse<Vec<CategoryCount>>>, CatalogError> {
    let counts = service.categories().await?;
    Ok(Json(ApiResponse::data(counts)))
}

/// Run the body preconditions, then decode into the typed payload.
///
/// Precondition failures are client errors. A body that passes them but
/// still cannot be decoded (an `inStock` that is not a boolean, say) is
/// rejected by the schema, which is a store error.
fn checked_body<T: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<T, CatalogError> {
    let Json(body) = body.map_err(|rejection| {
        CatalogError::Validation(vec![FieldError::body("", None, rejection.body_text())])
    })?;
    let clean = validation::validate_plant(body).map_err(CatalogError::Validation)?;
    serde_json::from_value(clean).map_err(|e| CatalogError::Store(StoreError::Schema(e.to_string())))
}
