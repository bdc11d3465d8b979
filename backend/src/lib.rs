use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, Path, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use c4_core::{generate_tag, Data};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

pub mod config;
pub mod error;
pub mod guard;
pub mod keygen;
pub mod store;

use crate::config::{Config, STATIC_PREFIX};
use crate::error::ApiError;
use crate::guard::Guard;
use crate::store::{MemoryStore, StateStore};

pub struct AppState<S = MemoryStore> {
    store: Arc<S>,
    guard: Arc<Guard>,
    static_dir: PathBuf,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
            static_dir: self.static_dir.clone(),
        }
    }
}

impl<S: StateStore> AppState<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store: Arc::new(store),
            guard: Arc::new(Guard::from_config(config)),
            static_dir: config.static_dir.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

pub fn app<S: StateStore>(state: AppState<S>) -> Router {
    let statics = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(root).fallback(wrong_method))
        .route("/health", get(health).fallback(wrong_method))
        .route(
            "/api/data/:id",
            get(get_data::<S>)
                .put(put_data::<S>)
                .fallback(wrong_method)
                // moveHistory has no length cap.
                .layer(DefaultBodyLimit::disable()),
        )
        .nest_service(STATIC_PREFIX, statics)
        .fallback(no_route)
        .layer(middleware::from_fn_with_state(
            state.guard.clone(),
            guard::enforce,
        ))
        .layer(middleware::from_fn(tag_request))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Logs a fresh correlation tag and runs the rest of the request inside a
/// span carrying it. The tag never reaches the response.
async fn tag_request(req: Request, next: Next) -> Response {
    let tag = generate_tag();
    tracing::info!(
        request_tag = %tag,
        method = %req.method(),
        path = %req.uri().path(),
        "request received"
    );
    let span = tracing::info_span!("request", request_tag = %tag);
    next.run(req).instrument(span).await
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");
    ApiError::Internal.into_response()
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello, Docker! <3" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "Status": "OK" }))
}

async fn no_route() -> ApiError {
    ApiError::NoRoute
}

async fn wrong_method() -> ApiError {
    ApiError::WrongMethod
}

async fn get_data<S: StateStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Data>, ApiError> {
    let data = state.store.get(&id).await?;
    Ok(Json(data))
}

async fn put_data<S: StateStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Data>, ApiError> {
    // Unknown ids answer 404 whatever the body looks like.
    if !state.store.contains(&id).await {
        return Err(ApiError::NotFound);
    }
    let body = body.map_err(|_| ApiError::BadRequest)?;
    // An empty body binds to a zero-valued record.
    let data: Data = if body.is_empty() {
        Data::default()
    } else {
        serde_json::from_slice(&body).map_err(|err| {
            tracing::debug!(%id, error = %err, "rejected body");
            ApiError::BadRequest
        })?
    };
    let stored = state.store.put(&id, data).await?;
    Ok(Json(stored))
}
