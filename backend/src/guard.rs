//! Access guard: ordered header checks run before every non-static route.
//!
//! Stages are plain values returning an allow/deny decision, so they can be
//! exercised without a router. [`enforce`] is the axum middleware that runs
//! the pipeline.

use std::sync::Arc;

use axum::extract::{OriginalUri, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::{Config, STATIC_PREFIX};
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("forbidden")]
    Forbidden,
    #[error("api key required")]
    KeyRequired,
    #[error("invalid api key")]
    KeyInvalid,
}

pub trait GuardStage: Send + Sync {
    fn check(&self, headers: &HeaderMap) -> Result<(), AccessError>;
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Coarse cross-site check. Both headers are client supplied, so this only
/// keeps honest browsers on other sites out.
#[derive(Debug, Clone)]
pub struct OriginCheck {
    pub allowed_origin: String,
    pub allowed_referer_prefix: String,
}

impl GuardStage for OriginCheck {
    fn check(&self, headers: &HeaderMap) -> Result<(), AccessError> {
        if header(headers, "origin").is_some_and(|o| o == self.allowed_origin) {
            return Ok(());
        }
        if header(headers, "referer").is_some_and(|r| r.starts_with(&self.allowed_referer_prefix)) {
            return Ok(());
        }
        Err(AccessError::Forbidden)
    }
}

#[derive(Debug, Clone)]
pub struct ApiKeyCheck {
    pub expected: String,
}

impl GuardStage for ApiKeyCheck {
    fn check(&self, headers: &HeaderMap) -> Result<(), AccessError> {
        // Raw bytes: keys outside visible ascii still get compared.
        let provided = headers
            .get(API_KEY_HEADER)
            .map(HeaderValue::as_bytes)
            .unwrap_or_default();
        if provided.is_empty() {
            return Err(AccessError::KeyRequired);
        }
        if !constant_time_eq(provided, self.expected.as_bytes()) {
            return Err(AccessError::KeyInvalid);
        }
        Ok(())
    }
}

/// Equality whose running time depends only on the lengths of the inputs.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub struct Guard {
    bypass_prefix: String,
    stages: Vec<Box<dyn GuardStage>>,
}

impl Guard {
    pub fn new(bypass_prefix: impl Into<String>, stages: Vec<Box<dyn GuardStage>>) -> Self {
        Self {
            bypass_prefix: bypass_prefix.into(),
            stages,
        }
    }

    /// Origin first, then key.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            STATIC_PREFIX,
            vec![
                Box::new(OriginCheck {
                    allowed_origin: config.allowed_origin.clone(),
                    allowed_referer_prefix: config.allowed_referer_prefix.clone(),
                }),
                Box::new(ApiKeyCheck {
                    expected: config.api_key.clone(),
                }),
            ],
        )
    }

    /// First failing stage wins; later stages are not consulted.
    pub fn evaluate(&self, path: &str, headers: &HeaderMap) -> Result<(), AccessError> {
        if path.starts_with(&self.bypass_prefix) {
            return Ok(());
        }
        self.stages.iter().try_for_each(|stage| stage.check(headers))
    }
}

pub async fn enforce(State(guard): State<Arc<Guard>>, req: Request, next: Next) -> Response {
    // Nested services see a stripped uri; match on what the client sent.
    let path = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_string(),
        None => req.uri().path().to_string(),
    };
    match guard.evaluate(&path, req.headers()) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            tracing::debug!(%path, reason = %err, "request denied");
            ApiError::from(err).into_response()
        }
    }
}
