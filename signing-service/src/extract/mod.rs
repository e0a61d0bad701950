//! Request extractors shared by the document handlers.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use service_core::error::AppError;
use validator::Validate;

/// Local document id taken from the `:id` path segment.
///
/// A segment that is not an integer can never name a document, so it is answered like
/// any other unknown id.
#[derive(Debug, Clone, Copy)]
pub struct DocumentId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for DocumentId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejecting malformed document id");
                AppError::NotFound("Document".to_string())
            })?;

        Ok(DocumentId(id))
    }
}

/// Payloads that declare which top-level fields must be present and non-empty.
pub trait RequiredFields {
    const REQUIRED: &'static [&'static str];
}

/// JSON body extractor that rejects missing or empty required fields before the payload
/// is deserialized, then runs `validator` checks.
///
/// Route method matching happens first (405), then this check (400), then the handler.
/// An empty body, or one sent without a JSON content type, is checked as `{}`.
#[derive(Debug, Clone)]
pub struct RequiredJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for RequiredJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + RequiredFields,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;

        let value = if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid data: {}", e)))?
        };

        let missing = missing_fields(&value, T::REQUIRED);
        if !missing.is_empty() {
            tracing::debug!(missing = ?missing, "Rejecting request with missing fields");
            return Err(AppError::MissingFields(missing));
        }

        let payload: T = serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid data: {}", e)))?;
        payload.validate()?;

        Ok(Self(payload))
    }
}

/// `application/json` or any `+json` media type, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|media| {
            let media = media.trim().to_ascii_lowercase();
            media == "application/json" || media.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Required fields that are absent or falsy, in declaration order.
pub fn missing_fields(body: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| body.get(**field).map_or(true, is_blank))
        .map(|field| field.to_string())
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
