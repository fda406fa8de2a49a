use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::extract::{Query, Request};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;
use crate::validate::RequestFields;

pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Rejects requests with malformed status, priority, category or dueDate
/// before the handler runs. The body is buffered and handed on unchanged.
pub async fn validate_fields(request: Request, next: Next) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let query: HashMap<String, String> = Query::try_from_uri(&parts.uri)
        .map(|Query(q)| q)
        .unwrap_or_default();

    let bytes = to_bytes(body, MAX_BODY_BYTES).await.map_err(|err| {
        warn!(method = %parts.method, uri = %parts.uri, %err, "Unreadable request body");
        AppError::PayloadTooLarge
    })?;
    // Malformed JSON is left for the handler's extractor to reject.
    let json = serde_json::from_slice::<Value>(&bytes).ok();

    let fields = RequestFields::merge(query, json.as_ref());
    if let Err(err) = fields.validate() {
        warn!(method = %parts.method, uri = %parts.uri, reason = %err, "Rejected request");
        return Err(err);
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
