//! # Routes
//!
//! Router assembly and the validate handler. The handler only does
//! content negotiation and the caller-level preconditions; the engine
//! does the rest.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use veridoc_engine::{ValidationRequest, ValidationResponse};

use crate::{AppError, AppState};

const UNSUPPORTED_CONTENT_TYPE: &str = "Unsupported Content-Type. Supported types are \"application/json\" and \"application/x-yaml\".";
const NO_DATA_PROVIDED: &str = "No data provided. Please supply valid YAML or JSON.";
const UNKNOWN_DATA_TYPE: &str =
    "Provided data is neither valid JSON nor YAML. Please check if your YAML/JSON is correct.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/validate", post(validate))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn validate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ValidationResponse>, AppError> {
    let request = parse_request(&headers, &body)?;

    if request.data.trim().is_empty() {
        return Err(AppError::BadRequest(NO_DATA_PROVIDED.to_string()));
    }
    if veridoc_core::is_unknown(request.data.as_bytes()) {
        return Err(AppError::UnsupportedMediaType(UNKNOWN_DATA_TYPE.to_string()));
    }

    let engine = state.engine().clone();
    let response = tokio::task::spawn_blocking(move || engine.validate(&request))
        .await
        .map_err(|err| AppError::Internal(format!("validation task failed: {err}")))?;

    Ok(Json(response))
}

fn parse_request(headers: &HeaderMap, body: &Bytes) -> Result<ValidationRequest, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        serde_json::from_slice(body)
            .map_err(|err| AppError::BadRequest(format!("Invalid JSON body: {err}")))
    } else if content_type.starts_with("application/x-yaml") {
        serde_yaml::from_slice(body)
            .map_err(|err| AppError::BadRequest(format!("Invalid YAML body: {err}")))
    } else {
        Err(AppError::UnsupportedMediaType(
            UNSUPPORTED_CONTENT_TYPE.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        map
    }

    #[test]
    fn json_bodies_deserialize() {
        let body = Bytes::from_static(br#"{"data": "a: 1"}"#);
        let request = parse_request(&headers("application/json"), &body).unwrap();
        assert_eq!(request.data, "a: 1");
    }

    #[test]
    fn yaml_bodies_deserialize() {
        let body = Bytes::from_static(b"data: |\n  a: 1\n");
        let request = parse_request(&headers("application/x-yaml"), &body).unwrap();
        assert_eq!(request.data, "a: 1\n");
    }

    #[test]
    fn other_content_types_are_rejected() {
        let body = Bytes::from_static(b"data");
        let err = parse_request(&headers("text/plain"), &body).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn empty_data_is_a_bad_request() {
        let state = AppState::new();
        let body = Bytes::from_static(br#"{"data": "  "}"#);
        let err = validate(State(state), headers("application/json"), body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_data_type_is_rejected_before_validation() {
        let state = AppState::new();
        let body = Bytes::from_static(br#"{"data": "not valid json or yaml: ["}"#);
        let err = validate(State(state), headers("application/json"), body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[tokio::test]
    async fn valid_request_runs_the_engine() {
        let state = AppState::new();
        let body = Bytes::from_static(br#"{"data": "name: John\n"}"#);
        let Json(response) = validate(State(state), headers("application/json"), body)
            .await
            .unwrap();
        assert!(response.validation_summary.valid);
        assert_eq!(response.validation_summary.validation_data_type, "YAML");
    }
}
