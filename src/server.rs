//! # HTTP Interface
//!
//! One GET endpoint (mounted at both `/` and `/generate`) that dispatches on
//! the `type` query parameter, renders the requested document and returns the
//! PDF bytes base64-encoded in the response body. OPTIONS answers CORS
//! preflight; every other method gets a JSON 405.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::documents::{self, DocumentKind};
use crate::fields::ClientData;
use crate::fonts::FontStore;

/// Shared per-process state: the font store resolved at startup.
#[derive(Clone)]
pub struct AppState {
    pub fonts: Arc<FontStore>,
}

/// Build the router. Allow all origins for now (you can restrict later).
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let handler = get(generate)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new()
        .route("/", handler.clone())
        .route("/generate", handler)
        .layer(cors)
        .with_state(state)
}

/// Everything the endpoint accepts, flattened into one query string.
/// All fields are optional; unknown parameters are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DocumentQuery {
    #[serde(rename = "type")]
    doc_type: Option<String>,
    logo: Option<String>,
    signature: Option<String>,
    full_name: Option<String>,
    birth_date: Option<String>,
    passport_series: Option<String>,
    passport_number: Option<String>,
    amount: Option<String>,
    term: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

impl DocumentQuery {
    fn client(&self) -> ClientData {
        ClientData {
            full_name: self.full_name.clone(),
            birth_date: self.birth_date.clone(),
            passport_series: self.passport_series.clone(),
            passport_number: self.passport_number.clone(),
            amount: self.amount.clone(),
            term: self.term.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

async fn generate(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Response {
    // An absent type falls back to the loan agreement; an unrecognized
    // value is rejected.
    let kind: DocumentKind = match query.doc_type.as_deref().unwrap_or("loan").parse() {
        Ok(kind) => kind,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid document type" })),
            )
                .into_response();
        }
    };

    // Rendering is CPU-bound and asset loading may block on the network,
    // so the whole generation runs off the async executor.
    let fonts = Arc::clone(&state.fonts);
    let rendered = tokio::task::spawn_blocking(move || {
        documents::generate(
            kind,
            &query.client(),
            query.logo.as_deref(),
            query.signature.as_deref(),
            &fonts,
        )
    })
    .await;

    let pdf = match rendered {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            eprintln!("document generation failed: {}", e);
            return generation_failed();
        }
        Err(e) => {
            eprintln!("generation task panicked: {}", e);
            return generation_failed();
        }
    };

    let body = base64::engine::general_purpose::STANDARD.encode(pdf);
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", kind.filename()),
            ),
        ],
        body,
    )
        .into_response()
}

fn generation_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Document generation failed" })),
    )
        .into_response()
}

async fn preflight() -> Response {
    (
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
        "",
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_maps_onto_client_data() {
        let query = DocumentQuery {
            full_name: Some("Иванов Иван".to_string()),
            amount: Some("1000".to_string()),
            ..Default::default()
        };
        let client = query.client();
        assert_eq!(client.full_name.as_deref(), Some("Иванов Иван"));
        assert_eq!(client.amount.as_deref(), Some("1000"));
        assert!(client.phone.is_none());
    }
}
