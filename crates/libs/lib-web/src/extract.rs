//! # Validated Extractors
//!
//! [`ValidatedJson`] and [`ValidatedQuery`] parse the request, then run the
//! type's [`RequestRules`]. Any failure becomes a 422 with
//! `{"message", "errors"}`, including bodies that are not valid JSON and query
//! strings that do not parse.
//!
//! [`IdPath`] reads a numeric `{id}` segment. An id that is not an integer
//! cannot name a row, so it is a JSON 404 like any other miss.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use lib_core::dto::RequestRules;
use lib_core::AppError;
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON body that passed its rule set.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + RequestRules,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("[EXTRACT] JSON body rejected: {}", rejection.body_text());
            AppError::field("body", rejection.body_text())
        })?;

        value.field_errors().into_result()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that passed its rule set.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + RequestRules,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("[EXTRACT] Query string rejected: {}", rejection.body_text());
                AppError::field("query", rejection.body_text())
            })?;

        value.field_errors().into_result()?;
        Ok(ValidatedQuery(value))
    }
}

/// Numeric `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("[EXTRACT] Path id rejected: {}", rejection.body_text());
                AppError::NotFound(resource_not_found(parts.uri.path()).to_string())
            })?;
        Ok(IdPath(id))
    }
}

/// Miss message for the resource a path belongs to.
fn resource_not_found(path: &str) -> &'static str {
    match path.trim_start_matches('/').split('/').next() {
        Some("users") => "User not found",
        Some("wallets") => "Wallet not found",
        Some("wallet-types") => "Wallet type not found",
        Some("transactions") => "Transaction not found",
        _ => "Not found",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::Router;
    use lib_core::dto::{PageQuery, RegisterUserRequest};
    use tower::ServiceExt;

    async fn echo_page(ValidatedQuery(q): ValidatedQuery<PageQuery>) -> String {
        format!("{}/{}", q.page_request().page, q.page_request().per_page)
    }

    async fn accept_register(ValidatedJson(_): ValidatedJson<RegisterUserRequest>) -> impl IntoResponse {
        StatusCode::NO_CONTENT
    }

    async fn echo_id(IdPath(id): IdPath) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/page", get(echo_page))
            .route("/register", post(accept_register))
            .route("/wallet-types/{id}", get(echo_id))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_query_out_of_range_is_422() {
        let response = app()
            .oneshot(Request::builder().uri("/page?per_page=500").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["errors"]["per_page"].is_array());
    }

    #[tokio::test]
    async fn test_unparseable_query_is_422() {
        let response = app()
            .oneshot(Request::builder().uri("/page?page=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_valid_query_passes() {
        let response = app()
            .oneshot(Request::builder().uri("/page?page=3&per_page=5").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"3/5");
    }

    #[tokio::test]
    async fn test_malformed_json_is_422() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert!(body["errors"]["body"].is_array());
    }

    #[tokio::test]
    async fn test_rule_failures_are_422_with_field_errors() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "Alice"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["errors"]["email"][0], "The email field is required.");
        assert_eq!(
            body["message"],
            "The email field is required. (and 1 more error)"
        );
    }

    #[tokio::test]
    async fn test_numeric_id_passes() {
        let response = app()
            .oneshot(Request::builder().uri("/wallet-types/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"42");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_json_404() {
        let response = app()
            .oneshot(Request::builder().uri("/wallet-types/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Wallet type not found");
    }

    #[test]
    fn test_resource_not_found_messages() {
        assert_eq!(resource_not_found("/users/x"), "User not found");
        assert_eq!(resource_not_found("/wallets/x/transactions"), "Wallet not found");
        assert_eq!(resource_not_found("/transactions/x"), "Transaction not found");
        assert_eq!(resource_not_found("/elsewhere/x"), "Not found");
    }
}
