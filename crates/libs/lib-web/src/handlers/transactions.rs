//! # Transaction Handlers
//!
//! Transaction CRUD and the multi-filter search. Single-row responses use the
//! `{"message", "data"}` envelope.

use super::{check_references, References};
use crate::extract::{IdPath, ValidatedJson, ValidatedQuery};
use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_core::dto::{PageQuery, TransactionRequest, TransactionResponse, TransactionSearchQuery};
use lib_core::model::store::models::{Transaction, TransactionForUpdate};
use lib_core::model::store::TransactionRepository;
use lib_core::{AppError, DbPool, FieldErrors, Page, Result};
use tracing::{debug, info, instrument};

fn not_found() -> AppError {
    AppError::NotFound("Transaction not found".to_string())
}

async fn check_transaction_references(pool: &DbPool, req: &TransactionRequest) -> Result<()> {
    let mut errors = FieldErrors::new();
    check_references(
        pool,
        References {
            user_id: req.user_id,
            wallet_id: req.wallet_id,
            ..Default::default()
        },
        &mut errors,
    )
    .await?;
    errors.into_result()
}

/// `GET /transactions`
#[instrument(skip(pool))]
pub async fn list_transactions(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Page<Transaction>>> {
    Ok(Json(TransactionRepository::list(&pool, query.page_request()).await?))
}

/// `POST /transactions` - every field is optional; gaps get defaults.
#[instrument(skip(pool, req))]
pub async fn create_transaction(
    State(pool): State<DbPool>,
    ValidatedJson(req): ValidatedJson<TransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>)> {
    check_transaction_references(&pool, &req).await?;

    let transaction = TransactionRepository::create(&pool, req.into_model()).await?;
    info!(
        "[TRANSACTIONS]  Created transaction {} ({} {})",
        transaction.id, transaction.kind, transaction.amount
    );

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::new(
            "Transaction created successfully",
            transaction,
        )),
    ))
}

#[instrument(skip(pool))]
pub async fn get_transaction(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
) -> Result<Json<TransactionResponse>> {
    let transaction = TransactionRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(TransactionResponse::new(
        "Transaction retrieved successfully",
        transaction,
    )))
}

#[instrument(skip(pool, req))]
pub async fn update_transaction(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<TransactionRequest>,
) -> Result<Json<TransactionResponse>> {
    if TransactionRepository::find_by_id(&pool, id).await?.is_none() {
        return Err(not_found());
    }
    check_transaction_references(&pool, &req).await?;

    let transaction = TransactionRepository::update(&pool, id, TransactionForUpdate::from(req)).await?;
    info!("[TRANSACTIONS]  Updated transaction {}", id);

    Ok(Json(TransactionResponse::new(
        "Transaction updated successfully",
        transaction,
    )))
}

#[instrument(skip(pool))]
pub async fn delete_transaction(
    State(pool): State<DbPool>,
    IdPath(id): IdPath,
) -> Result<StatusCode> {
    if !TransactionRepository::delete(&pool, id).await? {
        return Err(not_found());
    }

    info!("[TRANSACTIONS]  Deleted transaction {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /transactions/search`
///
/// Filters: `id`, `min_amount`, `max_amount`, `start_date`, `end_date`,
/// `status`, `type`, `description`. Sorted by `sort_by` (default
/// `created_at`) in `sort_order` (default `desc`).
#[instrument(skip(pool))]
pub async fn search_transactions(
    State(pool): State<DbPool>,
    ValidatedQuery(query): ValidatedQuery<TransactionSearchQuery>,
) -> Result<Json<Page<Transaction>>> {
    let (sort, direction) = query.sort();
    let page = TransactionRepository::search(
        &pool,
        &query.filter(),
        sort,
        direction,
        query.page_request(),
    )
    .await?;

    debug!("[TRANSACTIONS] Search matched {} rows", page.total);
    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn amounts(body: &Value) -> Vec<f64> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["amount"].as_f64().unwrap())
            .collect()
    }

    async fn seed(app: &TestApp, token: &str) {
        for (amount, kind, status, description) in [
            (100.0, "deposit", "completed", "Salary for March"),
            (25.0, "withdrawal", "pending", "ATM cash"),
            (60.0, "deposit", "failed", "Refund"),
            (300.0, "transfer", "completed", "Rent"),
            (5.0, "withdrawal", "completed", "Coffee"),
        ] {
            let (status_code, _) = app
                .send(
                    "POST",
                    "/transactions",
                    Some(token),
                    Some(json!({
                        "amount": amount,
                        "type": kind,
                        "status": status,
                        "description": description,
                    })),
                )
                .await;
            assert_eq!(status_code, StatusCode::CREATED);
        }
    }

    #[tokio::test]
    async fn test_create_transaction_defaults() {
        // Arrange
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;

        // Act
        let (status, body) = app
            .send("POST", "/transactions", Some(&token), Some(json!({})))
            .await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Transaction created successfully");
        assert_eq!(body["data"]["type"], "deposit");
        assert_eq!(body["data"]["status"], "completed");
        assert_eq!(body["data"]["currency"], "NGN");
        assert_eq!(body["data"]["amount"], 0.0);
    }

    #[tokio::test]
    async fn test_create_transaction_unknown_references() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;

        let (status, body) = app
            .send(
                "POST",
                "/transactions",
                Some(&token),
                Some(json!({"user_id": 9999, "wallet_id": 9999, "amount": 1})),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["user_id"][0], "The selected user id is invalid.");
        assert_eq!(body["errors"]["wallet_id"][0], "The selected wallet id is invalid.");
    }

    #[tokio::test]
    async fn test_transaction_crud() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;
        let (_, created) = app
            .send(
                "POST",
                "/transactions",
                Some(&token),
                Some(json!({"amount": 40, "description": "Groceries"})),
            )
            .await;
        let uri = format!("/transactions/{}", created["data"]["id"]);

        let (status, body) = app.send("GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Transaction retrieved successfully");
        assert_eq!(body["data"]["description"], "Groceries");

        let (status, body) = app
            .send(
                "PUT",
                &uri,
                Some(&token),
                Some(json!({"status": "reversed", "type": "refund"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Transaction updated successfully");
        assert_eq!(body["data"]["status"], "reversed");
        assert_eq!(body["data"]["type"], "refund");
        assert_eq!(body["data"]["amount"], 40.0);

        let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app.send("GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Transaction not found");
    }

    #[tokio::test]
    async fn test_search_without_filters_is_newest_first() {
        // Arrange
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;
        seed(&app, &token).await;

        // Act
        let (status, body) = app
            .send("GET", "/transactions/search", Some(&token), None)
            .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 5);
        assert_eq!(amounts(&body), vec![5.0, 300.0, 60.0, 25.0, 100.0]);
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;
        seed(&app, &token).await;

        let (_, body) = app
            .send(
                "GET",
                "/transactions/search?sort_by=id&sort_order=asc&per_page=2&page=2",
                Some(&token),
                None,
            )
            .await;

        assert_eq!(amounts(&body), vec![60.0, 300.0]);
        assert_eq!(body["current_page"], 2);
        assert_eq!(body["last_page"], 3);
        assert_eq!(body["per_page"], 2);
        assert_eq!(body["total"], 5);
    }

    #[tokio::test]
    async fn test_search_filters() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;
        seed(&app, &token).await;

        let (_, body) = app
            .send(
                "GET",
                "/transactions/search?min_amount=25&max_amount=100&sort_by=amount&sort_order=asc",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(amounts(&body), vec![25.0, 60.0, 100.0]);

        let (_, body) = app
            .send(
                "GET",
                "/transactions/search?type=withdrawal&status=completed",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(amounts(&body), vec![5.0]);

        let (_, body) = app
            .send("GET", "/transactions/search?description=salary", Some(&token), None)
            .await;
        assert_eq!(amounts(&body), vec![100.0]);

        let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let (_, body) = app
            .send(
                "GET",
                &format!("/transactions/search?start_date={today}&end_date={today}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(body["total"], 5);

        let (_, body) = app
            .send(
                "GET",
                "/transactions/search?start_date=2000-01-01&end_date=2000-12-31",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_search_rejects_bad_input() {
        let app = TestApp::new().await;
        let (_, token) = app.register_and_login("Alice", "alice@example.com").await;

        let (status, body) = app
            .send(
                "GET",
                "/transactions/search?start_date=2024-05-10&end_date=2024-05-01",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["errors"]["end_date"][0],
            "The end date field must be a date after or equal to start date."
        );

        let (status, _) = app
            .send("GET", "/transactions/search?start_date=yesterday", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .send("GET", "/transactions/search?sort_by=secret", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
