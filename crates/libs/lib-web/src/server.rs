//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`create_router`] builds the full application from an [`AppState`], so tests
//! drive exactly the router that production serves.

// region: --- Imports
use crate::handlers::{auth, transactions, users, wallet_types, wallets};
use crate::middleware::{log_requests, require_auth, stamp_req, RequestStamp};
use crate::services::mailer::{LogMailer, Mailer};
use axum::{
    middleware,
    routing::{any, get, post, put},
    Router,
};
use lib_core::{create_pool, migrate, AppError, Config, DbPool};
use lib_utils::get_env_or;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn Mailer> {
    fn from_ref(state: &AppState) -> Self {
        state.mailer.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read `BIND_ADDRESS`, keeping the default origins.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: get_env_or("BIND_ADDRESS", &defaults.bind_address),
            ..defaults
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - Database connection or migrations fail
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let log_level = get_env_or("LOG_LEVEL", "info").to_lowercase();

    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {
            tracing_subscriber::EnvFilter::new(&log_level)
        }
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {}", e))?;

    info!(" WALLET LEDGER BACKEND STARTING");
    info!(" Log level: {}", log_level);

    dotenvy::dotenv().ok();

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;

    info!("Connecting to database: {}", app_config.database_url);
    let pool = create_pool(&app_config.database_url).await?;

    info!(" Running database migrations...");
    migrate(&pool).await?;
    info!(" Migrations complete");

    let state = AppState {
        db: pool,
        config: app_config,
        mailer: Arc::new(LogMailer),
    };

    let app = create_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!(" SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    info!("[ROUTE SETUP] Registering HTTP routes...");
    let public = Router::new()
        .route("/users/register", post(auth::register))
        .route("/users/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/health", get(|| async { "OK" }));

    let protected = Router::new()
        // Users
        .route("/users", get(users::list_users))
        .route("/users/search", get(users::search_users))
        .route("/users/logout", any(auth::logout))
        .route("/users/change-password", put(auth::change_password))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/wallets", get(users::list_user_wallets))
        .route("/users/{id}/transactions", get(users::list_user_transactions))
        // Wallets
        .route("/wallets", get(wallets::list_wallets).post(wallets::create_wallet))
        .route("/wallets/search", get(wallets::search_wallets))
        .route(
            "/wallets/{id}",
            get(wallets::get_wallet)
                .put(wallets::update_wallet)
                .delete(wallets::delete_wallet),
        )
        .route("/wallets/{id}/transactions", get(wallets::list_wallet_transactions))
        // Wallet types
        .route(
            "/wallet-types",
            get(wallet_types::list_wallet_types).post(wallet_types::create_wallet_type),
        )
        .route("/wallet-types/search", get(wallet_types::search_wallet_types))
        .route(
            "/wallet-types/{id}",
            get(wallet_types::get_wallet_type)
                .put(wallet_types::update_wallet_type)
                .delete(wallet_types::delete_wallet_type),
        )
        // Transactions
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/transactions/search", get(transactions::search_transactions))
        .route(
            "/transactions/{id}",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            AppError::NotFound("Route not found".to_string())
        })
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] Error: {:?}, Latency: {}ms",
                            error,
                            latency.as_millis()
                        );
                    },
                ),
        )
        // Outermost after CORS so the span and the request log both see the id
        .layer(middleware::from_fn(stamp_req))
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!(" AUTH:");
    info!("   • POST /users/register");
    info!("   • POST /users/login");
    info!("   • ANY  /users/logout");
    info!("   • PUT  /users/change-password");
    info!("   • POST /forgot-password");
    info!("   • POST /reset-password");
    info!(" USERS:");
    info!("   • GET  /users, /users/search?query=&role=");
    info!("   • GET|PUT|DELETE /users/{{id}}");
    info!("   • GET  /users/{{id}}/wallets, /users/{{id}}/transactions");
    info!(" WALLETS:");
    info!("   • GET|POST /wallets, GET /wallets/search?query=");
    info!("   • GET|PUT|DELETE /wallets/{{id}}, GET /wallets/{{id}}/transactions");
    info!(" WALLET TYPES:");
    info!("   • GET|POST /wallet-types, GET /wallet-types/search?sort=&order=");
    info!("   • GET|PUT|DELETE /wallet-types/{{id}}");
    info!(" TRANSACTIONS:");
    info!("   • GET|POST /transactions, GET /transactions/search");
    info!("   • GET|PUT|DELETE /transactions/{{id}}");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
