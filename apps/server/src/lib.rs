pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    routing::{delete, get, post},
    Router,
};
use quiz_core::{KeyValueStore, QuestionBank, QuizSession};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::SqliteStore;
use crate::error::{ApiError, Result};
use crate::models::BankSummary;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The active session; `None` until a bank has been loaded.
    pub session: Arc<Mutex<Option<QuizSession>>>,
    pub store: Arc<dyn KeyValueStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            store,
            config: Arc::new(config),
        }
    }

    pub fn lock_session(&self) -> Result<MutexGuard<'_, Option<QuizSession>>> {
        self.session
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".to_string()))
    }

    /// Run `f` against the active session, or fail with `NoBank`.
    pub fn with_session<T>(&self, f: impl FnOnce(&mut QuizSession) -> Result<T>) -> Result<T> {
        let mut guard = self.lock_session()?;
        let session = guard.as_mut().ok_or(ApiError::NoBank)?;
        f(session)
    }

    /// Replace the active session with one over `bank`, restoring persisted progress.
    pub fn install_bank(&self, bank: QuestionBank) -> Result<BankSummary> {
        let session = QuizSession::open(bank, self.store.clone());
        let summary = BankSummary::from_session(&session);
        *self.lock_session()? = Some(session);
        Ok(summary)
    }
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Bank routes
        .route("/api/bank", get(routes::bank::summary).post(routes::bank::load))
        .route("/api/bank/reload", post(routes::bank::reload))
        // Question routes
        .route("/api/questions/current", get(routes::questions::current))
        .route("/api/questions/valid", get(routes::questions::valid))
        .route("/api/questions/:number", get(routes::questions::by_number))
        // Navigation routes
        .route("/api/navigation/next", post(routes::navigation::next))
        .route("/api/navigation/prev", post(routes::navigation::prev))
        .route("/api/navigation/jump", post(routes::navigation::jump))
        .route("/api/navigation/select", post(routes::navigation::select))
        // Answer routes
        .route(
            "/api/answers",
            post(routes::answers::submit).delete(routes::answers::reset),
        )
        .route("/api/stats", get(routes::answers::stats))
        // Settings routes
        .route(
            "/api/settings/filter",
            get(routes::settings::get_filter).put(routes::settings::update_filter),
        )
        .route("/api/settings/range", delete(routes::settings::reset_range));

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(path = %config.db_path.display(), "Opening progress database...");
    let store = SqliteStore::open(&config.db_path)?;

    let state = AppState::new(Arc::new(store), config);

    tracing::info!("Loading question bank...");
    match services::bank::load_from_files(&state.config.bank_paths).await {
        Ok(bank) => {
            state.install_bank(bank)?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "starting without a question bank");
        }
    }

    let addr = state.config.addr();
    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
