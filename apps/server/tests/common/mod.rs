//! Common test utilities and fixtures for integration tests.
//!
//! Every context runs against an in-memory SQLite store, so no external
//! services are needed.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum_test::TestServer;

use quiz_core::{KeyValueStore, QuestionBank};
use quiz_runner_server::config::Config;
use quiz_runner_server::db::SqliteStore;
use quiz_runner_server::{build_router, AppState};

/// Test context holding the application state and its backing store.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<dyn KeyValueStore>,
}

impl TestContext {
    /// Create a context with the sample bank loaded.
    pub fn new() -> Self {
        let ctx = Self::without_bank();
        ctx.load(&[fixtures::SAMPLE_BANK]);
        ctx
    }

    /// Create a context with no bank loaded.
    pub fn without_bank() -> Self {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(SqliteStore::open_in_memory().expect("Failed to open in-memory database"));
        Self::with_store(store, fixtures::test_config(vec![]))
    }

    /// Create a context over an existing store, e.g. to simulate a restart.
    pub fn with_store(store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            state: AppState::new(store.clone(), config),
            store,
        }
    }

    /// Replace the active bank.
    pub fn load(&self, documents: &[&str]) {
        let bank = QuestionBank::from_documents(documents).expect("Failed to parse test bank");
        self.state
            .install_bank(bank)
            .expect("Failed to install test bank");
    }

    /// Build a test server over the full router.
    pub fn server(&self) -> TestServer {
        TestServer::new(build_router(self.state.clone())).expect("Failed to build test server")
    }
}
