//! Shared fixtures for the `#[cfg(test)]` suites.

use std::sync::Arc;

use actix_web::http::header;
use actix_web::web;

use crate::config::app_config::AppConfig;
use crate::db::store::QrCodeStore;
use crate::state::app_state::AppState;
use crate::utils::jwt::create_token;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        mongodb_uri: "mongodb://unused".to_string(),
        database_name: "qr_studio_test".to_string(),
        base_url: "https://qr.test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        cors_origins: Vec::new(),
        short_code_attempts: 3,
    }
}

pub fn test_state(store: Arc<dyn QrCodeStore>) -> web::Data<AppState> {
    web::Data::new(AppState::new(store, test_config()))
}

/// `Authorization` header for a token whose subject is `owner_id`.
pub fn bearer(owner_id: &str) -> (header::HeaderName, String) {
    let token = create_token(TEST_SECRET, owner_id, chrono::Duration::hours(1)).unwrap();
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
