use std::sync::Arc;

use crate::config::app_config::AppConfig;
use crate::db::store::QrCodeStore;

pub struct AppState {
    pub store: Arc<dyn QrCodeStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn QrCodeStore>, config: AppConfig) -> Self {
        Self { store, config }
    }
}
