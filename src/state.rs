use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::AppConfig;
use crate::database::{ConnectionStore, MetricsSource};
use crate::session::SessionCookies;

/// Long-lived handles shared by every handler, passed in through axum state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<dyn AuthProvider>,
    pub connections: Arc<dyn ConnectionStore>,
    pub metrics: Arc<dyn MetricsSource>,
    pub cookies: SessionCookies,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        auth: Arc<dyn AuthProvider>,
        connections: Arc<dyn ConnectionStore>,
        metrics: Arc<dyn MetricsSource>,
    ) -> Self {
        let cookies = SessionCookies::new(config.session.clone());
        Self {
            config: Arc::new(config),
            auth,
            connections,
            metrics,
            cookies,
        }
    }
}
