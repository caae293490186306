use std::sync::Arc;

use yamdb_mail::ConfirmationMailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Confirmation code delivery (SMTP, log-only, or an in-memory outbox in tests).
    pub mailer: Arc<dyn ConfirmationMailer>,
}
