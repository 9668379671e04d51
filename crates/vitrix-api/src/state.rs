//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use vitrix_cache::CacheManager;
use vitrix_core::config::AppConfig;
use vitrix_database::Stores;
use vitrix_push::PushGateway;
use vitrix_service::{
    AccountDirectory, NotificationDispatcher, NotificationService, ReceiptReconciler,
    RecipientResolver,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Account and message stores.
    pub stores: Stores,
    /// Notification orchestration.
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire the service graph over the given stores and gateway.
    pub fn build(config: AppConfig, stores: Stores, gateway: Arc<dyn PushGateway>) -> Self {
        let cache = CacheManager::new(&config.cache);
        let notifications = &config.notifications;

        let directory = AccountDirectory::new(
            Arc::clone(&stores.accounts),
            cache,
            notifications.directory_ttl_seconds,
        );
        let resolver = RecipientResolver::new(Arc::clone(&stores.accounts));
        let dispatcher = NotificationDispatcher::new(gateway, Arc::clone(&stores.accounts));
        let reconciler = ReceiptReconciler::new(
            Arc::clone(&stores.messages),
            directory,
            notifications.reconcile_max_attempts,
        );
        let notification_service = Arc::new(NotificationService::new(
            resolver,
            dispatcher,
            reconciler,
            Arc::clone(&stores.messages),
            notifications.clone(),
        ));

        Self {
            config: Arc::new(config),
            stores,
            notification_service,
        }
    }
}
