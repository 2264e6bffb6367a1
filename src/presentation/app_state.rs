// Application state for HTTP handlers
use crate::application::polling_controller::DashboardController;
use crate::application::reading_service::ReadingService;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub reading_service: ReadingService,
    /// Present when the in-process dashboard is enabled.
    pub dashboard: Option<Arc<Mutex<DashboardController>>>,
}
