//! Autospec Booking
//!
//! Intake service for vehicle workshop bookings: validates customer and
//! vehicle details and writes each accepted request as one new document in
//! the `bookings` collection of a document store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire services on top of an already constructed document store
    pub fn new(config: AppConfig, store: Arc<dyn store::DocumentStore>) -> Self {
        let services = services::Services::new(store, &config.booking);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
