//! Business logic services

pub mod bookings;
pub mod submission;
pub mod validation;

use std::{sync::Arc, time::Duration};

use crate::{config::BookingConfig, store::DocumentStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub bookings: bookings::BookingsService,
}

impl Services {
    /// Create all services on top of the given document store
    pub fn new(store: Arc<dyn DocumentStore>, booking_config: &BookingConfig) -> Self {
        Self {
            bookings: bookings::BookingsService::new(
                store,
                Duration::from_secs(booking_config.dismiss_after_secs),
            ),
        }
    }
}
