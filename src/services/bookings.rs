//! Bookings service

use std::{sync::Arc, time::Duration};

use super::submission::{SubmissionFlow, SubmitError};
use crate::{
    models::BookingRequest,
    store::{DocumentStore, RecordId},
};

/// Result of an accepted booking
#[derive(Debug, Clone)]
pub struct SubmittedBooking {
    pub id: RecordId,
    pub message: String,
    pub dismiss_after: Duration,
}

#[derive(Clone)]
pub struct BookingsService {
    store: Arc<dyn DocumentStore>,
    dismiss_after: Duration,
}

impl BookingsService {
    pub fn new(store: Arc<dyn DocumentStore>, dismiss_after: Duration) -> Self {
        Self { store, dismiss_after }
    }

    /// Fresh flow with an empty draft
    pub fn flow(&self) -> SubmissionFlow {
        SubmissionFlow::new(self.store.clone(), self.dismiss_after)
    }

    /// Run a complete draft through its own submission flow
    pub async fn submit(&self, draft: BookingRequest) -> Result<SubmittedBooking, SubmitError> {
        let mut flow = self.flow();
        flow.fill(draft);
        let id = flow.submit().await?;

        Ok(SubmittedBooking {
            id,
            message: flow.feedback().unwrap_or_default().to_string(),
            dismiss_after: flow.dismiss_after(),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::submission::SUCCESS_MESSAGE,
        services::validation::ValidationError,
        store::{MemoryStore, Value},
    };

    fn service(store: Arc<MemoryStore>) -> BookingsService {
        BookingsService::new(store, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_submit_stores_normalized_record() {
        let store = Arc::new(MemoryStore::new());
        let draft = BookingRequest {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            reg: "ab12 cde".to_string(),
            preferred_date: "2024-06-01".to_string(),
            consent: true,
            ..Default::default()
        };

        let submitted = service(store.clone()).submit(draft).await.unwrap();
        assert_eq!(submitted.message, SUCCESS_MESSAGE);
        assert_eq!(submitted.dismiss_after, Duration::from_secs(5));

        let records = store.records("bookings");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, submitted.id);
        assert_eq!(records[0].1["reg"], Value::from("AB12 CDE"));
    }

    #[tokio::test]
    async fn test_submit_rejects_incomplete_draft() {
        let store = Arc::new(MemoryStore::new());
        let err = service(store.clone())
            .submit(BookingRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Validation(ValidationError::MissingRequired)));
        assert_eq!(store.calls(), 0);
    }
}
