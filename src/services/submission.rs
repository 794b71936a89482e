//! Booking submission flow
//!
//! Holds the draft being edited and walks it through
//! `Idle -> Submitting -> Success | Error`. A success message clears itself
//! after a delay; the pending clear is an explicit [`DismissTimer`] that the
//! owner polls, so nothing fires behind the flow's back.
//!
//! `submit` takes `&mut self`, so a flow can never have two writes in
//! flight. Observers that need to see `Submitting` while the store call is
//! pending subscribe to the phase channel.

use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{sync::watch, time::Instant};

use super::validation::{validate, ValidationError};
use crate::{
    models::{BookingField, BookingRequest, FieldValue, BOOKINGS_COLLECTION},
    store::{DocumentStore, RecordId, StoreError},
};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your booking request has been sent.";
pub const FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// Upper bound for the auto-dismiss delay
pub const MAX_DISMISS_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Scheduled,
    Fired,
    Cancelled,
}

/// Pending auto-dismiss of the success message
#[derive(Debug, Clone, Copy)]
pub struct DismissTimer {
    deadline: Instant,
    state: TimerState,
}

impl DismissTimer {
    fn schedule(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: now
                .checked_add(delay)
                .unwrap_or_else(|| now + MAX_DISMISS_DELAY),
            state: TimerState::Scheduled,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    fn cancel(&mut self) {
        if self.state == TimerState::Scheduled {
            self.state = TimerState::Cancelled;
        }
    }

    /// Fire if due; returns true only on the transition to `Fired`
    fn poll(&mut self, now: Instant) -> bool {
        if self.state == TimerState::Scheduled && now >= self.deadline {
            self.state = TimerState::Fired;
            return true;
        }
        false
    }
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to create booking record: {0}")]
    Store(#[from] StoreError),
}

pub struct SubmissionFlow {
    store: Arc<dyn DocumentStore>,
    dismiss_after: Duration,
    draft: BookingRequest,
    phase: watch::Sender<Phase>,
    feedback: Option<String>,
    dismiss: Option<DismissTimer>,
}

impl SubmissionFlow {
    pub fn new(store: Arc<dyn DocumentStore>, dismiss_after: Duration) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            store,
            dismiss_after: dismiss_after.min(MAX_DISMISS_DELAY),
            draft: BookingRequest::default(),
            phase,
            feedback: None,
            dismiss: None,
        }
    }

    pub fn draft(&self) -> &BookingRequest {
        &self.draft
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Receiver that sees every phase change, including while a write is pending
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn dismiss_timer(&self) -> Option<&DismissTimer> {
        self.dismiss.as_ref()
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    /// The submit control is disabled while a write is in flight
    pub fn can_submit(&self) -> bool {
        self.phase() != Phase::Submitting
    }

    pub fn update_field(&mut self, field: BookingField, value: impl Into<FieldValue>) {
        self.draft.update_field(field, value);
    }

    /// Load a whole draft, normalizing it the same way as field-by-field input
    pub fn fill(&mut self, draft: BookingRequest) {
        self.draft.fill_from(draft);
    }

    /// Validate the draft and, if it passes, write it to the store exactly once
    pub async fn submit(&mut self) -> Result<RecordId, SubmitError> {
        self.clear_feedback();

        let record = validate(&self.draft).map(|valid| valid.to_document());
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Booking rejected: {:?}", e);
                self.set_phase(Phase::Error);
                self.feedback = Some(e.to_string());
                return Err(e.into());
            }
        };

        self.set_phase(Phase::Submitting);
        let result = self.store.create_record(BOOKINGS_COLLECTION, record).await;

        match result {
            Ok(id) => {
                tracing::info!("Booking {} created via {}", id, self.store.backend_name());
                self.set_phase(Phase::Success);
                self.feedback = Some(SUCCESS_MESSAGE.to_string());
                self.draft = BookingRequest::default();
                self.dismiss = Some(DismissTimer::schedule(Instant::now(), self.dismiss_after));
                Ok(id)
            }
            Err(e) => {
                tracing::error!("Error adding booking record: {}", e);
                self.set_phase(Phase::Error);
                self.feedback = Some(FAILURE_MESSAGE.to_string());
                Err(e.into())
            }
        }
    }

    /// Clear the success message once its timer is due
    pub fn poll_dismiss(&mut self, now: Instant) -> bool {
        let fired = self.dismiss.as_mut().is_some_and(|timer| timer.poll(now));
        if fired && self.phase() == Phase::Success {
            self.feedback = None;
            self.set_phase(Phase::Idle);
        }
        fired
    }

    fn clear_feedback(&mut self) {
        if let Some(timer) = self.dismiss.as_mut() {
            timer.cancel();
        }
        self.feedback = None;
        self.set_phase(Phase::Idle);
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase.send_replace(phase);
    }
}
