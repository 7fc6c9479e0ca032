use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::brochure::Brochure;
use super::domain::{LeadDraft, LeadPayload, SubmissionStatus};
use super::intake::IntakeGateway;
use super::sink::BrochureSink;
use super::validation::{DraftValidator, ValidationFailure};
use crate::catalog::{Institution, IntakeCalendar};

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Form not configured by developer. Please provide an API endpoint.";
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed. Please try again later.";
pub const SUBMISSION_SUCCEEDED_MESSAGE: &str = "Thank you! Your brochure is downloading.";

/// Result of a submit attempt that the session accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The intake service recorded the lead. `brochure` is where the brochure went,
    /// or `None` when the sink could not store it.
    Accepted { brochure: Option<String> },
    /// The draft broke a rule; the session kept its status.
    Invalid(ValidationFailure),
    /// No intake endpoint is configured; nothing was sent.
    NotConfigured,
    /// The intake service could not be reached or refused the lead.
    Failed,
    /// The session was closed while the request was in flight.
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("a submission is already in progress")]
    InFlight,
    #[error("form session is closed")]
    Closed,
}

/// Point-in-time view of a form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub institution: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub draft: LeadDraft,
}

#[derive(Debug)]
struct SessionState {
    draft: LeadDraft,
    status: SubmissionStatus,
    message: Option<String>,
    // Bumped on every status change; a revert timer only fires for the epoch it was armed in.
    epoch: u64,
    closed: bool,
    revert: Option<JoinHandle<()>>,
}

impl SessionState {
    fn cancel_revert(&mut self) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
    }

    fn transition(&mut self, status: SubmissionStatus, message: Option<&str>) -> u64 {
        self.cancel_revert();
        self.epoch += 1;
        self.status = status;
        self.message = message.map(str::to_string);
        self.epoch
    }
}

/// One lead form bound to an institution.
///
/// The session owns the draft and the status machine
/// `idle -> submitting -> succeeded | failed`; terminal states fall back to idle after
/// `status_reset` unless a newer submission supersedes them.
#[derive(Debug)]
pub struct LeadFormSession {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    institution: Arc<Institution>,
    calendar: IntakeCalendar,
    status_reset: Duration,
    gateway: Arc<dyn IntakeGateway>,
    sink: Arc<dyn BrochureSink>,
    state: Arc<Mutex<SessionState>>,
}

impl LeadFormSession {
    pub fn new(
        institution: Arc<Institution>,
        calendar: IntakeCalendar,
        status_reset: Duration,
        gateway: Arc<dyn IntakeGateway>,
        sink: Arc<dyn BrochureSink>,
    ) -> Self {
        let state = SessionState {
            draft: LeadDraft::defaults_for(&institution, &calendar),
            status: SubmissionStatus::Idle,
            message: None,
            epoch: 0,
            closed: false,
            revert: None,
        };

        let inner = SessionInner {
            institution,
            calendar,
            status_reset,
            gateway,
            sink,
            state: Arc::new(Mutex::new(state)),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn institution(&self) -> &Institution {
        &self.inner.institution
    }

    pub fn calendar(&self) -> &IntakeCalendar {
        &self.inner.calendar
    }

    pub fn status(&self) -> SubmissionStatus {
        self.inner.lock().status
    }

    pub fn message(&self) -> Option<String> {
        self.inner.lock().message.clone()
    }

    pub fn draft(&self) -> LeadDraft {
        self.inner.lock().draft.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock();
        SessionSnapshot {
            institution: self.inner.institution.slug.clone(),
            status: state.status,
            message: state.message.clone(),
            draft: state.draft.clone(),
        }
    }

    /// Applies an edit to the draft. Edits while idle clear a pending validation message.
    pub fn update_draft<F>(&self, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut LeadDraft),
    {
        let mut state = self.inner.lock();
        if state.closed {
            return Err(SessionError::Closed);
        }

        edit(&mut state.draft);
        if state.status == SubmissionStatus::Idle {
            state.message = None;
        }
        Ok(())
    }

    pub fn replace_draft(&self, draft: LeadDraft) -> Result<(), SessionError> {
        self.update_draft(|current| *current = draft)
    }

    /// Runs the submission workflow for the current draft.
    ///
    /// Validation is re-run on every call. Only one request is in flight at a time; a
    /// second call while submitting returns [`SessionError::InFlight`].
    ///
    /// The request runs on its own task, so dropping the returned future does not
    /// strand the session in `submitting`: the attempt still settles and arms the
    /// revert timer.
    pub async fn submit(&self) -> Result<SubmitOutcome, SessionError> {
        let inner = &self.inner;
        let (draft, epoch) = {
            let mut state = inner.lock();
            if state.closed {
                return Err(SessionError::Closed);
            }
            if state.status == SubmissionStatus::Submitting {
                return Err(SessionError::InFlight);
            }

            if !inner.gateway.endpoint().is_configured() {
                warn!(
                    institution = %inner.institution.slug,
                    "lead intake endpoint not configured; refusing submission"
                );
                inner.settle(&mut state, SubmissionStatus::Failed, NOT_CONFIGURED_MESSAGE);
                return Ok(SubmitOutcome::NotConfigured);
            }

            let validator = DraftValidator::new(&inner.institution, &inner.calendar);
            if let Err(failure) = validator.validate(&state.draft) {
                debug!(institution = %inner.institution.slug, ?failure, "draft rejected");
                state.message = Some(failure.to_string());
                return Ok(SubmitOutcome::Invalid(failure));
            }

            let epoch = state.transition(SubmissionStatus::Submitting, None);
            (state.draft.clone(), epoch)
        };

        let attempt = {
            let inner = Arc::clone(inner);
            tokio::spawn(async move { inner.deliver(draft, epoch).await })
        };

        match attempt.await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(
                    institution = %inner.institution.slug,
                    error = %err,
                    "submission task did not finish"
                );
                let mut state = inner.lock();
                if !state.closed && state.epoch == epoch {
                    inner.settle(&mut state, SubmissionStatus::Failed, SUBMISSION_FAILED_MESSAGE);
                }
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    /// Stops the session: pending timers are cancelled and late results are dropped.
    pub fn close(&self) {
        let mut state = self.inner.lock();
        state.closed = true;
        state.cancel_revert();
    }
}

impl SessionInner {
    /// Sends the draft and settles the attempt armed at `epoch`.
    async fn deliver(&self, draft: LeadDraft, epoch: u64) -> SubmitOutcome {
        let payload = LeadPayload {
            draft: &draft,
            university: &self.institution.name,
        };
        let result = self.gateway.submit(&payload).await;

        if self.superseded(epoch) {
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                // Sinks may touch the filesystem; the state lock stays released meanwhile.
                let brochure = Brochure::for_institution(&self.institution);
                let location = match self.sink.deliver(&brochure) {
                    Ok(location) => Some(location),
                    Err(err) => {
                        warn!(error = %err, filename = %brochure.filename, "brochure not saved");
                        None
                    }
                };

                let mut state = self.lock();
                if state.closed || state.epoch != epoch {
                    debug!(
                        institution = %self.institution.slug,
                        "form session closed while the brochure was saved"
                    );
                    return SubmitOutcome::Discarded;
                }
                state.draft = LeadDraft::defaults_for(&self.institution, &self.calendar);
                self.settle(
                    &mut state,
                    SubmissionStatus::Succeeded,
                    SUBMISSION_SUCCEEDED_MESSAGE,
                );
                info!(institution = %self.institution.slug, "lead accepted by intake");
                SubmitOutcome::Accepted { brochure: location }
            }
            Err(err) => {
                error!(
                    institution = %self.institution.slug,
                    error = %err,
                    "lead submission failed"
                );
                let mut state = self.lock();
                if state.closed || state.epoch != epoch {
                    return SubmitOutcome::Discarded;
                }
                self.settle(&mut state, SubmissionStatus::Failed, SUBMISSION_FAILED_MESSAGE);
                SubmitOutcome::Failed
            }
        }
    }

    fn superseded(&self, epoch: u64) -> bool {
        let state = self.lock();
        if state.closed || state.epoch != epoch {
            debug!(
                institution = %self.institution.slug,
                "form session closed before intake responded; dropping result"
            );
            return true;
        }
        false
    }

    /// Enters a terminal status and arms the timer that returns the session to idle.
    fn settle(&self, state: &mut SessionState, status: SubmissionStatus, message: &str) {
        let epoch = state.transition(status, Some(message));
        let shared = Arc::clone(&self.state);
        let delay = self.status_reset;

        state.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = shared.lock().expect("session mutex poisoned");
            if state.closed || state.epoch != epoch {
                return;
            }
            state.epoch += 1;
            state.status = SubmissionStatus::Idle;
            state.message = None;
            state.revert = None;
        }));
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("session mutex poisoned")
    }
}

impl Drop for LeadFormSession {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.closed = true;
            state.cancel_revert();
        }
    }
}
