//! Lead capture: draft validation, brochure generation and the form submission workflow.

pub mod brochure;
pub mod domain;
pub mod intake;
pub mod session;
pub mod sink;
pub mod validation;

#[cfg(test)]
mod tests;

pub use brochure::{format_fee_range, format_inr, render_brochure, Brochure};
pub use domain::{LeadDraft, LeadPayload, SubmissionStatus};
pub use intake::{HttpIntakeGateway, IntakeError, IntakeGateway};
pub use session::{
    LeadFormSession, SessionError, SessionSnapshot, SubmitOutcome, NOT_CONFIGURED_MESSAGE,
    SUBMISSION_FAILED_MESSAGE, SUBMISSION_SUCCEEDED_MESSAGE,
};
pub use sink::{BrochureSink, DirectorySink, MemorySink, SinkError};
pub use validation::{validate_draft, DraftValidator, ValidationFailure};
