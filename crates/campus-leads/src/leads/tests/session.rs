use super::common::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::leads::brochure::Brochure;
use crate::leads::domain::{LeadDraft, SubmissionStatus};
use crate::leads::session::{
    LeadFormSession, SessionError, SubmitOutcome, NOT_CONFIGURED_MESSAGE,
    SUBMISSION_FAILED_MESSAGE, SUBMISSION_SUCCEEDED_MESSAGE,
};
use crate::leads::sink::{BrochureSink, MemorySink, SinkError};
use crate::leads::validation::ValidationFailure;

const JUST_PAST_RESET: Duration = Duration::from_millis(5_010);

#[tokio::test(start_paused = true)]
async fn accepted_lead_downloads_brochure_and_resets_draft() {
    let gateway = Arc::new(RecordingGateway::accepting());
    let sink = Arc::new(MemorySink::default());
    let session = session(gateway.clone(), sink.clone());
    session.replace_draft(valid_draft()).expect("draft accepted");

    let outcome = session.submit().await.expect("submission runs");

    assert_eq!(
        outcome,
        SubmitOutcome::Accepted {
            brochure: Some("apex-university-brochure.txt".to_string())
        }
    );
    assert_eq!(session.status(), SubmissionStatus::Succeeded);
    assert_eq!(
        session.message().as_deref(),
        Some(SUBMISSION_SUCCEEDED_MESSAGE)
    );

    let brochure = sink.latest().expect("brochure delivered");
    assert_eq!(brochure.filename, "apex-university-brochure.txt");
    assert!(brochure
        .content
        .starts_with("# BROCHURE: APEX UNIVERSITY OF TECHNOLOGY"));

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["university"], "Apex University of Technology");
    assert_eq!(requests[0]["fullName"], "Arjun Menon");
    assert_eq!(requests[0]["intakeYear"], "2027");

    let defaults = session.draft();
    assert_eq!(defaults.course, "B.Tech in Computer Science");
    assert_eq!(defaults.intake_year, "2026");
    assert!(defaults.full_name.is_empty());
    assert!(!defaults.consent);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(session.status(), SubmissionStatus::Succeeded);

    tokio::time::sleep(Duration::from_millis(1_010)).await;
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(session.message(), None);
}

#[tokio::test(start_paused = true)]
async fn server_error_keeps_draft_and_allows_resubmission() {
    let gateway = Arc::new(RecordingGateway::rejecting(500));
    let sink = Arc::new(MemorySink::default());
    let session = session(gateway.clone(), sink.clone());
    session.replace_draft(valid_draft()).expect("draft accepted");

    let outcome = session.submit().await.expect("submission runs");

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.status(), SubmissionStatus::Failed);
    let message = session.message().expect("failure message");
    assert_eq!(message, SUBMISSION_FAILED_MESSAGE);
    assert!(!message.contains("500"));
    assert!(!message.contains("exploded"));
    assert_eq!(session.draft(), valid_draft());
    assert!(sink.latest().is_none());

    tokio::time::sleep(JUST_PAST_RESET).await;
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(session.message(), None);

    gateway.set_reply(Reply::Accept);
    let retry = session.submit().await.expect("resubmission runs");
    assert!(matches!(retry, SubmitOutcome::Accepted { .. }));
    assert_eq!(gateway.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn unconfigured_endpoint_fails_without_network() {
    let gateway = Arc::new(RecordingGateway::unconfigured());
    let session = session(gateway.clone(), Arc::new(MemorySink::default()));
    session.replace_draft(valid_draft()).expect("draft accepted");

    let outcome = session.submit().await.expect("submission runs");

    assert_eq!(outcome, SubmitOutcome::NotConfigured);
    assert_eq!(session.status(), SubmissionStatus::Failed);
    assert_eq!(session.message().as_deref(), Some(NOT_CONFIGURED_MESSAGE));
    assert!(gateway.requests().is_empty());

    tokio::time::sleep(JUST_PAST_RESET).await;
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(session.message(), None);
}

#[tokio::test(start_paused = true)]
async fn configuration_is_checked_before_the_draft() {
    let gateway = Arc::new(RecordingGateway::unconfigured());
    let session = session(gateway.clone(), Arc::new(MemorySink::default()));

    let outcome = session.submit().await.expect("submission runs");

    assert_eq!(outcome, SubmitOutcome::NotConfigured);
    assert!(gateway.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn invalid_draft_never_reaches_submitting() {
    let gateway = Arc::new(RecordingGateway::accepting());
    let session = session(gateway.clone(), Arc::new(MemorySink::default()));
    session
        .update_draft(|draft| {
            *draft = valid_draft();
            draft.full_name = "  ".to_string();
        })
        .expect("draft accepted");

    let outcome = session.submit().await.expect("submission runs");

    assert_eq!(
        outcome,
        SubmitOutcome::Invalid(ValidationFailure::MissingRequiredFields)
    );
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(
        session.message().as_deref(),
        Some("Please fill out all required fields.")
    );
    assert!(gateway.requests().is_empty());

    session
        .update_draft(|draft| draft.full_name = "Arjun Menon".to_string())
        .expect("draft accepted");
    assert_eq!(session.message(), None);
}

#[tokio::test(start_paused = true)]
async fn course_from_another_institution_is_rejected() {
    let gateway = Arc::new(RecordingGateway::accepting());
    let session = session(gateway.clone(), Arc::new(MemorySink::default()));
    session
        .update_draft(|draft| {
            *draft = valid_draft();
            draft.course = "B.A. in Film Making".to_string();
        })
        .expect("draft accepted");

    let outcome = session.submit().await.expect("submission runs");

    assert_eq!(outcome, SubmitOutcome::Invalid(ValidationFailure::UnknownCourse));
    assert!(gateway.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rejected_edit_in_failed_state_leaves_timer_running() {
    let gateway = Arc::new(RecordingGateway::rejecting(503));
    let session = session(gateway.clone(), Arc::new(MemorySink::default()));
    session.replace_draft(valid_draft()).expect("draft accepted");
    session.submit().await.expect("submission runs");
    assert_eq!(session.status(), SubmissionStatus::Failed);

    session
        .update_draft(|draft| draft.email = "a@b".to_string())
        .expect("draft accepted");
    assert_eq!(
        session.message().as_deref(),
        Some(SUBMISSION_FAILED_MESSAGE),
        "edits must not clear a failure message"
    );

    let outcome = session.submit().await.expect("submission runs");
    assert_eq!(outcome, SubmitOutcome::Invalid(ValidationFailure::InvalidEmail));
    assert_eq!(session.status(), SubmissionStatus::Failed);

    tokio::time::sleep(JUST_PAST_RESET).await;
    assert_eq!(session.status(), SubmissionStatus::Idle);
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn resubmission_cancels_pending_revert() {
    let gateway = Arc::new(RecordingGateway::rejecting(502));
    let session = session(gateway.clone(), Arc::new(MemorySink::default()));
    session.replace_draft(valid_draft()).expect("draft accepted");
    session.submit().await.expect("first submission runs");
    assert_eq!(session.status(), SubmissionStatus::Failed);

    tokio::time::sleep(Duration::from_secs(3)).await;
    gateway.set_reply(Reply::Accept);
    session.submit().await.expect("second submission runs");
    assert_eq!(session.status(), SubmissionStatus::Succeeded);

    // The first failure's timer would have fired here.
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(session.status(), SubmissionStatus::Succeeded);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(session.status(), SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn second_submit_while_in_flight_is_rejected() {
    let gateway = Arc::new(RecordingGateway::gated());
    let session = Arc::new(session(gateway.clone(), Arc::new(MemorySink::default())));
    session.replace_draft(valid_draft()).expect("draft accepted");

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit().await })
    };
    wait_for_status(&session, SubmissionStatus::Submitting).await;

    match session.submit().await {
        Err(SessionError::InFlight) => {}
        other => panic!("expected in-flight rejection, got {other:?}"),
    }

    gateway.release();
    let outcome = pending
        .await
        .expect("task joins")
        .expect("submission runs");
    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    assert_eq!(session.status(), SubmissionStatus::Succeeded);
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn closed_session_discards_late_response() {
    let gateway = Arc::new(RecordingGateway::gated());
    let sink = Arc::new(MemorySink::default());
    let session = Arc::new(session(gateway.clone(), sink.clone()));
    session.replace_draft(valid_draft()).expect("draft accepted");

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit().await })
    };
    wait_for_status(&session, SubmissionStatus::Submitting).await;

    session.close();
    gateway.release();

    let outcome = pending
        .await
        .expect("task joins")
        .expect("submission runs");
    assert_eq!(outcome, SubmitOutcome::Discarded);
    assert!(sink.latest().is_none());
    assert_eq!(session.draft(), valid_draft());
    assert!(session.is_closed());

    assert!(matches!(
        session.update_draft(|draft| *draft = LeadDraft::default()),
        Err(SessionError::Closed)
    ));
    assert!(matches!(session.submit().await, Err(SessionError::Closed)));
}

#[tokio::test(start_paused = true)]
async fn closing_cancels_revert_timer() {
    let gateway = Arc::new(RecordingGateway::rejecting(500));
    let session = session(gateway, Arc::new(MemorySink::default()));
    session.replace_draft(valid_draft()).expect("draft accepted");
    session.submit().await.expect("submission runs");

    session.close();
    tokio::time::sleep(JUST_PAST_RESET).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, SubmissionStatus::Failed);
    assert_eq!(snapshot.institution, "apex-university");
}

#[tokio::test(start_paused = true)]
async fn abandoned_submit_still_settles_and_allows_resubmission() {
    let gateway = Arc::new(RecordingGateway::gated());
    let sink = Arc::new(MemorySink::default());
    let session = Arc::new(session(gateway.clone(), sink.clone()));
    session.replace_draft(valid_draft()).expect("draft accepted");

    let caller = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit().await })
    };
    wait_for_status(&session, SubmissionStatus::Submitting).await;

    // The caller goes away mid-request, as a disconnected HTTP client would.
    caller.abort();
    assert!(caller.await.expect_err("caller aborted").is_cancelled());

    gateway.release();
    wait_for_status(&session, SubmissionStatus::Succeeded).await;
    assert_eq!(gateway.requests().len(), 1);
    assert_eq!(
        sink.latest().map(|brochure| brochure.filename),
        Some("apex-university-brochure.txt".to_string())
    );

    tokio::time::sleep(JUST_PAST_RESET).await;
    assert_eq!(session.status(), SubmissionStatus::Idle);

    session.replace_draft(valid_draft()).expect("draft accepted");
    gateway.release();
    let outcome = session.submit().await.expect("resubmission runs");
    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    assert_eq!(gateway.requests().len(), 2);
}

/// Reads the owning session's status while delivering.
#[derive(Debug, Default)]
struct StatusReadingSink {
    session: Mutex<Option<Arc<LeadFormSession>>>,
    seen: Mutex<Option<SubmissionStatus>>,
}

impl BrochureSink for StatusReadingSink {
    fn deliver(&self, brochure: &Brochure) -> Result<String, SinkError> {
        let session = self.session.lock().expect("sink session mutex").clone();
        if let Some(session) = session {
            *self.seen.lock().expect("sink seen mutex") = Some(session.status());
        }
        Ok(brochure.filename.clone())
    }
}

#[tokio::test(start_paused = true)]
async fn brochure_sink_runs_without_the_session_lock() {
    let gateway = Arc::new(RecordingGateway::accepting());
    let sink = Arc::new(StatusReadingSink::default());
    let session = Arc::new(LeadFormSession::new(
        Catalog::standard().default_institution(),
        calendar(),
        STATUS_RESET,
        gateway,
        sink.clone(),
    ));
    *sink.session.lock().expect("sink session mutex") = Some(Arc::clone(&session));
    session.replace_draft(valid_draft()).expect("draft accepted");

    let outcome = session.submit().await.expect("submission runs");

    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    assert_eq!(
        *sink.seen.lock().expect("sink seen mutex"),
        Some(SubmissionStatus::Submitting)
    );
    assert_eq!(session.status(), SubmissionStatus::Succeeded);
    sink.session.lock().expect("sink session mutex").take();
}
