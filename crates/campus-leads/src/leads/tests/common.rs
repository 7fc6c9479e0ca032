use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::catalog::{Catalog, IntakeCalendar};
use crate::config::IntakeEndpoint;
use crate::leads::domain::{LeadDraft, LeadPayload, SubmissionStatus};
use crate::leads::intake::{IntakeError, IntakeGateway};
use crate::leads::session::LeadFormSession;
use crate::leads::sink::MemorySink;

pub(super) const STATUS_RESET: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub(super) enum Reply {
    Accept,
    Reject(u16),
}

#[derive(Debug)]
pub(super) struct RecordingGateway {
    endpoint: IntakeEndpoint,
    reply: Mutex<Reply>,
    requests: Mutex<Vec<Value>>,
    gate: Option<Notify>,
}

impl RecordingGateway {
    fn build(endpoint: IntakeEndpoint, reply: Reply, gate: Option<Notify>) -> Self {
        Self {
            endpoint,
            reply: Mutex::new(reply),
            requests: Mutex::new(Vec::new()),
            gate,
        }
    }

    fn configured() -> IntakeEndpoint {
        IntakeEndpoint::Configured("https://intake.example.test/leads".to_string())
    }

    pub(super) fn accepting() -> Self {
        Self::build(Self::configured(), Reply::Accept, None)
    }

    pub(super) fn rejecting(status: u16) -> Self {
        Self::build(Self::configured(), Reply::Reject(status), None)
    }

    pub(super) fn unconfigured() -> Self {
        Self::build(IntakeEndpoint::Unconfigured, Reply::Accept, None)
    }

    /// Accepts, but only once [`RecordingGateway::release`] is called.
    pub(super) fn gated() -> Self {
        Self::build(Self::configured(), Reply::Accept, Some(Notify::new()))
    }

    pub(super) fn set_reply(&self, reply: Reply) {
        *self.reply.lock().expect("reply mutex") = reply;
    }

    pub(super) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(super) fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("requests mutex").clone()
    }
}

#[async_trait]
impl IntakeGateway for RecordingGateway {
    fn endpoint(&self) -> &IntakeEndpoint {
        &self.endpoint
    }

    async fn submit(&self, payload: &LeadPayload<'_>) -> Result<(), IntakeError> {
        let value = serde_json::to_value(payload).expect("payload serializes");
        self.requests.lock().expect("requests mutex").push(value);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = *self.reply.lock().expect("reply mutex");
        match reply {
            Reply::Accept => Ok(()),
            Reply::Reject(status) => Err(IntakeError::Rejected {
                status,
                body: "upstream exploded".to_string(),
            }),
        }
    }
}

pub(super) fn calendar() -> IntakeCalendar {
    IntakeCalendar::starting(2026)
}

pub(super) fn session(gateway: Arc<RecordingGateway>, sink: Arc<MemorySink>) -> LeadFormSession {
    LeadFormSession::new(
        Catalog::standard().default_institution(),
        calendar(),
        STATUS_RESET,
        gateway,
        sink,
    )
}

pub(super) fn valid_draft() -> LeadDraft {
    LeadDraft {
        full_name: "Arjun Menon".to_string(),
        email: "arjun.menon@example.com".to_string(),
        phone: "9876543210".to_string(),
        state: "Karnataka".to_string(),
        course: "MBA in Digital Marketing".to_string(),
        intake_year: "2027".to_string(),
        consent: true,
    }
}

pub(super) async fn wait_for_status(session: &LeadFormSession, status: SubmissionStatus) {
    for _ in 0..100 {
        if session.status() == status {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("session never reached {status:?}");
}
