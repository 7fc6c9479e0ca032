use serde::{Deserialize, Serialize};

use crate::catalog::{Institution, IntakeCalendar};

/// In-progress lead form contents. Field names follow the form's wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub state: String,
    pub course: String,
    pub intake_year: String,
    pub consent: bool,
}

impl LeadDraft {
    /// Empty draft preselecting the first course and the earliest intake year.
    pub fn defaults_for(institution: &Institution, calendar: &IntakeCalendar) -> Self {
        Self {
            course: institution.default_course().unwrap_or_default().to_string(),
            intake_year: calendar.default_year().unwrap_or_default().to_string(),
            ..Self::default()
        }
    }
}

/// Body posted to the intake endpoint: the draft plus the institution display name.
#[derive(Debug, Serialize)]
pub struct LeadPayload<'a> {
    #[serde(flatten)]
    pub draft: &'a LeadDraft,
    pub university: &'a str,
}

/// Lifecycle of a form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Submitting => "Submitting",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
