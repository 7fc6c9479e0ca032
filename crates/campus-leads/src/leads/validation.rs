use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::domain::LeadDraft;
use crate::catalog::{Institution, IntakeCalendar};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$",
    )
    .expect("Invalid email regex")
});

/// First rule a draft broke. The display text is shown to the applicant as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("Please fill out all required fields.")]
    MissingRequiredFields,
    #[error("You must consent to receive information.")]
    ConsentRequired,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid 10-digit phone number.")]
    InvalidPhone,
    #[error("Please choose a course offered by this institution.")]
    UnknownCourse,
    #[error("Please choose an available intake year.")]
    UnavailableIntakeYear,
}

/// Field-level rules, checked in order: required fields, consent, email, phone.
pub fn validate_draft(draft: &LeadDraft) -> Result<(), ValidationFailure> {
    let required = [
        &draft.full_name,
        &draft.email,
        &draft.phone,
        &draft.state,
        &draft.course,
        &draft.intake_year,
    ];
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(ValidationFailure::MissingRequiredFields);
    }

    if !draft.consent {
        return Err(ValidationFailure::ConsentRequired);
    }

    if !is_valid_email(&draft.email) {
        return Err(ValidationFailure::InvalidEmail);
    }

    if !is_valid_phone(&draft.phone) {
        return Err(ValidationFailure::InvalidPhone);
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|byte| byte.is_ascii_digit())
}

/// Field rules plus the choices a specific institution offers.
#[derive(Debug, Clone, Copy)]
pub struct DraftValidator<'a> {
    institution: &'a Institution,
    calendar: &'a IntakeCalendar,
}

impl<'a> DraftValidator<'a> {
    pub fn new(institution: &'a Institution, calendar: &'a IntakeCalendar) -> Self {
        Self {
            institution,
            calendar,
        }
    }

    pub fn validate(&self, draft: &LeadDraft) -> Result<(), ValidationFailure> {
        validate_draft(draft)?;

        if self.institution.course(&draft.course).is_none() {
            return Err(ValidationFailure::UnknownCourse);
        }

        if !self.calendar.contains(&draft.intake_year) {
            return Err(ValidationFailure::UnavailableIntakeYear);
        }

        Ok(())
    }
}
