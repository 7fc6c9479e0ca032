use chrono::{Datelike, NaiveDate};
use serde::Serialize;

const INTAKE_WINDOW_YEARS: i32 = 3;

/// Intake years a lead may apply for: the reference year and the two after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeCalendar {
    years: Vec<String>,
}

impl IntakeCalendar {
    pub fn starting(first_year: i32) -> Self {
        let years = (0..INTAKE_WINDOW_YEARS)
            .map(|offset| (first_year + offset).to_string())
            .collect();
        Self { years }
    }

    pub fn for_date(today: NaiveDate) -> Self {
        Self::starting(today.year())
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn default_year(&self) -> Option<&str> {
        self.years.first().map(String::as_str)
    }

    pub fn contains(&self, year: &str) -> bool {
        self.years.iter().any(|candidate| candidate == year)
    }
}
