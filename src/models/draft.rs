use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ServiceSelection,
    DateTimeSelection,
    ContactDetails,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::ServiceSelection => 1,
            Step::DateTimeSelection => 2,
            Step::ContactDetails => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::ServiceSelection => "Výběr Služby",
            Step::DateTimeSelection => "Datum a Čas",
            Step::ContactDetails => "Vaše Údaje",
        }
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::ServiceSelection => Some(Step::DateTimeSelection),
            Step::DateTimeSelection => Some(Step::ContactDetails),
            Step::ContactDetails => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::ServiceSelection => None,
            Step::DateTimeSelection => Some(Step::ServiceSelection),
            Step::ContactDetails => Some(Step::DateTimeSelection),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Service,
    Datetime,
    Name,
    Phone,
    Email,
    Submit,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Service => "service",
            Field::Datetime => "datetime",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Submit => "submit",
        }
    }
}

pub type FieldErrors = BTreeMap<Field, String>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

/// The in-progress booking owned by one wizard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingDraft {
    pub step: Step,
    pub selected_service_id: Option<String>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<String>,
    /// Month shown in the calendar. Independent of `selected_date`.
    pub view_date: NaiveDate,
    pub contact: ContactDetails,
    pub errors: FieldErrors,
    pub submission: SubmissionState,
}

impl BookingDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: Step::ServiceSelection,
            selected_service_id: None,
            selected_date: None,
            selected_time: None,
            view_date: today,
            contact: ContactDetails::default(),
            errors: FieldErrors::new(),
            submission: SubmissionState::Idle,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.submission == SubmissionState::Succeeded
    }
}
