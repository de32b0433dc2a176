use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;

use crate::models::service::is_time_slot;
use crate::models::{
    BookingDraft, BookingRecord, Field, FieldErrors, Service, Step, SubmissionState,
};
use crate::services::calendar::{month_ordinal, shift_month};
use crate::services::sink::BookingSink;
use crate::services::validation::validate_contact;

pub const SERVICE_REQUIRED: &str = "selection required";
pub const DATETIME_REQUIRED: &str = "date and time required";
pub const SUBMIT_FAILED: &str = "submission failed";

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// One user input, dispatched to the wizard.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SelectService { id: String },
    Advance,
    Retreat,
    SelectDate { day: u32 },
    SelectTime { time: String },
    ChangeMonth { delta: i32 },
    SetName { value: String },
    SetPhone { value: String },
    SetEmail { value: String },
    SetMessage { value: String },
    Reset,
}

/// A submission that passed validation and is waiting for the sink.
#[derive(Debug)]
pub struct SubmitTicket {
    generation: u64,
    pub record: BookingRecord,
}

#[derive(Debug)]
pub enum SubmitStart {
    Ignored,
    Invalid(FieldErrors),
    Accepted(SubmitTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Ignored,
    Invalid(FieldErrors),
    Submitted(BookingRecord),
    SinkFailed,
}

/// The booking state machine. Every method is synchronous; the submission
/// latency lives in [`WizardHandle::submit`].
pub struct Wizard {
    draft: BookingDraft,
    clock: Arc<dyn Clock>,
    /// Bumped on reset so an in-flight submission cannot finalize a fresh draft.
    generation: u64,
}

impl Wizard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let draft = BookingDraft::new(clock.today());
        Self {
            draft,
            clock,
            generation: 0,
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Inputs are frozen while submitting and after success.
    fn is_locked(&self) -> bool {
        self.draft.submission == SubmissionState::Submitting || self.draft.is_succeeded()
    }

    /// Calendar and time slots only respond on the date/time step.
    fn on_date_step(&self) -> bool {
        self.draft.step == Step::DateTimeSelection
    }

    pub fn dispatch(&mut self, action: Action) {
        if self.is_locked() && action != Action::Reset {
            tracing::debug!(?action, "ignoring action on locked wizard");
            return;
        }

        match action {
            Action::SelectService { id } => self.select_service(&id),
            Action::Advance => self.advance(),
            Action::Retreat => self.retreat(),
            Action::SelectDate { day } => self.select_date(day),
            Action::SelectTime { time } => self.select_time(&time),
            Action::ChangeMonth { delta } => self.change_month(delta),
            Action::SetName { value } => self.draft.contact.name = value,
            Action::SetPhone { value } => self.draft.contact.phone = value,
            Action::SetEmail { value } => self.draft.contact.email = value,
            Action::SetMessage { value } => self.draft.contact.message = value,
            Action::Reset => self.reset(),
        }
    }

    pub fn select_service(&mut self, id: &str) {
        if Service::find(id).is_none() {
            tracing::debug!(id, "unknown service id");
            return;
        }
        self.draft.selected_service_id = Some(id.to_string());
    }

    pub fn advance(&mut self) {
        let draft = &mut self.draft;
        let missing = match draft.step {
            Step::ServiceSelection if draft.selected_service_id.is_none() => {
                Some((Field::Service, SERVICE_REQUIRED))
            }
            Step::DateTimeSelection
                if draft.selected_date.is_none() || draft.selected_time.is_none() =>
            {
                Some((Field::Datetime, DATETIME_REQUIRED))
            }
            _ => None,
        };

        if let Some((field, message)) = missing {
            draft.errors = FieldErrors::from([(field, message.to_string())]);
            return;
        }

        if let Some(next) = draft.step.next() {
            draft.errors.clear();
            draft.step = next;
        }
    }

    pub fn retreat(&mut self) {
        if let Some(previous) = self.draft.step.previous() {
            self.draft.step = previous;
        }
    }

    pub fn select_date(&mut self, day: u32) {
        if !self.on_date_step() {
            return;
        }
        let view = self.draft.view_date;
        let Some(date) = NaiveDate::from_ymd_opt(view.year(), view.month(), day) else {
            return;
        };
        if date < self.today() {
            return;
        }
        self.draft.selected_date = Some(date);
        self.draft.selected_time = None;
    }

    pub fn select_time(&mut self, time: &str) {
        if !self.on_date_step() {
            return;
        }
        if self.draft.selected_date.is_none() || !is_time_slot(time) {
            return;
        }
        self.draft.selected_time = Some(time.to_string());
    }

    pub fn change_month(&mut self, delta: i32) {
        if delta == 0 || !self.on_date_step() {
            return;
        }
        let Some(target) = shift_month(self.draft.view_date, delta) else {
            return;
        };
        if month_ordinal(target) < month_ordinal(self.today()) {
            return;
        }
        self.draft.view_date = target;
    }

    pub fn reset(&mut self) {
        self.draft = BookingDraft::new(self.today());
        self.generation += 1;
    }

    /// Validates the contact step and, when it passes, moves to Submitting.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.draft.step != Step::ContactDetails || self.is_locked() {
            return SubmitStart::Ignored;
        }

        let contact = match validate_contact(&self.draft.contact) {
            Ok(contact) => contact,
            Err(errors) => {
                self.draft.errors = errors.clone();
                return SubmitStart::Invalid(errors);
            }
        };

        let draft = &self.draft;
        let (Some(service), Some(date), Some(time)) = (
            draft.selected_service_id.as_deref().and_then(Service::find),
            draft.selected_date,
            draft.selected_time.clone(),
        ) else {
            let errors = FieldErrors::from([(Field::Datetime, DATETIME_REQUIRED.to_string())]);
            self.draft.errors = errors.clone();
            return SubmitStart::Invalid(errors);
        };

        let record = BookingRecord {
            service_id: service.id.to_string(),
            service_name: service.name.to_string(),
            price: service.price,
            date,
            time,
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            message: contact.message,
        };

        self.draft.errors.clear();
        self.draft.submission = SubmissionState::Submitting;
        SubmitStart::Accepted(SubmitTicket {
            generation: self.generation,
            record,
        })
    }

    pub fn finish_submit(&mut self, ticket: &SubmitTicket) {
        if ticket.generation != self.generation {
            return;
        }
        self.draft.submission = SubmissionState::Succeeded;
    }

    /// Back to the contact step with everything the user typed intact.
    pub fn fail_submit(&mut self, ticket: &SubmitTicket) {
        if ticket.generation != self.generation {
            return;
        }
        self.draft.submission = SubmissionState::Idle;
        self.draft.step = Step::ContactDetails;
        self.draft.errors = FieldErrors::from([(Field::Submit, SUBMIT_FAILED.to_string())]);
    }
}

/// Shared handle to one wizard plus the collaborators its submission needs.
#[derive(Clone)]
pub struct WizardHandle {
    wizard: Arc<Mutex<Wizard>>,
    sink: Arc<dyn BookingSink>,
    submit_delay: Duration,
}

impl WizardHandle {
    pub fn new(wizard: Wizard, sink: Arc<dyn BookingSink>, submit_delay: Duration) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(wizard)),
            sink,
            submit_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Wizard> {
        self.wizard.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> (BookingDraft, NaiveDate) {
        let wizard = self.lock();
        (wizard.draft().clone(), wizard.today())
    }

    pub fn dispatch(&self, action: Action) -> BookingDraft {
        let mut wizard = self.lock();
        wizard.dispatch(action);
        wizard.draft().clone()
    }

    /// Runs the whole submission lifecycle. The wizard stays readable while
    /// the simulated request is in flight; duplicate calls are ignored.
    pub async fn submit(&self) -> SubmitOutcome {
        let start = self.lock().begin_submit();
        let ticket = match start {
            SubmitStart::Ignored => return SubmitOutcome::Ignored,
            SubmitStart::Invalid(errors) => {
                tracing::debug!(fields = errors.len(), "submission rejected");
                return SubmitOutcome::Invalid(errors);
            }
            SubmitStart::Accepted(ticket) => ticket,
        };

        tracing::info!(booking = %ticket.record.summary(), "submitting reservation");
        tokio::time::sleep(self.submit_delay).await;

        match self.sink.deliver(&ticket.record).await {
            Ok(()) => {
                self.lock().finish_submit(&ticket);
                SubmitOutcome::Submitted(ticket.record)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to deliver reservation");
                self.lock().fail_submit(&ticket);
                SubmitOutcome::SinkFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-06-16 is a Monday
    fn today() -> NaiveDate {
        date(2025, 6, 16)
    }

    fn wizard() -> Wizard {
        Wizard::new(Arc::new(FixedClock(today())))
    }

    fn wizard_at_date_step() -> Wizard {
        let mut w = wizard();
        w.select_service("1");
        w.advance();
        assert_eq!(w.draft().step, Step::DateTimeSelection);
        w
    }

    fn wizard_at_contact_step() -> Wizard {
        let mut w = wizard_at_date_step();
        w.select_date(20);
        w.select_time("10:00");
        w.advance();
        assert_eq!(w.draft().step, Step::ContactDetails);
        w
    }

    fn fill_contact(w: &mut Wizard) {
        w.dispatch(Action::SetName {
            value: "Jana Nováková".to_string(),
        });
        w.dispatch(Action::SetPhone {
            value: "+420 123 456 789".to_string(),
        });
        w.dispatch(Action::SetEmail {
            value: "jana@example.cz".to_string(),
        });
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<BookingRecord>>,
    }

    #[async_trait]
    impl BookingSink for RecordingSink {
        async fn deliver(&self, record: &BookingRecord) -> anyhow::Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl BookingSink for FailingSink {
        async fn deliver(&self, _record: &BookingRecord) -> anyhow::Result<()> {
            anyhow::bail!("booking API unavailable")
        }
    }

    #[test]
    fn test_advance_requires_service() {
        let mut w = wizard();
        w.advance();
        assert_eq!(w.draft().step, Step::ServiceSelection);
        assert_eq!(w.draft().errors[&Field::Service], SERVICE_REQUIRED);

        w.select_service("1");
        assert_eq!(w.draft().step, Step::ServiceSelection);
        w.advance();
        assert_eq!(w.draft().step, Step::DateTimeSelection);
        assert!(w.draft().errors.is_empty());
    }

    #[test]
    fn test_unknown_service_is_ignored() {
        let mut w = wizard();
        w.select_service("42");
        assert!(w.draft().selected_service_id.is_none());
    }

    #[test]
    fn test_advance_requires_date_and_time() {
        let mut w = wizard();
        w.select_service("2");
        w.advance();

        w.advance();
        assert_eq!(w.draft().step, Step::DateTimeSelection);
        assert_eq!(w.draft().errors[&Field::Datetime], DATETIME_REQUIRED);

        w.select_date(18);
        w.advance();
        assert_eq!(w.draft().step, Step::DateTimeSelection);

        w.select_time("14:30");
        w.advance();
        assert_eq!(w.draft().step, Step::ContactDetails);
        assert!(w.draft().errors.is_empty());
    }

    #[test]
    fn test_advance_at_last_step_is_noop() {
        let mut w = wizard_at_contact_step();
        let before = w.draft().clone();
        w.advance();
        assert_eq!(w.draft(), &before);
    }

    #[test]
    fn test_retreat_at_first_step_is_noop() {
        let mut w = wizard();
        w.select_service("3");
        let before = w.draft().clone();
        w.retreat();
        assert_eq!(w.draft(), &before);
    }

    #[test]
    fn test_retreat_keeps_selections() {
        let mut w = wizard_at_contact_step();
        w.retreat();
        assert_eq!(w.draft().step, Step::DateTimeSelection);
        w.retreat();
        assert_eq!(w.draft().step, Step::ServiceSelection);
        assert_eq!(w.draft().selected_service_id.as_deref(), Some("1"));
        assert_eq!(w.draft().selected_date, Some(date(2025, 6, 20)));
        assert_eq!(w.draft().selected_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_past_dates_are_unselectable() {
        let mut w = wizard_at_date_step();
        for day in 1..16 {
            let before = w.draft().clone();
            w.select_date(day);
            assert_eq!(w.draft(), &before, "day {day}");
        }
    }

    #[test]
    fn test_today_is_selectable() {
        let mut w = wizard_at_date_step();
        w.select_date(16);
        assert_eq!(w.draft().selected_date, Some(today()));
    }

    #[test]
    fn test_nonexistent_day_is_ignored() {
        let mut w = wizard_at_date_step();
        w.select_date(31);
        assert!(w.draft().selected_date.is_none());
        w.select_date(0);
        assert!(w.draft().selected_date.is_none());
    }

    #[test]
    fn test_new_date_clears_time() {
        let mut w = wizard_at_date_step();
        w.select_date(20);
        w.select_time("10:00");
        assert_eq!(w.draft().selected_time.as_deref(), Some("10:00"));
        w.select_date(21);
        assert!(w.draft().selected_time.is_none());
        assert_eq!(w.draft().selected_date, Some(date(2025, 6, 21)));
    }

    #[test]
    fn test_time_needs_date_and_known_slot() {
        let mut w = wizard_at_date_step();
        w.select_time("10:00");
        assert!(w.draft().selected_time.is_none());
        w.select_date(20);
        w.select_time("10:15");
        assert!(w.draft().selected_time.is_none());
        w.select_time("17:30");
        assert_eq!(w.draft().selected_time.as_deref(), Some("17:30"));
    }

    #[test]
    fn test_cannot_browse_before_current_month() {
        let mut w = wizard_at_date_step();
        w.change_month(-1);
        assert_eq!(w.draft().view_date, today());
        w.change_month(-12);
        assert_eq!(w.draft().view_date, today());
    }

    #[test]
    fn test_month_navigation_forward_and_back() {
        let mut w = wizard_at_date_step();
        w.change_month(7);
        assert_eq!(w.draft().view_date, date(2026, 1, 1));
        w.change_month(-2);
        assert_eq!(w.draft().view_date, date(2025, 11, 1));
        w.change_month(-5);
        assert_eq!(w.draft().view_date, date(2025, 6, 1));
        w.change_month(-1);
        assert_eq!(w.draft().view_date, date(2025, 6, 1));
    }

    #[test]
    fn test_select_date_uses_viewed_month() {
        let mut w = wizard_at_date_step();
        w.change_month(1);
        w.select_date(3);
        assert_eq!(w.draft().selected_date, Some(date(2025, 7, 3)));
    }

    #[test]
    fn test_calendar_ignored_outside_date_step() {
        let mut w = wizard();
        let before = w.draft().clone();
        w.dispatch(Action::SelectDate { day: 20 });
        w.dispatch(Action::SelectTime {
            time: "10:00".to_string(),
        });
        w.dispatch(Action::ChangeMonth { delta: 1 });
        assert_eq!(w.draft(), &before);
    }

    #[test]
    fn test_contact_step_keeps_chosen_time() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        w.dispatch(Action::SelectDate { day: 21 });
        assert_eq!(w.draft().selected_date, Some(date(2025, 6, 20)));
        assert_eq!(w.draft().selected_time.as_deref(), Some("10:00"));
        assert!(matches!(w.begin_submit(), SubmitStart::Accepted(_)));
    }

    #[test]
    fn test_submit_without_time_reports_datetime_error() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        w.retreat();
        w.select_date(21);
        w.draft.step = Step::ContactDetails;
        let SubmitStart::Invalid(errors) = w.begin_submit() else {
            panic!("expected a date/time error");
        };
        assert_eq!(errors[&Field::Datetime], DATETIME_REQUIRED);
        assert_eq!(w.draft().errors, errors);
        assert_eq!(w.draft().submission, SubmissionState::Idle);
    }

    #[test]
    fn test_huge_month_delta_is_ignored() {
        let mut w = wizard_at_date_step();
        w.dispatch(Action::ChangeMonth { delta: i32::MAX });
        assert_eq!(w.draft().view_date, today());
        w.dispatch(Action::ChangeMonth { delta: i32::MIN });
        assert_eq!(w.draft().view_date, today());
    }

    #[test]
    fn test_submit_outside_contact_step_is_ignored() {
        let mut w = wizard();
        assert!(matches!(w.begin_submit(), SubmitStart::Ignored));
    }

    #[test]
    fn test_submit_reports_every_invalid_field() {
        let mut w = wizard_at_contact_step();
        w.dispatch(Action::SetPhone {
            value: "12345678".to_string(),
        });
        w.dispatch(Action::SetEmail {
            value: "a@b".to_string(),
        });
        let SubmitStart::Invalid(errors) = w.begin_submit() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(w.draft().errors, errors);
        assert_eq!(w.draft().submission, SubmissionState::Idle);
        assert_eq!(w.draft().step, Step::ContactDetails);
    }

    #[test]
    fn test_submit_uses_sanitized_fields() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        w.dispatch(Action::SetName {
            value: "<script>".to_string(),
        });
        let SubmitStart::Accepted(ticket) = w.begin_submit() else {
            panic!("expected submission to start");
        };
        assert_eq!(ticket.record.name, "script");
        assert_eq!(w.draft().submission, SubmissionState::Submitting);
        // raw input is left as typed
        assert_eq!(w.draft().contact.name, "<script>");
    }

    #[test]
    fn test_inputs_frozen_while_submitting() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        let SubmitStart::Accepted(_) = w.begin_submit() else {
            panic!("expected submission to start");
        };
        let before = w.draft().clone();
        w.dispatch(Action::Retreat);
        w.dispatch(Action::SetName {
            value: "Other".to_string(),
        });
        assert_eq!(w.draft(), &before);
        assert!(matches!(w.begin_submit(), SubmitStart::Ignored));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        w.change_month(3);
        w.dispatch(Action::Reset);
        assert_eq!(w.draft(), &BookingDraft::new(today()));
    }

    #[test]
    fn test_reset_during_submission_wins() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        let SubmitStart::Accepted(ticket) = w.begin_submit() else {
            panic!("expected submission to start");
        };
        w.dispatch(Action::Reset);
        w.finish_submit(&ticket);
        assert_eq!(w.draft(), &BookingDraft::new(today()));
    }

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let action: Action =
            serde_json::from_str(r#"{"type":"change_month","delta":-1}"#).unwrap();
        assert_eq!(action, Action::ChangeMonth { delta: -1 });
        let action: Action = serde_json::from_str(r#"{"type":"advance"}"#).unwrap();
        assert_eq!(action, Action::Advance);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_submission() {
        let sink = Arc::new(RecordingSink::default());
        let handle = WizardHandle::new(wizard(), sink.clone(), Duration::from_millis(1500));

        let klasicka = crate::models::SERVICES
            .iter()
            .find(|s| s.name == "Klasická Manikúra")
            .unwrap();
        handle.dispatch(Action::SelectService {
            id: klasicka.id.to_string(),
        });
        handle.dispatch(Action::Advance);
        handle.dispatch(Action::SelectDate { day: 20 });
        handle.dispatch(Action::SelectTime {
            time: "10:00".to_string(),
        });
        handle.dispatch(Action::Advance);
        handle.dispatch(Action::SetName {
            value: "Jana".to_string(),
        });
        handle.dispatch(Action::SetPhone {
            value: "+420 123 456 789".to_string(),
        });
        handle.dispatch(Action::SetEmail {
            value: "a@b.c".to_string(),
        });

        let task = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.snapshot().0.submission, SubmissionState::Submitting);

        let outcome = task.await.unwrap();
        let SubmitOutcome::Submitted(record) = outcome else {
            panic!("expected a submitted booking");
        };
        assert_eq!(record.service_name, "Klasická Manikúra");
        assert_eq!(record.date, date(2025, 6, 20));
        assert_eq!(record.time, "10:00");
        assert_eq!(record.email, "a@b.c");
        assert_eq!(handle.snapshot().0.submission, SubmissionState::Succeeded);
        assert_eq!(sink.records.lock().unwrap().as_slice(), &[record]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_submit_delivers_once() {
        let sink = Arc::new(RecordingSink::default());
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        let handle = WizardHandle::new(w, sink.clone(), Duration::from_millis(1500));

        let (first, second) = tokio::join!(handle.submit(), handle.submit());
        let outcomes = [first, second];
        let submitted = outcomes
            .iter()
            .filter(|o| matches!(o, SubmitOutcome::Submitted(_)))
            .count();
        let ignored = outcomes
            .iter()
            .filter(|o| **o == SubmitOutcome::Ignored)
            .count();
        assert_eq!((submitted, ignored), (1, 1));
        assert_eq!(handle.snapshot().0.submission, SubmissionState::Succeeded);
        assert_eq!(sink.records.lock().unwrap().len(), 1);

        assert_eq!(handle.submit().await, SubmitOutcome::Ignored);
        assert_eq!(sink.records.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sink_failure_returns_to_contact_step() {
        let mut w = wizard_at_contact_step();
        fill_contact(&mut w);
        let handle = WizardHandle::new(w, Arc::new(FailingSink), Duration::from_millis(1500));

        assert_eq!(handle.submit().await, SubmitOutcome::SinkFailed);
        let (draft, _) = handle.snapshot();
        assert_eq!(draft.step, Step::ContactDetails);
        assert_eq!(draft.submission, SubmissionState::Idle);
        assert_eq!(draft.errors[&Field::Submit], SUBMIT_FAILED);
        assert_eq!(draft.contact.name, "Jana Nováková");
        assert_eq!(draft.selected_time.as_deref(), Some("10:00"));
    }
}
