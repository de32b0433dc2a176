use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{BookingDraft, Service, TIME_SLOTS};
use crate::services::calendar::{month_grid, month_label};

pub fn selected_service(draft: &BookingDraft) -> Option<&'static Service> {
    draft.selected_service_id.as_deref().and_then(Service::find)
}

pub fn current_year(draft: &BookingDraft) -> i32 {
    draft.view_date.year()
}

/// 0-based, January is 0.
pub fn current_month(draft: &BookingDraft) -> u32 {
    draft.view_date.month0()
}

pub fn calendar_days(draft: &BookingDraft) -> Vec<Option<u32>> {
    month_grid(current_year(draft), current_month(draft) as i32)
}

fn viewed_day(draft: &BookingDraft, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(current_year(draft), current_month(draft) + 1, day)
}

pub fn is_date_selected(draft: &BookingDraft, day: u32) -> bool {
    draft.selected_date.is_some() && draft.selected_date == viewed_day(draft, day)
}

pub fn is_date_disabled(draft: &BookingDraft, today: NaiveDate, day: u32) -> bool {
    viewed_day(draft, day).map_or(true, |date| date < today)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarCell {
    pub day: u32,
    pub disabled: bool,
    pub selected: bool,
}

/// Everything the rendering layer reads after an action.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    #[serde(flatten)]
    pub draft: BookingDraft,
    pub step_number: u8,
    pub step_title: &'static str,
    pub selected_service: Option<&'static Service>,
    pub current_year: i32,
    pub current_month: u32,
    pub month_label: String,
    pub calendar: Vec<Option<CalendarCell>>,
    pub time_slots: &'static [&'static str],
}

pub fn view(draft: &BookingDraft, today: NaiveDate) -> WizardView {
    let calendar = calendar_days(draft)
        .into_iter()
        .map(|cell| {
            cell.map(|day| CalendarCell {
                day,
                disabled: is_date_disabled(draft, today, day),
                selected: is_date_selected(draft, day),
            })
        })
        .collect();

    WizardView {
        draft: draft.clone(),
        step_number: draft.step.number(),
        step_title: draft.step.title(),
        selected_service: selected_service(draft),
        current_year: current_year(draft),
        current_month: current_month(draft),
        month_label: month_label(draft.view_date),
        calendar,
        time_slots: &TIME_SLOTS,
    }
}
