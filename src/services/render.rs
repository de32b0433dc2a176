//! Server-side markup for the reservation wizard.
//!
//! The fragment is re-rendered from a [`WizardView`] after every action.
//! Buttons carry `data-action` attributes naming the action to dispatch.

use std::fmt::Write;

use chrono::Datelike;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::{Field, Step, SubmissionState, SERVICES};
use crate::services::calendar::{DAY_HEADER, MONTH_NAMES};
use crate::services::derived::WizardView;

pub fn render_wizard(view: &WizardView) -> String {
    let mut out = String::new();
    let draft = &view.draft;

    let _ = write!(
        out,
        r#"<section class="reservation-wizard" data-step="{}" data-submission="{}">"#,
        view.step_number,
        submission_name(draft.submission)
    );

    if draft.is_succeeded() {
        render_success(&mut out, view);
        out.push_str("</section>");
        return out;
    }

    out.push_str(r#"<div class="wizard-progress">"#);
    for s in 1..=3u8 {
        let class = if view.step_number >= s { "done" } else { "pending" };
        let _ = write!(out, r#"<div class="progress-{class}"></div>"#);
    }
    out.push_str("</div>");

    let _ = write!(
        out,
        r#"<header class="wizard-header"><span>Krok 0{} / 03</span><h3>{}</h3></header>"#,
        view.step_number,
        text(view.step_title)
    );

    match draft.step {
        Step::ServiceSelection => render_services(&mut out, view),
        Step::DateTimeSelection => render_calendar(&mut out, view),
        Step::ContactDetails => render_contact(&mut out, view),
    }

    render_navigation(&mut out, view);
    out.push_str("</section>");
    out
}

fn submission_name(state: SubmissionState) -> &'static str {
    match state {
        SubmissionState::Idle => "idle",
        SubmissionState::Submitting => "submitting",
        SubmissionState::Succeeded => "succeeded",
    }
}

fn render_error(out: &mut String, view: &WizardView, field: Field) {
    if let Some(message) = view.draft.errors.get(&field) {
        let _ = write!(
            out,
            r#"<p class="field-error" data-field="{}">{}</p>"#,
            field.as_str(),
            text(message)
        );
    }
}

fn render_success(out: &mut String, view: &WizardView) {
    let service = view.selected_service.map(|s| s.name).unwrap_or_default();
    let _ = write!(
        out,
        r#"<div class="wizard-success"><h3>Potvrzeno</h3><p>Vaše rezervace na <span>{}</span> byla úspěšně odeslána.</p><p>Potvrzení vám dorazí na email.</p><button data-action="reset">Nová Rezervace</button></div>"#,
        text(service)
    );
}

fn render_services(out: &mut String, view: &WizardView) {
    out.push_str(r#"<div class="wizard-services">"#);
    for service in &SERVICES {
        let selected = view.draft.selected_service_id.as_deref() == Some(service.id);
        let _ = write!(
            out,
            r#"<button class="service-option{}" data-action="select_service" data-id="{}"><h4>{}</h4><span class="duration">{}</span><span class="price">{} Kč</span></button>"#,
            if selected { " selected" } else { "" },
            attr(service.id),
            text(service.name),
            text(service.duration),
            service.price
        );
    }
    render_error(out, view, Field::Service);
    out.push_str("</div>");
}

fn render_calendar(out: &mut String, view: &WizardView) {
    let _ = write!(
        out,
        r#"<div class="wizard-calendar"><nav><button data-action="change_month" data-delta="-1">&lsaquo;</button><span>{}</span><button data-action="change_month" data-delta="1">&rsaquo;</button></nav>"#,
        text(&view.month_label)
    );

    out.push_str(r#"<div class="calendar-header">"#);
    for day in DAY_HEADER {
        let _ = write!(out, "<div>{day}</div>");
    }
    out.push_str(r#"</div><div class="calendar-grid">"#);
    for cell in &view.calendar {
        match cell {
            None => out.push_str("<div></div>"),
            Some(cell) => {
                let class = if cell.selected {
                    "day selected"
                } else if cell.disabled {
                    "day disabled"
                } else {
                    "day"
                };
                let _ = write!(
                    out,
                    r#"<div><button class="{class}" data-action="select_date" data-day="{}"{}>{}</button></div>"#,
                    cell.day,
                    if cell.disabled { " disabled" } else { "" },
                    cell.day
                );
            }
        }
    }
    out.push_str("</div></div>");

    let slots_class = if view.draft.selected_date.is_some() {
        "wizard-times"
    } else {
        "wizard-times inactive"
    };
    let _ = write!(out, r#"<div class="{slots_class}"><label>Dostupné Časy</label>"#);
    for slot in view.time_slots {
        let selected = view.draft.selected_time.as_deref() == Some(*slot);
        let _ = write!(
            out,
            r#"<button class="time-slot{}" data-action="select_time" data-time="{slot}">{slot}</button>"#,
            if selected { " selected" } else { "" }
        );
    }
    out.push_str("</div>");
    render_error(out, view, Field::Datetime);
}

fn render_contact(out: &mut String, view: &WizardView) {
    let draft = &view.draft;
    let service = view.selected_service.map(|s| s.name).unwrap_or_default();
    let when = draft
        .selected_date
        .map(|d| format!("{}. {} {}", d.day(), MONTH_NAMES[d.month0() as usize], d.year()))
        .unwrap_or_default();

    let _ = write!(
        out,
        r#"<div class="wizard-recap"><p>Rekapitulace</p><p class="recap-service">{}</p><p class="recap-when">{} &bull; {}</p></div>"#,
        text(service),
        text(&when),
        text(draft.selected_time.as_deref().unwrap_or_default())
    );

    let fields = [
        (Field::Name, "set_name", "text", "Jméno a Příjmení *", &draft.contact.name),
        (Field::Phone, "set_phone", "tel", "Telefon *", &draft.contact.phone),
        (Field::Email, "set_email", "email", "Email *", &draft.contact.email),
    ];
    out.push_str(r#"<form class="wizard-contact">"#);
    for (field, action, kind, label, value) in fields {
        let _ = write!(
            out,
            r#"<div class="field"><input type="{kind}" name="{name}" data-action="{action}" value="{}" /><label>{}</label>"#,
            attr(value),
            text(label),
            name = field.as_str()
        );
        render_error(out, view, field);
        out.push_str("</div>");
    }
    let _ = write!(
        out,
        r#"<div class="field"><textarea name="message" data-action="set_message" rows="2">{}</textarea><label>Poznámka (Volitelné)</label></div></form>"#,
        text(&draft.contact.message)
    );
    render_error(out, view, Field::Submit);
}

fn render_navigation(out: &mut String, view: &WizardView) {
    out.push_str(r#"<div class="wizard-nav">"#);
    if view.draft.step.previous().is_some() {
        out.push_str(r#"<button data-action="retreat">Zpět</button>"#);
    } else {
        out.push_str("<div></div>");
    }

    if view.draft.step == Step::ContactDetails {
        let submitting = view.draft.submission == SubmissionState::Submitting;
        let _ = write!(
            out,
            r#"<button data-action="submit"{}>{}</button>"#,
            if submitting { " disabled" } else { "" },
            if submitting { "Odesílám..." } else { "Dokončit" }
        );
    } else {
        out.push_str(r#"<button data-action="advance">Pokračovat</button>"#);
    }
    out.push_str("</div>");
}

/// Inserts `fragment` as the first child of the element with `id="mount_id"`.
/// A document without that element is returned unchanged.
pub fn mount(document: &str, mount_id: &str, fragment: &str) -> String {
    let marker = format!(r#"id="{mount_id}""#);
    // Only a standalone attribute counts, not a suffix such as `data-id=`.
    let insert_at = document
        .match_indices(&marker)
        .map(|(at, _)| at)
        .find(|&at| {
            document[..at]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace)
        })
        .and_then(|at| document[at..].find('>').map(|close| at + close + 1));

    match insert_at {
        Some(at) => {
            let mut out = String::with_capacity(document.len() + fragment.len());
            out.push_str(&document[..at]);
            out.push_str(fragment);
            out.push_str(&document[at..]);
            out
        }
        None => {
            tracing::debug!(mount_id, "mount point not found, skipping render");
            document.to_string()
        }
    }
}
