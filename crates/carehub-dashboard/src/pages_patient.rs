//! Page renderers for the patient portal.

use carehub_core::AuthenticatedUser;
use carehub_core::model::{Medication, PatientVisit, TestResult, VisitKind};

use crate::router::PatientTab;
use crate::templates::{self, badge, card, html_escape, stats_card};
use crate::views::style::{result_status_color, visit_status_color};

pub fn patient_dashboard(
    user: &AuthenticatedUser,
    upcoming: &[PatientVisit],
    results: &[TestResult],
    medications: &[Medication],
) -> String {
    let next = upcoming
        .iter()
        .map(|v| v.date)
        .min()
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_else(|| "None".to_string());

    let summary = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">{}{}{}{}</div>"##,
        stats_card("Next Appointment", &next, "calendar", "teal", None),
        stats_card("Health Score", "85/100", "heart", "red", None),
        stats_card("Test Results", &format!("{} New", results.len()), "file-alt", "blue", None),
        stats_card("Medications", &format!("{} Active", medications.len()), "pills", "purple", None),
    );

    let visits: String = upcoming
        .iter()
        .map(|v| {
            format!(
                r##"<div class="border border-gray-200 rounded-lg p-4">
                    <p class="font-medium text-gray-900">{specialty}</p>
                    <p class="text-sm text-gray-600">{doctor}</p>
                    <p class="text-sm text-gray-500">{date} at {time}</p>
                </div>"##,
                specialty = html_escape(&v.specialty),
                doctor = html_escape(&v.doctor),
                date = v.date,
                time = html_escape(&v.time),
            )
        })
        .collect();

    let results_html: String = results
        .iter()
        .map(|r| {
            let color = result_status_color(&r.status).as_str();
            format!(
                r##"<div class="flex items-center justify-between p-3 bg-gray-50 rounded-lg">
                    <div>
                        <p class="font-medium text-gray-900">{test}</p>
                        <p class="text-sm text-gray-600">{result}</p>
                        <p class="text-xs text-gray-500">{date}</p>
                    </div>
                    <span class="text-sm font-medium text-{color}-600"><i class="fas fa-check-circle mr-1"></i>{status}</span>
                </div>"##,
                test = html_escape(&r.test),
                result = html_escape(&r.result),
                date = r.date,
                status = html_escape(&r.status),
            )
        })
        .collect();

    let meds: Vec<Vec<String>> = medications
        .iter()
        .map(|m| {
            vec![
                html_escape(&m.name),
                html_escape(&m.dosage),
                html_escape(&m.frequency),
                html_escape(&m.next_dose),
            ]
        })
        .collect();

    format!(
        r##"<div class="bg-gradient-to-r from-teal-500 to-teal-600 rounded-xl text-white p-6">
            <h1 class="text-2xl font-bold mb-2">Welcome back, {name}!</h1>
            <p class="text-teal-100">Here's your health overview for today</p>
        </div>
        {summary}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            {VISITS}
            {RESULTS}
        </div>
        {MEDS}"##,
        name = html_escape(&user.first_name),
        VISITS = card("Upcoming Appointments", &format!(r#"<div class="space-y-4">{visits}</div>"#)),
        RESULTS = card("Recent Test Results", &format!(r#"<div class="space-y-3">{results_html}</div>"#)),
        MEDS = card(
            "Current Medications",
            &templates::table(&["Medication", "Dosage", "Frequency", "Next Dose"], &meds)
        ),
    )
}

fn visit_card(visit: &PatientVisit, upcoming: bool) -> String {
    let icon = match visit.kind {
        VisitKind::InPerson => "map-marker-alt",
        VisitKind::Telemedicine => "video",
    };
    let actions = if !upcoming {
        r##"<button type="button" class="text-teal-600 hover:text-teal-800 text-sm font-medium">View Summary</button>"##
            .to_string()
    } else {
        let join = if visit.kind == VisitKind::Telemedicine {
            r##"<button type="button" class="bg-teal-600 text-white px-3 py-1 rounded-lg text-sm">Join Video Call</button>"##
        } else {
            ""
        };
        format!(
            r##"{join}
            <button type="button" class="border border-gray-300 text-gray-700 px-3 py-1 rounded-lg text-sm">Reschedule</button>
            <button type="button" class="border border-red-300 text-red-700 px-3 py-1 rounded-lg text-sm">Cancel</button>"##
        )
    };

    format!(
        r##"<div class="border border-gray-200 rounded-lg p-4 space-y-3">
            <div class="flex items-center justify-between">
                <div>
                    <p class="font-medium text-gray-900">{doctor}</p>
                    <p class="text-sm text-gray-600">{specialty}</p>
                </div>
                {status}
            </div>
            <div class="text-sm text-gray-600 space-y-1">
                <p><i class="fas fa-calendar w-4 mr-2"></i>{date} at {time}</p>
                <p><i class="fas fa-{icon} w-4 mr-2"></i>{location}</p>
                <p><i class="fas fa-stethoscope w-4 mr-2"></i>{kind}</p>
            </div>
            <div class="flex gap-2">{actions}</div>
        </div>"##,
        doctor = html_escape(&visit.doctor),
        specialty = html_escape(&visit.specialty),
        status = badge(visit.status.label(), visit_status_color(visit.status)),
        date = visit.date,
        time = html_escape(&visit.time),
        location = html_escape(&visit.location),
        kind = visit.kind,
    )
}

fn visit_list(visits: &[PatientVisit], upcoming: bool) -> String {
    if visits.is_empty() {
        let message = if upcoming {
            "No upcoming appointments scheduled"
        } else {
            "No past appointments found"
        };
        return templates::empty_state("calendar-times", message, "");
    }
    let cards: String = visits.iter().map(|v| visit_card(v, upcoming)).collect();
    format!(r#"<div class="space-y-4">{cards}</div>"#)
}

/// Upcoming and past visits, switchable in the page.
pub fn patient_appointments(upcoming: &[PatientVisit], past: &[PatientVisit]) -> String {
    card(
        "My Appointments",
        &templates::tabs(
            "visit-tabs",
            &[
                ("upcoming", "Upcoming", visit_list(upcoming, true)),
                ("past", "Past Appointments", visit_list(past, false)),
            ],
        ),
    )
}

/// Sections of the portal that show a placeholder only.
pub fn placeholder(tab: PatientTab) -> String {
    let (title, text) = match tab {
        PatientTab::MedicalRecords => ("Medical Records", "Your medical records will be displayed here."),
        PatientTab::HealthMetrics => (
            "Health Metrics",
            "Your health metrics and trends will be displayed here.",
        ),
        PatientTab::Messages => (
            "Messages",
            "Your messages with healthcare providers will be displayed here.",
        ),
        _ => ("Coming Soon", "This section is not available yet."),
    };
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-100 p-6">
            <h2 class="text-xl font-semibold text-gray-900">{title}</h2>
            <p class="text-gray-600 mt-2">{text}</p>
        </div>"##
    )
}
