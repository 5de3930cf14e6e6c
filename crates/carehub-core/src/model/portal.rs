//! Records shown on the dashboards and the patient portal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{PatientCondition, labeled_enum};

labeled_enum! {
    VisitKind {
        InPerson => "In-Person",
        Telemedicine => "Telemedicine",
    }
}

labeled_enum! {
    VisitStatus {
        Confirmed => "Confirmed",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

labeled_enum! {
    Trend {
        Up => "up",
        Down => "down",
    }
}

labeled_enum! {
    ActivityKind {
        Admission => "admission",
        Emergency => "emergency",
        Surgery => "surgery",
        Maintenance => "maintenance",
        Lab => "lab",
        Shift => "shift",
    }
}

/// An appointment as the patient sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientVisit {
    pub id: String,
    pub date: NaiveDate,
    pub time: String,
    pub doctor: String,
    pub specialty: String,
    #[serde(rename = "type")]
    pub kind: VisitKind,
    pub location: String,
    pub status: VisitStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test: String,
    pub result: String,
    pub status: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub next_dose: String,
}

/// Headline metric on the staff dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub change: String,
    pub trend: Trend,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub activity: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPatient {
    pub name: String,
    pub room: String,
    pub condition: PatientCondition,
    pub doctor: String,
}
