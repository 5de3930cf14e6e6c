//! Flat hospital records held as fixtures.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::labeled_enum;

labeled_enum! {
    Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

labeled_enum! {
    /// Current clinical condition of an admitted patient.
    PatientCondition {
        Stable => "Stable",
        Critical => "Critical",
        UnderObservation => "Under Observation",
        Discharged => "Discharged",
    }
}

labeled_enum! {
    StaffRole {
        Doctor => "Doctor",
        Nurse => "Nurse",
        Administrator => "Administrator",
        Technician => "Technician",
    }
}

labeled_enum! {
    Shift {
        Day => "Day",
        Night => "Night",
        Evening => "Evening",
    }
}

labeled_enum! {
    StaffStatus {
        Available => "Available",
        OnDuty => "On Duty",
        OffDuty => "Off Duty",
        OnLeave => "On Leave",
    }
}

labeled_enum! {
    AppointmentType {
        Consultation => "Consultation",
        Surgery => "Surgery",
        FollowUp => "Follow-up",
        Emergency => "Emergency",
    }
}

labeled_enum! {
    AppointmentStatus {
        Scheduled => "Scheduled",
        InProgress => "In Progress",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

labeled_enum! {
    RoomType {
        General => "General",
        Icu => "ICU",
        Surgery => "Surgery",
        Emergency => "Emergency",
    }
}

labeled_enum! {
    RoomStatus {
        Occupied => "Occupied",
        Available => "Available",
        Maintenance => "Maintenance",
    }
}

/// An admitted or registered patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub blood_type: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub current_condition: PatientCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_doctor: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A hospital staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: StaffRole,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub shift: Shift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    pub status: StaffStatus,
}

impl Staff {
    /// Name as shown in lists; doctors get their title.
    pub fn display_name(&self) -> String {
        match self.role {
            StaffRole::Doctor => format!("Dr. {} {}", self.first_name, self.last_name),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    /// Referential tag only; not validated against the patient list.
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub head: String,
    pub staff_count: u32,
    pub room_count: u32,
    pub current_patients: u32,
    pub max_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub number: String,
    #[serde(rename = "type")]
    pub kind: RoomType,
    pub department: String,
    pub status: RoomStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}
