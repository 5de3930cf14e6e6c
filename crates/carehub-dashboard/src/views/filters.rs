//! List filters for the staff pages.
//!
//! Every categorical field takes a [`Choice`]: `All` (or an empty or
//! unrecognised value) places no constraint on the field.

use std::fmt;
use std::str::FromStr;

use carehub_core::{
    Appointment, AppointmentStatus, Patient, PatientCondition, Room, RoomStatus, RoomType, Staff,
    StaffRole, StaffStatus,
};
use chrono::{Local, NaiveDate};

/// Departments offered by the room page's department drop-down.
pub const ROOM_DEPARTMENTS: &[&str] = &["Cardiology", "Emergency", "ICU", "Surgery"];

/// A drop-down selection: everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: FromStr> Choice<T> {
    /// Parse a query value. Missing, empty, "All" and unknown values mean
    /// no constraint.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("All") => Choice::All,
            Some(value) => value.parse().map(Choice::Only).unwrap_or(Choice::All),
        }
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> Choice<T> {
    /// The value to pre-select in the drop-down.
    pub fn selected(&self) -> String {
        match self {
            Choice::All => "All".to_string(),
            Choice::Only(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientFilter {
    pub search: String,
    pub condition: Choice<PatientCondition>,
}

impl PatientFilter {
    pub fn new(search: Option<&str>, condition: Option<&str>) -> Self {
        Self {
            search: search.unwrap_or_default().trim().to_string(),
            condition: Choice::parse(condition),
        }
    }

    /// Name search is case-insensitive; room numbers match as a substring.
    pub fn matches(&self, patient: &Patient) -> bool {
        let needle = self.search.to_lowercase();
        let found = needle.is_empty()
            || patient.first_name.to_lowercase().contains(&needle)
            || patient.last_name.to_lowercase().contains(&needle)
            || patient
                .room_number
                .as_deref()
                .is_some_and(|room| room.contains(self.search.as_str()));
        found && self.condition.admits(&patient.current_condition)
    }

    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.matches(p)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffFilter {
    pub role: Choice<StaffRole>,
    pub status: Choice<StaffStatus>,
}

impl StaffFilter {
    pub fn new(role: Option<&str>, status: Option<&str>) -> Self {
        Self {
            role: Choice::parse(role),
            status: Choice::parse(status),
        }
    }

    pub fn matches(&self, member: &Staff) -> bool {
        self.role.admits(&member.role) && self.status.admits(&member.status)
    }

    pub fn apply<'a>(&self, staff: &'a [Staff]) -> Vec<&'a Staff> {
        staff.iter().filter(|s| self.matches(s)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentFilter {
    pub date: NaiveDate,
    pub status: Choice<AppointmentStatus>,
}

impl AppointmentFilter {
    /// A missing or malformed date selects today.
    pub fn new(date: Option<&str>, status: Option<&str>) -> Self {
        let date = date
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            .unwrap_or_else(|| Local::now().date_naive());
        Self {
            date,
            status: Choice::parse(status),
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        appointment.date == self.date && self.status.admits(&appointment.status)
    }

    pub fn apply<'a>(&self, appointments: &'a [Appointment]) -> Vec<&'a Appointment> {
        appointments.iter().filter(|a| self.matches(a)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomFilter {
    pub kind: Choice<RoomType>,
    pub status: Choice<RoomStatus>,
    pub department: Choice<String>,
}

impl RoomFilter {
    pub fn new(kind: Option<&str>, status: Option<&str>, department: Option<&str>) -> Self {
        Self {
            kind: Choice::parse(kind),
            status: Choice::parse(status),
            department: Choice::parse(department),
        }
    }

    pub fn matches(&self, room: &Room) -> bool {
        self.kind.admits(&room.kind)
            && self.status.admits(&room.status)
            && self.department.admits(&room.department)
    }

    pub fn apply<'a>(&self, rooms: &'a [Room]) -> Vec<&'a Room> {
        rooms.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::fixtures;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn choice_parsing() {
        assert_eq!(Choice::<StaffRole>::parse(None), Choice::All);
        assert_eq!(Choice::<StaffRole>::parse(Some("")), Choice::All);
        assert_eq!(Choice::<StaffRole>::parse(Some("All")), Choice::All);
        assert_eq!(Choice::<StaffRole>::parse(Some("Janitor")), Choice::All);
        assert_eq!(
            Choice::<StaffStatus>::parse(Some("On Duty")),
            Choice::Only(StaffStatus::OnDuty)
        );
        assert_eq!(Choice::Only(StaffStatus::OnLeave).selected(), "On Leave");
        assert_eq!(Choice::<StaffStatus>::All.selected(), "All");
    }

    #[test]
    fn on_duty_doctors() {
        let staff = fixtures::staff();
        let filter = StaffFilter::new(Some("Doctor"), Some("On Duty"));
        let names: Vec<String> = filter.apply(&staff).iter().map(|s| s.display_name()).collect();
        assert_eq!(names, ["Dr. Sarah Wilson"]);

        assert_eq!(StaffFilter::default().apply(&staff).len(), staff.len());
    }

    #[test]
    fn patient_search() {
        let patients = fixtures::patients();

        let by_name = PatientFilter::new(Some("PATIENT"), None);
        assert_eq!(by_name.apply(&patients).len(), 3);

        let by_room = PatientFilter::new(Some("20"), None);
        let hits = by_room.apply(&patients);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].room_number.as_deref(), Some("205"));

        let critical = PatientFilter::new(None, Some("Critical"));
        let hits = critical.apply(&patients);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].last_name, "B");

        let nothing = PatientFilter::new(Some("zzz"), Some("Stable"));
        assert!(nothing.apply(&patients).is_empty());
    }

    #[test]
    fn appointments_by_date_and_status() {
        let appointments = fixtures::appointments();

        let filter = AppointmentFilter::new(Some("2024-01-17"), None);
        assert_eq!(filter.date, date(2024, 1, 17));
        assert_eq!(filter.apply(&appointments).len(), 2);

        let filter = AppointmentFilter::new(Some("2024-01-17"), Some("In Progress"));
        let hits = filter.apply(&appointments);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].patient_name, "Patient B");

        let today = AppointmentFilter::new(Some("not-a-date"), None);
        assert_eq!(today.date, Local::now().date_naive());
    }

    #[test]
    fn rooms_by_type_status_department() {
        let rooms = fixtures::rooms();

        let icu = RoomFilter::new(Some("ICU"), None, None);
        let hits = icu.apply(&rooms);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, "205");

        let free_cardiology = RoomFilter::new(None, Some("Available"), Some("Cardiology"));
        let hits = free_cardiology.apply(&rooms);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, "102");

        assert!(RoomFilter::new(None, None, Some("Surgery")).apply(&rooms).is_empty());
    }
}
