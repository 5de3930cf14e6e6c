//! Static hospital data rendered by the dashboard.
//!
//! Nothing here is persisted; every call returns a fresh copy.

use chrono::{NaiveDate, NaiveTime};

use crate::model::{
    Activity, ActivityKind, Appointment, AppointmentStatus, AppointmentType, CriticalPatient,
    Department, Gender, Medication, Patient, PatientCondition, PatientVisit, Room, RoomStatus,
    RoomType, Shift, Staff, StaffRole, StaffStatus, StatCard, TestResult, Trend, VisitKind,
    VisitStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "1".to_string(),
            first_name: "Patient".to_string(),
            last_name: "A".to_string(),
            date_of_birth: date(1985, 3, 15),
            gender: Gender::Male,
            phone: "(555) 123-4567".to_string(),
            email: "patient.a@email.com".to_string(),
            address: "123 Main St, City, State 12345".to_string(),
            emergency_contact: "Emergency Contact A".to_string(),
            emergency_phone: "(555) 987-6543".to_string(),
            blood_type: "A+".to_string(),
            allergies: strings(&["Penicillin"]),
            current_condition: PatientCondition::Stable,
            admission_date: Some(date(2024, 1, 15)),
            room_number: Some("101".to_string()),
            assigned_doctor: Some("Dr. Sarah Wilson".to_string()),
        },
        Patient {
            id: "2".to_string(),
            first_name: "Patient".to_string(),
            last_name: "B".to_string(),
            date_of_birth: date(1992, 7, 22),
            gender: Gender::Female,
            phone: "(555) 234-5678".to_string(),
            email: "patient.b@email.com".to_string(),
            address: "456 Oak Ave, City, State 12345".to_string(),
            emergency_contact: "Emergency Contact B".to_string(),
            emergency_phone: "(555) 876-5432".to_string(),
            blood_type: "O-".to_string(),
            allergies: strings(&["Latex", "Shellfish"]),
            current_condition: PatientCondition::Critical,
            admission_date: Some(date(2024, 1, 14)),
            room_number: Some("205".to_string()),
            assigned_doctor: Some("Dr. Michael Chen".to_string()),
        },
        Patient {
            id: "3".to_string(),
            first_name: "Patient".to_string(),
            last_name: "C".to_string(),
            date_of_birth: date(1978, 11, 8),
            gender: Gender::Male,
            phone: "(555) 345-6789".to_string(),
            email: "patient.c@email.com".to_string(),
            address: "789 Pine St, City, State 12345".to_string(),
            emergency_contact: "Emergency Contact C".to_string(),
            emergency_phone: "(555) 765-4321".to_string(),
            blood_type: "B+".to_string(),
            allergies: Vec::new(),
            current_condition: PatientCondition::UnderObservation,
            admission_date: Some(date(2024, 1, 16)),
            room_number: Some("103".to_string()),
            assigned_doctor: Some("Dr. Sarah Wilson".to_string()),
        },
    ]
}

pub fn staff() -> Vec<Staff> {
    vec![
        Staff {
            id: "1".to_string(),
            first_name: "Sarah".to_string(),
            last_name: "Wilson".to_string(),
            role: StaffRole::Doctor,
            department: "Cardiology".to_string(),
            phone: "(555) 111-2222".to_string(),
            email: "sarah.wilson@hospital.com".to_string(),
            shift: Shift::Day,
            specialization: Some("Cardiovascular Surgery".to_string()),
            status: StaffStatus::OnDuty,
        },
        Staff {
            id: "2".to_string(),
            first_name: "Michael".to_string(),
            last_name: "Chen".to_string(),
            role: StaffRole::Doctor,
            department: "Emergency".to_string(),
            phone: "(555) 222-3333".to_string(),
            email: "michael.chen@hospital.com".to_string(),
            shift: Shift::Night,
            specialization: Some("Emergency Medicine".to_string()),
            status: StaffStatus::Available,
        },
        Staff {
            id: "3".to_string(),
            first_name: "Jennifer".to_string(),
            last_name: "Adams".to_string(),
            role: StaffRole::Nurse,
            department: "ICU".to_string(),
            phone: "(555) 333-4444".to_string(),
            email: "jennifer.adams@hospital.com".to_string(),
            shift: Shift::Day,
            specialization: None,
            status: StaffStatus::OnDuty,
        },
        Staff {
            id: "4".to_string(),
            first_name: "David".to_string(),
            last_name: "Brown".to_string(),
            role: StaffRole::Administrator,
            department: "Administration".to_string(),
            phone: "(555) 444-5555".to_string(),
            email: "david.brown@hospital.com".to_string(),
            shift: Shift::Day,
            specialization: None,
            status: StaffStatus::Available,
        },
    ]
}

pub fn appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            id: "1".to_string(),
            patient_id: "1".to_string(),
            patient_name: "Patient A".to_string(),
            doctor_id: "1".to_string(),
            doctor_name: "Dr. Sarah Wilson".to_string(),
            date: date(2024, 1, 17),
            time: time(10, 0),
            kind: AppointmentType::Consultation,
            status: AppointmentStatus::Scheduled,
            notes: Some("Regular checkup".to_string()),
        },
        Appointment {
            id: "2".to_string(),
            patient_id: "2".to_string(),
            patient_name: "Patient B".to_string(),
            doctor_id: "2".to_string(),
            doctor_name: "Dr. Michael Chen".to_string(),
            date: date(2024, 1, 17),
            time: time(14, 30),
            kind: AppointmentType::Emergency,
            status: AppointmentStatus::InProgress,
            notes: Some("Urgent care required".to_string()),
        },
        Appointment {
            id: "3".to_string(),
            patient_id: "3".to_string(),
            patient_name: "Patient C".to_string(),
            doctor_id: "1".to_string(),
            doctor_name: "Dr. Sarah Wilson".to_string(),
            date: date(2024, 1, 18),
            time: time(9, 0),
            kind: AppointmentType::FollowUp,
            status: AppointmentStatus::Scheduled,
            notes: Some("Post-surgery follow-up".to_string()),
        },
    ]
}

pub fn departments() -> Vec<Department> {
    let dept = |id: &str, name: &str, head: &str, staff: u32, rooms: u32, current: u32, max: u32| Department {
        id: id.to_string(),
        name: name.to_string(),
        head: head.to_string(),
        staff_count: staff,
        room_count: rooms,
        current_patients: current,
        max_capacity: max,
    };
    vec![
        dept("1", "Cardiology", "Dr. Sarah Wilson", 12, 8, 15, 20),
        dept("2", "Emergency", "Dr. Michael Chen", 18, 6, 8, 12),
        dept("3", "ICU", "Dr. Patricia Lee", 20, 10, 12, 15),
        dept("4", "Surgery", "Dr. James Rodriguez", 15, 5, 6, 8),
    ]
}

pub fn rooms() -> Vec<Room> {
    vec![
        Room {
            id: "1".to_string(),
            number: "101".to_string(),
            kind: RoomType::General,
            department: "Cardiology".to_string(),
            status: RoomStatus::Occupied,
            patient_id: Some("1".to_string()),
            equipment: strings(&["Monitor", "IV Stand", "Bed"]),
        },
        Room {
            id: "2".to_string(),
            number: "102".to_string(),
            kind: RoomType::General,
            department: "Cardiology".to_string(),
            status: RoomStatus::Available,
            patient_id: None,
            equipment: strings(&["Monitor", "IV Stand", "Bed"]),
        },
        Room {
            id: "3".to_string(),
            number: "103".to_string(),
            kind: RoomType::General,
            department: "Cardiology".to_string(),
            status: RoomStatus::Occupied,
            patient_id: Some("3".to_string()),
            equipment: strings(&["Monitor", "IV Stand", "Bed", "Oxygen"]),
        },
        Room {
            id: "4".to_string(),
            number: "205".to_string(),
            kind: RoomType::Icu,
            department: "ICU".to_string(),
            status: RoomStatus::Occupied,
            patient_id: Some("2".to_string()),
            equipment: strings(&["Ventilator", "Monitor", "IV Stand", "Bed", "Defibrillator"]),
        },
    ]
}

pub fn dashboard_stats() -> Vec<StatCard> {
    let stat = |label: &str, value: &str, change: &str, trend: Trend, icon: &str, color: &str| StatCard {
        label: label.to_string(),
        value: value.to_string(),
        change: change.to_string(),
        trend,
        icon: icon.to_string(),
        color: color.to_string(),
    };
    vec![
        stat("Total Patients", "247", "+12%", Trend::Up, "users", "blue"),
        stat("Today's Appointments", "32", "+5%", Trend::Up, "calendar", "green"),
        stat("Available Rooms", "18", "-3", Trend::Down, "bed", "orange"),
        stat("Staff On Duty", "45", "+2", Trend::Up, "hospital", "purple"),
    ]
}

pub fn recent_activities() -> Vec<Activity> {
    let act = |time: &str, activity: &str, kind: ActivityKind| Activity {
        time: time.to_string(),
        activity: activity.to_string(),
        kind,
    };
    vec![
        act("10:30 AM", "New patient admitted to Room 205", ActivityKind::Admission),
        act("10:15 AM", "Emergency case assigned to Dr. Chen", ActivityKind::Emergency),
        act("09:45 AM", "Surgery completed successfully", ActivityKind::Surgery),
        act("09:30 AM", "Room 103 cleaned and ready for next patient", ActivityKind::Maintenance),
        act("09:15 AM", "Lab results uploaded for patient in Room 301", ActivityKind::Lab),
        act("09:00 AM", "Morning shift handover completed", ActivityKind::Shift),
    ]
}

pub fn critical_patients() -> Vec<CriticalPatient> {
    vec![
        CriticalPatient {
            name: "Patient A".to_string(),
            room: "205".to_string(),
            condition: PatientCondition::Critical,
            doctor: "Dr. Michael Chen".to_string(),
        },
        CriticalPatient {
            name: "Patient B".to_string(),
            room: "301".to_string(),
            condition: PatientCondition::Critical,
            doctor: "Dr. Sarah Wilson".to_string(),
        },
    ]
}

pub fn upcoming_visits() -> Vec<PatientVisit> {
    vec![
        PatientVisit {
            id: "1".to_string(),
            date: date(2024, 1, 18),
            time: "10:00 AM".to_string(),
            doctor: "Dr. Sarah Wilson".to_string(),
            specialty: "Cardiology".to_string(),
            kind: VisitKind::InPerson,
            location: "Room 205, Cardiology Wing".to_string(),
            status: VisitStatus::Confirmed,
        },
        PatientVisit {
            id: "2".to_string(),
            date: date(2024, 1, 25),
            time: "2:30 PM".to_string(),
            doctor: "Dr. Michael Chen".to_string(),
            specialty: "General Medicine".to_string(),
            kind: VisitKind::Telemedicine,
            location: "Video Call".to_string(),
            status: VisitStatus::Confirmed,
        },
    ]
}

pub fn past_visits() -> Vec<PatientVisit> {
    vec![PatientVisit {
        id: "3".to_string(),
        date: date(2024, 1, 10),
        time: "9:00 AM".to_string(),
        doctor: "Dr. Sarah Wilson".to_string(),
        specialty: "Cardiology".to_string(),
        kind: VisitKind::InPerson,
        location: "Room 205, Cardiology Wing".to_string(),
        status: VisitStatus::Completed,
    }]
}

pub fn recent_results() -> Vec<TestResult> {
    let result = |test: &str, value: &str, d: NaiveDate| TestResult {
        test: test.to_string(),
        result: value.to_string(),
        status: "Normal".to_string(),
        date: d,
    };
    vec![
        result("Blood Pressure", "120/80 mmHg", date(2024, 1, 15)),
        result("Heart Rate", "72 bpm", date(2024, 1, 15)),
        result("Blood Sugar", "95 mg/dL", date(2024, 1, 10)),
    ]
}

pub fn medications() -> Vec<Medication> {
    vec![
        Medication {
            name: "Lisinopril".to_string(),
            dosage: "10mg".to_string(),
            frequency: "Once daily".to_string(),
            next_dose: "8:00 AM".to_string(),
        },
        Medication {
            name: "Metformin".to_string(),
            dosage: "500mg".to_string(),
            frequency: "Twice daily".to_string(),
            next_dose: "6:00 PM".to_string(),
        },
    ]
}
