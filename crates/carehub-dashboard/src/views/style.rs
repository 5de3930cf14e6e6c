//! Badge colours and icons for categorical values.

use std::str::FromStr;

use carehub_core::model::{ActivityKind, VisitStatus};
use carehub_core::{
    AppointmentStatus, AppointmentType, PatientCondition, RoomStatus, RoomType, StaffRole,
    StaffStatus,
};

/// Tailwind colour family used for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Orange,
    Teal,
    Gray,
}

impl BadgeColor {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeColor::Red => "red",
            BadgeColor::Yellow => "yellow",
            BadgeColor::Green => "green",
            BadgeColor::Blue => "blue",
            BadgeColor::Purple => "purple",
            BadgeColor::Pink => "pink",
            BadgeColor::Orange => "orange",
            BadgeColor::Teal => "teal",
            BadgeColor::Gray => "gray",
        }
    }

    /// Map a free-form label through `f`; labels that name no variant are gray.
    pub fn for_label<T: FromStr>(label: &str, f: fn(T) -> BadgeColor) -> BadgeColor {
        label.parse().map(f).unwrap_or(BadgeColor::Gray)
    }
}

pub fn condition_color(condition: PatientCondition) -> BadgeColor {
    match condition {
        PatientCondition::Critical => BadgeColor::Red,
        PatientCondition::UnderObservation => BadgeColor::Yellow,
        PatientCondition::Stable => BadgeColor::Green,
        PatientCondition::Discharged => BadgeColor::Gray,
    }
}

pub fn staff_status_color(status: StaffStatus) -> BadgeColor {
    match status {
        StaffStatus::OnDuty => BadgeColor::Green,
        StaffStatus::Available => BadgeColor::Blue,
        StaffStatus::OffDuty => BadgeColor::Gray,
        StaffStatus::OnLeave => BadgeColor::Yellow,
    }
}

pub fn staff_role_color(role: StaffRole) -> BadgeColor {
    match role {
        StaffRole::Doctor => BadgeColor::Purple,
        StaffRole::Nurse => BadgeColor::Pink,
        StaffRole::Administrator => BadgeColor::Orange,
        StaffRole::Technician => BadgeColor::Teal,
    }
}

pub fn appointment_status_color(status: AppointmentStatus) -> BadgeColor {
    match status {
        AppointmentStatus::Scheduled => BadgeColor::Blue,
        AppointmentStatus::InProgress => BadgeColor::Yellow,
        AppointmentStatus::Completed => BadgeColor::Green,
        AppointmentStatus::Cancelled => BadgeColor::Red,
    }
}

pub fn appointment_type_color(kind: AppointmentType) -> BadgeColor {
    match kind {
        AppointmentType::Emergency => BadgeColor::Red,
        AppointmentType::Surgery => BadgeColor::Purple,
        AppointmentType::Consultation => BadgeColor::Blue,
        AppointmentType::FollowUp => BadgeColor::Green,
    }
}

pub fn room_status_color(status: RoomStatus) -> BadgeColor {
    match status {
        RoomStatus::Occupied => BadgeColor::Red,
        RoomStatus::Available => BadgeColor::Green,
        RoomStatus::Maintenance => BadgeColor::Yellow,
    }
}

/// Font Awesome icon for a room status.
pub fn room_status_icon(status: RoomStatus) -> &'static str {
    match status {
        RoomStatus::Occupied => "user",
        RoomStatus::Available => "check-circle",
        RoomStatus::Maintenance => "wrench",
    }
}

pub fn room_type_color(kind: RoomType) -> BadgeColor {
    match kind {
        RoomType::Icu => BadgeColor::Purple,
        RoomType::Surgery => BadgeColor::Red,
        RoomType::Emergency => BadgeColor::Orange,
        RoomType::General => BadgeColor::Blue,
    }
}

pub fn visit_status_color(status: VisitStatus) -> BadgeColor {
    match status {
        VisitStatus::Confirmed => BadgeColor::Green,
        VisitStatus::Completed => BadgeColor::Blue,
        VisitStatus::Cancelled => BadgeColor::Red,
    }
}

/// Dot colour of an entry in the staff dashboard's activity feed.
pub fn activity_color(kind: ActivityKind) -> BadgeColor {
    match kind {
        ActivityKind::Admission => BadgeColor::Blue,
        ActivityKind::Emergency => BadgeColor::Red,
        ActivityKind::Surgery => BadgeColor::Purple,
        ActivityKind::Maintenance => BadgeColor::Yellow,
        ActivityKind::Lab => BadgeColor::Green,
        ActivityKind::Shift => BadgeColor::Gray,
    }
}

/// Lab results only distinguish normal from everything else.
pub fn result_status_color(status: &str) -> BadgeColor {
    if status.eq_ignore_ascii_case("normal") {
        BadgeColor::Green
    } else {
        BadgeColor::Yellow
    }
}
