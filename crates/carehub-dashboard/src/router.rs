//! Role router.
//!
//! Maps the current user and the requested tab to the view to render. The
//! mapping is total: unknown tabs resolve to the role's dashboard.

use carehub_core::{AuthenticatedUser, Role};
use carehub_session::{AuthPhase, AuthSnapshot};

/// Tabs of the hospital staff interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffTab {
    Dashboard,
    Patients,
    Appointments,
    Staff,
    Departments,
    Rooms,
    Profile,
}

impl StaffTab {
    pub const ALL: &'static [StaffTab] = &[
        StaffTab::Dashboard,
        StaffTab::Patients,
        StaffTab::Appointments,
        StaffTab::Staff,
        StaffTab::Departments,
        StaffTab::Rooms,
        StaffTab::Profile,
    ];

    pub fn id(self) -> &'static str {
        match self {
            StaffTab::Dashboard => "dashboard",
            StaffTab::Patients => "patients",
            StaffTab::Appointments => "appointments",
            StaffTab::Staff => "staff",
            StaffTab::Departments => "departments",
            StaffTab::Rooms => "rooms",
            StaffTab::Profile => "profile",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.id() == id)
    }

    fn title(self) -> &'static str {
        match self {
            StaffTab::Dashboard => "Dashboard",
            StaffTab::Patients => "Patients",
            StaffTab::Appointments => "Appointments",
            StaffTab::Staff => "Staff",
            StaffTab::Departments => "Departments",
            StaffTab::Rooms => "Rooms",
            StaffTab::Profile => "Profile Settings",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            StaffTab::Dashboard => "Hospital overview and key metrics",
            StaffTab::Patients => "Manage patient records and information",
            StaffTab::Appointments => "Schedule and manage appointments",
            StaffTab::Staff => "Manage hospital staff and schedules",
            StaffTab::Departments => "Department management and oversight",
            StaffTab::Rooms => "Room availability and management",
            StaffTab::Profile => "Manage your account settings",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            StaffTab::Dashboard => "chart-bar",
            StaffTab::Patients => "users",
            StaffTab::Appointments => "calendar",
            StaffTab::Staff => "user-check",
            StaffTab::Departments => "building",
            StaffTab::Rooms => "bed",
            StaffTab::Profile => "cog",
        }
    }
}

/// Tabs of the patient portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientTab {
    Dashboard,
    Appointments,
    MedicalRecords,
    HealthMetrics,
    Messages,
    Profile,
}

impl PatientTab {
    pub const ALL: &'static [PatientTab] = &[
        PatientTab::Dashboard,
        PatientTab::Appointments,
        PatientTab::MedicalRecords,
        PatientTab::HealthMetrics,
        PatientTab::Messages,
        PatientTab::Profile,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PatientTab::Dashboard => "dashboard",
            PatientTab::Appointments => "appointments",
            PatientTab::MedicalRecords => "medical-records",
            PatientTab::HealthMetrics => "health-metrics",
            PatientTab::Messages => "messages",
            PatientTab::Profile => "profile",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.id() == id)
    }

    fn title(self) -> &'static str {
        match self {
            PatientTab::Dashboard => "My Dashboard",
            PatientTab::Appointments => "My Appointments",
            PatientTab::MedicalRecords => "Medical Records",
            PatientTab::HealthMetrics => "Health Metrics",
            PatientTab::Messages => "Messages",
            PatientTab::Profile => "Profile Settings",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            PatientTab::Dashboard => "Your health overview and recent activity",
            PatientTab::Appointments => "Manage your healthcare appointments",
            PatientTab::MedicalRecords => "View your medical history and records",
            PatientTab::HealthMetrics => "Track your health progress",
            PatientTab::Messages => "Communicate with your healthcare team",
            PatientTab::Profile => "Manage your account settings",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            PatientTab::Dashboard => "user",
            PatientTab::Appointments => "calendar",
            PatientTab::MedicalRecords => "file-alt",
            PatientTab::HealthMetrics => "heart",
            PatientTab::Messages => "comment",
            PatientTab::Profile => "cog",
        }
    }
}

/// What to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Session restore still running.
    Loading,
    /// Login / registration.
    Entry,
    Staff(StaffTab),
    Patient(PatientTab),
}

/// A resolved view with its header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub view: View,
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// Resolve the view for a user and a requested tab.
pub fn resolve(user: Option<&AuthenticatedUser>, tab: Option<&str>) -> Route {
    let Some(user) = user else {
        return Route {
            view: View::Entry,
            title: "Sign In",
            subtitle: "Access your CareHub account",
        };
    };
    let tab = tab.unwrap_or_default();

    match user.role {
        Role::Patient => {
            let tab = PatientTab::from_id(tab).unwrap_or(PatientTab::Dashboard);
            Route {
                view: View::Patient(tab),
                title: tab.title(),
                subtitle: tab.subtitle(),
            }
        }
        Role::HospitalStaff => {
            let tab = StaffTab::from_id(tab).unwrap_or(StaffTab::Dashboard);
            Route {
                view: View::Staff(tab),
                title: tab.title(),
                subtitle: tab.subtitle(),
            }
        }
    }
}

/// Resolve from a controller snapshot; shows the loading view until the
/// controller has left the `Initializing` phase.
pub fn resolve_snapshot(snapshot: &AuthSnapshot, tab: Option<&str>) -> Route {
    if snapshot.phase == AuthPhase::Initializing {
        return Route {
            view: View::Loading,
            title: "Loading...",
            subtitle: "",
        };
    }
    resolve(snapshot.user.as_ref(), tab)
}

/// Sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
    /// Font Awesome icon name.
    pub icon: &'static str,
}

/// Sidebar menu for a role.
pub fn nav_menu(role: Role) -> Vec<NavItem> {
    match role {
        Role::Patient => PatientTab::ALL
            .iter()
            .map(|t| NavItem {
                id: t.id(),
                label: t.title(),
                icon: t.icon(),
            })
            .collect(),
        Role::HospitalStaff => StaffTab::ALL
            .iter()
            .map(|t| NavItem {
                id: t.id(),
                label: t.title(),
                icon: t.icon(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: "u1".to_string(),
            email: "a@h.com".to_string(),
            role,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: None,
            department: None,
            specialization: None,
            patient_id: None,
            staff_id: None,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn no_user_routes_to_entry() {
        assert_eq!(resolve(None, Some("patients")).view, View::Entry);
        assert_eq!(resolve(None, None).view, View::Entry);
    }

    #[test]
    fn patient_tabs() {
        let patient = user(Role::Patient);
        let route = resolve(Some(&patient), Some("medical-records"));
        assert_eq!(route.view, View::Patient(PatientTab::MedicalRecords));
        assert_eq!(route.title, "Medical Records");
        assert_eq!(route.subtitle, "View your medical history and records");

        let route = resolve(Some(&patient), Some("profile"));
        assert_eq!(route.title, "Profile Settings");
    }

    #[test]
    fn staff_tabs() {
        let staff = user(Role::HospitalStaff);
        let route = resolve(Some(&staff), Some("rooms"));
        assert_eq!(route.view, View::Staff(StaffTab::Rooms));
        assert_eq!(route.subtitle, "Room availability and management");
    }

    #[test]
    fn unknown_tab_falls_back_to_dashboard() {
        let patient = user(Role::Patient);
        let staff = user(Role::HospitalStaff);

        let route = resolve(Some(&patient), Some("nonexistent"));
        assert_eq!(route.view, View::Patient(PatientTab::Dashboard));
        assert_eq!(route.title, "My Dashboard");

        // Staff-only tab requested by a patient.
        let route = resolve(Some(&patient), Some("rooms"));
        assert_eq!(route.view, View::Patient(PatientTab::Dashboard));

        let route = resolve(Some(&staff), Some("nonexistent"));
        assert_eq!(route.view, View::Staff(StaffTab::Dashboard));
        assert_eq!(route.title, "Dashboard");
        assert_eq!(resolve(Some(&staff), None).view, View::Staff(StaffTab::Dashboard));
    }

    #[test]
    fn initializing_snapshot_is_loading() {
        let snapshot = AuthSnapshot {
            phase: AuthPhase::Initializing,
            user: None,
            loading: true,
        };
        assert_eq!(resolve_snapshot(&snapshot, None).view, View::Loading);

        let snapshot = AuthSnapshot {
            phase: AuthPhase::Authenticated,
            user: Some(user(Role::HospitalStaff)),
            loading: false,
        };
        assert_eq!(
            resolve_snapshot(&snapshot, Some("staff")).view,
            View::Staff(StaffTab::Staff)
        );
    }

    #[test]
    fn nav_menus_follow_tab_order() {
        let staff: Vec<&str> = nav_menu(Role::HospitalStaff).iter().map(|i| i.id).collect();
        assert_eq!(
            staff,
            ["dashboard", "patients", "appointments", "staff", "departments", "rooms", "profile"]
        );
        let patient = nav_menu(Role::Patient);
        assert_eq!(patient[0].label, "My Dashboard");
        assert!(patient.iter().all(|item| PatientTab::from_id(item.id).is_some()));
    }
}
