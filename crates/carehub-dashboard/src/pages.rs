//! Page renderers for the hospital staff interface, plus the profile page
//! shared by both roles.

use carehub_core::model::{Activity, CriticalPatient, StatCard, Trend};
use carehub_core::{
    Appointment, AppointmentStatus, AuthenticatedUser, Department, LoginSession, Patient,
    PatientCondition, Role, Room, RoomStatus, RoomType, Staff, StaffRole, StaffStatus,
};
use chrono::{DateTime, Utc};

use crate::templates::{
    self, badge, card, empty_state, html_escape, input, options_with_all, select, stats_card,
    submit_button, table,
};
use crate::views::capacity::{self, OccupancyBand, RoomCounts};
use crate::views::filters::ROOM_DEPARTMENTS;
use crate::views::style::{
    activity_color, appointment_status_color, appointment_type_color, condition_color,
    room_status_color, room_status_icon, room_type_color, staff_role_color, staff_status_color,
};
use crate::views::{AppointmentFilter, PatientFilter, RoomFilter, StaffFilter};

/// Departments selectable on the staff profile form.
pub const PROFILE_DEPARTMENTS: &[&str] = &[
    "Cardiology",
    "Emergency",
    "ICU",
    "Surgery",
    "Pediatrics",
    "Radiology",
    "Administration",
];

/// Shown while the browser session is being restored.
pub fn loading_page() -> String {
    templates::layout("Loading...", templates::spinner())
}

fn page_heading(title: &str, subtitle: &str) -> String {
    format!(
        r##"<div>
            <h2 class="text-xl font-semibold text-gray-900">{title}</h2>
            <p class="text-gray-600">{subtitle}</p>
        </div>"##
    )
}

/// GET filter form that keeps the current tab.
fn filter_form(tab: &str, fields: &[String]) -> String {
    let fields: String = fields.concat();
    format!(
        r##"<form method="GET" action="/" class="bg-white rounded-xl shadow-sm border border-gray-100 p-4">
            <input type="hidden" name="tab" value="{tab}">
            <div class="grid grid-cols-1 md:grid-cols-4 gap-4 items-end">
                {fields}
                <div>{button}</div>
            </div>
        </form>"##,
        button = submit_button("Filter", "filter"),
    )
}

fn labels<T: Copy>(all: &[T], label: fn(T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(|v| label(*v)).collect()
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn staff_dashboard(
    stats: &[StatCard],
    activities: &[Activity],
    critical: &[CriticalPatient],
    departments: &[Department],
) -> String {
    let stats_html: String = stats
        .iter()
        .map(|s| {
            stats_card(
                &html_escape(&s.label),
                &html_escape(&s.value),
                &s.icon,
                &s.color,
                Some((s.change.as_str(), s.trend == Trend::Up)),
            )
        })
        .collect();

    let activity_html: String = activities
        .iter()
        .map(|a| {
            format!(
                r##"<div class="flex items-start gap-3">
                    <div class="w-2 h-2 bg-{color}-500 rounded-full mt-2"></div>
                    <div class="flex-1">
                        <p class="text-sm text-gray-900">{text}</p>
                        <p class="text-xs text-gray-500 mt-1">{time}</p>
                    </div>
                </div>"##,
                color = activity_color(a.kind).as_str(),
                text = html_escape(&a.activity),
                time = html_escape(&a.time),
            )
        })
        .collect();

    let critical_html: String = critical
        .iter()
        .map(|p| {
            format!(
                r##"<div class="bg-red-50 border border-red-200 rounded-lg p-4">
                    <div class="flex items-center justify-between">
                        <div>
                            <p class="font-medium text-gray-900">{name}</p>
                            <p class="text-sm text-gray-600">Room {room} &bull; {doctor}</p>
                        </div>
                        {badge}
                    </div>
                </div>"##,
                name = html_escape(&p.name),
                room = html_escape(&p.room),
                doctor = html_escape(&p.doctor),
                badge = badge(p.condition.label(), condition_color(p.condition)),
            )
        })
        .collect();

    let overview_html: String = departments
        .iter()
        .map(|d| {
            format!(
                r##"<div class="border border-gray-200 rounded-lg p-4">
                    <h4 class="font-medium text-gray-900 mb-2">{name}</h4>
                    <div class="space-y-2">
                        <div class="flex justify-between text-sm">
                            <span class="text-gray-600">Occupancy</span>
                            <span class="font-medium">{label}</span>
                        </div>
                        {bar}
                    </div>
                </div>"##,
                name = html_escape(&d.name),
                label = capacity::occupancy_label(d.current_patients, d.max_capacity),
                bar = occupancy_bar(d.current_patients, d.max_capacity),
            )
        })
        .collect();

    format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6">{stats_html}</div>
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            {ACTIVITY}
            {CRITICAL}
        </div>
        {OVERVIEW}"##,
        ACTIVITY = card("Recent Activity", &format!(r#"<div class="space-y-4">{activity_html}</div>"#)),
        CRITICAL = card("Critical Patients", &format!(r#"<div class="space-y-4">{critical_html}</div>"#)),
        OVERVIEW = card(
            "Department Overview",
            &format!(r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4">{overview_html}</div>"#)
        ),
    )
}

fn occupancy_bar(current: u32, max: u32) -> String {
    format!(
        r##"<div class="w-full bg-gray-200 rounded-full h-2">
            <div class="bg-{color}-500 h-2 rounded-full" style="width: {width:.1}%"></div>
        </div>"##,
        color = OccupancyBand::of(current, max).color().as_str(),
        width = capacity::display_width(current, max),
    )
}

pub fn patients_page(patients: &[Patient], filter: &PatientFilter) -> String {
    let form = filter_form(
        "patients",
        &[
            format!(
                r##"<div class="md:col-span-2">{}</div>"##,
                input(
                    "search",
                    "Search",
                    "text",
                    &filter.search,
                    "Search patients by name or room number..."
                )
            ),
            select(
                "condition",
                "Condition",
                &options_with_all(labels(PatientCondition::ALL, PatientCondition::label)),
                &filter.condition.selected(),
            ),
        ],
    );

    let matches = filter.apply(patients);
    let body = if matches.is_empty() {
        empty_state("search", "No patients found", "No patients found matching your search criteria.")
    } else {
        let rows: Vec<Vec<String>> = matches
            .iter()
            .map(|p| {
                vec![
                    format!(
                        r#"<div class="font-medium">{}</div><div class="text-xs text-gray-500">{} &bull; {}</div>"#,
                        html_escape(&p.full_name()),
                        p.gender,
                        html_escape(&p.blood_type)
                    ),
                    format!(
                        r#"<div>{}</div><div class="text-xs text-gray-500">{}</div>"#,
                        html_escape(&p.phone),
                        html_escape(&p.email)
                    ),
                    html_escape(p.room_number.as_deref().unwrap_or("-")),
                    badge(p.current_condition.label(), condition_color(p.current_condition)),
                    html_escape(p.assigned_doctor.as_deref().unwrap_or("-")),
                    p.admission_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        table(&["Patient", "Contact", "Room", "Condition", "Doctor", "Admission"], &rows)
    };

    format!(
        "{}{}{}",
        page_heading("Patient Management", "Manage patient records and information"),
        form,
        card(&format!("Patients ({})", matches.len()), &body)
    )
}

pub fn appointments_page(appointments: &[Appointment], filter: &AppointmentFilter) -> String {
    let form = filter_form(
        "appointments",
        &[
            input("date", "Date", "date", &filter.date.to_string(), ""),
            select(
                "status",
                "Status",
                &options_with_all(labels(AppointmentStatus::ALL, AppointmentStatus::label)),
                &filter.status.selected(),
            ),
        ],
    );

    let mut matches = filter.apply(appointments);
    matches.sort_by_key(|a| a.time);
    let body = if matches.is_empty() {
        empty_state(
            "calendar",
            "No appointments",
            &format!("No appointments scheduled for {}", filter.date),
        )
    } else {
        let rows: Vec<Vec<String>> = matches
            .iter()
            .map(|a| {
                vec![
                    a.time.format("%H:%M").to_string(),
                    html_escape(&a.patient_name),
                    html_escape(&a.doctor_name),
                    badge(a.kind.label(), appointment_type_color(a.kind)),
                    badge(a.status.label(), appointment_status_color(a.status)),
                    html_escape(a.notes.as_deref().unwrap_or("")),
                ]
            })
            .collect();
        table(&["Time", "Patient", "Doctor", "Type", "Status", "Notes"], &rows)
    };

    format!(
        "{}{}{}",
        page_heading("Appointment Management", "Schedule and manage patient appointments"),
        form,
        card(&format!("Appointments for {}", filter.date), &body)
    )
}

pub fn staff_page(staff: &[Staff], filter: &StaffFilter) -> String {
    let form = filter_form(
        "staff",
        &[
            select(
                "role",
                "Role",
                &options_with_all(labels(StaffRole::ALL, StaffRole::label)),
                &filter.role.selected(),
            ),
            select(
                "status",
                "Status",
                &options_with_all(labels(StaffStatus::ALL, StaffStatus::label)),
                &filter.status.selected(),
            ),
        ],
    );

    let matches = filter.apply(staff);
    let body = if matches.is_empty() {
        empty_state("user-slash", "No staff found", "No staff members found matching your criteria.")
    } else {
        let cards: String = matches
            .iter()
            .map(|m| {
                let specialization = m
                    .specialization
                    .as_deref()
                    .map(|s| format!(r#"<p class="text-sm text-gray-600">{}</p>"#, html_escape(s)))
                    .unwrap_or_default();
                format!(
                    r##"<div class="border border-gray-200 rounded-lg p-4 space-y-3">
                        <div class="flex items-center justify-between">
                            <div>
                                <p class="font-medium text-gray-900">{name}</p>
                                {specialization}
                            </div>
                            {status}
                        </div>
                        <div class="flex gap-2">{role}</div>
                        <div class="text-sm text-gray-600 space-y-1">
                            <p><i class="fas fa-phone w-4 mr-2"></i>{phone}</p>
                            <p><i class="fas fa-envelope w-4 mr-2"></i>{email}</p>
                            <p><i class="fas fa-clock w-4 mr-2"></i>{shift} Shift</p>
                        </div>
                        <div class="pt-3 border-t border-gray-100 text-sm">
                            <span class="text-gray-600">Department</span>
                            <span class="font-medium ml-2">{department}</span>
                        </div>
                    </div>"##,
                    name = html_escape(&m.display_name()),
                    status = badge(m.status.label(), staff_status_color(m.status)),
                    role = badge(m.role.label(), staff_role_color(m.role)),
                    phone = html_escape(&m.phone),
                    email = html_escape(&m.email),
                    shift = m.shift,
                    department = html_escape(&m.department),
                )
            })
            .collect();
        format!(r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">{cards}</div>"#)
    };

    format!(
        "{}{}{}",
        page_heading("Staff Management", "Manage hospital staff and schedules"),
        form,
        card(&format!("Staff ({})", matches.len()), &body)
    )
}

pub fn departments_page(departments: &[Department]) -> String {
    let cards: String = departments
        .iter()
        .map(|d| {
            let band = OccupancyBand::of(d.current_patients, d.max_capacity);
            format!(
                r##"<div class="bg-white rounded-xl shadow-sm border border-gray-100 p-6 space-y-4">
                    <div>
                        <h3 class="text-lg font-semibold text-gray-900">{name}</h3>
                        <p class="text-sm text-gray-600">Head: {head}</p>
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="bg-blue-50 rounded-lg p-3">
                            <p class="text-2xl font-bold text-blue-700">{staff}</p>
                            <p class="text-xs text-blue-600">Staff Members</p>
                        </div>
                        <div class="bg-green-50 rounded-lg p-3">
                            <p class="text-2xl font-bold text-green-700">{rooms}</p>
                            <p class="text-xs text-green-600">Total Rooms</p>
                        </div>
                    </div>
                    <div class="space-y-2">
                        <div class="flex justify-between text-sm">
                            <span class="text-gray-600">Patient Capacity</span>
                            <span class="font-medium">{current}/{max} ({label})</span>
                        </div>
                        {bar}
                    </div>
                    <div class="flex justify-between text-sm">
                        <div>
                            <span class="text-gray-600">Available Beds:</span>
                            <span class="font-medium ml-2">{free}</span>
                        </div>
                        <div>
                            <span class="text-gray-600">Status:</span>
                            <span class="ml-2 font-medium text-{color}-600">{status}</span>
                        </div>
                    </div>
                </div>"##,
                name = html_escape(&d.name),
                head = html_escape(&d.head),
                staff = d.staff_count,
                rooms = d.room_count,
                current = d.current_patients,
                max = d.max_capacity,
                label = capacity::occupancy_label(d.current_patients, d.max_capacity),
                bar = occupancy_bar(d.current_patients, d.max_capacity),
                free = d.max_capacity.saturating_sub(d.current_patients),
                color = band.color().as_str(),
                status = band.label(),
            )
        })
        .collect();

    format!(
        r##"{heading}<div class="grid grid-cols-1 md:grid-cols-2 gap-6">{cards}</div>"##,
        heading = page_heading("Department Management", "Manage hospital departments and their resources"),
    )
}

pub fn rooms_page(rooms: &[Room], filter: &RoomFilter) -> String {
    let form = filter_form(
        "rooms",
        &[
            select(
                "department",
                "Department",
                &options_with_all(ROOM_DEPARTMENTS.iter().copied()),
                &filter.department.selected(),
            ),
            select(
                "type",
                "Type",
                &options_with_all(labels(RoomType::ALL, RoomType::label)),
                &filter.kind.selected(),
            ),
            select(
                "status",
                "Status",
                &options_with_all(labels(RoomStatus::ALL, RoomStatus::label)),
                &filter.status.selected(),
            ),
        ],
    );

    let counts = RoomCounts::tally(rooms);
    let summary = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-4 gap-6">{}{}{}{}</div>"##,
        stats_card("Available", &counts.available.to_string(), "check-circle", "green", None),
        stats_card("Occupied", &counts.occupied.to_string(), "user", "red", None),
        stats_card("Maintenance", &counts.maintenance.to_string(), "wrench", "yellow", None),
        stats_card("Total Rooms", &rooms.len().to_string(), "bed", "blue", None),
    );

    let matches = filter.apply(rooms);
    let body = if matches.is_empty() {
        empty_state("bed", "No rooms found", "No rooms found matching your criteria.")
    } else {
        let cards: String = matches
            .iter()
            .map(|r| {
                let patient = r
                    .patient_id
                    .as_deref()
                    .map(|id| {
                        format!(
                            r#"<p class="text-sm text-gray-600">Patient Assigned: <span class="font-medium">#{}</span></p>"#,
                            html_escape(id)
                        )
                    })
                    .unwrap_or_default();
                let equipment: String = r
                    .equipment
                    .iter()
                    .map(|e| {
                        format!(
                            r#"<span class="px-2 py-1 bg-gray-100 text-gray-700 text-xs rounded">{}</span>"#,
                            html_escape(e)
                        )
                    })
                    .collect();
                format!(
                    r##"<div class="border border-gray-200 rounded-lg p-4 space-y-3">
                        <div class="flex items-center justify-between">
                            <div>
                                <p class="text-lg font-semibold text-gray-900">Room {number}</p>
                                <p class="text-sm text-gray-600">{department}</p>
                            </div>
                            <i class="fas fa-{icon} text-{status_color}-500 text-xl"></i>
                        </div>
                        <div class="flex gap-2">{kind}{status}</div>
                        {patient}
                        <div>
                            <p class="text-sm text-gray-600 mb-2">Equipment Available:</p>
                            <div class="flex flex-wrap gap-1">{equipment}</div>
                        </div>
                    </div>"##,
                    number = html_escape(&r.number),
                    department = html_escape(&r.department),
                    icon = room_status_icon(r.status),
                    status_color = room_status_color(r.status).as_str(),
                    kind = badge(r.kind.label(), room_type_color(r.kind)),
                    status = badge(r.status.label(), room_status_color(r.status)),
                )
            })
            .collect();
        format!(r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">{cards}</div>"#)
    };

    format!(
        "{}{}{}{}",
        page_heading("Room Management", "Monitor room availability and manage assignments"),
        summary,
        form,
        card(&format!("Rooms ({})", matches.len()), &body)
    )
}

/// Account settings: editable profile form and the login history.
pub fn profile_page(user: &AuthenticatedUser, history: &[LoginSession]) -> String {
    let staff_fields = if user.role == Role::HospitalStaff {
        let mut departments = vec![(String::new(), "Select Department".to_string())];
        departments.extend(PROFILE_DEPARTMENTS.iter().map(|d| (d.to_string(), d.to_string())));
        format!(
            "{}{}",
            select(
                "department",
                "Department",
                &departments,
                user.department.as_deref().unwrap_or_default()
            ),
            input(
                "specialization",
                "Specialization",
                "text",
                user.specialization.as_deref().unwrap_or_default(),
                "e.g., Cardiovascular Surgery"
            ),
        )
    } else {
        String::new()
    };

    let form = format!(
        r##"<form method="POST" action="/profile" class="space-y-6">
            <div class="grid grid-cols-1 md:grid-cols-2 gap-6">{first}{last}</div>
            <div class="space-y-1">
                <label class="block text-sm font-medium text-gray-700">Email Address</label>
                <input type="email" value="{email}" disabled class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-gray-50">
                <p class="text-sm text-gray-500">Email cannot be changed</p>
            </div>
            {phone}
            <div class="space-y-1">
                <label class="block text-sm font-medium text-gray-700">Role</label>
                <input type="text" value="{role}" disabled class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-gray-50">
            </div>
            {staff_fields}
            {save}
        </form>"##,
        first = input("first_name", "First Name", "text", &user.first_name, ""),
        last = input("last_name", "Last Name", "text", &user.last_name, ""),
        email = html_escape(&user.email),
        phone = input("phone", "Phone Number", "tel", user.phone.as_deref().unwrap_or_default(), ""),
        role = user.role.label(),
        save = submit_button("Save Changes", "save"),
    );

    let (status_color, status) = if user.is_active {
        ("green", "Active")
    } else {
        ("red", "Inactive")
    };
    let account = format!(
        r##"<div class="bg-gray-50 rounded-lg p-4 space-y-3 mb-8">
            <div class="flex justify-between text-sm"><span class="text-gray-600">Account Created:</span><span class="font-medium">{created}</span></div>
            <div class="flex justify-between text-sm"><span class="text-gray-600">Last Login:</span><span class="font-medium">{last_login}</span></div>
            <div class="flex justify-between text-sm"><span class="text-gray-600">Account Status:</span><span class="font-medium text-{status_color}-600">{status}</span></div>
        </div>"##,
        created = format_time(user.created_at),
        last_login = user.last_login.map(format_time).unwrap_or_else(|| "Never".to_string()),
    );

    let sessions = if history.is_empty() {
        r#"<div class="text-center py-8 text-gray-500">No login history available</div>"#.to_string()
    } else {
        history.iter().map(login_session_row).collect()
    };

    let security = format!(
        r##"{account}
        <h4 class="font-medium text-gray-900 mb-4"><i class="fas fa-history mr-2"></i>Recent Login Activity</h4>
        <div class="space-y-3">{sessions}</div>"##
    );

    card(
        "Account Settings",
        &templates::tabs(
            "profile-tabs",
            &[
                ("profile", "Profile Information", form),
                ("security", "Security &amp; Login History", security),
            ],
        ),
    )
}

fn login_session_row(session: &LoginSession) -> String {
    let (dot, state, state_color) = if session.is_active {
        ("bg-green-500", "Active", "green")
    } else {
        ("bg-gray-400", "Ended", "gray")
    };
    let logout = session
        .logout_time
        .map(|t| format!(r#"<div><i class="fas fa-clock w-4 mr-2"></i>Logout: {}</div>"#, format_time(t)))
        .unwrap_or_default();
    format!(
        r##"<div class="border border-gray-200 rounded-lg p-4">
            <div class="flex items-center justify-between mb-2">
                <div class="flex items-center gap-2">
                    <div class="w-3 h-3 rounded-full {dot}"></div>
                    <span class="font-medium text-gray-900">{device}</span>
                </div>
                <span class="text-xs px-2 py-1 rounded-full bg-{state_color}-100 text-{state_color}-800">{state}</span>
            </div>
            <div class="text-sm text-gray-600 space-y-1">
                <div><i class="fas fa-clock w-4 mr-2"></i>Login: {login}</div>
                {logout}
                <div><i class="fas fa-globe w-4 mr-2"></i>IP: {ip}</div>
            </div>
        </div>"##,
        device = session.device_label(),
        login = format_time(session.login_time),
        ip = html_escape(session.ip_address.as_deref().unwrap_or("Unknown")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::{NewLoginSession, RegisterData, fixtures};

    #[test]
    fn staff_page_lists_filtered_members() {
        let html = staff_page(&fixtures::staff(), &StaffFilter::new(Some("Doctor"), Some("On Duty")));
        assert!(html.contains("Dr. Sarah Wilson"));
        assert!(!html.contains("Dr. Michael Chen"));
        assert!(html.contains("Staff (1)"));
        assert!(html.contains(r#"<option value="Doctor" selected>"#));
    }

    #[test]
    fn empty_results_show_message() {
        let html = patients_page(&fixtures::patients(), &PatientFilter::new(Some("nobody"), None));
        assert!(html.contains("No patients found matching your search criteria."));

        let html = appointments_page(&fixtures::appointments(), &AppointmentFilter::new(Some("2023-05-01"), None));
        assert!(html.contains("No appointments scheduled for 2023-05-01"));
    }

    #[test]
    fn departments_show_band_and_free_beds() {
        let departments = vec![Department {
            id: "9".to_string(),
            name: "Oncology".to_string(),
            head: "Dr. Who".to_string(),
            staff_count: 3,
            room_count: 2,
            current_patients: 12,
            max_capacity: 10,
        }];
        let html = departments_page(&departments);
        assert!(html.contains("At Capacity"));
        assert!(html.contains("12/10 (120%)"));
        assert!(html.contains("width: 100.0%"));
        assert!(html.contains(r#"<span class="font-medium ml-2">0</span>"#));
    }

    #[test]
    fn rooms_page_counts_all_rooms() {
        let html = rooms_page(&fixtures::rooms(), &RoomFilter::new(Some("ICU"), None, None));
        assert!(html.contains("Rooms (1)"));
        assert!(html.contains("Room 205"));
        assert!(html.contains("fa-wrench"));
    }

    #[test]
    fn profile_page_history() {
        let data = RegisterData {
            email: "p@h.com".to_string(),
            password: "secret1".to_string(),
            first_name: "Pat".to_string(),
            last_name: "Lee".to_string(),
            phone: None,
            role: Role::Patient,
            department: None,
            specialization: None,
        };
        let user = AuthenticatedUser::from_registration("u1", &data, Utc::now());

        let html = profile_page(&user, &[]);
        assert!(html.contains("No login history available"));
        assert!(html.contains("Never"));
        assert!(!html.contains("Specialization"));

        let mut session = NewLoginSession::started("u1", "198.51.100.4".to_string(), Some("Firefox/121".to_string()))
            .into_session("1");
        session.close(Utc::now());
        let html = profile_page(&user, &[session]);
        assert!(html.contains("Firefox Browser"));
        assert!(html.contains("Ended"));
        assert!(html.contains("IP: 198.51.100.4"));
    }
}
