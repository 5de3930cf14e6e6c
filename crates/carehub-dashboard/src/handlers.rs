//! Request handlers for the dashboard.

use axum::{
    Form, Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use carehub_core::{AuthenticatedUser, ProfilePatch, fixtures};
use carehub_session::AuthController;
use tracing::debug;

use crate::api_types::{HealthResponse, HomeQuery, ProfileForm};
use crate::auth::current_session;
use crate::error::DashboardError;
use crate::pages;
use crate::pages_patient;
use crate::router::{PatientTab, StaffTab, View, resolve_snapshot};
use crate::state::AppState;
use crate::templates::{Notice, app_layout};
use crate::views::{AppointmentFilter, PatientFilter, RoomFilter, StaffFilter};

// =============================================================================
// Page Handlers (HTML responses)
// =============================================================================

/// Handler for the role-routed home page.
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HomeQuery>,
) -> Response {
    let Some((_, controller)) = current_session(&state, &headers) else {
        return Redirect::to("/login").into_response();
    };

    let snapshot = controller.snapshot();
    let route = resolve_snapshot(&snapshot, query.tab.as_deref());
    let user = match (route.view, snapshot.user) {
        (View::Loading, _) => return Html(pages::loading_page()).into_response(),
        (View::Staff(_) | View::Patient(_), Some(user)) => user,
        _ => return Redirect::to("/login").into_response(),
    };

    let (active, content) = match route.view {
        View::Staff(tab) => (tab.id(), staff_content(tab, &user, &controller, &query).await),
        View::Patient(tab) => (tab.id(), patient_content(tab, &user, &controller).await),
        View::Loading | View::Entry => return Redirect::to("/login").into_response(),
    };
    debug!(tab = active, role = %user.role, "Rendering page");

    let notice = match (query.error.as_deref(), query.notice.as_deref()) {
        (Some(error), _) => Some(Notice::Error(error)),
        (None, Some(notice)) => Some(Notice::Success(notice)),
        (None, None) => None,
    };
    Html(app_layout(&user, &route, active, &content, notice)).into_response()
}

async fn staff_content(
    tab: StaffTab,
    user: &AuthenticatedUser,
    controller: &AuthController,
    query: &HomeQuery,
) -> String {
    match tab {
        StaffTab::Dashboard => pages::staff_dashboard(
            &fixtures::dashboard_stats(),
            &fixtures::recent_activities(),
            &fixtures::critical_patients(),
            &fixtures::departments(),
        ),
        StaffTab::Patients => pages::patients_page(
            &fixtures::patients(),
            &PatientFilter::new(query.search.as_deref(), query.condition.as_deref()),
        ),
        StaffTab::Appointments => pages::appointments_page(
            &fixtures::appointments(),
            &AppointmentFilter::new(query.date.as_deref(), query.status.as_deref()),
        ),
        StaffTab::Staff => pages::staff_page(
            &fixtures::staff(),
            &StaffFilter::new(query.role.as_deref(), query.status.as_deref()),
        ),
        StaffTab::Departments => pages::departments_page(&fixtures::departments()),
        StaffTab::Rooms => pages::rooms_page(
            &fixtures::rooms(),
            &RoomFilter::new(
                query.kind.as_deref(),
                query.status.as_deref(),
                query.department.as_deref(),
            ),
        ),
        StaffTab::Profile => pages::profile_page(user, &controller.login_history().await),
    }
}

async fn patient_content(tab: PatientTab, user: &AuthenticatedUser, controller: &AuthController) -> String {
    match tab {
        PatientTab::Dashboard => pages_patient::patient_dashboard(
            user,
            &fixtures::upcoming_visits(),
            &fixtures::recent_results(),
            &fixtures::medications(),
        ),
        PatientTab::Appointments => {
            pages_patient::patient_appointments(&fixtures::upcoming_visits(), &fixtures::past_visits())
        }
        PatientTab::MedicalRecords | PatientTab::HealthMetrics | PatientTab::Messages => {
            pages_patient::placeholder(tab)
        }
        PatientTab::Profile => pages::profile_page(user, &controller.login_history().await),
    }
}

// =============================================================================
// Form Handlers
// =============================================================================

/// Handler for profile form submission (POST).
pub async fn profile_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ProfileForm>,
) -> Result<Response, DashboardError> {
    let (_, controller) = current_session(&state, &headers).ok_or(DashboardError::NotAuthenticated)?;

    let patch = ProfilePatch::from(form);
    let outcome = controller.update_profile(&patch).await;
    let target = if outcome.success {
        format!(
            "/?tab=profile&notice={}",
            urlencoding::encode("Profile updated successfully!")
        )
    } else {
        let error = outcome
            .error
            .unwrap_or_else(|| "Failed to update profile".to_string());
        format!("/?tab=profile&error={}", urlencoding::encode(&error))
    };
    Ok(Redirect::to(&target).into_response())
}

// =============================================================================
// API Handlers (JSON responses)
// =============================================================================

/// Liveness check.
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.session_count(),
    })
}
