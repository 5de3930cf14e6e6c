//! End-to-end requests through the dashboard router.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use carehub_core::{DashboardConfig, Role, SeedUser};
use carehub_dashboard::AppState;
use carehub_dashboard::api_types::HealthResponse;
use carehub_dashboard::routes::create_router;
use carehub_dashboard::state::StoreFactory;
use carehub_session::{InMemoryBackend, StaticIp};
use tower::ServiceExt;

struct Harness {
    app: Router,
    backend: Arc<InMemoryBackend>,
    staff_id: String,
    patient_id: String,
}

fn seed(email: &str, role: Role, first: &str) -> SeedUser {
    SeedUser {
        email: email.to_string(),
        password: "secret1".to_string(),
        role,
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        phone: None,
        department: None,
        specialization: None,
    }
}

fn harness() -> Harness {
    let backend = InMemoryBackend::new();
    let staff_id = backend.seed_user(&seed("staff@carehub.test", Role::HospitalStaff, "Sam"));
    let patient_id = backend.seed_user(&seed("patient@carehub.test", Role::Patient, "Pat"));
    let state = AppState::new(
        DashboardConfig::default(),
        StoreFactory::Memory(backend.clone()),
        Arc::new(StaticIp::new("10.0.0.7")),
        "carehub-tests",
    );
    Harness {
        app: create_router(state),
        backend,
        staff_id,
        patient_id,
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

/// The `name=value` pair of the Set-Cookie header.
fn cookie_pair(response: &Response) -> String {
    let raw = response.headers()[header::SET_COOKIE].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login(app: &Router, email: &str, role: &str) -> String {
    let body = format!("email={}&password=secret1&role={}", email.replace('@', "%40"), role);
    let response = send(app, post_form("/login", None, &body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    cookie_pair(&response)
}

#[tokio::test]
async fn anonymous_home_redirects_to_login() {
    let h = harness();
    let response = send(&h.app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = send(&h.app, get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sign in to your account"));
}

#[tokio::test]
async fn staff_login_shows_staff_dashboard() {
    let h = harness();
    let cookie = login(&h.app, "staff@carehub.test", "hospital_staff").await;

    let html = body_text(send(&h.app, get("/", Some(&cookie))).await).await;
    assert!(html.contains("Hospital overview and key metrics"));
    assert!(html.contains("Total Patients"));
    assert!(html.contains("Hospital Management"));

    let html = body_text(send(&h.app, get("/?tab=no-such-tab", Some(&cookie))).await).await;
    assert!(html.contains("Hospital overview and key metrics"));

    let html = body_text(send(&h.app, get("/?tab=patients&search=zzz", Some(&cookie))).await).await;
    assert!(html.contains("No patients found matching your search criteria."));

    // Signed-in users skip the entry screen.
    let response = send(&h.app, get("/login", Some(&cookie))).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn patients_never_see_staff_tabs() {
    let h = harness();
    // The profile role wins over the role picked on the form.
    let cookie = login(&h.app, "patient@carehub.test", "hospital_staff").await;

    let html = body_text(send(&h.app, get("/?tab=rooms", Some(&cookie))).await).await;
    assert!(html.contains("Patient Portal"));
    assert!(html.contains("Welcome back, Pat!"));
    assert!(!html.contains("Room availability and management"));
}

#[tokio::test]
async fn failed_login_reports_error() {
    let h = harness();
    let body = "email=staff%40carehub.test&password=wrong&role=hospital_staff";
    let response = send(&h.app, post_form("/login", None, body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/login?error="));
    assert!(target.ends_with("&role=hospital_staff"));

    let body = "email=staff%40carehub.test&password=secret1&role=admin";
    let response = send(&h.app, post_form("/login", None, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_cookie_and_closes_login_sessions() {
    let h = harness();
    let cookie = login(&h.app, "staff@carehub.test", "hospital_staff").await;
    let sessions = h.backend.login_sessions_for(&h.staff_id);
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_active);
    assert_eq!(sessions[0].ip_address.as_deref(), Some("10.0.0.7"));

    let response = send(&h.app, post_form("/logout", Some(&cookie), "")).await;
    assert_eq!(location(&response), "/login");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    assert!(h.backend.login_sessions_for(&h.staff_id).iter().all(|s| !s.is_active));
    let response = send(&h.app, get("/", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn profile_updates_and_history() {
    let h = harness();
    let cookie = login(&h.app, "patient@carehub.test", "patient").await;

    let response = send(
        &h.app,
        post_form("/profile", Some(&cookie), "first_name=Patty&last_name=Tester&phone=555-0100"),
    )
    .await;
    assert_eq!(
        location(&response),
        "/?tab=profile&notice=Profile%20updated%20successfully%21"
    );
    let profile = h.backend.profile(&h.patient_id).unwrap();
    assert_eq!(profile.first_name, "Patty");
    assert_eq!(profile.phone.as_deref(), Some("555-0100"));

    let html = body_text(send(&h.app, get(&location(&response), Some(&cookie))).await).await;
    assert!(html.contains("Profile updated successfully!"));
    assert!(html.contains("Login History"));
    assert!(html.contains("IP: 10.0.0.7"));
}

#[tokio::test]
async fn profile_without_user() {
    let h = harness();
    let response = send(&h.app, post_form("/profile", None, "first_name=X")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&h.app, post_form("/profile", Some("carehub_session=unknown"), "first_name=X")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

async fn session_count(app: &Router) -> usize {
    let response = send(app, get("/healthz", None)).await;
    let health: HealthResponse = serde_json::from_str(&body_text(response).await).unwrap();
    health.sessions
}

#[tokio::test]
async fn failed_sign_ins_open_no_sessions() {
    let h = harness();
    for _ in 0..5 {
        let body = "email=nobody%40carehub.test&password=secret1&role=patient";
        let response = send(&h.app, post_form("/login", None, body)).await;
        assert!(location(&response).starts_with("/login?error="));
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = "first_name=A&last_name=B&email=staff%40carehub.test&phone=\
                    &password=secret1&confirm_password=secret1&role=patient";
        let response = send(&h.app, post_form("/register", None, body)).await;
        assert!(location(&response).starts_with("/register?error="));
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
    assert_eq!(session_count(&h.app).await, 0);

    let cookie = login(&h.app, "staff@carehub.test", "hospital_staff").await;
    assert_eq!(session_count(&h.app).await, 1);

    // A failed attempt from a signed-in browser keeps its session.
    let body = "email=staff%40carehub.test&password=wrong&role=hospital_staff";
    let response = send(&h.app, post_form("/login", Some(&cookie), body)).await;
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let response = send(&h.app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(session_count(&h.app).await, 1);
}

#[tokio::test]
async fn healthz_counts_sessions() {
    let h = harness();
    let _cookie = login(&h.app, "staff@carehub.test", "hospital_staff").await;

    let response = send(&h.app, get("/healthz", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.sessions, 1);
}
