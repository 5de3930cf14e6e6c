//! Login, registration and logout for the dashboard.
//!
//! A browser session is an opaque id in an HttpOnly cookie, mapped by
//! [`AppState`] to the [`AuthController`] of that browser. The id is only
//! handed out once a sign-in succeeds.

use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use carehub_core::{DashboardConfig, Role};
use carehub_session::AuthController;
use tracing::{info, warn};

use crate::api_types::{EntryQuery, LoginForm, RegisterForm};
use crate::error::DashboardError;
use crate::state::AppState;
use crate::templates::{self, Notice, notice_banner};

/// Extract a cookie value from the `Cookie` request header.
pub fn extract_session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{}=", name);
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn session_cookie(config: &DashboardConfig, id: &str) -> String {
    let secure = if config.secure_cookies { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        config.cookie_name, id, config.session_idle_secs, secure
    )
}

fn cleared_cookie(config: &DashboardConfig) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", config.cookie_name)
}

/// The controller of the requesting browser, if it has a live session.
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Option<(String, AuthController)> {
    let id = extract_session_cookie(headers, &state.config().cookie_name)?;
    let controller = state.session(&id)?;
    Some((id, controller))
}

fn redirect_with_cookie(cookie: String, to: &str) -> Response {
    ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

/// Redirect a browser that is now signed in. A controller that was not yet
/// tracked gets a browser session and its cookie.
fn signed_in_redirect(
    state: &AppState,
    id: Option<String>,
    controller: AuthController,
    to: &str,
) -> Response {
    match id {
        Some(id) => {
            info!(session = %id, "Dashboard sign-in");
            Redirect::to(to).into_response()
        }
        None => {
            let id = state.track(controller);
            info!(session = %id, "Dashboard sign-in");
            redirect_with_cookie(session_cookie(state.config(), &id), to)
        }
    }
}

fn entry_redirect(path: &str, error: &str, role: Role) -> String {
    format!(
        "{}?error={}&role={}",
        path,
        urlencoding::encode(error),
        role.as_str()
    )
}

/// Handler for the login screen (GET).
pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EntryQuery>,
) -> Response {
    if signed_in(&state, &headers) {
        return Redirect::to("/").into_response();
    }
    Html(entry_page(EntryMode::Login, &query)).into_response()
}

/// Handler for login form submission (POST).
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, DashboardError> {
    let credentials = form.into_credentials()?;
    let cookie = extract_session_cookie(&headers, &state.config().cookie_name);
    let (id, controller) = state.session_or_new(cookie.as_deref()).await?;

    let outcome = controller.login(&credentials).await;
    if outcome.success && controller.user().is_some() {
        Ok(signed_in_redirect(&state, id, controller, "/"))
    } else {
        let error = outcome.error.unwrap_or_else(|| "Login failed".to_string());
        Ok(Redirect::to(&entry_redirect("/login", &error, credentials.role)).into_response())
    }
}

/// Handler for the registration screen (GET).
pub async fn register_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EntryQuery>,
) -> Response {
    if signed_in(&state, &headers) {
        return Redirect::to("/").into_response();
    }
    Html(entry_page(EntryMode::Register, &query)).into_response()
}

/// Handler for registration form submission (POST).
pub async fn register_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> Result<Response, DashboardError> {
    let requested_role = form.role.parse().unwrap_or(Role::Patient);
    let data = match form.into_registration() {
        Ok(data) => data,
        Err(message) => {
            return Ok(Redirect::to(&entry_redirect("/register", &message, requested_role)).into_response());
        }
    };

    let cookie = extract_session_cookie(&headers, &state.config().cookie_name);
    let (id, controller) = state.session_or_new(cookie.as_deref()).await?;
    let outcome = controller.register(&data).await;

    if !outcome.success {
        let error = outcome.error.unwrap_or_else(|| "Registration failed".to_string());
        return Ok(Redirect::to(&entry_redirect("/register", &error, data.role)).into_response());
    }

    if controller.user().is_some() {
        Ok(signed_in_redirect(&state, id, controller, "/"))
    } else {
        // Account created but the store did not sign it in.
        let notice = "Account created. Please sign in.";
        Ok(Redirect::to(&format!(
            "/login?notice={}&role={}",
            urlencoding::encode(notice),
            data.role.as_str()
        ))
        .into_response())
    }
}

/// Handler for logout (POST).
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some((id, controller)) = current_session(&state, &headers) {
        let outcome = controller.logout().await;
        if !outcome.is_clean() {
            warn!(session = %id, "Logout completed with errors");
        }
        state.close_session(&id);
    }
    redirect_with_cookie(cleared_cookie(state.config()), "/login")
}

fn signed_in(state: &AppState, headers: &HeaderMap) -> bool {
    current_session(state, headers).is_some_and(|(_, controller)| controller.user().is_some())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryMode {
    Login,
    Register,
}

fn role_selector(selected: Role) -> String {
    [
        (Role::Patient, "user", "Patient", "Access your health records"),
        (Role::HospitalStaff, "user-md", "Hospital Staff", "Manage patients and operations"),
    ]
    .iter()
    .map(|(role, icon, label, hint)| {
        let checked = if *role == selected { "checked" } else { "" };
        format!(
            r##"<label class="flex-1 cursor-pointer">
                <input type="radio" name="role" value="{value}" class="peer sr-only" {checked}>
                <div class="border-2 border-gray-200 rounded-lg p-4 text-center peer-checked:border-primary-600 peer-checked:bg-primary-50">
                    <i class="fas fa-{icon} text-2xl text-primary-600 mb-2"></i>
                    <p class="font-medium text-gray-900">{label}</p>
                    <p class="text-xs text-gray-500">{hint}</p>
                </div>
            </label>"##,
            value = role.as_str(),
        )
    })
    .collect()
}

fn login_form(role: Role) -> String {
    format!(
        r##"<form method="POST" action="/login" class="space-y-5">
            <div>
                <p class="text-sm font-medium text-gray-700 mb-3">Select your role:</p>
                <div class="flex gap-3">{roles}</div>
            </div>
            {email}
            <div class="space-y-1" x-data="{{ show: false }}">
                <label for="password" class="block text-sm font-medium text-gray-700">Password</label>
                <div class="relative">
                    <input :type="show ? 'text' : 'password'" type="password" id="password" name="password" required
                           placeholder="Enter your password"
                           class="w-full px-4 py-2 pr-12 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
                    <button type="button" @click="show = !show" class="absolute inset-y-0 right-0 pr-3 text-gray-400 hover:text-gray-600">
                        <i class="fas" :class="show ? 'fa-eye-slash' : 'fa-eye'"></i>
                    </button>
                </div>
            </div>
            <button type="submit" class="w-full py-3 px-4 bg-primary-600 hover:bg-primary-700 text-white font-medium rounded-lg transition-colors">
                <i class="fas fa-sign-in-alt mr-2"></i>Sign In
            </button>
            <p class="text-center text-sm text-gray-600">Don't have an account? <a href="/register" class="text-primary-600 hover:underline">Create one</a></p>
        </form>"##,
        roles = role_selector(role),
        email = templates::input("email", "Email Address", "email", "", "Enter your email"),
    )
}

fn register_form(role: Role) -> String {
    let staff_fields = format!(
        r##"<div x-show="role === 'hospital_staff'" x-cloak class="grid grid-cols-1 md:grid-cols-2 gap-4">{}{}</div>"##,
        templates::input("department", "Department", "text", "", "e.g., Cardiology"),
        templates::input("specialization", "Specialization", "text", "", "e.g., Cardiovascular Surgery"),
    );
    format!(
        r##"<form method="POST" action="/register" class="space-y-5" x-data="{{ role: '{role_value}' }}" @change="role = $event.target.name === 'role' ? $event.target.value : role">
            <div>
                <p class="text-sm font-medium text-gray-700 mb-3">I am a:</p>
                <div class="flex gap-3">{roles}</div>
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">{first}{last}</div>
            {email}
            {phone}
            {staff_fields}
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">{password}{confirm}</div>
            <button type="submit" class="w-full py-3 px-4 bg-primary-600 hover:bg-primary-700 text-white font-medium rounded-lg transition-colors">
                <i class="fas fa-user-plus mr-2"></i>Create Account
            </button>
            <p class="text-center text-sm text-gray-600">Already registered? <a href="/login" class="text-primary-600 hover:underline">Sign in</a></p>
        </form>"##,
        role_value = role.as_str(),
        roles = role_selector(role),
        first = templates::input("first_name", "First Name", "text", "", ""),
        last = templates::input("last_name", "Last Name", "text", "", ""),
        email = templates::input("email", "Email Address", "email", "", "Enter your email"),
        phone = templates::input("phone", "Phone Number", "tel", "", "(555) 123-4567"),
        password = templates::input("password", "Password", "password", "", "At least 6 characters"),
        confirm = templates::input("confirm_password", "Confirm Password", "password", "", ""),
    )
}

fn entry_page(mode: EntryMode, query: &EntryQuery) -> String {
    let role = query
        .role
        .as_deref()
        .and_then(|r| r.parse().ok())
        .unwrap_or(Role::Patient);
    let banner = match (query.error.as_deref(), query.notice.as_deref()) {
        (Some(error), _) => notice_banner(Notice::Error(error)),
        (None, Some(notice)) => notice_banner(Notice::Success(notice)),
        (None, None) => String::new(),
    };
    let (heading, subheading, form, title) = match mode {
        EntryMode::Login => ("Welcome back", "Sign in to your account", login_form(role), "Sign In"),
        EntryMode::Register => (
            "Create your account",
            "Join CareHub as a patient or staff member",
            register_form(role),
            "Register",
        ),
    };

    let content = format!(
        r##"<div class="min-h-screen flex items-center justify-center p-4 bg-gradient-to-br from-primary-50 to-teal-50">
        <div class="w-full max-w-lg">
            <div class="text-center mb-8">
                <div class="inline-flex items-center justify-center w-14 h-14 bg-primary-600 rounded-xl mb-4">
                    <i class="fas fa-hospital text-white text-2xl"></i>
                </div>
                <h1 class="text-3xl font-bold text-gray-900">CareHub</h1>
                <p class="text-gray-600">Hospital Management &amp; Patient Portal</p>
            </div>
            <div class="bg-white rounded-2xl shadow-xl p-8 space-y-6">
                <div class="text-center">
                    <h2 class="text-xl font-semibold text-gray-900">{heading}</h2>
                    <p class="text-gray-500 mt-1">{subheading}</p>
                </div>
                {banner}
                {form}
            </div>
        </div>
    </div>"##
    );
    templates::layout(title, &content)
}
