//! HTML templates for the dashboard.
//!
//! Plain `format!` templates styled with Tailwind CSS; Alpine.js drives the
//! few client-side toggles (in-page tabs, password visibility).

use carehub_core::{AuthenticatedUser, Role};

use crate::router::{Route, nav_menu};
use crate::views::BadgeColor;

/// One-shot message shown above the page content after a form post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    Success(&'a str),
    Error(&'a str),
}

/// Escape text for use in element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn head(title: &str) -> String {
    format!(
        r##"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - CareHub</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {{
            theme: {{
                extend: {{
                    colors: {{
                        primary: {{
                            50: '#eff6ff',
                            100: '#dbeafe',
                            200: '#bfdbfe',
                            500: '#3b82f6',
                            600: '#2563eb',
                            700: '#1d4ed8',
                            900: '#1e3a8a',
                        }}
                    }}
                }}
            }}
        }}
    </script>
    <script defer src="https://unpkg.com/alpinejs@3.x.x/dist/cdn.min.js"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <style>[x-cloak] {{ display: none !important; }}</style>
</head>"##,
        title = html_escape(title),
    )
}

/// Bare page without navigation, used for the entry and loading screens.
pub fn layout(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
{HEAD}
<body class="bg-gray-100 min-h-screen">
    {content}
</body>
</html>"##,
        HEAD = head(title),
    )
}

/// Full application frame: sidebar for the user's role, page header and
/// content.
pub fn app_layout(
    user: &AuthenticatedUser,
    route: &Route,
    active_tab: &str,
    content: &str,
    notice: Option<Notice<'_>>,
) -> String {
    let notice_html = notice.map(notice_banner).unwrap_or_default();
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
{HEAD}
<body class="bg-gray-100">
    <div class="flex h-screen">
        {SIDEBAR}
        <div class="flex-1 flex flex-col overflow-hidden">
            {HEADER}
            <main class="flex-1 overflow-auto">
                <div class="p-6 space-y-6">
                    {notice_html}
                    {content}
                </div>
            </main>
        </div>
    </div>
</body>
</html>"##,
        HEAD = head(route.title),
        SIDEBAR = sidebar_template(user, active_tab),
        HEADER = header_template(user, route),
    )
}

fn header_template(user: &AuthenticatedUser, route: &Route) -> String {
    let (avatar, role_label) = match user.role {
        Role::Patient => ("bg-teal-600", "Patient"),
        Role::HospitalStaff => ("bg-primary-600", "Hospital Staff"),
    };
    let subtitle = if route.subtitle.is_empty() {
        String::new()
    } else {
        format!(r#"<p class="text-gray-600 mt-1">{}</p>"#, route.subtitle)
    };
    format!(
        r##"<header class="bg-white border-b border-gray-200 px-6 py-4 shadow-sm">
                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="text-2xl font-bold text-gray-900">{title}</h2>
                        {subtitle}
                    </div>
                    <div class="flex items-center gap-3 pl-4 border-l border-gray-200">
                        <div class="w-8 h-8 {avatar} rounded-full flex items-center justify-center">
                            <i class="fas fa-user text-white text-sm"></i>
                        </div>
                        <div>
                            <p class="text-sm font-medium text-gray-900">{name}</p>
                            <p class="text-xs text-gray-500">{role_label}</p>
                        </div>
                    </div>
                </div>
            </header>"##,
        title = route.title,
        name = html_escape(&user.full_name()),
    )
}

fn sidebar_template(user: &AuthenticatedUser, active_tab: &str) -> String {
    let (brand, tagline, accent) = match user.role {
        Role::Patient => (
            "Patient Portal".to_string(),
            format!("Welcome, {}", html_escape(&user.first_name)),
            "teal",
        ),
        Role::HospitalStaff => ("CareHub".to_string(), "Hospital Management".to_string(), "blue"),
    };

    let items: String = nav_menu(user.role)
        .iter()
        .map(|item| {
            let class = if item.id == active_tab {
                format!("bg-{accent}-50 text-{accent}-700 border-l-4 border-{accent}-700")
            } else {
                "text-gray-600 hover:bg-gray-50 hover:text-gray-900".to_string()
            };
            format!(
                r##"<li>
                        <a href="/?tab={id}" class="w-full flex items-center px-4 py-3 rounded-lg transition-colors {class}">
                            <i class="fas fa-{icon} w-5 mr-3"></i>
                            {label}
                        </a>
                    </li>"##,
                id = item.id,
                icon = item.icon,
                label = item.label,
            )
        })
        .collect();

    format!(
        r##"<aside class="w-64 bg-white border-r border-gray-200 min-h-screen flex flex-col">
            <div class="p-6 border-b border-gray-200">
                <div class="flex items-center gap-3">
                    <div class="w-10 h-10 bg-{accent}-600 rounded-lg flex items-center justify-center">
                        <i class="fas fa-hospital text-white"></i>
                    </div>
                    <div>
                        <h1 class="text-xl font-bold text-gray-900">{brand}</h1>
                        <p class="text-sm text-gray-500">{tagline}</p>
                    </div>
                </div>
            </div>
            <nav class="p-4 flex-1">
                <ul class="space-y-2">
                    {items}
                </ul>
            </nav>
            <div class="p-4 border-t border-gray-200">
                <form method="POST" action="/logout">
                    <button type="submit" class="w-full flex items-center px-4 py-3 text-gray-600 hover:bg-red-50 hover:text-red-700 rounded-lg transition-colors">
                        <i class="fas fa-sign-out-alt w-5 mr-3"></i>
                        Sign Out
                    </button>
                </form>
            </div>
        </aside>"##
    )
}

/// Success or error banner.
pub fn notice_banner(notice: Notice<'_>) -> String {
    let (color, icon, message) = match notice {
        Notice::Success(message) => ("green", "check-circle", message),
        Notice::Error(message) => ("red", "exclamation-circle", message),
    };
    format!(
        r##"<div class="p-4 bg-{color}-50 border border-{color}-200 rounded-lg">
            <div class="flex items-center gap-3">
                <i class="fas fa-{icon} text-{color}-500"></i>
                <span class="text-{color}-700">{message}</span>
            </div>
        </div>"##,
        message = html_escape(message),
    )
}

/// Card component.
pub fn card(title: &str, content: &str) -> String {
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-100 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-100">
                <h3 class="text-lg font-semibold text-gray-900">{title}</h3>
            </div>
            <div class="p-6">
                {content}
            </div>
        </div>"##
    )
}

/// Headline metric with an optional change indicator.
pub fn stats_card(title: &str, value: &str, icon: &str, color: &str, change: Option<(&str, bool)>) -> String {
    let change_html = change.map_or(String::new(), |(text, up)| {
        let (trend_color, arrow) = if up { ("green", "arrow-up") } else { ("red", "arrow-down") };
        format!(
            r##"<p class="text-sm text-{trend_color}-600 mt-1"><i class="fas fa-{arrow} mr-1"></i>{text} from last week</p>"##
        )
    });
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-100 p-6">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-sm text-gray-500">{title}</p>
                    <p class="text-2xl font-bold text-gray-900 mt-1">{value}</p>
                    {change_html}
                </div>
                <div class="w-12 h-12 rounded-full bg-{color}-100 flex items-center justify-center">
                    <i class="fas fa-{icon} text-{color}-500 text-xl"></i>
                </div>
            </div>
        </div>"##
    )
}

/// Badge component.
pub fn badge(text: &str, color: BadgeColor) -> String {
    let color = color.as_str();
    format!(
        r##"<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-{color}-100 text-{color}-800">{text}</span>"##,
        text = html_escape(text),
    )
}

/// Input field component.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, placeholder: &str) -> String {
    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <input type="{input_type}" name="{name}" id="{name}" value="{value}" placeholder="{placeholder}"
                   class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
        </div>"##,
        value = html_escape(value),
    )
}

/// Select field component. Options are `(value, text)`; `selected` names
/// the pre-selected value.
pub fn select(name: &str, label: &str, options: &[(String, String)], selected: &str) -> String {
    let options_html: String = options
        .iter()
        .map(|(value, text)| {
            let value = html_escape(value);
            let text = html_escape(text);
            if value == html_escape(selected) {
                format!(r#"<option value="{value}" selected>{text}</option>"#)
            } else {
                format!(r#"<option value="{value}">{text}</option>"#)
            }
        })
        .collect();

    format!(
        r##"<div class="space-y-1">
            <label for="{name}" class="block text-sm font-medium text-gray-700">{label}</label>
            <select name="{name}" id="{name}"
                    class="w-full px-4 py-2 border border-gray-300 rounded-lg bg-white text-gray-900 focus:ring-2 focus:ring-primary-500 focus:border-primary-500">
                {options_html}
            </select>
        </div>"##
    )
}

/// "All" followed by every label.
pub fn options_with_all<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<(String, String)> {
    std::iter::once("All")
        .chain(labels)
        .map(|l| (l.to_string(), l.to_string()))
        .collect()
}

/// Primary submit button.
pub fn submit_button(text: &str, icon: &str) -> String {
    format!(
        r##"<button type="submit" class="inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium transition-colors">
            <i class="fas fa-{icon}"></i> {text}
        </button>"##
    )
}

/// Table component. Cells are inserted as-is; escape text before passing it.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let headers_html: String = headers
        .iter()
        .map(|h| format!(r#"<th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">{h}</th>"#))
        .collect();

    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!(r#"<td class="px-6 py-4 whitespace-nowrap text-sm text-gray-900">{cell}</td>"#))
                .collect();
            format!(r#"<tr class="hover:bg-gray-50">{cells}</tr>"#)
        })
        .collect();

    format!(
        r##"<div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50">
                    <tr>{headers_html}</tr>
                </thead>
                <tbody class="bg-white divide-y divide-gray-200">
                    {rows_html}
                </tbody>
            </table>
        </div>"##
    )
}

/// Empty state component.
pub fn empty_state(icon: &str, title: &str, description: &str) -> String {
    format!(
        r##"<div class="text-center py-12">
            <i class="fas fa-{icon} text-4xl text-gray-400 mb-4"></i>
            <h3 class="text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-1 text-gray-500">{description}</p>
        </div>"##
    )
}

/// Full-screen loading indicator.
pub fn spinner() -> &'static str {
    r##"<div class="min-h-screen flex items-center justify-center">
        <div class="text-center">
            <div class="w-12 h-12 border-4 border-primary-600 border-t-transparent rounded-full animate-spin mx-auto mb-4"></div>
            <p class="text-gray-600">Loading...</p>
        </div>
    </div>"##
}

/// In-page tab container; `tabs` are `(key, label, content)`.
pub fn tabs(id: &str, tabs: &[(&str, &str, String)]) -> String {
    let tab_buttons: String = tabs
        .iter()
        .map(|(key, label, _)| {
            format!(
                r##"<button type="button" @click="activeTab = '{key}'"
                        :class="activeTab === '{key}' ? 'border-primary-600 text-primary-600' : 'border-transparent text-gray-500 hover:text-gray-700'"
                        class="px-4 py-2 border-b-2 font-medium text-sm transition-colors">
                    {label}
                </button>"##
            )
        })
        .collect();

    let tab_contents: String = tabs
        .iter()
        .map(|(key, _, content)| {
            format!(
                r##"<div x-show="activeTab === '{key}'" x-cloak>
                    {content}
                </div>"##
            )
        })
        .collect();

    let first_key = tabs.first().map(|(k, _, _)| *k).unwrap_or("default");

    format!(
        r##"<div x-data="{{ activeTab: '{first_key}' }}" id="{id}">
            <div class="border-b border-gray-200 mb-4">
                <nav class="flex gap-2">
                    {tab_buttons}
                </nav>
            </div>
            <div>
                {tab_contents}
            </div>
        </div>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::resolve;
    use carehub_core::RegisterData;
    use chrono::Utc;

    fn user(role: Role) -> AuthenticatedUser {
        let data = RegisterData {
            email: "x@h.com".to_string(),
            password: "secret1".to_string(),
            first_name: "Jennifer".to_string(),
            last_name: "<Adams>".to_string(),
            phone: None,
            role,
            department: None,
            specialization: None,
        };
        AuthenticatedUser::from_registration("u1", &data, Utc::now())
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#x27;Neil &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn sidebar_marks_active_tab() {
        let staff = user(Role::HospitalStaff);
        let route = resolve(Some(&staff), Some("rooms"));
        let html = app_layout(&staff, &route, "rooms", "", None);
        assert!(html.contains(r#"href="/?tab=rooms" class="w-full flex items-center px-4 py-3 rounded-lg transition-colors bg-blue-50"#));
        assert!(html.contains("Room availability and management"));
        assert!(html.contains("Jennifer &lt;Adams&gt;"));
        assert!(!html.contains("<Adams>"));
    }

    #[test]
    fn patient_frame() {
        let patient = user(Role::Patient);
        let route = resolve(Some(&patient), None);
        let html = app_layout(&patient, &route, "dashboard", "", Some(Notice::Error("Nope")));
        assert!(html.contains("Patient Portal"));
        assert!(html.contains("Welcome, Jennifer"));
        assert!(html.contains("/?tab=medical-records"));
        assert!(!html.contains("/?tab=rooms"));
        assert!(html.contains("text-red-700\">Nope"));
    }

    #[test]
    fn select_preselects_value() {
        let html = select("status", "Status", &options_with_all(["On Duty", "Off Duty"]), "On Duty");
        assert!(html.contains(r#"<option value="On Duty" selected>On Duty</option>"#));
        assert!(html.contains(r#"<option value="All">All</option>"#));
    }
}
