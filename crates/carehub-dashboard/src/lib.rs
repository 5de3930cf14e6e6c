//! # carehub-dashboard
//!
//! Role-aware web dashboard for the CareHub hospital administration tool.
//!
//! Each browser session (identified by an HttpOnly cookie) owns one
//! [`carehub_session::AuthController`]. Every request resolves that
//! controller, routes on its user's role and the requested tab, and renders
//! the page from the controller state plus the static fixtures.
//!
//! - Hospital staff: dashboard, patients, appointments, staff, departments,
//!   rooms, profile settings
//! - Patients: personal dashboard, appointments, medical records, health
//!   metrics, messages, profile settings
//!
//! ## Tech Stack
//!
//! - Axum for HTTP server
//! - Server-rendered HTML with Tailwind CSS (CDN) for styling
//! - Plain HTML forms, with Alpine.js for tabs and show/hide toggles

pub mod api_types;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod pages_patient;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;
pub mod views;

pub use error::DashboardError;
pub use router::{NavItem, Route, View, nav_menu, resolve, resolve_snapshot};
pub use server::DashboardServer;
pub use state::AppState;
