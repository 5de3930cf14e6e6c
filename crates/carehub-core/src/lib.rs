//! # carehub-core
//!
//! Shared types for the CareHub hospital administration dashboard.
//!
//! - [`model`]: the authenticated user, login sessions and the flat hospital
//!   records (patients, staff, appointments, departments, rooms).
//! - [`fixtures`]: the static in-memory data the dashboard renders.
//! - [`config`]: the YAML configuration shared by every CareHub crate.

// Configuration types shared across all CareHub crates
pub mod config;
pub mod fixtures;
pub mod model;

pub use config::{
    CarehubConfig, ConfigError, DashboardConfig, IpLookupConfig, LoggingConfig, SeedUser,
    SessionStoreConfig, StoreBackend,
};
pub use model::{
    Appointment, AppointmentStatus, AppointmentType, AuthenticatedUser, Department, Gender,
    LoginCredentials, LoginSession, NewLoginSession, Patient, PatientCondition, ProfilePatch,
    RegisterData, Role, Room, RoomStatus, RoomType, Shift, Staff, StaffRole, StaffStatus,
    UnknownLabel,
};
