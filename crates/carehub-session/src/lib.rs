//! # carehub-session
//!
//! Session handling for the CareHub dashboard.
//!
//! This crate provides:
//! - The [`SessionStore`] client contract for the external identity/profile
//!   backend, with an in-memory implementation and a client for the hosted
//!   auth + REST service
//! - Explicit listener registration for session-change notifications
//! - Best-effort client IP lookup
//! - The [`AuthController`], the single source of truth for "who is logged
//!   in" within one client context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use carehub_core::{LoginCredentials, Role, SeedUser};
//! use carehub_session::{AuthController, InMemoryBackend, StaticIp};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let backend = InMemoryBackend::new();
//! backend.seed_user(&SeedUser {
//!     email: "a@h.com".to_string(),
//!     password: "secret".to_string(),
//!     role: Role::Patient,
//!     first_name: "Patient".to_string(),
//!     last_name: "A".to_string(),
//!     phone: None,
//!     department: None,
//!     specialization: None,
//! });
//!
//! let controller = AuthController::new(
//!     Arc::new(backend.connect()),
//!     Arc::new(StaticIp::unknown()),
//! );
//! controller.initialize().await;
//!
//! let outcome = controller
//!     .login(&LoginCredentials {
//!         email: "a@h.com".to_string(),
//!         password: "secret".to_string(),
//!         role: Role::Patient,
//!     })
//!     .await;
//! assert!(outcome.success);
//! # }
//! ```

pub mod controller;
pub mod error;
pub mod ip;
pub mod listeners;
pub mod memory;
pub mod store;
pub mod supabase;

pub use controller::{
    AuthController, AuthOutcome, AuthPhase, AuthSnapshot, LOGIN_HISTORY_LIMIT, LogoutOutcome,
};
pub use error::StoreError;
pub use ip::{HttpIpLookup, IpLookup, StaticIp, UNKNOWN_IP};
pub use listeners::{ListenerRegistry, SessionListener, Subscription};
pub use memory::{InMemoryBackend, InMemorySessionStore};
pub use store::{AuthSession, SessionEvent, SessionQuery, SessionStore, SignUp};
pub use supabase::SupabaseSessionStore;
