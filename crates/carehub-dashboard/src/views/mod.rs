//! Pure view helpers: filtering, colour mapping and capacity arithmetic.
//!
//! Nothing in here touches the session or renders HTML; the page renderers
//! in [`crate::pages`] and [`crate::pages_patient`] build on these.

pub mod capacity;
pub mod filters;
pub mod style;

pub use capacity::{OccupancyBand, RoomCounts, display_width, occupancy_label, occupancy_percent};
pub use filters::{AppointmentFilter, Choice, PatientFilter, RoomFilter, StaffFilter};
pub use style::BadgeColor;
