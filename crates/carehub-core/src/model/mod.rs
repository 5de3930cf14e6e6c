//! Domain records.
//!
//! Hospital records are plain data with categorical fields. Categorical
//! enums serialize as the human-readable labels the UI shows ("On Duty",
//! "Under Observation", "Follow-up"), so the same string is used on the wire,
//! in filter drop-downs and in badges.

pub use hospital::{
    Appointment, AppointmentStatus, AppointmentType, Department, Gender, Patient,
    PatientCondition, Room, RoomStatus, RoomType, Shift, Staff, StaffRole, StaffStatus,
};
pub use portal::{
    Activity, ActivityKind, CriticalPatient, Medication, PatientVisit, StatCard, TestResult,
    Trend, VisitKind, VisitStatus,
};
pub use session::{LoginSession, NewLoginSession};
pub use user::{AuthenticatedUser, LoginCredentials, ProfilePatch, RegisterData, Role};

/// A label that does not name any variant of a categorical enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a categorical enum whose serialized form is its display label.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The display label, also used as the serialized form.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| $crate::model::UnknownLabel {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }
    };
}

pub(crate) use labeled_enum;

mod hospital;
mod portal;
mod session;
mod user;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for status in StaffStatus::ALL {
            let parsed: StaffStatus = status.label().parse().unwrap();
            assert_eq!(parsed, *status);
        }
        assert_eq!("on duty".parse::<StaffStatus>().unwrap(), StaffStatus::OnDuty);
    }

    #[test]
    fn unknown_label_names_the_enum() {
        let err = "Janitor".parse::<StaffRole>().unwrap_err();
        assert_eq!(err.kind, "StaffRole");
        assert_eq!(err.to_string(), "unknown StaffRole: 'Janitor'");
    }

    #[test]
    fn labels_are_the_serialized_form() {
        let json = serde_json::to_string(&PatientCondition::UnderObservation).unwrap();
        assert_eq!(json, "\"Under Observation\"");
        let back: AppointmentType = serde_json::from_str("\"Follow-up\"").unwrap();
        assert_eq!(back, AppointmentType::FollowUp);
    }
}
