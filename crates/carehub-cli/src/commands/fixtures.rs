//! `carehub fixtures` - print the fixture tables the dashboard renders.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use carehub_core::fixtures;
use carehub_dashboard::views::{
    AppointmentFilter, PatientFilter, RoomCounts, RoomFilter, StaffFilter, occupancy_label,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Patients,
    Staff,
    Appointments,
    Departments,
    Rooms,
}

/// Filters, spelled like the dashboard's query parameters.
#[derive(Debug, Default, Args)]
pub struct FixtureFilters {
    /// Patient name or room number
    #[arg(long)]
    pub search: Option<String>,
    /// Patient condition, e.g. "Critical"
    #[arg(long)]
    pub condition: Option<String>,
    /// Staff role, e.g. "Doctor"
    #[arg(long)]
    pub role: Option<String>,
    /// Staff, appointment or room status
    #[arg(long)]
    pub status: Option<String>,
    /// Appointment date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<String>,
    /// Room type, e.g. "ICU"
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Room department
    #[arg(long)]
    pub department: Option<String>,
}

/// Render the selected table as text lines, or as pretty JSON.
pub fn render(entity: Entity, filters: &FixtureFilters, json: bool) -> Result<String> {
    Ok(match entity {
        Entity::Patients => {
            let all = fixtures::patients();
            let filter = PatientFilter::new(filters.search.as_deref(), filters.condition.as_deref());
            let rows = filter.apply(&all);
            if json {
                to_json(&rows)?
            } else {
                lines(rows.iter().map(|p| {
                    format!(
                        "{:<6} {:<20} {:<18} room {:<6} {}",
                        p.id,
                        p.full_name(),
                        p.current_condition,
                        p.room_number.as_deref().unwrap_or("-"),
                        p.assigned_doctor.as_deref().unwrap_or("-"),
                    )
                }))
            }
        }
        Entity::Staff => {
            let all = fixtures::staff();
            let filter = StaffFilter::new(filters.role.as_deref(), filters.status.as_deref());
            let rows = filter.apply(&all);
            if json {
                to_json(&rows)?
            } else {
                lines(rows.iter().map(|s| {
                    format!(
                        "{:<6} {:<22} {:<14} {:<16} {:<8} {}",
                        s.id,
                        format!("{} {}", s.first_name, s.last_name),
                        s.role,
                        s.department,
                        s.shift,
                        s.status,
                    )
                }))
            }
        }
        Entity::Appointments => {
            let all = fixtures::appointments();
            let filter = AppointmentFilter::new(filters.date.as_deref(), filters.status.as_deref());
            let mut rows = filter.apply(&all);
            rows.sort_by_key(|a| a.time);
            if json {
                to_json(&rows)?
            } else if rows.is_empty() {
                format!("No appointments scheduled for {}\n", filter.date)
            } else {
                lines(rows.iter().map(|a| {
                    format!(
                        "{} {} {:<18} {:<20} {:<13} {}",
                        a.date,
                        a.time.format("%H:%M"),
                        a.patient_name,
                        a.doctor_name,
                        a.kind,
                        a.status,
                    )
                }))
            }
        }
        Entity::Departments => {
            let rows = fixtures::departments();
            if json {
                to_json(&rows)?
            } else {
                lines(rows.iter().map(|d| {
                    format!(
                        "{:<14} {:<20} {:>3}/{:<3} {:>5}",
                        d.name,
                        d.head,
                        d.current_patients,
                        d.max_capacity,
                        occupancy_label(d.current_patients, d.max_capacity),
                    )
                }))
            }
        }
        Entity::Rooms => {
            let all = fixtures::rooms();
            let filter = RoomFilter::new(
                filters.kind.as_deref(),
                filters.status.as_deref(),
                filters.department.as_deref(),
            );
            let rows = filter.apply(&all);
            if json {
                to_json(&rows)?
            } else {
                let counts = RoomCounts::tally(rows.iter().copied());
                let mut out = lines(rows.iter().map(|r| {
                    format!("{:<6} {:<10} {:<14} {}", r.number, r.kind, r.department, r.status)
                }));
                out.push_str(&format!(
                    "{} available, {} occupied, {} maintenance\n",
                    counts.available, counts.occupied, counts.maintenance
                ));
                out
            }
        }
    })
}

fn lines(rows: impl Iterator<Item = String>) -> String {
    rows.map(|row| row + "\n").collect()
}

fn to_json<T: Serialize>(rows: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)? + "\n")
}

/// Run `carehub fixtures`. Without an entity, print the size of each table.
pub fn run(entity: Option<Entity>, filters: &FixtureFilters, json: bool) -> Result<()> {
    match entity {
        Some(entity) => print!("{}", render(entity, filters, json)?),
        None => {
            println!("patients      {}", fixtures::patients().len());
            println!("staff         {}", fixtures::staff().len());
            println!("appointments  {}", fixtures::appointments().len());
            println!("departments   {}", fixtures::departments().len());
            println!("rooms         {}", fixtures::rooms().len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_filter_matches_dashboard() {
        let filters = FixtureFilters {
            role: Some("Doctor".to_string()),
            status: Some("On Duty".to_string()),
            ..Default::default()
        };
        let out = render(Entity::Staff, &filters, false).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("Sarah Wilson"));
    }

    #[test]
    fn appointments_for_a_date() {
        let filters = FixtureFilters {
            date: Some("2024-01-17".to_string()),
            ..Default::default()
        };
        let out = render(Entity::Appointments, &filters, false).unwrap();
        assert_eq!(out.lines().count(), 2);

        let filters = FixtureFilters {
            date: Some("1999-01-01".to_string()),
            ..Default::default()
        };
        let out = render(Entity::Appointments, &filters, false).unwrap();
        assert_eq!(out, "No appointments scheduled for 1999-01-01\n");
    }

    #[test]
    fn json_output_parses() {
        let out = render(Entity::Departments, &FixtureFilters::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), fixtures::departments().len());
    }
}
