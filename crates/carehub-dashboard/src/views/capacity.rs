//! Department occupancy and room availability.

use carehub_core::{Room, RoomStatus};

use super::style::BadgeColor;

/// Occupancy in percent. Zero capacity reads as empty.
pub fn occupancy_percent(current: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    f64::from(current) / f64::from(max) * 100.0
}

/// Width of the occupancy bar, clamped to `[0, 100]`.
pub fn display_width(current: u32, max: u32) -> f64 {
    occupancy_percent(current, max).clamp(0.0, 100.0)
}

/// Rounded percentage for display, e.g. `"75%"`.
pub fn occupancy_label(current: u32, max: u32) -> String {
    format!("{}%", occupancy_percent(current, max).round() as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyBand {
    AtCapacity,
    High,
    Normal,
}

impl OccupancyBand {
    pub fn of(current: u32, max: u32) -> Self {
        let pct = occupancy_percent(current, max);
        if pct >= 90.0 {
            OccupancyBand::AtCapacity
        } else if pct >= 75.0 {
            OccupancyBand::High
        } else {
            OccupancyBand::Normal
        }
    }

    pub fn color(self) -> BadgeColor {
        match self {
            OccupancyBand::AtCapacity => BadgeColor::Red,
            OccupancyBand::High => BadgeColor::Yellow,
            OccupancyBand::Normal => BadgeColor::Green,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OccupancyBand::AtCapacity => "At Capacity",
            OccupancyBand::High => "High Occupancy",
            OccupancyBand::Normal => "Available",
        }
    }
}

/// Rooms per status, for the summary cards on the room page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomCounts {
    pub available: usize,
    pub occupied: usize,
    pub maintenance: usize,
}

impl RoomCounts {
    pub fn tally<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> Self {
        rooms.into_iter().fold(Self::default(), |mut counts, room| {
            match room.status {
                RoomStatus::Available => counts.available += 1,
                RoomStatus::Occupied => counts.occupied += 1,
                RoomStatus::Maintenance => counts.maintenance += 1,
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_core::fixtures;

    #[test]
    fn zero_capacity_is_empty() {
        assert_eq!(occupancy_percent(5, 0), 0.0);
        assert_eq!(display_width(5, 0), 0.0);
        assert_eq!(occupancy_label(0, 0), "0%");
        assert_eq!(OccupancyBand::of(3, 0), OccupancyBand::Normal);
    }

    #[test]
    fn overfull_bar_is_clamped() {
        assert_eq!(occupancy_percent(15, 10), 150.0);
        assert_eq!(display_width(15, 10), 100.0);
        assert_eq!(occupancy_label(15, 10), "150%");
    }

    #[test]
    fn bands() {
        assert_eq!(OccupancyBand::of(9, 10), OccupancyBand::AtCapacity);
        assert_eq!(OccupancyBand::of(15, 20), OccupancyBand::High);
        assert_eq!(OccupancyBand::of(8, 12), OccupancyBand::Normal);
        assert_eq!(OccupancyBand::of(15, 20).label(), "High Occupancy");
        assert_eq!(OccupancyBand::AtCapacity.color(), BadgeColor::Red);
    }

    #[test]
    fn rounded_label() {
        // 8 / 12 = 66.67%
        assert_eq!(occupancy_label(8, 12), "67%");
        assert_eq!(occupancy_label(12, 15), "80%");
    }

    #[test]
    fn room_tally() {
        let counts = RoomCounts::tally(&fixtures::rooms());
        assert_eq!(
            counts,
            RoomCounts {
                available: 1,
                occupied: 3,
                maintenance: 0
            }
        );
    }
}
