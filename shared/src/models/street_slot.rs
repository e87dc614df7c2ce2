//! Street Slot Model (路边车位)
//!
//! Externally-sensed spaces: occupancy is reported by a roadside sensor
//! device, not derived from bookings.

use serde::{Deserialize, Serialize};

/// Street parking slot entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StreetSlot {
    pub id: i64,
    /// Display number reported by the sensor (e.g. "A1")
    pub slot_number: String,
    pub occupied: bool,
    pub last_updated: i64,
}

/// Occupancy report from the sensor device
///
/// `status` must be `"available"` or `"occupied"`; anything else is
/// rejected at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetSlotReport {
    pub status: String,
}

impl StreetSlotReport {
    /// Parse the reported status into an occupancy flag.
    /// `None` means the status is not one of the two legal values.
    pub fn as_occupied(&self) -> Option<bool> {
        match self.status.as_str() {
            "occupied" => Some(true),
            "available" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_two_legal_statuses_parse() {
        let report = |status: &str| StreetSlotReport {
            status: status.into(),
        };
        assert_eq!(report("occupied").as_occupied(), Some(true));
        assert_eq!(report("available").as_occupied(), Some(false));
        assert_eq!(report("reserved").as_occupied(), None);
        assert_eq!(report("").as_occupied(), None);
        assert_eq!(report("OCCUPIED").as_occupied(), None);
    }
}
