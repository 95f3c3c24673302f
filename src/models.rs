//! Domain models for the inward register. These types stay light-weight data
//! holders so the persistence and presentation layers can focus on their own
//! concerns. The serialized field names match the historical storage format,
//! so lists written by earlier tooling keep loading unchanged.

use std::fmt;

use chrono::Local;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Processing state of an inward entry. New entries always start out as
/// [`Status::Pending`]; anything outside the two known values is carried
/// verbatim in [`Status::Other`] so foreign data survives a round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Pending,
    Processed,
    Other(String),
}

impl Status {
    /// The storage and display text for this status.
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "Pending",
            Status::Processed => "Processed",
            Status::Other(text) => text,
        }
    }
}

impl From<&str> for Status {
    fn from(text: &str) -> Self {
        match text {
            "Pending" => Status::Pending,
            "Processed" => Status::Processed,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Status::from(text.as_str()))
    }
}

/// One logged inward-material entry. Records are immutable once created; the
/// list they live in is only ever appended to and rewritten as a whole, so no
/// identifier beyond list position exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Entry date, already display-formatted as `DD/MM/YYYY`.
    pub date: String,
    #[serde(rename = "reelCode")]
    pub reel_code: String,
    pub weight: f64,
    pub zone: String,
    pub status: Status,
    /// Entry time, already display-formatted as `HH:MM`.
    pub time: String,
}

impl Record {
    /// Build a fresh entry from form input, stamping the current local date
    /// and time and the default `Pending` status.
    pub fn new(reel_code: String, weight: f64, zone: String) -> Self {
        let now = Local::now();
        Self {
            date: now.format("%d/%m/%Y").to_string(),
            reel_code,
            weight,
            zone,
            status: Status::Pending,
            time: now.format("%H:%M").to_string(),
        }
    }

    /// Weight with its unit suffix, as shown in the table (`12.5 kg`).
    pub fn weight_display(&self) -> String {
        format!("{} kg", self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_known_and_unknown_text() {
        assert_eq!(Status::from("Pending"), Status::Pending);
        assert_eq!(Status::from("Processed"), Status::Processed);
        assert_eq!(Status::from("On Hold"), Status::Other("On Hold".to_string()));
        assert_eq!(Status::Other("On Hold".to_string()).as_str(), "On Hold");
    }

    #[test]
    fn status_serializes_as_plain_text() {
        let json = serde_json::to_string(&Status::Other("On Hold".to_string())).unwrap();
        assert_eq!(json, "\"On Hold\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::Other("On Hold".to_string()));
    }

    #[test]
    fn new_record_defaults_to_pending() {
        let record = Record::new("R1".to_string(), 12.5, "A".to_string());
        assert_eq!(record.status, Status::Pending);
        assert_eq!(record.weight_display(), "12.5 kg");
    }

    #[test]
    fn record_round_trips_with_historical_field_names() {
        let record = Record::new("R7".to_string(), 3.25, "B".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"reelCode\":\"R7\""));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
