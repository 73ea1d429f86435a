//! Availability records and the per-entity availability map.
//!
//! The server embeds the whole map into the page once. After that it is only
//! touched in memory, and only after the server acknowledged an update.

use chrono::{NaiveDate, NaiveTime};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::editor::EditorError;

/// Time format used by the location time inputs and the wire format
pub const TIME_FORMAT: &str = "%H:%M";

/// Which kind of entity an availability page edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Actor,
    Location,
}

impl EntityKind {
    /// Lowercase noun used in validation messages ("an actor", "a location")
    pub fn noun_with_article(&self) -> &'static str {
        match self {
            EntityKind::Actor => "an actor",
            EntityKind::Location => "a location",
        }
    }
}

/// An actor or a location as listed on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
}

impl Entity {
    /// Parse the embedded entity list, falling back to an empty list
    pub fn list_from_embedded(raw: Option<&str>) -> Vec<Entity> {
        match raw {
            Some(json) if !json.trim().is_empty() => match serde_json::from_str(json) {
                Ok(list) => list,
                Err(e) => {
                    log::error!("📋 ENTITIES: Error parsing entity list: {}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }
}

/// Database ids arrive as numbers on some pages and strings on others
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid entity id: {}", other))),
    }
}

/// Optional usable time window supplied with a "mark available" edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TimeWindow {
    /// Build a window from raw input values; blank inputs count as absent
    pub fn from_inputs(start: &str, end: &str) -> Self {
        let clean = |s: &str| {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        };
        Self {
            start_time: clean(start),
            end_time: clean(end),
        }
    }

    /// Check both times parse and, when both are present, that start < end
    pub fn validate(&self) -> Result<(), EditorError> {
        let start = self.start_time.as_deref().map(parse_time).transpose()?;
        let end = self.end_time.as_deref().map(parse_time).transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(EditorError::TimeOrder);
            }
        }
        Ok(())
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, EditorError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| EditorError::InvalidTime(value.to_string()))
}

/// A per-entity, per-date availability record.
///
/// Actors store a plain boolean, locations store [`LocationAvailability`].
/// The associated request type is the JSON body posted for one date.
pub trait AvailabilityRecord: Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned + 'static {
    type Request: Serialize + Clone + PartialEq + std::fmt::Debug;

    const KIND: EntityKind;
    const ENDPOINT: &'static str;

    /// Build the record an edit would store, validating the time window
    fn from_edit(is_available: bool, window: &TimeWindow) -> Result<Self, EditorError>;

    fn is_available(&self) -> bool;

    /// `HH:MM - HH:MM` label shown under the day number, if any
    fn time_range_label(&self) -> Option<String> {
        None
    }

    fn to_request(&self, entity_id: &str, date: NaiveDate) -> Self::Request;
}

/// Body of `POST /api/actor-availability`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorAvailabilityRequest {
    pub actor_id: String,
    pub date: NaiveDate,
    pub is_available: bool,
}

impl AvailabilityRecord for bool {
    type Request = ActorAvailabilityRequest;

    const KIND: EntityKind = EntityKind::Actor;
    const ENDPOINT: &'static str = "/api/actor-availability";

    fn from_edit(is_available: bool, _window: &TimeWindow) -> Result<Self, EditorError> {
        Ok(is_available)
    }

    fn is_available(&self) -> bool {
        *self
    }

    fn to_request(&self, entity_id: &str, date: NaiveDate) -> ActorAvailabilityRequest {
        ActorAvailabilityRequest {
            actor_id: entity_id.to_string(),
            date,
            is_available: *self,
        }
    }
}

/// Location availability for a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAvailability {
    pub is_available: bool,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Body of `POST /api/location-availability`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAvailabilityRequest {
    pub location_id: String,
    pub date: NaiveDate,
    pub is_available: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl AvailabilityRecord for LocationAvailability {
    type Request = LocationAvailabilityRequest;

    const KIND: EntityKind = EntityKind::Location;
    const ENDPOINT: &'static str = "/api/location-availability";

    fn from_edit(is_available: bool, window: &TimeWindow) -> Result<Self, EditorError> {
        // Times only travel with "mark available"
        if !is_available {
            return Ok(Self {
                is_available,
                start_time: None,
                end_time: None,
            });
        }

        window.validate()?;
        Ok(Self {
            is_available,
            start_time: window.start_time.clone(),
            end_time: window.end_time.clone(),
        })
    }

    fn is_available(&self) -> bool {
        self.is_available
    }

    fn time_range_label(&self) -> Option<String> {
        if !self.is_available {
            return None;
        }
        match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some(format!("{} - {}", start, end))
            }
            _ => None,
        }
    }

    fn to_request(&self, entity_id: &str, date: NaiveDate) -> LocationAvailabilityRequest {
        LocationAvailabilityRequest {
            location_id: entity_id.to_string(),
            date,
            is_available: self.is_available,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

/// Reply of both availability endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityUpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Entity id -> date -> availability record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityMap<R> {
    entries: HashMap<String, BTreeMap<NaiveDate, R>>,
}

impl<R> Default for AvailabilityMap<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<R: AvailabilityRecord> AvailabilityMap<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON blob embedded in the page.
    ///
    /// A missing attribute gives an empty map. Malformed JSON is logged and
    /// treated as empty. A single bad entity or date entry is logged and
    /// skipped; the rest of the blob still loads.
    pub fn from_embedded(raw: Option<&str>) -> Self {
        let Some(json) = raw.filter(|s| !s.trim().is_empty()) else {
            return Self::new();
        };

        let entities = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(json) {
            Ok(entities) => entities,
            Err(e) => {
                log::error!("🗓️ AVAILABILITY: Error parsing availability data, ignoring all of it: {}", e);
                return Self::new();
            }
        };

        let mut map = Self::new();
        for (entity_id, days) in entities {
            let serde_json::Value::Object(days) = days else {
                log::warn!("🗓️ AVAILABILITY: Skipping {}: expected a date map", entity_id);
                continue;
            };

            for (day, value) in days {
                let date = match NaiveDate::parse_from_str(&day, "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(e) => {
                        log::warn!("🗓️ AVAILABILITY: Skipping {} {}: bad date ({})", entity_id, day, e);
                        continue;
                    }
                };
                match serde_json::from_value::<R>(value) {
                    Ok(record) => map.set(&entity_id, date, record),
                    Err(e) => log::warn!("🗓️ AVAILABILITY: Skipping {} on {}: {}", entity_id, day, e),
                }
            }
        }

        log::debug!("🗓️ AVAILABILITY: Loaded embedded data for {} entities", map.entries.len());
        map
    }

    pub fn get(&self, entity_id: &str, date: NaiveDate) -> Option<&R> {
        self.entries.get(entity_id).and_then(|days| days.get(&date))
    }

    /// Absent entries count as available
    pub fn is_available(&self, entity_id: &str, date: NaiveDate) -> bool {
        self.get(entity_id, date).map_or(true, R::is_available)
    }

    pub fn set(&mut self, entity_id: &str, date: NaiveDate, record: R) {
        self.entries
            .entry(entity_id.to_string())
            .or_default()
            .insert(date, record);
    }

    pub fn entity_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_actor_map_from_embedded() {
        let map = AvailabilityMap::<bool>::from_embedded(Some(
            r#"{"A1": {"2024-06-01": false, "2024-06-02": true}}"#,
        ));

        assert_eq!(map.get("A1", date("2024-06-01")), Some(&false));
        assert!(!map.is_available("A1", date("2024-06-01")));
        assert!(map.is_available("A1", date("2024-06-02")));
        // Absent defaults to available
        assert!(map.is_available("A1", date("2024-06-03")));
        assert!(map.is_available("B2", date("2024-06-01")));
    }

    #[test]
    fn test_location_map_from_embedded() {
        let map = AvailabilityMap::<LocationAvailability>::from_embedded(Some(
            r#"{"7": {"2024-06-01": {"is_available": true, "start_time": "09:00", "end_time": "17:00"},
                     "2024-06-02": {"is_available": false, "start_time": null, "end_time": null}}}"#,
        ));

        let record = map.get("7", date("2024-06-01")).unwrap();
        assert_eq!(record.time_range_label(), Some("09:00 - 17:00".to_string()));
        assert!(!map.is_available("7", date("2024-06-02")));
    }

    #[test]
    fn test_malformed_embedded_data_is_empty() {
        let map = AvailabilityMap::<bool>::from_embedded(Some("{not json"));
        assert_eq!(map.entity_count(), 0);

        let map = AvailabilityMap::<bool>::from_embedded(None);
        assert_eq!(map.entity_count(), 0);

        let map = AvailabilityMap::<bool>::from_embedded(Some("   "));
        assert_eq!(map.entity_count(), 0);
    }

    #[test]
    fn test_bad_entries_are_skipped_individually() {
        let map = AvailabilityMap::<bool>::from_embedded(Some(
            r#"{"A1": {"2024-06-01": false, "2024-06-02": null, "June 3": false}, "B2": 7, "C3": {"2024-06-04": false}}"#,
        ));
        assert_eq!(map.get("A1", date("2024-06-01")), Some(&false));
        assert_eq!(map.get("A1", date("2024-06-02")), None);
        assert!(!map.is_available("A1", date("2024-06-01")));
        assert!(!map.is_available("C3", date("2024-06-04")));
        assert_eq!(map.entity_count(), 2);
    }

    #[test]
    fn test_set_creates_entity_entry() {
        let mut map = AvailabilityMap::<bool>::new();
        map.set("A1", date("2024-06-01"), false);
        assert_eq!(map.entity_count(), 1);
        assert_eq!(map.get("A1", date("2024-06-01")), Some(&false));
    }

    #[test]
    fn test_time_window_validation() {
        assert!(TimeWindow::from_inputs("09:00", "17:00").validate().is_ok());
        assert!(TimeWindow::from_inputs("09:00", "").validate().is_ok());
        assert!(TimeWindow::from_inputs("", "").validate().is_ok());

        assert_eq!(
            TimeWindow::from_inputs("14:00", "12:00").validate(),
            Err(EditorError::TimeOrder)
        );
        assert_eq!(
            TimeWindow::from_inputs("12:00", "12:00").validate(),
            Err(EditorError::TimeOrder)
        );
        assert_eq!(
            TimeWindow::from_inputs("noon", "17:00").validate(),
            Err(EditorError::InvalidTime("noon".to_string()))
        );
    }

    #[test]
    fn test_location_edit_drops_times_when_unavailable() {
        let window = TimeWindow::from_inputs("14:00", "12:00");
        // Time order is only checked when marking available
        let record = LocationAvailability::from_edit(false, &window).unwrap();
        assert_eq!(record.start_time, None);
        assert_eq!(record.end_time, None);
        assert_eq!(record.time_range_label(), None);
    }

    #[test]
    fn test_request_bodies() {
        let actor = true.to_request("A1", date("2024-06-01"));
        assert_eq!(
            serde_json::to_value(&actor).unwrap(),
            serde_json::json!({"actor_id": "A1", "date": "2024-06-01", "is_available": true})
        );

        let location = LocationAvailability {
            is_available: false,
            start_time: None,
            end_time: None,
        }
        .to_request("7", date("2024-06-02"));
        assert_eq!(
            serde_json::to_value(&location).unwrap(),
            serde_json::json!({
                "location_id": "7",
                "date": "2024-06-02",
                "is_available": false,
                "start_time": null,
                "end_time": null
            })
        );
    }

    #[test]
    fn test_entity_list_from_embedded() {
        let list = Entity::list_from_embedded(Some(
            r#"[{"id": "1", "name": "Jane Doe"}, {"id": 42, "name": "Warehouse"}]"#,
        ));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Jane Doe");
        assert_eq!(list[1].id, "42");

        assert!(Entity::list_from_embedded(Some("oops")).is_empty());
    }
}
