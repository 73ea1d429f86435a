//! Availability editor controller.
//!
//! Owns all mutable state of an availability page: the embedded availability
//! map, the chosen entity, the rendered grid and the day selection. The UI
//! layer only forwards events here and renders what it reads back, so the
//! whole interaction can be exercised without a DOM.

use chrono::NaiveDate;
use thiserror::Error;

use crate::availability::{AvailabilityMap, AvailabilityRecord, EntityKind, TimeWindow};
use crate::calendar::{CalendarError, CalendarGrid};
use crate::selection::{ClickMode, SelectionSet};

/// Banner text for a per-date transport failure
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update availability. See console for details.";

/// Client-side validation failures. The display text is the banner message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Please select {} first.", .0.noun_with_article())]
    NoEntity(EntityKind),
    #[error("Please select start and end dates.")]
    MissingDates,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("Please select dates first.")]
    EmptySelection,
    #[error("Start time must be before end time.")]
    TimeOrder,
    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

/// One date's pending change inside a batch
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityUpdate<R: AvailabilityRecord> {
    pub entity_id: String,
    pub date: NaiveDate,
    pub record: R,
}

impl<R: AvailabilityRecord> AvailabilityUpdate<R> {
    pub fn request(&self) -> R::Request {
        self.record.to_request(&self.entity_id, self.date)
    }

    /// Banner text when the server answered `success: false`
    pub fn rejection_message(&self, message: &str) -> String {
        format!("Error updating date {}: {}", self.date.format("%Y-%m-%d"), message)
    }
}

/// Every per-date request triggered by one "mark available/unavailable" click
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityBatch<R: AvailabilityRecord> {
    pub entity_id: String,
    pub updates: Vec<AvailabilityUpdate<R>>,
}

impl<R: AvailabilityRecord> AvailabilityBatch<R> {
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// How a single per-date request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Server answered `success: false`
    Rejected(String),
    /// Transport or decoding failure
    Failed,
}

/// Tally of a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub applied: usize,
}

impl BatchSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a UpdateOutcome>) -> Self {
        let mut summary = BatchSummary::default();
        for outcome in outcomes {
            summary.total += 1;
            if *outcome == UpdateOutcome::Applied {
                summary.applied += 1;
            }
        }
        summary
    }

    /// The aggregate banner only appears when every request succeeded
    pub fn success_message(&self) -> Option<String> {
        if self.total > 0 && self.applied == self.total {
            Some(format!("Successfully updated availability for {} dates.", self.applied))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityEditor<R: AvailabilityRecord> {
    availability: AvailabilityMap<R>,
    selection: SelectionSet,
    selected_entity: Option<String>,
    grid: Option<CalendarGrid>,
}

impl<R: AvailabilityRecord> AvailabilityEditor<R> {
    pub fn new(availability: AvailabilityMap<R>) -> Self {
        Self {
            availability,
            selection: SelectionSet::new(),
            selected_entity: None,
            grid: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        R::KIND
    }

    pub fn availability(&self) -> &AvailabilityMap<R> {
        &self.availability
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selected_entity(&self) -> Option<&str> {
        self.selected_entity.as_deref()
    }

    pub fn grid(&self) -> Option<&CalendarGrid> {
        self.grid.as_ref()
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.selection.contains(date)
    }

    /// Switch to another entity (dropdown change or list-item click).
    ///
    /// Always a full selection reset. An empty id means "no entity". A grid
    /// on screen is rebuilt over the same range for the new entity, or
    /// dropped when no entity is left.
    pub fn select_entity(&mut self, entity_id: &str) {
        let entity_id = entity_id.trim();
        self.selected_entity = if entity_id.is_empty() {
            None
        } else {
            Some(entity_id.to_string())
        };
        self.selection.clear();

        let stale = self
            .grid
            .as_ref()
            .filter(|g| self.selected_entity.as_deref() != Some(g.entity_id.as_str()))
            .map(|g| (g.start, g.end));
        if let Some((start, end)) = stale {
            self.grid = match &self.selected_entity {
                Some(id) => CalendarGrid::generate(id, start, end, &self.availability).ok(),
                None => None,
            };
        }
        log::debug!("🎬 EDITOR: Selected {:?} {:?}", R::KIND, self.selected_entity);
    }

    /// Build a fresh grid from raw `YYYY-MM-DD` inputs.
    ///
    /// Any validation failure leaves the previous grid untouched.
    pub fn generate_calendar(&mut self, start_input: &str, end_input: &str) -> Result<&CalendarGrid, EditorError> {
        let entity_id = self
            .selected_entity
            .clone()
            .ok_or(EditorError::NoEntity(R::KIND))?;

        let (start_input, end_input) = (start_input.trim(), end_input.trim());
        if start_input.is_empty() || end_input.is_empty() {
            return Err(EditorError::MissingDates);
        }
        let start = parse_date(start_input)?;
        let end = parse_date(end_input)?;

        let grid = CalendarGrid::generate(&entity_id, start, end, &self.availability)?;
        log::info!("🗓️ EDITOR: Calendar generated for {} ({} to {})", entity_id, start, end);

        Ok(&*self.grid.insert(grid))
    }

    /// Route a day-cell click into the selection. Padding cells are inert.
    pub fn click_day(&mut self, date: NaiveDate, mode: ClickMode) -> bool {
        let in_grid = self.grid.as_ref().map_or(false, |g| {
            self.selected_entity.as_deref() == Some(g.entity_id.as_str()) && g.day(date).is_some()
        });
        if !in_grid {
            return false;
        }
        self.selection.click(date, mode);
        true
    }

    /// Validate and turn the current selection into one update per date.
    ///
    /// Nothing is dispatched when this fails.
    pub fn plan_batch(&self, is_available: bool, window: &TimeWindow) -> Result<AvailabilityBatch<R>, EditorError> {
        let entity_id = self
            .selected_entity
            .clone()
            .ok_or(EditorError::NoEntity(R::KIND))?;

        if self.selection.is_empty() {
            return Err(EditorError::EmptySelection);
        }

        let record = R::from_edit(is_available, window)?;

        let updates = self
            .selection
            .dates()
            .iter()
            .map(|date| AvailabilityUpdate {
                entity_id: entity_id.clone(),
                date: *date,
                record: record.clone(),
            })
            .collect();

        Ok(AvailabilityBatch { entity_id, updates })
    }

    /// Commit one acknowledged update into the map and repaint its cell.
    ///
    /// Only called after the server reported success for this date.
    pub fn apply_update(&mut self, update: &AvailabilityUpdate<R>) {
        self.availability.set(&update.entity_id, update.date, update.record.clone());

        if let Some(grid) = self.grid.as_mut().filter(|g| g.entity_id == update.entity_id) {
            grid.repaint(update.date, &update.record);
        }
        log::debug!("🗓️ EDITOR: Applied {:?} for {} on {}", update.record, update.entity_id, update.date);
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, EditorError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| EditorError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::LocationAvailability;
    use crate::calendar::DayStatus;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn actor_editor() -> AvailabilityEditor<bool> {
        let mut editor = AvailabilityEditor::new(AvailabilityMap::new());
        editor.select_entity("A1");
        editor.generate_calendar("2024-06-01", "2024-06-30").unwrap();
        editor
    }

    #[test]
    fn test_generate_requires_entity() {
        let mut editor = AvailabilityEditor::<bool>::new(AvailabilityMap::new());
        let err = editor.generate_calendar("2024-06-01", "2024-06-30").unwrap_err();
        assert_eq!(err.to_string(), "Please select an actor first.");

        let mut editor = AvailabilityEditor::<LocationAvailability>::new(AvailabilityMap::new());
        let err = editor.generate_calendar("2024-06-01", "2024-06-30").unwrap_err();
        assert_eq!(err.to_string(), "Please select a location first.");
    }

    #[test]
    fn test_generate_requires_both_dates() {
        let mut editor = AvailabilityEditor::<bool>::new(AvailabilityMap::new());
        editor.select_entity("A1");
        assert_eq!(editor.generate_calendar("2024-06-01", "").unwrap_err(), EditorError::MissingDates);
        assert!(editor.grid().is_none());
    }

    #[test]
    fn test_inverted_range_keeps_previous_grid() {
        let mut editor = actor_editor();
        let before = editor.grid().cloned();

        let err = editor.generate_calendar("2024-07-10", "2024-07-01").unwrap_err();
        assert_eq!(err.to_string(), "Start date must be before end date.");
        assert_eq!(editor.grid().cloned(), before);
    }

    #[test]
    fn test_regenerate_replaces_grid() {
        let mut editor = actor_editor();
        editor.generate_calendar("2024-08-01", "2024-08-03").unwrap();
        let grid = editor.grid().unwrap();
        assert_eq!(grid.start, date("2024-08-01"));
        assert_eq!(grid.range_days().count(), 3);
    }

    #[test]
    fn test_entity_change_clears_selection() {
        let mut editor = actor_editor();
        editor.click_day(date("2024-06-03"), ClickMode::Single);
        editor.click_day(date("2024-06-04"), ClickMode::Toggle);
        assert_eq!(editor.selection().len(), 2);

        editor.select_entity("B2");
        assert!(editor.selection().is_empty());
        assert_eq!(editor.selected_entity(), Some("B2"));
    }

    #[test]
    fn test_entity_change_rebuilds_visible_grid() {
        let mut editor = actor_editor();
        editor.select_entity("B2");

        let grid = editor.grid().unwrap();
        assert_eq!(grid.entity_id, "B2");
        assert_eq!(grid.start, date("2024-06-01"));
        assert_eq!(grid.end, date("2024-06-30"));

        // Edits made through the rebuilt grid show up on it
        assert!(editor.click_day(date("2024-06-03"), ClickMode::Single));
        let batch = editor.plan_batch(false, &TimeWindow::default()).unwrap();
        assert_eq!(batch.entity_id, "B2");
        editor.apply_update(&batch.updates[0]);

        assert_eq!(editor.availability().get("B2", date("2024-06-03")), Some(&false));
        assert_eq!(editor.availability().get("A1", date("2024-06-03")), None);
        assert_eq!(
            editor.grid().unwrap().day(date("2024-06-03")).unwrap().status,
            Some(DayStatus::Unavailable)
        );
    }

    #[test]
    fn test_clearing_entity_drops_grid() {
        let mut editor = actor_editor();
        editor.select_entity("");
        assert!(editor.grid().is_none());
        assert!(!editor.click_day(date("2024-06-03"), ClickMode::Single));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_padding_clicks_are_ignored() {
        let mut editor = actor_editor();
        // May 31 is a padding cell of the June grid
        assert!(!editor.click_day(date("2024-05-31"), ClickMode::Single));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_plan_batch_preconditions() {
        let mut editor = AvailabilityEditor::<bool>::new(AvailabilityMap::new());
        assert_eq!(
            editor.plan_batch(false, &TimeWindow::default()).unwrap_err(),
            EditorError::NoEntity(EntityKind::Actor)
        );

        editor.select_entity("A1");
        assert_eq!(
            editor.plan_batch(false, &TimeWindow::default()).unwrap_err(),
            EditorError::EmptySelection
        );
    }

    #[test]
    fn test_batch_mark_unavailable_two_dates() {
        let mut editor = actor_editor();
        editor.click_day(date("2024-06-01"), ClickMode::Single);
        editor.click_day(date("2024-06-02"), ClickMode::Toggle);

        let batch = editor.plan_batch(false, &TimeWindow::default()).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.updates[0].request().actor_id, "A1");

        for update in &batch.updates {
            editor.apply_update(update);
        }

        assert_eq!(editor.availability().get("A1", date("2024-06-01")), Some(&false));
        assert_eq!(editor.availability().get("A1", date("2024-06-02")), Some(&false));
        let grid = editor.grid().unwrap();
        assert_eq!(grid.day(date("2024-06-01")).unwrap().status, Some(DayStatus::Unavailable));
        // Selection survives the repaint
        assert!(editor.is_selected(date("2024-06-02")));

        let outcomes = vec![UpdateOutcome::Applied, UpdateOutcome::Applied];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(
            summary.success_message().as_deref(),
            Some("Successfully updated availability for 2 dates.")
        );
    }

    #[test]
    fn test_failed_update_leaves_state_untouched() {
        let mut editor = actor_editor();
        editor.click_day(date("2024-06-01"), ClickMode::Single);
        editor.click_day(date("2024-06-02"), ClickMode::Toggle);
        let batch = editor.plan_batch(false, &TimeWindow::default()).unwrap();

        // Only the first request succeeds
        editor.apply_update(&batch.updates[0]);

        assert_eq!(editor.availability().get("A1", date("2024-06-02")), None);
        assert_eq!(
            editor.grid().unwrap().day(date("2024-06-02")).unwrap().status,
            Some(DayStatus::Available)
        );

        let outcomes = vec![UpdateOutcome::Applied, UpdateOutcome::Rejected("Missing required data".into())];
        assert_eq!(BatchSummary::from_outcomes(&outcomes).success_message(), None);
        assert_eq!(
            batch.updates[1].rejection_message("Missing required data"),
            "Error updating date 2024-06-02: Missing required data"
        );
    }

    #[test]
    fn test_location_time_order_rejected_before_dispatch() {
        let mut editor = AvailabilityEditor::<LocationAvailability>::new(AvailabilityMap::new());
        editor.select_entity("7");
        editor.generate_calendar("2024-06-01", "2024-06-07").unwrap();
        editor.click_day(date("2024-06-03"), ClickMode::Single);

        let err = editor
            .plan_batch(true, &TimeWindow::from_inputs("14:00", "12:00"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Start time must be before end time.");
    }

    #[test]
    fn test_location_update_replaces_time_label() {
        let mut editor = AvailabilityEditor::<LocationAvailability>::new(AvailabilityMap::new());
        editor.select_entity("7");
        editor.generate_calendar("2024-06-01", "2024-06-07").unwrap();
        editor.click_day(date("2024-06-03"), ClickMode::Single);

        let batch = editor
            .plan_batch(true, &TimeWindow::from_inputs("08:00", "12:00"))
            .unwrap();
        editor.apply_update(&batch.updates[0]);
        assert_eq!(
            editor.grid().unwrap().day(date("2024-06-03")).unwrap().time_range.as_deref(),
            Some("08:00 - 12:00")
        );

        let request = batch.updates[0].request();
        assert_eq!(request.start_time.as_deref(), Some("08:00"));
        assert_eq!(request.location_id, "7");
    }

    #[test]
    fn test_update_for_other_entity_does_not_repaint() {
        let mut editor = actor_editor();
        editor.click_day(date("2024-06-03"), ClickMode::Single);
        let batch = editor.plan_batch(false, &TimeWindow::default()).unwrap();

        // User switched entity and regenerated while the batch was in flight
        editor.select_entity("B2");
        editor.generate_calendar("2024-06-01", "2024-06-30").unwrap();
        editor.apply_update(&batch.updates[0]);

        assert_eq!(editor.availability().get("A1", date("2024-06-03")), Some(&false));
        assert_eq!(
            editor.grid().unwrap().day(date("2024-06-03")).unwrap().status,
            Some(DayStatus::Available)
        );
    }
}
