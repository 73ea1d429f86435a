//! Week-row calendar grid for an inclusive date range.
//!
//! The grid always spans whole Sunday-first weeks. Days that fall outside the
//! requested range are padding cells and carry no availability.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::availability::{AvailabilityMap, AvailabilityRecord};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Start date must be before end date.")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Type of calendar day for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Empty padding day before the start of the range
    PaddingBefore,
    /// Day inside the requested range
    RangeDay,
    /// Empty padding day after the end of the range
    PaddingAfter,
}

/// Availability class of an in-range day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayStatus {
    Available,
    Unavailable,
}

impl DayStatus {
    pub fn from_available(is_available: bool) -> Self {
        if is_available { DayStatus::Available } else { DayStatus::Unavailable }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            DayStatus::Available => "available",
            DayStatus::Unavailable => "unavailable",
        }
    }
}

/// Represents a single cell in the calendar grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day_type: CalendarDayType,
    /// `None` for padding days
    pub status: Option<DayStatus>,
    /// Usable time window label (locations only)
    pub time_range: Option<String>,
}

impl CalendarDay {
    fn padding(date: NaiveDate, day_type: CalendarDayType) -> Self {
        Self {
            date,
            day_type,
            status: None,
            time_range: None,
        }
    }

    pub fn is_in_range(&self) -> bool {
        self.day_type == CalendarDayType::RangeDay
    }

    /// Day-of-month number shown in the cell
    pub fn day_number(&self) -> u32 {
        self.date.day()
    }

    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn paint<R: AvailabilityRecord>(&mut self, record: Option<&R>) {
        let available = record.map_or(true, R::is_available);
        self.status = Some(DayStatus::from_available(available));
        self.time_range = record.and_then(R::time_range_label);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarWeek {
    pub days: Vec<CalendarDay>,
}

/// A rendered availability calendar for one entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarGrid {
    pub entity_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarGrid {
    /// Build the grid for `entity_id` over `start..=end`.
    ///
    /// Fails without producing anything when `start` is after `end`.
    pub fn generate<R: AvailabilityRecord>(
        entity_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        availability: &AvailabilityMap<R>,
    ) -> Result<Self, CalendarError> {
        if start > end {
            return Err(CalendarError::InvalidRange { start, end });
        }

        let grid_start = start - Duration::days(i64::from(start.weekday().num_days_from_sunday()));
        let grid_end = end + Duration::days(i64::from(6 - end.weekday().num_days_from_sunday()));

        log::debug!(
            "🗓️ CALENDAR: Generating grid for {} from {} to {} (grid {}..{})",
            entity_id, start, end, grid_start, grid_end
        );

        let mut weeks = Vec::new();
        let mut current_week = Vec::with_capacity(7);

        for date in grid_start.iter_days().take_while(|d| *d <= grid_end) {
            let day = if date < start {
                CalendarDay::padding(date, CalendarDayType::PaddingBefore)
            } else if date > end {
                CalendarDay::padding(date, CalendarDayType::PaddingAfter)
            } else {
                let mut day = CalendarDay::padding(date, CalendarDayType::RangeDay);
                day.paint(availability.get(entity_id, date));
                day
            };

            current_week.push(day);
            if current_week.len() == 7 {
                weeks.push(CalendarWeek {
                    days: std::mem::take(&mut current_week),
                });
            }
        }

        log::debug!("🗓️ CALENDAR: Generated {} week rows", weeks.len());

        Ok(Self {
            entity_id: entity_id.to_string(),
            start,
            end,
            weeks,
        })
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .find(|d| d.date == date && d.is_in_range())
    }

    /// Repaint a single in-range cell after its record changed.
    ///
    /// Returns `false` if the date is not part of the grid.
    pub fn repaint<R: AvailabilityRecord>(&mut self, date: NaiveDate, record: &R) -> bool {
        let cell = self
            .weeks
            .iter_mut()
            .flat_map(|w| w.days.iter_mut())
            .find(|d| d.date == date && d.is_in_range());

        match cell {
            Some(cell) => {
                cell.paint(Some(record));
                true
            }
            None => false,
        }
    }

    /// All in-range days in order
    pub fn range_days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter(|d| d.is_in_range())
    }
}
