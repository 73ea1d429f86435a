//! Platform-independent core of the shooting-schedule client.
//!
//! Everything here is plain data and state transitions so it can be tested
//! natively; the Yew frontend only wires these types to the DOM and HTTP.

pub mod alerts;
pub mod availability;
pub mod calendar;
pub mod editor;
pub mod optimization;
pub mod schedule;
pub mod selection;

pub use alerts::{Alert, AlertLevel, AlertQueue, DEFAULT_ALERT_TIMEOUT_MS};
pub use availability::{
    ActorAvailabilityRequest, AvailabilityMap, AvailabilityRecord, AvailabilityUpdateResponse, Entity,
    EntityKind, LocationAvailability, LocationAvailabilityRequest, TimeWindow,
};
pub use calendar::{CalendarDay, CalendarDayType, CalendarError, CalendarGrid, CalendarWeek, DayStatus, WEEKDAY_LABELS};
pub use editor::{
    AvailabilityBatch, AvailabilityEditor, AvailabilityUpdate, BatchSummary, EditorError, UpdateOutcome,
    UPDATE_FAILED_MESSAGE,
};
pub use optimization::{Algorithm, FormError, OptimizationForm, WeightFactor};
pub use schedule::{
    ApproveScheduleResponse, NotifyActorsResponse, OptimizeError, OptimizeOutcome, OptimizeScheduleResponse,
    SaveScheduleForm, ScheduleActionBar, ScheduleMetadata, ScheduleResult, ScheduledScene, TimelineDay,
};
pub use selection::{ClickMode, SelectionSet};
