pub mod alert_banner;
pub mod availability_calendar;
pub mod availability_page;
pub mod entity_picker;
pub mod optimization_page;
pub mod schedule_actions;
pub mod schedule_timeline;
