pub mod use_alerts;
pub mod use_availability_editor;
