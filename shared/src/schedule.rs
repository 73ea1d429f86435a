//! Optimized schedule results and the schedule action bar.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::availability::id_from_string_or_number;

pub const OPTIMIZE_ENDPOINT: &str = "/api/optimize-schedule";
pub const SAVE_SCHEDULE_ENDPOINT: &str = "/save-schedule";

pub const OPTIMIZATION_FAILED_MESSAGE: &str = "Optimization failed";
pub const OPTIMIZATION_ERROR_MESSAGE: &str = "An error occurred during optimization. See console for details.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizeError {
    /// `success: false`, message shown verbatim
    #[error("{0}")]
    Rejected(String),
    #[error("Optimization response did not contain a schedule")]
    MissingSchedule,
}

fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_from_string_or_number")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}

/// One scene placed on the shooting schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledScene {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<String>,
    /// `YYYY-MM-DD`
    pub shooting_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int_ext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<f64>,
    #[serde(default, alias = "cost", skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields this client does not render; kept so a save round-trips them
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ScheduledScene {
    pub fn title(&self) -> String {
        format!("Scene {}", self.scene_number.as_deref().unwrap_or("?"))
    }

    pub fn location_display(&self) -> &str {
        non_empty(&self.location_name).unwrap_or("No Location")
    }

    pub fn time_of_day_display(&self) -> &str {
        non_empty(&self.time_of_day).unwrap_or("N/A")
    }

    pub fn duration_display(&self) -> String {
        match self.estimated_duration {
            Some(hours) if hours > 0.0 => format!("{}h", hours),
            _ => "N/A".to_string(),
        }
    }

    pub fn cost_display(&self) -> String {
        match self.estimated_cost {
            Some(cost) => format!("${}", format_number(cost)),
            None => "N/A".to_string(),
        }
    }

    pub fn description_display(&self) -> &str {
        non_empty(&self.description).unwrap_or("No description available")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    #[serde(default)]
    pub total_cost: f64,
    /// Counts arrive as plain JSON numbers, sometimes with a fraction part
    #[serde(default)]
    pub total_days: f64,
    #[serde(default)]
    pub total_scenes: f64,
}

impl ScheduleMetadata {
    /// Summary for responses that came without metadata
    pub fn derive_from(scenes: &BTreeMap<String, ScheduledScene>) -> Self {
        let days: BTreeSet<&str> = scenes.values().map(|s| s.shooting_date.as_str()).collect();
        Self {
            total_cost: scenes.values().filter_map(|s| s.estimated_cost).sum(),
            total_days: days.len() as f64,
            total_scenes: scenes.len() as f64,
        }
    }

    pub fn cost_display(&self) -> String {
        format!("${}", format_number(self.total_cost))
    }

    pub fn days_display(&self) -> String {
        format!("{} days", format_number(self.total_days))
    }

    pub fn scenes_display(&self) -> String {
        format_number(self.total_scenes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBody {
    pub scenes: BTreeMap<String, ScheduledScene>,
    #[serde(default)]
    pub metadata: Option<ScheduleMetadata>,
}

/// Raw reply of `POST /api/optimize-schedule`.
///
/// The service answers in one of two shapes: legacy `{result, metadata}` or
/// `{schedule: {scenes, metadata}}`. Call [`OptimizeScheduleResponse::into_outcome`]
/// right after decoding; nothing else should look at the raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeScheduleResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub result: Option<BTreeMap<String, ScheduledScene>>,
    #[serde(default)]
    pub metadata: Option<ScheduleMetadata>,
    #[serde(default)]
    pub schedule: Option<ScheduleBody>,
}

/// Normalized schedule ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleResult {
    pub scenes: BTreeMap<String, ScheduledScene>,
    pub metadata: ScheduleMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeOutcome {
    /// Server stored the schedule and wants the browser on its page
    Redirect(String),
    Schedule(ScheduleResult),
}

impl OptimizeScheduleResponse {
    pub fn into_outcome(self) -> Result<OptimizeOutcome, OptimizeError> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| OPTIMIZATION_FAILED_MESSAGE.to_string());
            return Err(OptimizeError::Rejected(message));
        }

        if let Some(url) = self.redirect_url.filter(|u| !u.is_empty()) {
            return Ok(OptimizeOutcome::Redirect(url));
        }

        let (scenes, metadata) = match (self.schedule, self.result) {
            (Some(body), _) => (body.scenes, body.metadata),
            (None, Some(scenes)) => (scenes, self.metadata),
            (None, None) => return Err(OptimizeError::MissingSchedule),
        };

        let metadata = metadata.unwrap_or_else(|| ScheduleMetadata::derive_from(&scenes));
        Ok(OptimizeOutcome::Schedule(ScheduleResult { scenes, metadata }))
    }
}

/// Scenes shot on one day
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDay {
    pub date: String,
    pub label: String,
    pub scenes: Vec<ScheduledScene>,
}

/// Hidden fields of the "Save This Schedule" form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveScheduleForm {
    pub schedule_data: String,
    pub algorithm: String,
    pub name: String,
}

impl ScheduleResult {
    /// Group scenes by shooting date, dates ascending.
    ///
    /// Within a day scenes run by start time, then by scene key.
    pub fn timeline(&self) -> Vec<TimelineDay> {
        let mut by_date: BTreeMap<&str, Vec<(&String, &ScheduledScene)>> = BTreeMap::new();
        for (key, scene) in &self.scenes {
            by_date.entry(scene.shooting_date.as_str()).or_default().push((key, scene));
        }

        by_date
            .into_iter()
            .map(|(date, mut scenes)| {
                scenes.sort_by(|(ka, a), (kb, b)| {
                    a.start_time
                        .cmp(&b.start_time)
                        .then_with(|| natural_key(ka).cmp(&natural_key(kb)))
                });
                TimelineDay {
                    date: date.to_string(),
                    label: timeline_label(date),
                    scenes: scenes.into_iter().map(|(_, s)| s.clone()).collect(),
                }
            })
            .collect()
    }

    pub fn save_form(&self, algorithm: &str, today: &str) -> Result<SaveScheduleForm, serde_json::Error> {
        Ok(SaveScheduleForm {
            schedule_data: serde_json::to_string(&self.scenes)?,
            algorithm: algorithm.to_string(),
            name: format!("Schedule - {}", today),
        })
    }
}

/// Numeric keys sort numerically, anything else after them as text
fn natural_key(key: &str) -> (u64, &str) {
    (key.parse::<u64>().unwrap_or(u64::MAX), key)
}

/// `2024-06-01` -> `Sat, Jun 1`
pub fn timeline_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%a, %b %-d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// en-US style grouping with up to three fraction digits: `1234.5` -> `1,234.5`
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.3}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

// --- Schedule action bar ---

pub const APPROVE_CONFIRM: &str = "Are you sure you want to approve this schedule? This action cannot be undone.";
pub const APPROVE_SUCCESS: &str = "Schedule approved successfully!";
pub const APPROVE_FAILED: &str = "Failed to approve schedule";
pub const APPROVE_ERROR: &str = "An error occurred while approving the schedule";

pub const NOTIFY_CONFIRM: &str =
    "Are you sure you want to send notifications to all actors? They will be notified by email about their shooting dates.";
pub const NOTIFY_PENDING_LABEL: &str = "Sending...";
pub const NOTIFY_FAILED: &str = "Failed to send notifications";
pub const NOTIFY_ERROR: &str = "An error occurred while sending notifications";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveScheduleResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyActorsResponse {
    pub success: bool,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NotifyActorsResponse {
    pub fn success_message(&self) -> String {
        format!("Notifications sent successfully to {} actors", self.count.unwrap_or(0))
    }
}

/// Server message if present, otherwise the fallback
pub fn message_or(message: Option<&str>, fallback: &str) -> String {
    match message {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ => fallback.to_string(),
    }
}

/// Button state of the approve / notify / export / print bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleActionBar {
    pub schedule_id: String,
    approved: bool,
    approve_in_flight: bool,
    notify_in_flight: bool,
}

impl ScheduleActionBar {
    pub fn new(schedule_id: impl Into<String>, approved: bool) -> Self {
        Self {
            schedule_id: schedule_id.into(),
            approved,
            approve_in_flight: false,
            notify_in_flight: false,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn approve_enabled(&self) -> bool {
        !self.approved && !self.approve_in_flight
    }

    pub fn notify_enabled(&self) -> bool {
        self.approved && !self.notify_in_flight
    }

    pub fn notify_in_flight(&self) -> bool {
        self.notify_in_flight
    }

    /// Returns `false` if approving is not possible right now
    pub fn begin_approve(&mut self) -> bool {
        if !self.approve_enabled() {
            return false;
        }
        self.approve_in_flight = true;
        true
    }

    pub fn finish_approve(&mut self, succeeded: bool) {
        self.approve_in_flight = false;
        if succeeded {
            self.approved = true;
        }
    }

    pub fn begin_notify(&mut self) -> bool {
        if !self.notify_enabled() {
            return false;
        }
        self.notify_in_flight = true;
        true
    }

    pub fn finish_notify(&mut self) {
        self.notify_in_flight = false;
    }

    pub fn approve_path(&self) -> String {
        format!("/approve-schedule/{}", self.schedule_id)
    }

    pub fn notify_path(&self) -> String {
        format!("/notify-actors/{}", self.schedule_id)
    }

    pub fn export_path(&self) -> String {
        format!("/export-schedule-pdf/{}", self.schedule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(number: &str, date: &str, start: Option<&str>, cost: f64) -> ScheduledScene {
        serde_json::from_value(serde_json::json!({
            "scene_number": number,
            "shooting_date": date,
            "start_time": start,
            "estimated_cost": cost,
        }))
        .unwrap()
    }

    #[test]
    fn test_nested_shape_normalizes() {
        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "schedule": {
                "scenes": {
                    "1": {"scene_number": 1, "shooting_date": "2024-06-03", "estimated_cost": 200},
                    "2": {"scene_number": 2, "shooting_date": "2024-06-01", "estimated_cost": 200},
                    "3": {"scene_number": 3, "shooting_date": "2024-06-02", "estimated_cost": 200},
                    "4": {"scene_number": 4, "shooting_date": "2024-06-01", "estimated_cost": 200},
                    "5": {"scene_number": 5, "shooting_date": "2024-06-03", "estimated_cost": 200}
                },
                "metadata": {"total_cost": 1000, "total_days": 3, "total_scenes": 5}
            }
        }))
        .unwrap();

        let OptimizeOutcome::Schedule(result) = response.into_outcome().unwrap() else {
            panic!("expected inline schedule");
        };

        assert_eq!(result.metadata.cost_display(), "$1,000");
        assert_eq!(result.metadata.days_display(), "3 days");
        assert_eq!(result.metadata.scenes_display(), "5");

        let timeline = result.timeline();
        let dates: Vec<&str> = timeline.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-06-02", "2024-06-03"]);
        assert_eq!(timeline[0].label, "Sat, Jun 1");
        assert_eq!(timeline[0].scenes.len(), 2);
        assert_eq!(timeline[0].scenes[0].title(), "Scene 2");
    }

    #[test]
    fn test_legacy_shape_normalizes() {
        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "result": {
                "10": {"scene_number": "10", "shooting_date": "2024-06-02", "cost": 150.5}
            },
            "metadata": {"total_cost": 150.5, "total_days": 1, "total_scenes": 1}
        }))
        .unwrap();

        let OptimizeOutcome::Schedule(result) = response.into_outcome().unwrap() else {
            panic!("expected inline schedule");
        };
        assert_eq!(result.scenes["10"].estimated_cost, Some(150.5));
        assert_eq!(result.metadata.total_days, 1.0);
    }

    #[test]
    fn test_fractional_metadata_counts_decode() {
        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "result": {"1": {"shooting_date": "2024-06-01"}},
            "metadata": {"total_cost": 1234.5, "total_days": 3.0, "total_scenes": 12.0}
        }))
        .unwrap();

        let OptimizeOutcome::Schedule(result) = response.into_outcome().unwrap() else {
            panic!("expected inline schedule");
        };
        assert_eq!(result.metadata.cost_display(), "$1,234.5");
        assert_eq!(result.metadata.days_display(), "3 days");
        assert_eq!(result.metadata.scenes_display(), "12");
    }

    #[test]
    fn test_missing_metadata_is_derived() {
        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "schedule": {"scenes": {
                "1": {"shooting_date": "2024-06-01", "estimated_cost": 100},
                "2": {"shooting_date": "2024-06-01", "estimated_cost": 50}
            }}
        }))
        .unwrap();

        let OptimizeOutcome::Schedule(result) = response.into_outcome().unwrap() else {
            panic!("expected inline schedule");
        };
        assert_eq!(result.metadata, ScheduleMetadata { total_cost: 150.0, total_days: 1.0, total_scenes: 2.0 });
    }

    #[test]
    fn test_redirect_short_circuits() {
        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "schedule_id": 12,
            "redirect_url": "/schedule/12"
        }))
        .unwrap();
        assert_eq!(response.into_outcome().unwrap(), OptimizeOutcome::Redirect("/schedule/12".into()));
    }

    #[test]
    fn test_rejected_and_empty_responses() {
        let response: OptimizeScheduleResponse =
            serde_json::from_value(serde_json::json!({"success": false, "message": "Start date is required"})).unwrap();
        assert_eq!(
            response.into_outcome().unwrap_err().to_string(),
            "Start date is required"
        );

        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({"success": false})).unwrap();
        assert_eq!(response.into_outcome().unwrap_err().to_string(), "Optimization failed");

        let response: OptimizeScheduleResponse = serde_json::from_value(serde_json::json!({"success": true})).unwrap();
        assert_eq!(response.into_outcome().unwrap_err(), OptimizeError::MissingSchedule);
    }

    #[test]
    fn test_scenes_within_day_ordered_by_start_time() {
        let mut scenes = BTreeMap::new();
        scenes.insert("2".to_string(), scene("2", "2024-06-01", Some("13:00"), 1.0));
        scenes.insert("10".to_string(), scene("10", "2024-06-01", Some("08:00"), 1.0));
        scenes.insert("3".to_string(), scene("3", "2024-06-01", Some("08:00"), 1.0));
        let result = ScheduleResult {
            metadata: ScheduleMetadata::derive_from(&scenes),
            scenes,
        };

        let titles: Vec<String> = result.timeline()[0].scenes.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Scene 3", "Scene 10", "Scene 2"]);
    }

    #[test]
    fn test_scene_display_fallbacks() {
        let scene: ScheduledScene = serde_json::from_value(serde_json::json!({
            "shooting_date": "2024-06-01",
            "description": "  "
        }))
        .unwrap();

        assert_eq!(scene.location_display(), "No Location");
        assert_eq!(scene.time_of_day_display(), "N/A");
        assert_eq!(scene.duration_display(), "N/A");
        assert_eq!(scene.cost_display(), "N/A");
        assert_eq!(scene.description_display(), "No description available");

        let scene: ScheduledScene = serde_json::from_value(serde_json::json!({
            "shooting_date": "2024-06-01",
            "estimated_duration": 2.5,
            "estimated_cost": 12500
        }))
        .unwrap();
        assert_eq!(scene.duration_display(), "2.5h");
        assert_eq!(scene.cost_display(), "$12,500");
    }

    #[test]
    fn test_save_form_keeps_unknown_fields() {
        let mut scenes = BTreeMap::new();
        let mut s = scene("1", "2024-06-01", None, 10.0);
        s.extra.insert("scene_id".to_string(), serde_json::json!(1));
        scenes.insert("1".to_string(), s);
        let result = ScheduleResult { metadata: ScheduleMetadata::derive_from(&scenes), scenes };

        let form = result.save_form("ant_colony", "6/1/2024").unwrap();
        assert_eq!(form.name, "Schedule - 6/1/2024");
        assert_eq!(form.algorithm, "ant_colony");

        let data: serde_json::Value = serde_json::from_str(&form.schedule_data).unwrap();
        assert_eq!(data["1"]["scene_id"], 1);
        assert_eq!(data["1"]["shooting_date"], "2024-06-01");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(0.12345), "0.123");
        assert_eq!(format_number(-2500.0), "-2,500");
    }

    #[test]
    fn test_action_bar_approve_then_notify() {
        let mut bar = ScheduleActionBar::new("12", false);
        assert!(bar.approve_enabled());
        assert!(!bar.notify_enabled());
        assert!(!bar.begin_notify());

        assert!(bar.begin_approve());
        assert!(!bar.approve_enabled());
        bar.finish_approve(true);

        assert!(bar.is_approved());
        assert!(!bar.approve_enabled());
        assert!(bar.notify_enabled());

        assert!(bar.begin_notify());
        assert!(bar.notify_in_flight());
        assert!(!bar.begin_notify());
        bar.finish_notify();
        assert!(bar.notify_enabled());
    }

    #[test]
    fn test_action_bar_failed_approve_can_retry() {
        let mut bar = ScheduleActionBar::new("12", false);
        bar.begin_approve();
        bar.finish_approve(false);
        assert!(bar.approve_enabled());
        assert!(!bar.notify_enabled());
    }

    #[test]
    fn test_action_bar_paths_and_messages() {
        let bar = ScheduleActionBar::new("12", true);
        assert_eq!(bar.approve_path(), "/approve-schedule/12");
        assert_eq!(bar.notify_path(), "/notify-actors/12");
        assert_eq!(bar.export_path(), "/export-schedule-pdf/12");

        let response = NotifyActorsResponse { success: true, count: Some(4), message: None };
        assert_eq!(response.success_message(), "Notifications sent successfully to 4 actors");

        assert_eq!(message_or(None, APPROVE_FAILED), "Failed to approve schedule");
        assert_eq!(message_or(Some("Already approved"), APPROVE_FAILED), "Already approved");
    }
}
