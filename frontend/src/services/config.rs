//! Page configuration read from the mount element's `data-*` attributes.

use anyhow::{anyhow, bail, Result};
use log::LevelFilter;
use shared::DEFAULT_ALERT_TIMEOUT_MS;
use std::str::FromStr;

/// Which server-rendered page the app is mounted into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    ActorAvailability,
    LocationAvailability,
    Optimization,
    Schedule,
}

impl FromStr for Page {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "actor-availability" => Ok(Page::ActorAvailability),
            "location-availability" => Ok(Page::LocationAvailability),
            "optimization" => Ok(Page::Optimization),
            "schedule" => Ok(Page::Schedule),
            other => Err(anyhow!("Unknown page: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub page: Page,
    /// Prefix for every endpoint; empty means same origin
    pub api_base_url: String,
    pub alert_timeout_ms: u32,
    pub log_level: LevelFilter,
    pub availability_json: Option<String>,
    pub entities_json: Option<String>,
    pub schedule_id: Option<String>,
    pub approved: bool,
    pub default_start_date: Option<String>,
    pub default_end_date: Option<String>,
}

impl AppConfig {
    pub const MOUNT_ID: &'static str = "app";

    /// Build the config from an attribute lookup (`name -> value`)
    pub fn from_attributes<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let page: Page = match non_empty("data-page") {
            Some(value) => value.parse()?,
            None => bail!("Mount element is missing data-page"),
        };

        let alert_timeout_ms = match non_empty("data-alert-timeout-ms") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("⚙️ CONFIG: Invalid data-alert-timeout-ms '{}', using default", raw);
                DEFAULT_ALERT_TIMEOUT_MS
            }),
            None => DEFAULT_ALERT_TIMEOUT_MS,
        };

        let log_level = match non_empty("data-log-level") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("⚙️ CONFIG: Invalid data-log-level '{}', using info", raw);
                LevelFilter::Info
            }),
            None => LevelFilter::Info,
        };

        let schedule_id = non_empty("data-schedule-id");
        if page == Page::Schedule && schedule_id.is_none() {
            bail!("Schedule page requires data-schedule-id");
        }

        Ok(Self {
            page,
            api_base_url: non_empty("data-api-base")
                .map(|base| base.trim().trim_end_matches('/').to_string())
                .unwrap_or_default(),
            alert_timeout_ms,
            log_level,
            availability_json: non_empty("data-availability"),
            entities_json: non_empty("data-entities"),
            schedule_id,
            approved: non_empty("data-approved").map_or(false, |v| v.trim().eq_ignore_ascii_case("true")),
            default_start_date: non_empty("data-start-date"),
            default_end_date: non_empty("data-end-date"),
        })
    }

    pub fn from_mount_element(element: &web_sys::Element) -> Result<Self> {
        Self::from_attributes(|name| element.get_attribute(name))
    }
}
