use anyhow::{anyhow, Context, Result};
use shared::{AvailabilityMap, Entity, LocationAvailability};
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::availability_page::AvailabilityPage;
use components::optimization_page::OptimizationPage;
use components::schedule_actions::ScheduleActions;
use services::api::ApiClient;
use services::config::{AppConfig, Page};

/// Page data decoded once at startup from the mount element
#[derive(Clone, PartialEq)]
enum PageData {
    ActorAvailability {
        entities: Vec<Entity>,
        availability: AvailabilityMap<bool>,
    },
    LocationAvailability {
        entities: Vec<Entity>,
        availability: AvailabilityMap<LocationAvailability>,
    },
    Optimization {
        default_start_date: Option<String>,
        default_end_date: Option<String>,
    },
    Schedule {
        schedule_id: String,
        approved: bool,
    },
}

impl PageData {
    fn from_config(config: &AppConfig) -> Result<Self> {
        let entities = || Entity::list_from_embedded(config.entities_json.as_deref());

        Ok(match config.page {
            Page::ActorAvailability => PageData::ActorAvailability {
                entities: entities(),
                availability: AvailabilityMap::from_embedded(config.availability_json.as_deref()),
            },
            Page::LocationAvailability => PageData::LocationAvailability {
                entities: entities(),
                availability: AvailabilityMap::from_embedded(config.availability_json.as_deref()),
            },
            Page::Optimization => PageData::Optimization {
                default_start_date: config.default_start_date.clone(),
                default_end_date: config.default_end_date.clone(),
            },
            Page::Schedule => PageData::Schedule {
                schedule_id: config
                    .schedule_id
                    .clone()
                    .ok_or_else(|| anyhow!("Schedule page requires data-schedule-id"))?,
                approved: config.approved,
            },
        })
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    page: PageData,
    api_client: ApiClient,
    alert_timeout_ms: u32,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let api_client = props.api_client.clone();
    let alert_timeout_ms = props.alert_timeout_ms;

    match props.page.clone() {
        PageData::ActorAvailability { entities, availability } => html! {
            <AvailabilityPage<bool> {entities} {availability} {api_client} {alert_timeout_ms} />
        },
        PageData::LocationAvailability { entities, availability } => html! {
            <AvailabilityPage<LocationAvailability> {entities} {availability} {api_client} {alert_timeout_ms} />
        },
        PageData::Optimization {
            default_start_date,
            default_end_date,
        } => html! {
            <OptimizationPage {api_client} {alert_timeout_ms} {default_start_date} {default_end_date} />
        },
        PageData::Schedule { schedule_id, approved } => html! {
            <ScheduleActions {schedule_id} {approved} {api_client} {alert_timeout_ms} />
        },
    }
}

fn run() -> Result<()> {
    services::logging::init(log::LevelFilter::Info);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .context("No document available")?;
    let mount = document
        .get_element_by_id(AppConfig::MOUNT_ID)
        .with_context(|| format!("Missing #{} mount element", AppConfig::MOUNT_ID))?;

    let config = AppConfig::from_mount_element(&mount)?;
    log::set_max_level(config.log_level);
    log::info!("🚀 APP: Starting {:?} page", config.page);

    let props = AppProps {
        page: PageData::from_config(&config)?,
        api_client: ApiClient::new(config.api_base_url.clone()),
        alert_timeout_ms: config.alert_timeout_ms,
    };

    yew::Renderer::<App>::with_root_and_props(mount, props).render();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        gloo::console::error!(format!("Failed to start: {:#}", e));
    }
}
