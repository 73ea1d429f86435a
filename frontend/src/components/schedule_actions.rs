use shared::schedule::{APPROVE_CONFIRM, APPROVE_ERROR, APPROVE_SUCCESS, NOTIFY_CONFIRM, NOTIFY_ERROR, NOTIFY_PENDING_LABEL};
use shared::ScheduleActionBar;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::alert_banner::AlertBanner;
use crate::hooks::use_alerts::use_alerts;
use crate::services::api::ApiClient;
use crate::services::browser::{confirm, navigate_to, print_page};

enum BarAction {
    BeginApprove,
    FinishApprove(bool),
    BeginNotify,
    FinishNotify,
}

#[derive(Clone, PartialEq)]
struct BarState(ScheduleActionBar);

impl Reducible for BarState {
    type Action = BarAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut bar = self.0.clone();
        match action {
            BarAction::BeginApprove => {
                bar.begin_approve();
            }
            BarAction::FinishApprove(succeeded) => bar.finish_approve(succeeded),
            BarAction::BeginNotify => {
                bar.begin_notify();
            }
            BarAction::FinishNotify => bar.finish_notify(),
        }
        Rc::new(BarState(bar))
    }
}

#[derive(Properties, PartialEq)]
pub struct ScheduleActionsProps {
    pub schedule_id: String,
    pub approved: bool,
    pub api_client: ApiClient,
    pub alert_timeout_ms: u32,
}

/// Approve / notify / export / print buttons of a saved schedule
#[function_component(ScheduleActions)]
pub fn schedule_actions(props: &ScheduleActionsProps) -> Html {
    let alerts = use_alerts(props.alert_timeout_ms);
    let bar = {
        let schedule_id = props.schedule_id.clone();
        let approved = props.approved;
        use_reducer(move || BarState(ScheduleActionBar::new(schedule_id, approved)))
    };

    let on_approve = {
        let bar = bar.clone();
        let alerts = alerts.actions.clone();
        let api_client = props.api_client.clone();
        Callback::from(move |_: MouseEvent| {
            if !bar.0.approve_enabled() || !confirm(APPROVE_CONFIRM) {
                return;
            }
            bar.dispatch(BarAction::BeginApprove);

            let path = bar.0.approve_path();
            let dispatcher = bar.dispatcher();
            let alerts = alerts.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                match api_client.approve_schedule(&path).await {
                    Ok(_) => {
                        log::info!("✅ SCHEDULE: Approved via {}", path);
                        dispatcher.dispatch(BarAction::FinishApprove(true));
                        alerts.success(APPROVE_SUCCESS);
                    }
                    Err(e) => {
                        log::error!("✅ SCHEDULE: Approve failed: {}", e);
                        dispatcher.dispatch(BarAction::FinishApprove(false));
                        alerts.danger(e.banner_message(APPROVE_ERROR));
                    }
                }
            });
        })
    };

    let on_notify = {
        let bar = bar.clone();
        let alerts = alerts.actions.clone();
        let api_client = props.api_client.clone();
        Callback::from(move |_: MouseEvent| {
            if !bar.0.notify_enabled() || !confirm(NOTIFY_CONFIRM) {
                return;
            }
            bar.dispatch(BarAction::BeginNotify);

            let path = bar.0.notify_path();
            let dispatcher = bar.dispatcher();
            let alerts = alerts.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                match api_client.notify_actors(&path).await {
                    Ok(response) => {
                        log::info!("✉️ SCHEDULE: Notified {:?} actors", response.count);
                        alerts.success(response.success_message());
                    }
                    Err(e) => {
                        log::error!("✉️ SCHEDULE: Notify failed: {}", e);
                        alerts.danger(e.banner_message(NOTIFY_ERROR));
                    }
                }
                dispatcher.dispatch(BarAction::FinishNotify);
            });
        })
    };

    let on_export = {
        let url = props.api_client.url(&bar.0.export_path());
        Callback::from(move |_: MouseEvent| navigate_to(&url))
    };

    let on_print = Callback::from(|_: MouseEvent| print_page());

    let on_dismiss = {
        let alerts = alerts.actions.clone();
        Callback::from(move |id| alerts.dismiss(id))
    };

    html! {
        <div class="schedule-actions">
            <AlertBanner alerts={alerts.state.queue.alerts().to_vec()} {on_dismiss} />

            <div class="btn-toolbar gap-2">
                if bar.0.is_approved() {
                    <button type="button" id="approve-schedule-btn" class="btn btn-success" disabled={true}>
                        {"Approved"}
                    </button>
                } else {
                    <button type="button" id="approve-schedule-btn" class="btn btn-success" disabled={!bar.0.approve_enabled()} onclick={on_approve}>
                        {"Approve Schedule"}
                    </button>
                }

                <button type="button" id="notify-actors-btn" class="btn btn-primary" disabled={!bar.0.notify_enabled()} onclick={on_notify}>
                    if bar.0.notify_in_flight() {
                        <span class="spinner-border spinner-border-sm me-1" role="status"></span>
                        {NOTIFY_PENDING_LABEL}
                    } else {
                        {"Notify Actors"}
                    }
                </button>

                <button type="button" id="export-pdf-btn" class="btn btn-outline-secondary" onclick={on_export}>
                    {"Export PDF"}
                </button>

                <button type="button" id="print-schedule-btn" class="btn btn-outline-secondary" onclick={on_print}>
                    {"Print"}
                </button>
            </div>
        </div>
    }
}
