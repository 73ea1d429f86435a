use gloo::timers::future::TimeoutFuture;
use shared::{Alert, AlertQueue};
use std::rc::Rc;
use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub enum AlertAction {
    Push(Alert),
    Dismiss(Uuid),
}

#[derive(Clone, Default, PartialEq)]
pub struct AlertState {
    pub queue: AlertQueue,
}

impl Reducible for AlertState {
    type Action = AlertAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut queue = self.queue.clone();
        match action {
            AlertAction::Push(alert) => queue.push(alert),
            AlertAction::Dismiss(id) => queue.dismiss(id),
        }
        Rc::new(AlertState { queue })
    }
}

/// Cloneable handle for raising alerts from callbacks and async tasks
#[derive(Clone, PartialEq)]
pub struct AlertSender {
    dispatcher: UseReducerDispatcher<AlertState>,
    timeout_ms: u32,
}

impl AlertSender {
    /// Show an alert and schedule its automatic dismissal
    pub fn show(&self, alert: Alert) {
        let id = alert.id;
        self.dispatcher.dispatch(AlertAction::Push(alert));

        let dispatcher = self.dispatcher.clone();
        let timeout_ms = self.timeout_ms;
        spawn_local(async move {
            TimeoutFuture::new(timeout_ms).await;
            dispatcher.dispatch(AlertAction::Dismiss(id));
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Alert::success(message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.show(Alert::warning(message));
    }

    pub fn danger(&self, message: impl Into<String>) {
        self.show(Alert::danger(message));
    }

    pub fn dismiss(&self, id: Uuid) {
        self.dispatcher.dispatch(AlertAction::Dismiss(id));
    }
}

pub struct UseAlertsResult {
    pub state: AlertState,
    pub actions: AlertSender,
}

/// Alert banner state; newest alert first, each one auto-dismissed after `timeout_ms`
#[hook]
pub fn use_alerts(timeout_ms: u32) -> UseAlertsResult {
    let alerts = use_reducer(AlertState::default);

    UseAlertsResult {
        state: (*alerts).clone(),
        actions: AlertSender {
            dispatcher: alerts.dispatcher(),
            timeout_ms,
        },
    }
}
