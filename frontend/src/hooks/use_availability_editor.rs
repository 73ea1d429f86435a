use chrono::NaiveDate;
use futures::future::{join_all, AbortHandle, Abortable};
use shared::{
    AvailabilityBatch, AvailabilityEditor, AvailabilityMap, AvailabilityRecord, AvailabilityUpdate, BatchSummary,
    CalendarGrid, ClickMode, TimeWindow, UpdateOutcome, UPDATE_FAILED_MESSAGE,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::functional::UseForceUpdateHandle;
use yew::prelude::*;

use crate::hooks::use_alerts::AlertSender;
use crate::services::api::{ApiClient, ApiError};

/// In-flight batches of one page, aborted together on unmount
#[derive(Clone, Default)]
pub struct BatchTasks {
    next_id: Rc<Cell<u64>>,
    handles: Rc<RefCell<HashMap<u64, AbortHandle>>>,
}

impl BatchTasks {
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let (handle, registration) = AbortHandle::new_pair();
        self.handles.borrow_mut().insert(id, handle);

        let handles = self.handles.clone();
        spawn_local(async move {
            if Abortable::new(task, registration).await.is_err() {
                log::debug!("📅 EDITOR: Batch {} aborted", id);
            }
            handles.borrow_mut().remove(&id);
        });
    }

    pub fn abort_all(&self) {
        for (_, handle) in self.handles.borrow_mut().drain() {
            handle.abort();
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct AvailabilityEditorState {
    pub selected_entity: Option<String>,
    pub grid: Option<CalendarGrid>,
    pub selected_dates: Vec<NaiveDate>,
}

pub struct UseAvailabilityEditorResult {
    pub state: AvailabilityEditorState,
    pub actions: UseAvailabilityEditorActions,
}

#[derive(Clone)]
pub struct UseAvailabilityEditorActions {
    pub select_entity: Callback<String>,
    /// `(start, end)` as typed in the date inputs
    pub generate_calendar: Callback<(String, String)>,
    pub click_day: Callback<(NaiveDate, ClickMode)>,
    /// `(is_available, time window)`
    pub mark_selected: Callback<(bool, TimeWindow)>,
}

/// Availability page state, owned by a single [`AvailabilityEditor`].
///
/// The editor lives in a `RefCell` so batch tasks can commit per-date
/// results after the callback that started them has returned.
#[hook]
pub fn use_availability_editor<R: AvailabilityRecord>(
    initial: &AvailabilityMap<R>,
    api_client: &ApiClient,
    alerts: &AlertSender,
) -> UseAvailabilityEditorResult {
    let editor = {
        let initial = initial.clone();
        use_mut_ref(move || AvailabilityEditor::new(initial))
    };
    let refresh = use_force_update();
    let tasks = use_mut_ref(BatchTasks::default);

    // Drop pending batches with the page
    {
        let tasks = tasks.borrow().clone();
        use_effect_with((), move |_| move || tasks.abort_all());
    }

    let select_entity = {
        let editor = editor.clone();
        let refresh = refresh.clone();
        use_callback((), move |entity_id: String, _| {
            editor.borrow_mut().select_entity(&entity_id);
            refresh.force_update();
        })
    };

    let generate_calendar = {
        let editor = editor.clone();
        let refresh = refresh.clone();
        let alerts = alerts.clone();
        use_callback((), move |(start, end): (String, String), _| {
            let result = editor.borrow_mut().generate_calendar(&start, &end).map(|_| ());
            match result {
                Ok(()) => refresh.force_update(),
                Err(e) => alerts.warning(e.to_string()),
            }
        })
    };

    let click_day = {
        let editor = editor.clone();
        let refresh = refresh.clone();
        use_callback((), move |(date, mode): (NaiveDate, ClickMode), _| {
            if editor.borrow_mut().click_day(date, mode) {
                refresh.force_update();
            }
        })
    };

    let mark_selected = {
        let editor = editor.clone();
        let refresh = refresh.clone();
        let alerts = alerts.clone();
        let api_client = api_client.clone();
        let tasks = tasks.borrow().clone();
        use_callback((), move |(is_available, window): (bool, TimeWindow), _| {
            let planned = editor.borrow().plan_batch(is_available, &window);
            let batch = match planned {
                Ok(batch) => batch,
                Err(e) => {
                    alerts.warning(e.to_string());
                    return;
                }
            };

            log::info!(
                "📅 EDITOR: Marking {} dates {} for {}",
                batch.len(),
                if is_available { "available" } else { "unavailable" },
                batch.entity_id
            );
            tasks.spawn(run_batch(batch, editor.clone(), refresh.clone(), api_client.clone(), alerts.clone()));
        })
    };

    let state = {
        let editor = editor.borrow();
        AvailabilityEditorState {
            selected_entity: editor.selected_entity().map(str::to_string),
            grid: editor.grid().cloned(),
            selected_dates: editor.selection().dates().to_vec(),
        }
    };

    UseAvailabilityEditorResult {
        state,
        actions: UseAvailabilityEditorActions {
            select_entity,
            generate_calendar,
            click_day,
            mark_selected,
        },
    }
}

/// Classify one date's reply and pick the banner it raises, if any.
///
/// A `success:false` reply shows the server's message for that date; every
/// transport-level failure shows the generic text.
pub fn settle_update<R: AvailabilityRecord>(
    update: &AvailabilityUpdate<R>,
    result: &Result<(), ApiError>,
) -> (UpdateOutcome, Option<String>) {
    match result {
        Ok(()) => (UpdateOutcome::Applied, None),
        Err(ApiError::Rejected(message)) => (
            UpdateOutcome::Rejected(message.clone()),
            Some(update.rejection_message(message)),
        ),
        Err(ApiError::Network(_) | ApiError::Decode(_) | ApiError::Server { .. }) => {
            (UpdateOutcome::Failed, Some(UPDATE_FAILED_MESSAGE.to_string()))
        }
    }
}

/// One request per date; each success is committed as soon as it arrives
async fn run_batch<R: AvailabilityRecord>(
    batch: AvailabilityBatch<R>,
    editor: Rc<RefCell<AvailabilityEditor<R>>>,
    refresh: UseForceUpdateHandle,
    api_client: ApiClient,
    alerts: AlertSender,
) {
    let requests = batch.updates.into_iter().map(|update| {
        let editor = editor.clone();
        let refresh = refresh.clone();
        let api_client = api_client.clone();
        let alerts = alerts.clone();

        async move {
            let result = api_client.update_availability(&update).await;
            if let Err(e) = &result {
                log::error!("📅 EDITOR: Update for {} failed: {}", update.date, e);
            }

            let (outcome, banner) = settle_update(&update, &result);
            if outcome == UpdateOutcome::Applied {
                editor.borrow_mut().apply_update(&update);
                refresh.force_update();
            }
            if let Some(banner) = banner {
                alerts.danger(banner);
            }
            outcome
        }
    });

    let outcomes = join_all(requests).await;
    let summary = BatchSummary::from_outcomes(&outcomes);
    log::info!("📅 EDITOR: Batch done, {}/{} applied", summary.applied, summary.total);

    if let Some(message) = summary.success_message() {
        alerts.success(message);
    }
}
