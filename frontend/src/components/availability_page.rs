use shared::{AvailabilityMap, AvailabilityRecord, Entity, EntityKind, TimeWindow};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::alert_banner::AlertBanner;
use crate::components::availability_calendar::AvailabilityCalendar;
use crate::components::entity_picker::EntityPicker;
use crate::hooks::use_alerts::use_alerts;
use crate::hooks::use_availability_editor::use_availability_editor;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct AvailabilityPageProps<R: AvailabilityRecord> {
    pub entities: Vec<Entity>,
    pub availability: AvailabilityMap<R>,
    pub api_client: ApiClient,
    pub alert_timeout_ms: u32,
}

fn bind_input(value: &UseStateHandle<String>) -> Callback<InputEvent> {
    let value = value.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        value.set(input.value());
    })
}

/// Actor or location availability editor, depending on `R`
#[function_component(AvailabilityPage)]
pub fn availability_page<R: AvailabilityRecord>(props: &AvailabilityPageProps<R>) -> Html {
    let alerts = use_alerts(props.alert_timeout_ms);
    let editor = use_availability_editor(&props.availability, &props.api_client, &alerts.actions);

    let start_date = use_state(String::new);
    let end_date = use_state(String::new);
    let start_time = use_state(String::new);
    let end_time = use_state(String::new);

    let with_time_window = R::KIND == EntityKind::Location;

    let on_generate = {
        let generate = editor.actions.generate_calendar.clone();
        let start_date = start_date.clone();
        let end_date = end_date.clone();
        Callback::from(move |_: MouseEvent| {
            generate.emit(((*start_date).clone(), (*end_date).clone()));
        })
    };

    let mark = |is_available: bool| {
        let mark_selected = editor.actions.mark_selected.clone();
        let start_time = start_time.clone();
        let end_time = end_time.clone();
        Callback::from(move |_: MouseEvent| {
            let window = if with_time_window {
                TimeWindow::from_inputs(&start_time, &end_time)
            } else {
                TimeWindow::default()
            };
            mark_selected.emit((is_available, window));
        })
    };

    let on_dismiss = {
        let alerts = alerts.actions.clone();
        Callback::from(move |id| alerts.dismiss(id))
    };

    html! {
        <div class="availability-page">
            <AlertBanner alerts={alerts.state.queue.alerts().to_vec()} {on_dismiss} />

            <div class="row">
                <div class="col-md-3">
                    <EntityPicker
                        kind={R::KIND}
                        entities={props.entities.clone()}
                        selected={editor.state.selected_entity.clone()}
                        on_select={editor.actions.select_entity.clone()}
                    />
                </div>

                <div class="col-md-9">
                    <div class="row g-2 align-items-end mb-3">
                        <div class="col">
                            <label for="start-date" class="form-label">{"Start Date"}</label>
                            <input type="date" id="start-date" class="form-control" value={(*start_date).clone()} oninput={bind_input(&start_date)} />
                        </div>
                        <div class="col">
                            <label for="end-date" class="form-label">{"End Date"}</label>
                            <input type="date" id="end-date" class="form-control" value={(*end_date).clone()} oninput={bind_input(&end_date)} />
                        </div>
                        <div class="col-auto">
                            <button type="button" id="generate-calendar" class="btn btn-primary" onclick={on_generate}>
                                {"Generate Calendar"}
                            </button>
                        </div>
                    </div>

                    if with_time_window {
                        <div class="row g-2 mb-3">
                            <div class="col">
                                <label for="start-time" class="form-label">{"Start Time"}</label>
                                <input type="time" id="start-time" class="form-control" value={(*start_time).clone()} oninput={bind_input(&start_time)} />
                            </div>
                            <div class="col">
                                <label for="end-time" class="form-label">{"End Time"}</label>
                                <input type="time" id="end-time" class="form-control" value={(*end_time).clone()} oninput={bind_input(&end_time)} />
                            </div>
                        </div>
                    }

                    <div class="btn-group mb-3">
                        <button type="button" id="mark-available" class="btn btn-success" onclick={mark(true)}>
                            {"Mark Available"}
                        </button>
                        <button type="button" id="mark-unavailable" class="btn btn-danger" onclick={mark(false)}>
                            {"Mark Unavailable"}
                        </button>
                    </div>

                    if let Some(grid) = editor.state.grid.clone() {
                        <AvailabilityCalendar
                            {grid}
                            selected_dates={editor.state.selected_dates.clone()}
                            on_day_click={editor.actions.click_day.clone()}
                        />
                    }
                </div>
            </div>
        </div>
    }
}
