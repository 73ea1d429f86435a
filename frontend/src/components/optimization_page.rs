use shared::schedule::{OPTIMIZATION_ERROR_MESSAGE, SAVE_SCHEDULE_ENDPOINT};
use shared::{Algorithm, OptimizationForm, OptimizeOutcome, ScheduleResult, WeightFactor};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::alert_banner::AlertBanner;
use crate::components::schedule_timeline::ScheduleTimeline;
use crate::hooks::use_alerts::use_alerts;
use crate::services::api::ApiClient;
use crate::services::browser::navigate_to;
use crate::services::date_utils::get_current_date_short;

#[derive(Properties, PartialEq)]
pub struct OptimizationPageProps {
    pub api_client: ApiClient,
    pub alert_timeout_ms: u32,
    #[prop_or_default]
    pub default_start_date: Option<String>,
    #[prop_or_default]
    pub default_end_date: Option<String>,
}

/// Schedule shown under the form, with the algorithm that produced it
#[derive(Clone, PartialEq)]
struct OptimizedSchedule {
    result: ScheduleResult,
    algorithm: Algorithm,
}

#[function_component(OptimizationPage)]
pub fn optimization_page(props: &OptimizationPageProps) -> Html {
    let alerts = use_alerts(props.alert_timeout_ms);
    let form = {
        let start_date = props.default_start_date.clone().unwrap_or_default();
        let end_date = props.default_end_date.clone().unwrap_or_default();
        use_state(move || OptimizationForm {
            start_date,
            end_date,
            ..OptimizationForm::default()
        })
    };
    let is_loading = use_state(|| false);
    let optimized = use_state(|| Option::<OptimizedSchedule>::None);
    let results_ref = use_node_ref();

    // Bring a fresh result into view
    {
        let results_ref = results_ref.clone();
        use_effect_with(optimized.is_some(), move |has_result| {
            if *has_result {
                if let Some(element) = results_ref.cast::<web_sys::Element>() {
                    element.scroll_into_view();
                }
            }
            || ()
        });
    }

    let update_form = |apply: fn(&mut OptimizationForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            apply(&mut next, input.value());
            form.set(next);
        })
    };

    let on_weight = |factor: WeightFactor| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            next.set_weight(factor, input.value().parse().unwrap_or(WeightFactor::DEFAULT));
            form.set(next);
        })
    };

    let on_algorithm = |algorithm: Algorithm| {
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*form).clone();
            next.algorithm = Some(algorithm);
            form.set(next);
        })
    };

    let on_submit = {
        let form = form.clone();
        let is_loading = is_loading.clone();
        let optimized = optimized.clone();
        let alerts = alerts.actions.clone();
        let api_client = props.api_client.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let errors = form.validate();
            if !errors.is_empty() {
                for error in errors {
                    alerts.warning(error.to_string());
                }
                return;
            }
            let Some(algorithm) = form.algorithm else {
                return;
            };

            let payload = form.to_payload();
            log::info!("🎬 OPTIMIZE: Submitting {} for {} to {}", algorithm.as_str(), form.start_date, form.end_date);
            is_loading.set(true);
            optimized.set(None);

            let is_loading = is_loading.clone();
            let optimized = optimized.clone();
            let alerts = alerts.clone();
            let api_client = api_client.clone();
            spawn_local(async move {
                match api_client.optimize_schedule(&payload).await {
                    Ok(OptimizeOutcome::Redirect(url)) => navigate_to(&url),
                    Ok(OptimizeOutcome::Schedule(result)) => {
                        log::info!("🎬 OPTIMIZE: Received {} scenes", result.scenes.len());
                        optimized.set(Some(OptimizedSchedule { result, algorithm }));
                    }
                    Err(e) => {
                        log::error!("🎬 OPTIMIZE: {}", e);
                        alerts.danger(e.banner_message(OPTIMIZATION_ERROR_MESSAGE));
                    }
                }
                is_loading.set(false);
            });
        })
    };

    let on_dismiss = {
        let alerts = alerts.actions.clone();
        Callback::from(move |id| alerts.dismiss(id))
    };

    html! {
        <div class="optimization-page">
            <AlertBanner alerts={alerts.state.queue.alerts().to_vec()} {on_dismiss} />

            <form id="optimization-form" onsubmit={on_submit}>
                <div class="mb-3">
                    <label for="name" class="form-label">{"Schedule Name"}</label>
                    <input
                        type="text"
                        id="name"
                        class="form-control"
                        value={form.name.clone()}
                        oninput={update_form(|f, v| f.name = v)}
                    />
                </div>

                <div class="row mb-3">
                    {for Algorithm::ALL.into_iter().map(|algorithm| html! {
                        <div class="col-md-4">
                            <div
                                class={classes!("card", "algorithm-card", (form.algorithm == Some(algorithm)).then_some("selected"))}
                                data-algorithm={algorithm.as_str()}
                                onclick={on_algorithm(algorithm)}
                            >
                                <div class="card-body">
                                    <h5 class="card-title">{algorithm.label()}</h5>
                                    <span class="badge bg-secondary">{algorithm.short_code()}</span>
                                </div>
                            </div>
                        </div>
                    })}
                </div>

                <div class="row mb-3">
                    <div class="col">
                        <label for="start_date" class="form-label">{"Start Date"}</label>
                        <input
                            type="date"
                            id="start_date"
                            class="form-control"
                            value={form.start_date.clone()}
                            oninput={update_form(|f, v| f.start_date = v)}
                        />
                    </div>
                    <div class="col">
                        <label for="end_date" class="form-label">{"End Date"}</label>
                        <input
                            type="date"
                            id="end_date"
                            class="form-control"
                            value={form.end_date.clone()}
                            oninput={update_form(|f, v| f.end_date = v)}
                        />
                    </div>
                </div>

                {for WeightFactor::ALL.into_iter().map(|factor| html! {
                    <div class="mb-3">
                        <label for={factor.field_name()} class="form-label">
                            {factor.label()}{": "}
                            <span id={format!("{}_value", factor.field_name())}>{form.weight(factor)}</span>
                        </label>
                        <input
                            type="range"
                            class="form-range"
                            id={factor.field_name()}
                            min={WeightFactor::MIN.to_string()}
                            max={WeightFactor::MAX.to_string()}
                            value={form.weight(factor).to_string()}
                            oninput={on_weight(factor)}
                        />
                    </div>
                })}

                <button type="submit" class="btn btn-primary" disabled={*is_loading}>
                    {"Optimize Schedule"}
                </button>
            </form>

            if *is_loading {
                <div id="loading" class="text-center my-4">
                    <div class="spinner-border" role="status"></div>
                    <p>{"Optimizing schedule..."}</p>
                </div>
            }

            <div id="results" ref={results_ref}>
                if let Some(schedule) = (*optimized).clone() {
                    <ScheduleTimeline
                        result={schedule.result}
                        algorithm={schedule.algorithm}
                        today={get_current_date_short()}
                        save_action={props.api_client.url(SAVE_SCHEDULE_ENDPOINT)}
                    />
                }
            </div>
        </div>
    }
}
