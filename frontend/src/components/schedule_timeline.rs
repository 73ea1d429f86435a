use shared::{Algorithm, ScheduleResult, ScheduledScene};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ScheduleTimelineProps {
    pub result: ScheduleResult,
    pub algorithm: Algorithm,
    /// `M/D/YYYY`, used in the default schedule name
    pub today: String,
    pub save_action: String,
}

fn scene_card(scene: &ScheduledScene) -> Html {
    html! {
        <div class="card scene-card mb-2">
            <div class="card-body">
                <div class="d-flex justify-content-between">
                    <h6 class="card-title mb-1">{scene.title()}</h6>
                    if let Some(int_ext) = scene.int_ext.as_deref().filter(|s| !s.is_empty()) {
                        <span class="badge bg-info">{int_ext}</span>
                    }
                </div>
                <div class="scene-location">{scene.location_display()}</div>
                <div class="scene-meta text-muted small">
                    <span>{scene.time_of_day_display()}</span>
                    if let (Some(start), Some(end)) = (&scene.start_time, &scene.end_time) {
                        <span>{format!(" | {} - {}", start, end)}</span>
                    }
                    <span>{format!(" | {}", scene.duration_display())}</span>
                    <span>{format!(" | {}", scene.cost_display())}</span>
                </div>
                <p class="card-text mt-1">{scene.description_display()}</p>
            </div>
        </div>
    }
}

/// Summary, day-by-day timeline and save form for an optimized schedule
#[function_component(ScheduleTimeline)]
pub fn schedule_timeline(props: &ScheduleTimelineProps) -> Html {
    let metadata = &props.result.metadata;
    let timeline = props.result.timeline();

    let save_form = match props.result.save_form(props.algorithm.as_str(), &props.today) {
        Ok(form) => html! {
            <form method="post" action={props.save_action.clone()} class="mt-3">
                <input type="hidden" name="schedule_data" value={form.schedule_data} />
                <input type="hidden" name="algorithm" value={form.algorithm} />
                <input type="hidden" name="name" value={form.name} />
                <button type="submit" class="btn btn-success">{"Save This Schedule"}</button>
            </form>
        },
        Err(e) => {
            log::error!("📋 TIMELINE: Could not serialize schedule: {}", e);
            html! {}
        }
    };

    html! {
        <div class="schedule-results">
            <div class="card mb-4">
                <div class="card-body">
                    <h4 class="card-title">{"Optimization Results"}</h4>
                    <div class="row text-center">
                        <div class="col">
                            <div class="text-muted">{"Total Cost"}</div>
                            <div id="total-cost" class="fs-4">{metadata.cost_display()}</div>
                        </div>
                        <div class="col">
                            <div class="text-muted">{"Total Days"}</div>
                            <div id="total-days" class="fs-4">{metadata.days_display()}</div>
                        </div>
                        <div class="col">
                            <div class="text-muted">{"Total Scenes"}</div>
                            <div id="total-scenes" class="fs-4">{metadata.scenes_display()}</div>
                        </div>
                    </div>
                </div>
            </div>

            <div class="schedule-timeline">
                {for timeline.iter().map(|day| html! {
                    <div class="timeline-day mb-3" data-date={day.date.clone()}>
                        <h5 class="timeline-date">{&day.label}</h5>
                        {for day.scenes.iter().map(scene_card)}
                    </div>
                })}
            </div>

            {save_form}
        </div>
    }
}
