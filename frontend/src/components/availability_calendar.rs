use chrono::NaiveDate;
use shared::{CalendarDay, CalendarGrid, ClickMode, WEEKDAY_LABELS};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AvailabilityCalendarProps {
    pub grid: CalendarGrid,
    pub selected_dates: Vec<NaiveDate>,
    pub on_day_click: Callback<(NaiveDate, ClickMode)>,
}

#[function_component(AvailabilityCalendar)]
pub fn availability_calendar(props: &AvailabilityCalendarProps) -> Html {
    let render_day = |day: &CalendarDay| -> Html {
        if !day.is_in_range() {
            return html! { <td class="empty-cell"></td> };
        }

        let date = day.date;
        let selected = props.selected_dates.contains(&date);
        let onclick = {
            let on_day_click = props.on_day_click.clone();
            Callback::from(move |e: MouseEvent| {
                on_day_click.emit((date, ClickMode::from_modifiers(e.ctrl_key(), e.meta_key())));
            })
        };

        html! {
            <td
                class={classes!("calendar-day", day.status.map(|s| s.css_class()), selected.then_some("selected"))}
                data-date={day.iso_date()}
                {onclick}
            >
                <div class="day-number">{day.day_number()}</div>
                if let Some(range) = &day.time_range {
                    <div class="time-range">{range}</div>
                }
            </td>
        }
    };

    html! {
        <div class="availability-calendar">
            <table class="table table-bordered calendar-table">
                <thead>
                    <tr>
                        {for WEEKDAY_LABELS.iter().map(|label| html! { <th>{*label}</th> })}
                    </tr>
                </thead>
                <tbody>
                    {for props.grid.weeks.iter().map(|week| html! {
                        <tr>
                            {for week.days.iter().map(&render_day)}
                        </tr>
                    })}
                </tbody>
            </table>
            <p class="mb-0 text-muted">
                {"Use "}<kbd>{"Ctrl+Click"}</kbd>{" to select multiple dates"}
            </p>
        </div>
    }
}
