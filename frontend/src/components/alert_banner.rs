use shared::Alert;
use uuid::Uuid;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AlertBannerProps {
    pub alerts: Vec<Alert>,
    pub on_dismiss: Callback<Uuid>,
}

/// Dismissible alert stack, newest first
#[function_component(AlertBanner)]
pub fn alert_banner(props: &AlertBannerProps) -> Html {
    html! {
        <div id="alert-container">
            {for props.alerts.iter().map(|alert| {
                let on_close = {
                    let on_dismiss = props.on_dismiss.clone();
                    let id = alert.id;
                    Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
                };

                html! {
                    <div key={alert.id.to_string()} class={classes!("alert", alert.level.css_class(), "alert-dismissible", "fade", "show")} role="alert">
                        {&alert.message}
                        <button type="button" class="btn-close" aria-label="Close" onclick={on_close}></button>
                    </div>
                }
            })}
        </div>
    }
}
