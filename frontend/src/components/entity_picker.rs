use shared::{Entity, EntityKind};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EntityPickerProps {
    pub kind: EntityKind,
    pub entities: Vec<Entity>,
    pub selected: Option<String>,
    pub on_select: Callback<String>,
}

/// Value the dropdown should hold; the placeholder option has an empty value
fn select_value(selected: Option<&str>) -> &str {
    selected.unwrap_or("")
}

/// Dropdown plus clickable list; both feed the same selection
#[function_component(EntityPicker)]
pub fn entity_picker(props: &EntityPickerProps) -> Html {
    let select_ref = use_node_ref();

    // `selected` attributes stop applying once the user has touched the
    // dropdown, so list clicks set the value directly
    {
        let select_ref = select_ref.clone();
        use_effect_with(props.selected.clone(), move |selected| {
            if let Some(select) = select_ref.cast::<HtmlSelectElement>() {
                select.set_value(select_value(selected.as_deref()));
            }
            || ()
        });
    }

    let (prefix, placeholder) = match props.kind {
        EntityKind::Actor => ("actor", "Select an actor..."),
        EntityKind::Location => ("location", "Select a location..."),
    };

    let on_change = {
        let on_select = props.on_select.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_select.emit(select.value());
        })
    };

    let is_selected = |entity: &Entity| props.selected.as_deref() == Some(entity.id.as_str());

    html! {
        <div class="entity-picker">
            <select id={format!("{}-select", prefix)} class="form-select mb-3" ref={select_ref} onchange={on_change}>
                <option value="" selected={props.selected.is_none()}>{placeholder}</option>
                {for props.entities.iter().map(|entity| html! {
                    <option value={entity.id.clone()} selected={is_selected(entity)}>{&entity.name}</option>
                })}
            </select>

            <div class="list-group">
                {for props.entities.iter().map(|entity| {
                    let onclick = {
                        let on_select = props.on_select.clone();
                        let id = entity.id.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.prevent_default();
                            on_select.emit(id.clone());
                        })
                    };
                    html! {
                        <a
                            href="#"
                            class={classes!("list-group-item", "list-group-item-action", format!("{}-list-item", prefix), is_selected(entity).then_some("active"))}
                            data-id={entity.id.clone()}
                            {onclick}
                        >
                            {&entity.name}
                        </a>
                    }
                })}
            </div>
        </div>
    }
}
