use crate::util::field_label;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AxisSelectorProps {
    pub fields: Vec<String>,
    pub x_field: String,
    pub y_field: String,
    pub on_x: Callback<String>,
    pub on_y: Callback<String>,
}

fn field_select(label: &str, fields: &[String], selected: &str, cb: Callback<String>) -> Html {
    let onchange = Callback::from(move |e: Event| {
        if let Some(sel) = e.target_dyn_into::<HtmlSelectElement>() {
            cb.emit(sel.value());
        }
    });
    html! {<label style="display:flex; align-items:center; gap:6px; font-size:12px;">
        { label.to_string() }
        <select {onchange}>
            { for fields.iter().map(|f| html!{ <option value={f.clone()} selected={f == selected}>{ field_label(f) }</option> }) }
        </select>
    </label>}
}

#[function_component(AxisSelector)]
pub fn axis_selector(props: &AxisSelectorProps) -> Html {
    html! {<div style="display:flex; gap:16px; padding:8px 12px;">
        { field_select("X axis", &props.fields, &props.x_field, props.on_x.clone()) }
        { field_select("Y axis", &props.fields, &props.y_field, props.on_y.clone()) }
    </div>}
}
