use super::legend::LegendRow;
use crate::state::{CategoryToggles, EventCategory};
use crate::util::format_tick;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendPanelProps {
    pub year: i32,
    /// Choropleth swatches with the lower bound of each bin.
    pub bins: Vec<(&'static str, Option<f64>)>,
    pub no_data: &'static str,
    pub toggles: CategoryToggles,
    pub on_toggle: Callback<EventCategory>,
}

#[function_component]
pub fn LegendPanel(props: &LegendPanelProps) -> Html {
    let bins = if props.bins.is_empty() {
        html! {<div style="font-size:11px; color:#8b949e;">{ format!("No population data for {}", props.year) }</div>}
    } else {
        props
            .bins
            .iter()
            .map(|(color, lower)| {
                let label = match lower {
                    Some(v) => format!("≥ {}", format_tick(*v)),
                    None => "lowest decile".to_string(),
                };
                html! { <LegendRow color={*color} {label} /> }
            })
            .collect::<Html>()
    };
    let categories = EventCategory::ALL
        .iter()
        .map(|c| {
            let c = *c;
            let cb = props.on_toggle.clone();
            html! { <LegendRow color={c.color()} label={c.label().to_string()} dimmed={!props.toggles.is_visible(c)} on_click={Callback::from(move |_| cb.emit(c))} /> }
        })
        .collect::<Html>();
    html! {<div style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:170px; font-size:12px;">
        <div style="font-weight:600; margin-bottom:4px;">{ format!("Population {}", props.year) }</div>
        { bins }
        <LegendRow color={props.no_data} label={"No data".to_string()} />
        <div style="font-weight:600; margin:8px 0 4px;">{"Events"}</div>
        { categories }
    </div>}
}
