use yew::prelude::*;

/// Hover text anchored at a canvas position.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipData {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
}

#[derive(Properties, PartialEq, Clone)]
pub struct TooltipProps {
    pub data: Option<TooltipData>,
}

#[function_component(Tooltip)]
pub fn tooltip(props: &TooltipProps) -> Html {
    let Some(d) = &props.data else {
        return html! {};
    };
    html! {<div style={format!("position:absolute; left:{}px; top:{}px; pointer-events:none; background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:6px; padding:6px 8px; font-size:12px; white-space:nowrap;", d.x + 12.0, d.y + 12.0)}>
        { for d.lines.iter().enumerate().map(|(i, l)| {
            let weight = if i == 0 { "600" } else { "400" };
            html!{ <div style={format!("font-weight:{weight};")}>{ l.clone() }</div> }
        }) }
    </div>}
}
