use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendRowProps {
    pub color: &'static str,
    pub label: String,
    #[prop_or(false)]
    pub dimmed: bool,
    #[prop_or_default]
    pub on_click: Option<Callback<()>>,
}

#[function_component(LegendRow)]
pub fn legend_row(props: &LegendRowProps) -> Html {
    let onclick = props.on_click.clone().map(|cb| Callback::from(move |_: MouseEvent| cb.emit(())));
    let cursor = if props.on_click.is_some() { "pointer" } else { "default" };
    let opacity = if props.dimmed { 0.35 } else { 1.0 };
    html! { <div {onclick} style={format!("display:flex; align-items:center; gap:8px; margin:3px 0; cursor:{cursor}; opacity:{opacity};")}> <span style={format!("display:inline-block; width:12px; height:12px; background:{}; border:1px solid #30363d; border-radius:2px;", props.color)}></span> <span>{ props.label.clone() }</span> </div> }
}
