use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct YearControlsProps {
    pub years: Vec<i32>,
    pub index: usize,
    pub playing: bool,
    pub on_toggle_play: Callback<()>,
    pub on_select: Callback<usize>,
}

#[function_component(YearControls)]
pub fn year_controls(props: &YearControlsProps) -> Html {
    let play_cb = {
        let cb = props.on_toggle_play.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let input_cb = {
        let cb = props.on_select.clone();
        Callback::from(move |e: InputEvent| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if let Ok(i) = input.value().parse::<usize>() {
                cb.emit(i);
            }
        })
    };
    let year = props.years.get(props.index).map(|y| y.to_string()).unwrap_or_default();
    let max = props.years.len().saturating_sub(1);
    html! {<div style="position:absolute; top:12px; left:50%; transform:translateX(-50%); display:flex; align-items:center; gap:10px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:6px 12px;">
        <button onclick={play_cb} disabled={props.years.len() < 2} style="padding:4px 10px; font-size:12px; min-width:60px;">{ if props.playing { "Pause" } else { "Play" } }</button>
        <input type="range" min="0" max={max.to_string()} step="1" value={props.index.to_string()} disabled={props.playing} oninput={input_cb} style="width:320px;" />
        <div style="font-size:20px; font-weight:600; min-width:56px; text-align:right;">{ year }</div>
    </div>}
}
