use yew::prelude::*;

/// Factor applied by one press of a zoom button.
pub const ZOOM_STEP: f64 = 1.5;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    /// Receives the multiplicative zoom factor.
    pub on_zoom: Callback<f64>,
    pub on_reset: Callback<()>,
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let button = |factor: f64, label: &'static str, title: &'static str| {
        let cb = props.on_zoom.clone();
        html! { <button {title} onclick={Callback::from(move |_| cb.emit(factor))}>{ label }</button> }
    };
    let on_reset = props.on_reset.reform(|_: MouseEvent| ());
    html! {<div style="position:absolute; left:12px; top:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        { button(1.0 / ZOOM_STEP, "-", "Zoom out") }
        { button(ZOOM_STEP, "+", "Zoom in") }
        <span style="width:8px;"></span>
        <button onclick={on_reset} title="Reset view">{"Reset"}</button>
    </div>}
}
