pub mod app;
pub mod axis_selector;
pub mod camera_controls;
pub mod legend;
pub mod legend_panel;
pub mod map_view;
pub mod scatter_view;
pub mod tooltip;
pub mod year_controls;

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

/// Sizes `canvas` to the window, minus the top bar and `reserved` pixels.
pub fn fit_canvas(canvas: &HtmlCanvasElement, reserved: f64) -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (canvas.width() as f64, canvas.height() as f64);
    };
    let nav_height: f64 = window
        .document()
        .and_then(|d| d.get_element_by_id("top-bar"))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|el| el.client_height() as f64)
        .unwrap_or(0.0);
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0).max(0.0);
    let height = (window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0) - nav_height - reserved).max(0.0);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    (width, height)
}
