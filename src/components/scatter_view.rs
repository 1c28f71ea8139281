use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use super::{axis_selector::AxisSelector, fit_canvas, tooltip::{Tooltip, TooltipData}};
use crate::config::AppConfig;
use crate::model::Dataset;
use crate::render::render_scatter;
use crate::state::scatter::{nearest_point, HoverSlot};
use crate::state::{DragOutcome, DragZoom, PlotArea, ScatterAction, ScatterFrame, ScatterState, Transition};
use crate::storage::LocalStore;
use crate::surface::CanvasSurface;
use crate::util::clog;

const HOVER_RADIUS_PX: f64 = 8.0;
// Height of the axis selector row above the canvas.
const SELECTOR_PX: f64 = 44.0;

#[derive(Properties, PartialEq, Clone)]
pub struct ScatterViewProps {
    pub data: Rc<Dataset>,
    pub config: Rc<AppConfig>,
}

#[function_component(ScatterView)]
pub fn scatter_view(props: &ScatterViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let scatter = {
        let data = props.data.clone();
        let cfg = props.config.clone();
        use_reducer(move || ScatterState::restore(data, &LocalStore, &cfg))
    };
    let state_ref = use_mut_ref(|| scatter.clone());
    let size = use_mut_ref(|| (800.0_f64, 500.0_f64));
    let displayed = use_mut_ref(|| None::<ScatterFrame>);
    let transition = use_mut_ref(|| None::<Transition>);
    let drag = use_mut_ref(DragZoom::default);
    let hover = use_mut_ref(HoverSlot::default);
    let dirty = use_mut_ref(|| true);
    let tooltip = use_state(|| None::<TooltipData>);

    // Effect: persist the selection and animate towards the new frame
    {
        let state_ref = state_ref.clone();
        let handle = scatter.clone();
        let size = size.clone();
        let displayed = displayed.clone();
        let transition = transition.clone();
        let dirty = dirty.clone();
        let hover = hover.clone();
        let tooltip = tooltip.clone();
        let duration = props.config.transition_ms;
        use_effect_with(scatter.version, move |_| {
            *state_ref.borrow_mut() = handle.clone();
            handle.persist(&LocalStore);
            if hover.borrow_mut().clear() {
                tooltip.set(None);
            }
            let (w, h) = *size.borrow();
            let target = handle.frame(PlotArea::for_canvas(w, h));
            let from = displayed.borrow().clone();
            match from {
                Some(from) => {
                    *transition.borrow_mut() = Some(Transition::new(from, target, js_sys::Date::now(), duration));
                }
                None => *displayed.borrow_mut() = Some(target),
            }
            *dirty.borrow_mut() = true;
            || ()
        });
    }

    let draw: Rc<dyn Fn()> = {
        let canvas_ref = canvas_ref.clone();
        let size = size.clone();
        let displayed = displayed.clone();
        let drag = drag.clone();
        let hover = hover.clone();
        let state_ref = state_ref.clone();
        Rc::new(move || {
            let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() else {
                return;
            };
            let Some(mut surface) = CanvasSurface::from_canvas(&canvas) else {
                return;
            };
            let (w, h) = *size.borrow();
            if let Some(frame) = &*displayed.borrow() {
                let version = state_ref.borrow().version;
                render_scatter(&mut surface, w, h, frame, drag.borrow().selection(), hover.borrow().get(version));
            }
        })
    };

    // Main mount effect (sizing, mouseup, RAF loop)
    {
        let canvas_ref = canvas_ref.clone();
        let state_ref = state_ref.clone();
        let size = size.clone();
        let displayed = displayed.clone();
        let transition = transition.clone();
        let drag = drag.clone();
        let dirty = dirty.clone();
        let draw = draw.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let canvas = canvas_ref.cast::<HtmlCanvasElement>();
            let apply_size = {
                let canvas = canvas.clone();
                let size = size.clone();
                let displayed = displayed.clone();
                let transition = transition.clone();
                let drag = drag.clone();
                let dirty = dirty.clone();
                let state_ref = state_ref.clone();
                move || {
                    let Some(canvas) = &canvas else {
                        return;
                    };
                    let (w, h) = fit_canvas(canvas, SELECTOR_PX);
                    *size.borrow_mut() = (w, h);
                    drag.borrow_mut().cancel();
                    *transition.borrow_mut() = None;
                    let st = state_ref.borrow().clone();
                    *displayed.borrow_mut() = Some(st.frame(PlotArea::for_canvas(w, h)));
                    *dirty.borrow_mut() = true;
                }
            };
            apply_size();
            let resize_cb = Closure::wrap(Box::new(move |_e: web_sys::Event| apply_size()) as Box<dyn FnMut(_)>);

            // Drags may end outside the canvas, so releases are observed on the window.
            let mouseup_cb = {
                let canvas = canvas.clone();
                let state_ref = state_ref.clone();
                let size = size.clone();
                let drag = drag.clone();
                let dirty = dirty.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if !drag.borrow().is_dragging() {
                        return;
                    }
                    let Some(canvas) = &canvas else {
                        return;
                    };
                    let rect = canvas.get_bounding_client_rect();
                    let x = e.client_x() as f64 - rect.left();
                    let y = e.client_y() as f64 - rect.top();
                    let (w, h) = *size.borrow();
                    let area = PlotArea::for_canvas(w, h);
                    let handle = state_ref.borrow().clone();
                    let outcome = drag.borrow_mut().release(&area, x, y, handle.is_zoomed());
                    match outcome {
                        DragOutcome::Zoom { x_px, y_px } => {
                            clog(&format!("zoom to x {:?} y {:?}", x_px, y_px));
                            handle.dispatch(ScatterAction::ZoomTo { x_px, y_px, area });
                        }
                        DragOutcome::Reset => handle.dispatch(ScatterAction::ResetZoom),
                        DragOutcome::None => {}
                    }
                    *dirty.borrow_mut() = true;
                }) as Box<dyn FnMut(_)>)
            };

            if let Some(window) = &window {
                window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()).ok();
                window.add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref()).ok();
            }

            // RAF loop: advance the running transition, redraw when something changed
            let raf_id = Rc::new(RefCell::new(None));
            let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
            {
                let raf_id = raf_id.clone();
                let closure_cell_loop = closure_cell.clone();
                let window_loop = window.clone();
                *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    let now = js_sys::Date::now();
                    {
                        let mut running = transition.borrow_mut();
                        if let Some(tr) = running.as_ref() {
                            *displayed.borrow_mut() = Some(tr.frame_at(now));
                            if tr.is_done(now) {
                                *running = None;
                            }
                            *dirty.borrow_mut() = true;
                        }
                    }
                    if std::mem::take(&mut *dirty.borrow_mut()) {
                        draw();
                    }
                    let Some(window) = &window_loop else {
                        return;
                    };
                    if let Some(cb) = closure_cell_loop.borrow().as_ref() {
                        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                            *raf_id.borrow_mut() = Some(id);
                        }
                    }
                }) as Box<dyn FnMut()>));
            }
            if let (Some(window), Some(cb)) = (&window, closure_cell.borrow().as_ref()) {
                if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            // Cleanup
            move || {
                if let Some(window) = &window {
                    let _ = window.remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
                    let _ = window.remove_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
                    if let Some(id) = *raf_id.borrow() {
                        let _ = window.cancel_animation_frame(id);
                    }
                }
                // Breaks the self-reference held by the loop closure.
                closure_cell.borrow_mut().take();
                let _keep_alive = (&resize_cb, &mouseup_cb);
            }
        });
    }

    let onmousedown = {
        let size = size.clone();
        let transition = transition.clone();
        let drag = drag.clone();
        let dirty = dirty.clone();
        let tooltip = tooltip.clone();
        Callback::from(move |e: MouseEvent| {
            // The selection is inverted with the target scales, which only match
            // the displayed frame once the transition has settled.
            if e.button() != 0 || !Transition::settled(transition.borrow().as_ref(), js_sys::Date::now()) {
                return;
            }
            let (w, h) = *size.borrow();
            let area = PlotArea::for_canvas(w, h);
            if drag.borrow_mut().press(&area, e.offset_x() as f64, e.offset_y() as f64) {
                e.prevent_default();
                tooltip.set(None);
                *dirty.borrow_mut() = true;
            }
        })
    };
    let onmousemove = {
        let size = size.clone();
        let drag = drag.clone();
        let hover = hover.clone();
        let displayed = displayed.clone();
        let dirty = dirty.clone();
        let tooltip = tooltip.clone();
        let state_ref = state_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let (x, y) = (e.offset_x() as f64, e.offset_y() as f64);
            let (w, h) = *size.borrow();
            let area = PlotArea::for_canvas(w, h);
            if drag.borrow().is_dragging() {
                drag.borrow_mut().move_to(&area, x, y);
                *dirty.borrow_mut() = true;
                return;
            }
            let hit = displayed.borrow().as_ref().and_then(|f| {
                let i = nearest_point(f, x, y, HOVER_RADIUS_PX)?;
                Some((i, f.points[i].row))
            });
            let version = state_ref.borrow().version;
            if !hover.borrow_mut().set(version, hit.map(|(i, _)| i)) {
                return;
            }
            *dirty.borrow_mut() = true;
            tooltip.set(hit.map(|(_, row)| TooltipData { x, y, lines: state_ref.borrow().describe(row) }));
        })
    };
    let onmouseleave = {
        let hover = hover.clone();
        let dirty = dirty.clone();
        let tooltip = tooltip.clone();
        Callback::from(move |_e: MouseEvent| {
            if hover.borrow_mut().clear() {
                *dirty.borrow_mut() = true;
            }
            tooltip.set(None);
        })
    };

    let on_x = {
        let scatter = scatter.clone();
        Callback::from(move |f: String| scatter.dispatch(ScatterAction::SetXField(f)))
    };
    let on_y = {
        let scatter = scatter.clone();
        Callback::from(move |f: String| scatter.dispatch(ScatterAction::SetYField(f)))
    };

    let hint = if scatter.is_zoomed() { "Click the plot to reset zoom" } else { "Drag over the plot to zoom" };
    html! {<div style="display:flex; flex-direction:column;">
        <div style="display:flex; align-items:center; justify-content:space-between;">
            <AxisSelector fields={scatter.fields.clone()} x_field={scatter.x_field.clone()} y_field={scatter.y_field.clone()} {on_x} {on_y} />
            <span style="font-size:11px; color:#8b949e; padding-right:12px;">{ hint }</span>
        </div>
        <div style="position:relative;">
            <canvas ref={canvas_ref} {onmousedown} {onmousemove} {onmouseleave} style="display:block; cursor:crosshair;" />
            <Tooltip data={(*tooltip).clone()} />
        </div>
    </div>}
}
