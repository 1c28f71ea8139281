use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, TouchEvent};
use yew::prelude::*;

use super::{
    camera_controls::CameraControls, fit_canvas, legend_panel::LegendPanel, tooltip::{Tooltip, TooltipData},
    year_controls::YearControls,
};
use crate::config::AppConfig;
use crate::geo::{project_regions, region_at, ProjectedRegion, Projection, Region};
use crate::model::Dataset;
use crate::render::{place_events, render_map, MapScene};
use crate::state::choropleth::{code_index, NO_DATA_FILL};
use crate::state::playback::Scheduler;
use crate::state::touch::distance;
use crate::state::{CategoryToggles, MapAction, MapCamera, MapState, TimerSlot, TouchState};
use crate::storage::LocalStore;
use crate::surface::CanvasSurface;
use crate::util::clog;

const FIT_PADDING_PX: f64 = 8.0;

/// `window.setInterval` backed scheduler. Closures live here until cancelled.
#[derive(Default)]
pub struct BrowserScheduler {
    live: HashMap<i32, Closure<dyn FnMut()>>,
}

impl Scheduler for BrowserScheduler {
    type Handle = i32;

    fn schedule(&mut self, interval_ms: u32, tick: Box<dyn FnMut()>) -> i32 {
        let cb = Closure::wrap(tick);
        let id = web_sys::window()
            .and_then(|w| {
                w.set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), interval_ms as i32)
                    .ok()
            })
            .unwrap_or(-1);
        self.live.insert(id, cb);
        id
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(w) = web_sys::window() {
            w.clear_interval_with_handle(handle);
        }
        self.live.remove(&handle);
    }
}

/// Projected boundaries for the current canvas size.
struct MapGeometry {
    projection: Projection,
    projected: Vec<ProjectedRegion>,
    codes: HashMap<String, usize>,
}

impl MapGeometry {
    fn build(regions: &[Region], width: f64, height: f64) -> Self {
        let projection = Projection::fit(regions, width, height, FIT_PADDING_PX);
        Self {
            projected: project_regions(regions, &projection),
            codes: code_index(regions),
            projection,
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub population: Rc<Dataset>,
    pub events: Rc<Dataset>,
    pub regions: Option<Rc<Vec<Region>>>,
    pub boundary_error: Option<String>,
    pub config: Rc<AppConfig>,
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let map = {
        let population = props.population.clone();
        let events = props.events.clone();
        let cfg = props.config.clone();
        use_reducer(move || MapState::new(population, &events, CategoryToggles::restore(&LocalStore), &cfg))
    };
    let state_ref = use_mut_ref(|| map.clone());
    let camera = {
        let cfg = props.config.clone();
        use_mut_ref(move || MapCamera::new(cfg.min_zoom, cfg.max_zoom))
    };
    let touch_state = use_mut_ref(TouchState::default);
    let regions_ref = use_mut_ref(|| props.regions.clone());
    let geometry = use_mut_ref(|| None::<MapGeometry>);
    let size = use_mut_ref(|| (800.0_f64, 500.0_f64));
    let hover = use_mut_ref(|| None::<usize>);
    let tooltip = use_state(|| None::<TooltipData>);
    let timer = use_mut_ref(|| TimerSlot::new(BrowserScheduler::default()));
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);

    let redraw = {
        let draw_ref = draw_ref.clone();
        move || {
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
        }
    };

    // Effect: boundaries arrived (or changed)
    {
        let regions_ref = regions_ref.clone();
        let geometry = geometry.clone();
        let size = size.clone();
        let redraw = redraw.clone();
        let regions = props.regions.clone();
        use_effect_with(regions.as_ref().map(|r| Rc::as_ptr(r) as usize), move |_| {
            let (w, h) = *size.borrow();
            *geometry.borrow_mut() = regions.as_ref().map(|r| MapGeometry::build(r, w, h));
            *regions_ref.borrow_mut() = regions;
            redraw();
            || ()
        });
    }

    // Effect: each state change persists toggles, drives the timer and redraws
    {
        let state_ref = state_ref.clone();
        let handle = map.clone();
        let timer = timer.clone();
        let redraw = redraw.clone();
        use_effect_with(map.version, move |_| {
            *state_ref.borrow_mut() = handle.clone();
            handle.toggles.persist(&LocalStore);
            let mut slot = timer.borrow_mut();
            if handle.playback.is_playing() && !slot.is_running() {
                clog(&format!("playback start at {} every {} ms", handle.year(), handle.step_ms()));
                let state_ref = state_ref.clone();
                slot.start(
                    handle.step_ms(),
                    Box::new(move || {
                        let h = state_ref.borrow().clone();
                        h.dispatch(MapAction::Tick);
                    }),
                );
            } else if !handle.playback.is_playing() && slot.is_running() {
                clog(&format!("playback stopped at {}", handle.year()));
                slot.stop();
            }
            drop(slot);
            redraw();
            || ()
        });
    }

    // Main mount effect (draw closure, gestures, resize)
    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.clone();
        let touch_state = touch_state.clone();
        let state_ref = state_ref.clone();
        let regions_ref = regions_ref.clone();
        let geometry = geometry.clone();
        let size = size.clone();
        let hover = hover.clone();
        let tooltip = tooltip.clone();
        let timer = timer.clone();
        let draw_ref = draw_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let canvas = canvas_ref.cast::<HtmlCanvasElement>();

            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let camera = camera.clone();
                let state_ref = state_ref.clone();
                let regions_ref = regions_ref.clone();
                let geometry = geometry.clone();
                let size = size.clone();
                let hover = hover.clone();
                Rc::new(move || {
                    let Some(canvas) = &canvas else {
                        return;
                    };
                    let Some(mut surface) = CanvasSurface::from_canvas(canvas) else {
                        return;
                    };
                    let (w, h) = *size.borrow();
                    let st = state_ref.borrow().clone();
                    let choropleth = st.choropleth();
                    let regions = regions_ref.borrow();
                    let geom = geometry.borrow();
                    let (regions, geom): (&[Region], Option<&MapGeometry>) = match (&*regions, &*geom) {
                        (Some(r), Some(g)) => (r.as_slice(), Some(g)),
                        _ => (&[], None),
                    };
                    let events = match geom {
                        Some(g) => place_events(&st.visible_events(), &g.projection, &g.projected, &g.codes),
                        None => Vec::new(),
                    };
                    let scene = MapScene {
                        regions,
                        projected: geom.map(|g| g.projected.as_slice()).unwrap_or(&[]),
                        choropleth: &choropleth,
                        events: &events,
                        hover: *hover.borrow(),
                    };
                    render_map(&mut surface, w, h, camera.borrow().transform, &scene);
                })
            };
            *draw_ref.borrow_mut() = Some(draw_closure.clone());

            let apply_size = {
                let canvas = canvas.clone();
                let camera = camera.clone();
                let regions_ref = regions_ref.clone();
                let geometry = geometry.clone();
                let size = size.clone();
                let draw = draw_closure.clone();
                move || {
                    let Some(canvas) = &canvas else {
                        return;
                    };
                    let (w, h) = fit_canvas(canvas, 0.0);
                    *size.borrow_mut() = (w, h);
                    camera.borrow_mut().set_viewport(w, h);
                    *geometry.borrow_mut() = regions_ref.borrow().as_ref().map(|r| MapGeometry::build(r, w, h));
                    draw();
                }
            };
            apply_size();
            let resize_cb = Closure::wrap(Box::new(move |_e: web_sys::Event| apply_size()) as Box<dyn FnMut(_)>);

            // Hover: region under the pointer in content space
            let update_hover = {
                let camera = camera.clone();
                let state_ref = state_ref.clone();
                let regions_ref = regions_ref.clone();
                let geometry = geometry.clone();
                let hover = hover.clone();
                let tooltip = tooltip.clone();
                let draw = draw_closure.clone();
                move |sx: f64, sy: f64| {
                    let (cx, cy) = camera.borrow().transform.invert((sx, sy));
                    let hit = geometry.borrow().as_ref().and_then(|g| region_at(&g.projected, cx, cy));
                    if *hover.borrow() == hit {
                        return;
                    }
                    *hover.borrow_mut() = hit;
                    let text = hit.and_then(|i| {
                        let regions = regions_ref.borrow();
                        let region = regions.as_ref()?.get(i)?;
                        Some(state_ref.borrow().choropleth().describe(region))
                    });
                    tooltip.set(text.map(|t| TooltipData { x: sx, y: sy, lines: vec![t] }));
                    draw();
                }
            };

            let wheel_cb = {
                let camera = camera.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
                    e.prevent_default();
                    camera.borrow_mut().wheel(e.delta_y(), e.offset_x() as f64, e.offset_y() as f64);
                    draw();
                }) as Box<dyn FnMut(_)>)
            };
            let dblclick_cb = {
                let camera = camera.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    e.prevent_default();
                    let factor = if e.shift_key() { 0.5 } else { 2.0 };
                    camera.borrow_mut().zoom_about(factor, e.offset_x() as f64, e.offset_y() as f64);
                    draw();
                }) as Box<dyn FnMut(_)>)
            };
            let mousedown_cb = {
                let camera = camera.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if e.button() == 0 && camera.borrow_mut().begin_pan(e.client_x() as f64, e.client_y() as f64) {
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let mousemove_cb = {
                let camera = camera.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let mut cam = camera.borrow_mut();
                    if cam.panning {
                        cam.pan_to(e.client_x() as f64, e.client_y() as f64);
                        drop(cam);
                        draw();
                        return;
                    }
                    drop(cam);
                    update_hover(e.offset_x() as f64, e.offset_y() as f64);
                }) as Box<dyn FnMut(_)>)
            };
            let mouseleave_cb = {
                let hover = hover.clone();
                let tooltip = tooltip.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    if hover.borrow_mut().take().is_some() {
                        draw();
                    }
                    tooltip.set(None);
                }) as Box<dyn FnMut(_)>)
            };
            let mouseup_cb = {
                let camera = camera.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    camera.borrow_mut().end_pan();
                }) as Box<dyn FnMut(_)>)
            };

            let touch_point = {
                let canvas = canvas.clone();
                move |t: &web_sys::Touch| -> (f64, f64) {
                    match &canvas {
                        Some(c) => {
                            let rect = c.get_bounding_client_rect();
                            (t.client_x() as f64 - rect.left(), t.client_y() as f64 - rect.top())
                        }
                        None => (t.client_x() as f64, t.client_y() as f64),
                    }
                }
            };
            let touch_start_cb = {
                let camera = camera.clone();
                let touch_state = touch_state.clone();
                let touch_point = touch_point.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let touches = e.touches();
                    let mut ts = touch_state.borrow_mut();
                    match (touches.item(0), touches.item(1)) {
                        (Some(a), Some(b)) => {
                            e.prevent_default();
                            camera.borrow_mut().end_pan();
                            ts.begin_pinch(distance(touch_point(&a), touch_point(&b)));
                        }
                        (Some(a), None) => {
                            ts.begin_single();
                            let (x, y) = touch_point(&a);
                            if camera.borrow_mut().begin_pan(x, y) {
                                e.prevent_default();
                            }
                        }
                        _ => {}
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_move_cb = {
                let camera = camera.clone();
                let touch_state = touch_state.clone();
                let touch_point = touch_point.clone();
                let draw = draw_closure.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let touches = e.touches();
                    let mut ts = touch_state.borrow_mut();
                    match (touches.item(0), touches.item(1)) {
                        (Some(a), Some(b)) if ts.pinch => {
                            e.prevent_default();
                            let (pa, pb) = (touch_point(&a), touch_point(&b));
                            if let Some(f) = ts.pinch_factor(distance(pa, pb)) {
                                let (fx, fy) = ((pa.0 + pb.0) / 2.0, (pa.1 + pb.1) / 2.0);
                                camera.borrow_mut().zoom_about(f, fx, fy);
                                draw();
                            }
                        }
                        (Some(a), None) if ts.single_active => {
                            let mut cam = camera.borrow_mut();
                            if cam.panning {
                                e.prevent_default();
                                let (x, y) = touch_point(&a);
                                cam.pan_to(x, y);
                                drop(cam);
                                draw();
                            }
                        }
                        _ => {}
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_end_cb = {
                let camera = camera.clone();
                let touch_state = touch_state.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    let remaining = e.touches().length();
                    touch_state.borrow_mut().end(remaining);
                    camera.borrow_mut().end_pan();
                }) as Box<dyn FnMut(_)>)
            };

            if let Some(canvas) = &canvas {
                canvas.add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("dblclick", dblclick_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("mouseleave", mouseleave_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref()).ok();
                canvas.add_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref()).ok();
            }
            if let Some(window) = &window {
                window.add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref()).ok();
                window.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref()).ok();
            }

            // Cleanup
            move || {
                if let Some(canvas) = &canvas {
                    let _ = canvas.remove_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("dblclick", dblclick_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("mousedown", mousedown_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("mouseleave", mouseleave_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("touchstart", touch_start_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("touchmove", touch_move_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref());
                    let _ = canvas.remove_event_listener_with_callback("touchcancel", touch_end_cb.as_ref().unchecked_ref());
                }
                if let Some(window) = &window {
                    let _ = window.remove_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref());
                    let _ = window.remove_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
                }
                timer.borrow_mut().stop();
                draw_ref.borrow_mut().take();
            }
        });
    }

    let on_zoom = {
        let camera = camera.clone();
        let redraw = redraw.clone();
        Callback::from(move |factor: f64| {
            camera.borrow_mut().zoom_center(factor);
            redraw();
        })
    };
    let on_reset = {
        let camera = camera.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            camera.borrow_mut().reset();
            redraw();
        })
    };
    let on_toggle_play = {
        let map = map.clone();
        Callback::from(move |_| map.dispatch(MapAction::TogglePlay))
    };
    let on_select = {
        let map = map.clone();
        Callback::from(move |i: usize| map.dispatch(MapAction::SelectIndex(i)))
    };
    let on_toggle = {
        let map = map.clone();
        Callback::from(move |c| map.dispatch(MapAction::ToggleCategory(c)))
    };

    let banner = match (&props.boundary_error, &props.regions) {
        (Some(err), _) => html! {<div style="position:absolute; left:50%; top:72px; transform:translateX(-50%); background:#3d1d1f; border:1px solid #f85149; color:#ffdcd7; border-radius:6px; padding:8px 12px; font-size:13px;">{ format!("Map boundaries failed to load: {err}") }</div>},
        (None, None) => html! {<div style="position:absolute; left:50%; top:72px; transform:translateX(-50%); color:#8b949e; font-size:13px;">{"Loading boundaries…"}</div>},
        _ => html! {},
    };
    let choropleth = map.choropleth();

    html! {<div style="position:relative;">
        <canvas ref={canvas_ref} style="display:block; cursor:grab; touch-action:none;" />
        <YearControls years={map.playback.years().to_vec()} index={map.playback.index()} playing={map.playback.is_playing()} {on_toggle_play} {on_select} />
        <CameraControls {on_zoom} {on_reset} />
        <LegendPanel year={map.year()} bins={choropleth.legend()} no_data={NO_DATA_FILL} toggles={map.toggles.clone()} {on_toggle} />
        <Tooltip data={(*tooltip).clone()} />
        { banner }
    </div>}
}
