use super::{map_view::MapView, scatter_view::ScatterView};
use crate::config::AppConfig;
use crate::geo::Region;
use crate::loader::{load_boundaries, load_bundle, load_config};
use crate::model::DataBundle;
use crate::util::cwarn;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(PartialEq, Clone, Copy)]
enum View {
    Scatter,
    Map,
}

#[derive(PartialEq, Clone)]
enum DataLoad {
    Loading,
    Ready { config: Rc<AppConfig>, bundle: DataBundle },
}

#[derive(PartialEq, Clone)]
enum BoundaryLoad {
    Loading,
    Ready(Rc<Vec<Region>>),
    Failed(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let view = use_state(|| View::Scatter);
    let data = use_state(|| DataLoad::Loading);
    let boundaries = use_state(|| BoundaryLoad::Loading);

    // Load config, tables, then boundaries
    {
        let data = data.clone();
        let boundaries = boundaries.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let config = Rc::new(load_config().await);
                let bundle = load_bundle(&config).await;
                data.set(DataLoad::Ready { config: config.clone(), bundle });
                match load_boundaries(&config).await {
                    Ok(regions) => boundaries.set(BoundaryLoad::Ready(Rc::new(regions))),
                    Err(e) => {
                        cwarn(&format!("boundary load failed: {e}"));
                        boundaries.set(BoundaryLoad::Failed(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let tab = |target: View, label: &'static str| {
        let view = view.clone();
        let active = *view == target;
        let style = if active {
            "padding:6px 14px; background:#1f6feb; color:#fff; border:1px solid #1f6feb; border-radius:6px;"
        } else {
            "padding:6px 14px; background:#21262d; color:#c9d1d9; border:1px solid #30363d; border-radius:6px;"
        };
        html! { <button {style} onclick={Callback::from(move |_| view.set(target))}>{ label }</button> }
    };

    let content = match &*data {
        DataLoad::Loading => html! {<div style="padding:24px; color:#8b949e;">{"Loading data…"}</div>},
        DataLoad::Ready { config, bundle } => match *view {
            View::Scatter => match &bundle.scatter {
                Ok(data) => html! { <ScatterView data={data.clone()} config={config.clone()} /> },
                Err(err) => html! {<div style="margin:24px; padding:12px; background:#3d1d1f; border:1px solid #f85149; color:#ffdcd7; border-radius:6px;">{ format!("Could not load scatter data: {err}") }</div>},
            },
            View::Map => {
                let (regions, boundary_error) = match &*boundaries {
                    BoundaryLoad::Loading => (None, None),
                    BoundaryLoad::Ready(r) => (Some(r.clone()), None),
                    BoundaryLoad::Failed(e) => (None, Some(e.clone())),
                };
                html! { <MapView
                    population={bundle.population.clone()}
                    events={bundle.events.clone()}
                    {regions}
                    {boundary_error}
                    config={config.clone()}
                /> }
            }
        },
    };

    html! {<div style="background:#0e1116; color:#c9d1d9; min-height:100vh; font-family:sans-serif;">
        <div id="top-bar" style="display:flex; align-items:center; gap:8px; padding:8px 12px; border-bottom:1px solid #30363d;">
            <span style="font-weight:600; margin-right:12px;">{"World indicators"}</span>
            { tab(View::Scatter, "Scatter") }
            { tab(View::Map, "Map") }
        </div>
        { content }
    </div>}
}
