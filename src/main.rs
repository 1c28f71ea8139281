mod components;
mod config;
mod error;
mod geo;
mod loader;
mod model;
mod render;
mod scale;
mod state;
mod storage;
mod surface;
mod util;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();
    util::clog("yew-world-viz starting");
    yew::Renderer::<App>::new().render();
}
