pub mod camera;
pub mod category;
pub mod choropleth;
pub mod drag_zoom;
pub mod map;
pub mod overlay;
pub mod playback;
pub mod scatter;
pub mod touch;
pub mod transition;

pub use camera::MapCamera;
pub use category::{CategoryToggles, EventCategory};
pub use drag_zoom::{DragOutcome, DragZoom};
pub use map::{MapAction, MapState};
pub use playback::TimerSlot;
pub use scatter::{PlotArea, ScatterAction, ScatterFrame, ScatterState};
pub use touch::TouchState;
pub use transition::Transition;
