//! Scatter view state: axis field selection, current/original domains and
//! the derived frame (scaled points and axis ticks) for one render pass.

use crate::config::{AppConfig, KEY_X_FIELD, KEY_Y_FIELD};
use crate::model::Dataset;
use crate::scale::{self, LinearScale};
use crate::storage::KeyValueStore;
use crate::util::{field_label, format_tick};
use std::rc::Rc;
use yew::Reducible;

pub const TICK_COUNT: usize = 10;

/// Plot rectangle inside the canvas, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub const MARGIN_LEFT: f64 = 72.0;
    pub const MARGIN_RIGHT: f64 = 24.0;
    pub const MARGIN_TOP: f64 = 24.0;
    pub const MARGIN_BOTTOM: f64 = 56.0;

    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self {
            left: Self::MARGIN_LEFT,
            top: Self::MARGIN_TOP,
            width: (width - Self::MARGIN_LEFT - Self::MARGIN_RIGHT).max(1.0),
            height: (height - Self::MARGIN_TOP - Self::MARGIN_BOTTOM).max(1.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.left, self.right())
    }

    /// Inverted so larger values sit higher.
    pub fn y_range(&self) -> (f64, f64) {
        (self.bottom(), self.top)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.left, self.right()), y.clamp(self.top, self.bottom()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub px: f64,
    pub label: String,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    pub domain: (f64, f64),
    /// Ticks are the dataset's distinct years rather than linear ticks.
    pub discrete: bool,
    pub ticks: Vec<Tick>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotPoint {
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

/// Everything needed to draw the scatter plot once.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterFrame {
    pub area: PlotArea,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<PlotPoint>,
}

/// Linear ticks for a domain, positioned with `scale`.
pub fn continuous_ticks(scale: &LinearScale) -> Vec<Tick> {
    scale
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|v| Tick { value: v, px: scale.map(v), label: format_tick(v), opacity: 1.0 })
        .collect()
}

/// Distinct years inside the domain, positioned with `scale`.
pub fn year_ticks(scale: &LinearScale, years: &[i32]) -> Vec<Tick> {
    years
        .iter()
        .map(|y| *y as f64)
        .filter(|v| scale.contains(*v))
        .map(|v| Tick { value: v, px: scale.map(v), label: format!("{}", v as i64), opacity: 1.0 })
        .collect()
}

/// Hides the first and last labels of an axis.
pub fn suppress_edge_labels(ticks: &mut [Tick]) {
    if let Some(first) = ticks.first_mut() {
        first.opacity = 0.0;
    }
    if let Some(last) = ticks.last_mut() {
        last.opacity = 0.0;
    }
}

/// Field choice given a stored preference: stored, else configured default,
/// else the field at `fallback_index` of the available list.
pub fn choose_field(stored: Option<String>, default: &str, fields: &[String], fallback_index: usize) -> String {
    if let Some(s) = stored {
        if fields.iter().any(|f| *f == s) {
            return s;
        }
        crate::util::clog(&format!("stored axis field `{s}` not in dataset; using default"));
    }
    if fields.iter().any(|f| f == default) {
        return default.to_string();
    }
    fields
        .get(fallback_index)
        .or_else(|| fields.first())
        .cloned()
        .unwrap_or_default()
}

fn field_extent(data: &Dataset, field: &str) -> (f64, f64) {
    match data.extent(field) {
        Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
        Some(e) => e,
        None => (0.0, 1.0),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterState {
    pub data: Rc<Dataset>,
    /// Selectable (numeric) fields.
    pub fields: Vec<String>,
    pub year_field: String,
    pub label_field: String,
    pub x_field: String,
    pub y_field: String,
    pub x_extent: (f64, f64),
    pub y_extent: (f64, f64),
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    years: Vec<i32>,
    /// Bumped on every change; effects key on it.
    pub version: u64,
}

impl ScatterState {
    pub fn new(data: Rc<Dataset>, x_field: String, y_field: String, cfg: &AppConfig) -> Self {
        let fields = data.numeric_fields();
        let years = data.distinct_years(&cfg.year_field);
        let x_extent = field_extent(&data, &x_field);
        let y_extent = field_extent(&data, &y_field);
        Self {
            data,
            fields,
            year_field: cfg.year_field.clone(),
            label_field: cfg.label_field.clone(),
            x_field,
            y_field,
            x_extent,
            y_extent,
            x_domain: x_extent,
            y_domain: y_extent,
            years,
            version: 0,
        }
    }

    /// Builds the state from stored preferences, falling back to defaults for
    /// missing or stale fields.
    pub fn restore(data: Rc<Dataset>, store: &dyn KeyValueStore, cfg: &AppConfig) -> Self {
        let fields = data.numeric_fields();
        let x = choose_field(store.get(KEY_X_FIELD), &cfg.default_x_field, &fields, 0);
        let y = choose_field(store.get(KEY_Y_FIELD), &cfg.default_y_field, &fields, 1);
        Self::new(data, x, y, cfg)
    }

    pub fn persist(&self, store: &dyn KeyValueStore) {
        store.set(KEY_X_FIELD, &self.x_field);
        store.set(KEY_Y_FIELD, &self.y_field);
    }

    pub fn is_zoomed(&self) -> bool {
        self.x_domain != self.x_extent || self.y_domain != self.y_extent
    }

    pub fn scales(&self, area: &PlotArea) -> (LinearScale, LinearScale) {
        (
            LinearScale::new(self.x_domain, area.x_range()),
            LinearScale::new(self.y_domain, area.y_range()),
        )
    }

    fn axis(&self, field: &str, scale: &LinearScale, vertical: bool) -> Axis {
        let discrete = field == self.year_field;
        let mut ticks = if discrete { year_ticks(scale, &self.years) } else { continuous_ticks(scale) };
        if vertical {
            suppress_edge_labels(&mut ticks);
        }
        Axis { label: field_label(field), domain: scale.domain, discrete, ticks }
    }

    pub fn frame(&self, area: PlotArea) -> ScatterFrame {
        let (xs, ys) = self.scales(&area);
        let points = match (self.data.column(&self.x_field), self.data.column(&self.y_field)) {
            (Some(xc), Some(yc)) => self
                .data
                .records
                .iter()
                .enumerate()
                .filter_map(|(row, r)| {
                    let (x, y) = (r.number(xc)?, r.number(yc)?);
                    Some(PlotPoint { row, x: xs.map(x), y: ys.map(y), opacity: 1.0 })
                })
                .collect(),
            _ => Vec::new(),
        };
        ScatterFrame {
            area,
            x_axis: self.axis(&self.x_field, &xs, false),
            y_axis: self.axis(&self.y_field, &ys, true),
            points,
        }
    }

    /// Tooltip lines for a dataset row.
    pub fn describe(&self, row: usize) -> Vec<String> {
        let Some(r) = self.data.records.get(row) else {
            return Vec::new();
        };
        let mut head = self.data.value(r, &self.label_field).unwrap_or("").to_string();
        if self.x_field != self.year_field && self.y_field != self.year_field {
            if let Some(y) = self.data.value(r, &self.year_field).filter(|s| !s.is_empty()) {
                head = format!("{head} ({y})");
            }
        }
        let mut out = vec![head];
        for f in [&self.x_field, &self.y_field] {
            let v = self
                .data
                .column(f)
                .and_then(|c| r.number(c))
                .map(crate::util::format_value)
                .unwrap_or_else(|| "n/a".into());
            out.push(format!("{}: {}", field_label(f), v));
        }
        out
    }
}

/// Hovered point, tied to the state version it was picked under. Indices
/// from an older version point into a different frame and read as `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverSlot {
    picked: Option<(u64, usize)>,
}

impl HoverSlot {
    pub fn get(&self, version: u64) -> Option<usize> {
        self.picked.filter(|(v, _)| *v == version).map(|(_, i)| i)
    }

    /// Returns true when the visible hover changed.
    pub fn set(&mut self, version: u64, index: Option<usize>) -> bool {
        let changed = self.get(version) != index;
        self.picked = index.map(|i| (version, i));
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.picked.take().is_some()
    }
}

/// Index into `frame.points` of the nearest point within `radius` pixels.
pub fn nearest_point(frame: &ScatterFrame, px: f64, py: f64, radius: f64) -> Option<usize> {
    if !frame.area.contains(px, py) {
        return None;
    }
    frame
        .points
        .iter()
        .enumerate()
        .filter(|(_, p)| frame.area.contains(p.x, p.y))
        .map(|(i, p)| (i, (p.x - px).powi(2) + (p.y - py).powi(2)))
        .filter(|(_, d2)| *d2 <= radius * radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[derive(Clone, Debug)]
pub enum ScatterAction {
    SetXField(String),
    SetYField(String),
    /// Pixel bounds of a drag selection within `area`.
    ZoomTo { x_px: (f64, f64), y_px: (f64, f64), area: PlotArea },
    ResetZoom,
}

impl Reducible for ScatterState {
    type Action = ScatterAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use ScatterAction::*;
        let mut new = (*self).clone();
        match action {
            SetXField(f) => {
                if f == new.x_field || !new.fields.contains(&f) {
                    return self;
                }
                new.x_extent = field_extent(&new.data, &f);
                new.x_field = f;
                new.x_domain = new.x_extent;
                new.y_domain = new.y_extent;
            }
            SetYField(f) => {
                if f == new.y_field || !new.fields.contains(&f) {
                    return self;
                }
                new.y_extent = field_extent(&new.data, &f);
                new.y_field = f;
                new.x_domain = new.x_extent;
                new.y_domain = new.y_extent;
            }
            ZoomTo { x_px, y_px, area } => {
                let (xs, ys) = new.scales(&area);
                let (x0, x1) = scale::ordered(x_px);
                let (top, bottom) = scale::ordered(y_px);
                new.x_domain = (xs.invert(x0), xs.invert(x1));
                new.y_domain = scale::nice((ys.invert(bottom), ys.invert(top)), TICK_COUNT as f64);
            }
            ResetZoom => {
                if !new.is_zoomed() {
                    return self;
                }
                new.x_domain = new.x_extent;
                new.y_domain = new.y_extent;
            }
        }
        new.version = new.version.wrapping_add(1);
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    const CSV: &str = "country,year,gdp_per_capita,life_expectancy,population\n\
                       Chile,2000,5000,76,15000000\n\
                       Chile,2010,12000,79,17000000\n\
                       Peru,2000,2000,70,26000000\n\
                       Peru,2010,5000,74,29000000\n";

    fn data() -> Rc<Dataset> {
        Rc::new(Dataset::from_csv(CSV).unwrap())
    }

    fn area() -> PlotArea {
        PlotArea { left: 0.0, top: 0.0, width: 100.0, height: 100.0 }
    }

    #[test]
    fn empty_store_yields_default_fields() {
        let s = ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default());
        assert_eq!(s.x_field, "gdp_per_capita");
        assert_eq!(s.y_field, "life_expectancy");
        assert!(!s.is_zoomed());
    }

    #[test]
    fn stale_stored_field_falls_back_to_default() {
        let store = MemoryStore::with(&[(KEY_X_FIELD, "co2_per_capita"), (KEY_Y_FIELD, "population")]);
        let s = ScatterState::restore(data(), &store, &AppConfig::default());
        assert_eq!(s.x_field, "gdp_per_capita");
        assert_eq!(s.y_field, "population");
    }

    #[test]
    fn missing_defaults_use_available_fields() {
        let fields = vec!["a".to_string(), "b".to_string()];
        assert_eq!(choose_field(None, "zzz", &fields, 1), "b");
        assert_eq!(choose_field(None, "zzz", &fields[..1], 1), "a");
        assert_eq!(choose_field(None, "zzz", &[], 0), "");
    }

    #[test]
    fn selection_persists() {
        let store = MemoryStore::default();
        let s = Rc::new(ScatterState::restore(data(), &store, &AppConfig::default()))
            .reduce(ScatterAction::SetYField("population".into()));
        s.persist(&store);
        assert_eq!(store.get(KEY_Y_FIELD).as_deref(), Some("population"));
        assert_eq!(ScatterState::restore(data(), &store, &AppConfig::default()).y_field, "population");
    }

    #[test]
    fn unknown_field_action_is_ignored() {
        let s = Rc::new(ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default()));
        let same = s.clone().reduce(ScatterAction::SetXField("country".into()));
        assert!(Rc::ptr_eq(&s, &same));
    }

    #[test]
    fn drag_selection_inverse_projects_and_nices_y() {
        let s = Rc::new(ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default()));
        // x: 2000..12000 over 0..100 px; y: 70..79 over 100..0 px.
        let z = s.reduce(ScatterAction::ZoomTo { x_px: (60.0, 10.0), y_px: (20.0, 80.0), area: area() });
        assert_eq!(z.x_domain, (3000.0, 8000.0));
        // Raw y bounds 71.8..77.2 are niced outward.
        let raw = (70.0 + 0.2 * 9.0, 70.0 + 0.8 * 9.0);
        assert_eq!(z.y_domain, scale::nice(raw, 10.0));
        assert_eq!(z.y_domain, (71.5, 77.5));
        assert!(z.is_zoomed());
    }

    #[test]
    fn reset_restores_original_extents_exactly() {
        let s = Rc::new(ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default()));
        let z = s.clone().reduce(ScatterAction::ZoomTo { x_px: (10.0, 60.0), y_px: (20.0, 80.0), area: area() });
        let r = z.reduce(ScatterAction::ResetZoom);
        assert_eq!(r.x_domain, s.x_extent);
        assert_eq!(r.y_domain, s.y_extent);
        assert!(!r.is_zoomed());
        let again = r.clone().reduce(ScatterAction::ResetZoom);
        assert!(Rc::ptr_eq(&r, &again));
    }

    #[test]
    fn year_axis_uses_exact_distinct_years() {
        let s = Rc::new(ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default()))
            .reduce(ScatterAction::SetXField("year".into()));
        let f = s.frame(area());
        assert!(f.x_axis.discrete);
        let values: Vec<f64> = f.x_axis.ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![2000.0, 2010.0]);
        assert!(!f.y_axis.discrete);
    }

    #[test]
    fn y_edge_labels_are_hidden_for_current_domain() {
        let s = Rc::new(ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default()));
        for st in [s.clone(), s.reduce(ScatterAction::ZoomTo { x_px: (0.0, 50.0), y_px: (0.0, 50.0), area: area() })] {
            let f = st.frame(area());
            let t = &f.y_axis.ticks;
            assert!(t.len() >= 3);
            assert_eq!(t.first().unwrap().opacity, 0.0);
            assert_eq!(t.last().unwrap().opacity, 0.0);
            assert!(t[1..t.len() - 1].iter().all(|t| t.opacity == 1.0));
            assert!(f.x_axis.ticks.iter().all(|t| t.opacity == 1.0));
        }
    }

    #[test]
    fn frame_scales_points() {
        let s = ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default());
        let f = s.frame(area());
        assert_eq!(f.points.len(), 4);
        assert_eq!((f.points[2].x, f.points[2].y), (0.0, 100.0));
        assert_eq!((f.points[1].x, f.points[1].y), (100.0, 0.0));
        assert_eq!(nearest_point(&f, 3.0, 97.0, 8.0), Some(2));
        assert_eq!(nearest_point(&f, 50.0, 50.0, 8.0), None);
    }

    #[test]
    fn describe_builds_tooltip_lines() {
        let s = ScatterState::restore(data(), &MemoryStore::default(), &AppConfig::default());
        assert_eq!(
            s.describe(1),
            vec!["Chile (2010)".to_string(), "gdp per capita: 12,000".into(), "life expectancy: 79".into()]
        );
    }

    #[test]
    fn hover_expires_with_the_state_version() {
        let mut h = HoverSlot::default();
        assert!(h.set(3, Some(7)));
        assert!(!h.set(3, Some(7)));
        assert_eq!(h.get(3), Some(7));
        assert_eq!(h.get(4), None);
        assert!(h.clear());
        assert!(!h.clear());
    }

}
