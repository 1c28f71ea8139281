//! Scene drawing for both views on top of a [`DrawSurface`].

use crate::geo::{ProjectedRegion, Projection, Region};
use crate::state::camera::ZoomTransform;
use crate::state::choropleth::{canonical_code, Choropleth};
use crate::state::drag_zoom::SelectionRect;
use crate::state::overlay::EventPoint;
use crate::state::scatter::ScatterFrame;
use crate::surface::{Align, DrawSurface, Shape};
use std::collections::HashMap;

pub const BACKGROUND: &str = "#0e1116";
pub const PANEL: &str = "#161b22";
pub const GRID: &str = "#2f3641";
pub const AXIS_TEXT: &str = "#8b949e";
pub const LABEL_TEXT: &str = "#c9d1d9";
pub const POINT: &str = "#58a6ff";
pub const POINT_HOVER: &str = "#f0f6fc";
pub const SELECTION: &str = "#1f6feb";
pub const BORDER: &str = "#0e1116";
pub const BORDER_HOVER: &str = "#f0f6fc";

pub const POINT_RADIUS: f64 = 4.0;
pub const EVENT_RADIUS: f64 = 3.5;

pub fn render_scatter(
    surface: &mut dyn DrawSurface,
    width: f64,
    height: f64,
    frame: &ScatterFrame,
    selection: Option<SelectionRect>,
    hover: Option<usize>,
) {
    let a = frame.area;
    surface.clear(width, height, BACKGROUND);
    surface.set_transform(ZoomTransform::default());
    surface.draw(&Shape::Rect { x: a.left, y: a.top, w: a.width, h: a.height, fill: Some(PANEL), stroke: None, opacity: 1.0 });

    for t in frame.x_axis.ticks.iter().filter(|t| t.px >= a.left - 0.5 && t.px <= a.right() + 0.5) {
        surface.draw(&Shape::Line { from: (t.px, a.top), to: (t.px, a.bottom()), stroke: GRID, width: 1.0 });
        surface.draw(&Shape::Text {
            x: t.px,
            y: a.bottom() + 16.0,
            text: t.label.clone(),
            color: AXIS_TEXT,
            align: Align::Center,
            opacity: t.opacity,
            rotation: 0.0,
        });
    }
    for t in frame.y_axis.ticks.iter().filter(|t| t.px >= a.top - 0.5 && t.px <= a.bottom() + 0.5) {
        surface.draw(&Shape::Line { from: (a.left, t.px), to: (a.right(), t.px), stroke: GRID, width: 1.0 });
        surface.draw(&Shape::Text {
            x: a.left - 8.0,
            y: t.px,
            text: t.label.clone(),
            color: AXIS_TEXT,
            align: Align::Right,
            opacity: t.opacity,
            rotation: 0.0,
        });
    }
    surface.draw(&Shape::Text {
        x: a.left + a.width / 2.0,
        y: height - 14.0,
        text: frame.x_axis.label.clone(),
        color: LABEL_TEXT,
        align: Align::Center,
        opacity: 1.0,
        rotation: 0.0,
    });
    surface.draw(&Shape::Text {
        x: 16.0,
        y: a.top + a.height / 2.0,
        text: frame.y_axis.label.clone(),
        color: LABEL_TEXT,
        align: Align::Center,
        opacity: 1.0,
        rotation: -std::f64::consts::FRAC_PI_2,
    });

    surface.push_clip(a.left, a.top, a.width, a.height);
    for (i, p) in frame.points.iter().enumerate() {
        let hovered = hover == Some(i);
        surface.draw(&Shape::Circle {
            x: p.x,
            y: p.y,
            r: if hovered { POINT_RADIUS * 1.5 } else { POINT_RADIUS },
            fill: if hovered { POINT_HOVER } else { POINT },
            opacity: p.opacity * 0.8,
        });
    }
    surface.pop_clip();

    if let Some(r) = selection {
        surface.draw(&Shape::Rect {
            x: r.x,
            y: r.y,
            w: r.width,
            h: r.height,
            fill: Some(SELECTION),
            stroke: Some(SELECTION),
            opacity: 0.25,
        });
    }
}

/// An overlay marker in content (un-zoomed) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEvent {
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub opacity: f64,
}

/// Positions events by coordinates, else by their region's centroid.
/// Events with neither are skipped.
pub fn place_events(
    visible: &[(&EventPoint, f64)],
    proj: &Projection,
    projected: &[ProjectedRegion],
    codes: &HashMap<String, usize>,
) -> Vec<PlacedEvent> {
    visible
        .iter()
        .filter_map(|(e, opacity)| {
            let (x, y) = match e.lon_lat {
                Some((lon, lat)) => proj.project(lon, lat),
                None => {
                    let idx = e.code.as_deref().and_then(canonical_code).and_then(|c| codes.get(&c))?;
                    projected.get(*idx)?.centroid()
                }
            };
            Some(PlacedEvent { x, y, color: e.category.color(), opacity: *opacity })
        })
        .collect()
}

pub struct MapScene<'a> {
    pub regions: &'a [Region],
    pub projected: &'a [ProjectedRegion],
    pub choropleth: &'a Choropleth,
    pub events: &'a [PlacedEvent],
    pub hover: Option<usize>,
}

pub fn render_map(surface: &mut dyn DrawSurface, width: f64, height: f64, camera: ZoomTransform, scene: &MapScene) {
    surface.clear(width, height, BACKGROUND);
    surface.set_transform(camera);
    let k = camera.k.max(f64::EPSILON);
    for p in scene.projected {
        let Some(region) = scene.regions.get(p.region) else {
            continue;
        };
        if scene.hover == Some(p.region) {
            continue;
        }
        surface.draw(&Shape::Polygon {
            rings: p.polygons.iter().flatten().cloned().collect(),
            fill: scene.choropleth.fill(region),
            stroke: BORDER,
            line_width: 0.5 / k,
        });
    }
    // Hovered region last so its outline sits on top.
    if let Some(p) = scene.hover.and_then(|h| scene.projected.iter().find(|p| p.region == h)) {
        if let Some(region) = scene.regions.get(p.region) {
            surface.draw(&Shape::Polygon {
                rings: p.polygons.iter().flatten().cloned().collect(),
                fill: scene.choropleth.fill(region),
                stroke: BORDER_HOVER,
                line_width: 1.5 / k,
            });
        }
    }
    for e in scene.events {
        surface.draw(&Shape::Circle { x: e.x, y: e.y, r: EVENT_RADIUS / k, fill: e.color, opacity: e.opacity });
    }
    surface.set_transform(ZoomTransform::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::geo::{parse_regions, project_regions};
    use crate::model::Dataset;
    use crate::state::category::CategoryToggles;
    use crate::state::choropleth::{code_index, NO_DATA_FILL, PALETTE};
    use crate::state::overlay::{event_points, visible_points, OverlayMode};
    use crate::state::scatter::{PlotArea, ScatterState};
    use crate::storage::MemoryStore;
    use crate::surface::{Op, RecordingSurface};
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    const CSV: &str = "country,year,gdp_per_capita,life_expectancy\n\
                       Chile,2000,5000,76\n\
                       Chile,2010,12000,79\n\
                       Peru,2000,2000,70\n";

    const GEO: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"ISO_A3":"FRA","NAME":"France"},
         "geometry":{"type":"Polygon","coordinates":[[[0,40],[10,40],[10,50],[0,50],[0,40]]]}},
        {"type":"Feature","properties":{"ISO_A3":"-99","NAME":"Nowhere"},
         "geometry":{"type":"Polygon","coordinates":[[[20,0],[30,0],[30,10],[20,10],[20,0]]]}}]}"#;

    #[test]
    fn scatter_draws_every_point_inside_a_clip() {
        let s = ScatterState::restore(Rc::new(Dataset::from_csv(CSV).unwrap()), &MemoryStore::default(), &AppConfig::default());
        let frame = s.frame(PlotArea::for_canvas(600.0, 400.0));
        let mut surface = RecordingSurface::default();
        render_scatter(&mut surface, 600.0, 400.0, &frame, None, Some(1));

        assert_eq!(surface.ops.first(), Some(&Op::Clear));
        assert_eq!(surface.circles().len(), 3);
        let clip = surface.ops.iter().position(|o| *o == Op::Clip).unwrap();
        let unclip = surface.ops.iter().position(|o| *o == Op::Unclip).unwrap();
        assert!(surface.ops[clip..unclip].iter().all(|o| matches!(o, Op::Clip | Op::Draw(Shape::Circle { .. }))));
        let big = surface.circles().into_iter().filter(|c| matches!(c, Shape::Circle { r, .. } if *r > POINT_RADIUS)).count();
        assert_eq!(big, 1);
    }

    #[test]
    fn hidden_y_edge_labels_are_drawn_transparent() {
        let s = ScatterState::restore(Rc::new(Dataset::from_csv(CSV).unwrap()), &MemoryStore::default(), &AppConfig::default());
        let frame = s.frame(PlotArea::for_canvas(600.0, 400.0));
        let mut surface = RecordingSurface::default();
        render_scatter(&mut surface, 600.0, 400.0, &frame, None, None);
        let first = &frame.y_axis.ticks[0].label;
        let drawn = surface
            .texts()
            .into_iter()
            .find(|t| matches!(t, Shape::Text { text, align: Align::Right, .. } if text == first));
        assert!(matches!(drawn, Some(Shape::Text { opacity, .. }) if *opacity == 0.0));
    }

    #[test]
    fn selection_overlay_is_drawn_last() {
        let s = ScatterState::restore(Rc::new(Dataset::from_csv(CSV).unwrap()), &MemoryStore::default(), &AppConfig::default());
        let frame = s.frame(PlotArea::for_canvas(600.0, 400.0));
        let mut surface = RecordingSurface::default();
        let sel = SelectionRect { x: 100.0, y: 50.0, width: 80.0, height: 40.0 };
        render_scatter(&mut surface, 600.0, 400.0, &frame, Some(sel), None);
        assert!(matches!(surface.ops.last(), Some(Op::Draw(Shape::Rect { x, w, .. })) if *x == 100.0 && *w == 80.0));
    }

    #[test]
    fn events_fall_back_to_region_centroid() {
        let regions = parse_regions(GEO).unwrap();
        let proj = Projection::fit(&regions, 400.0, 200.0, 0.0);
        let projected = project_regions(&regions, &proj);
        let events = event_points(
            &Dataset::from_csv(
                "year,disaster_type,country_code,location,latitude,longitude\n\
                 2020,Flood,FRA,,,\n\
                 2020,Storm,,,45,5\n\
                 2020,Drought,ZZZ,,,\n",
            )
            .unwrap(),
        );
        let visible = visible_points(&events, 2020, OverlayMode::Steady, &CategoryToggles::default());
        let placed = place_events(&visible, &proj, &projected, &code_index(&regions));
        assert_eq!(placed.len(), 2);
        assert_eq!((placed[0].x, placed[0].y), projected[0].centroid());
        assert_eq!((placed[1].x, placed[1].y), proj.project(5.0, 45.0));
    }

    #[test]
    fn map_fills_regions_and_scales_markers() {
        let regions = parse_regions(GEO).unwrap();
        let proj = Projection::fit(&regions, 400.0, 200.0, 0.0);
        let projected = project_regions(&regions, &proj);
        let pop = Dataset::from_csv("country_code,country_name,year,population\nFRA,France,2020,1\nDEU,Germany,2020,2\n").unwrap();
        let choropleth = Choropleth::for_year(&pop, 2020);
        let events = [PlacedEvent { x: 1.0, y: 1.0, color: "#fff", opacity: 0.6 }];
        let scene = MapScene { regions: &regions, projected: &projected, choropleth: &choropleth, events: &events, hover: Some(0) };
        let mut surface = RecordingSurface::default();
        let camera = ZoomTransform { x: -10.0, y: -5.0, k: 2.0 };
        render_map(&mut surface, 400.0, 200.0, camera, &scene);

        assert!(surface.ops.contains(&Op::Transform(camera)));
        let fills: Vec<&str> = surface
            .polygons()
            .into_iter()
            .filter_map(|p| match p {
                Shape::Polygon { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        // Unmatched region first, hovered France on top.
        assert_eq!(fills, vec![NO_DATA_FILL, PALETTE[0]]);
        assert!(matches!(surface.circles()[0], Shape::Circle { r, .. } if *r == EVENT_RADIUS / 2.0));
    }
}
