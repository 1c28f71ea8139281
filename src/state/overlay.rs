//! Event-point overlay: which events are drawn for a year, and how opaque.

use super::category::{CategoryToggles, EventCategory};
use crate::model::Dataset;

pub const COL_YEAR: &str = "year";
pub const COL_CATEGORY: &str = "disaster_type";
pub const COL_CODE: &str = "country_code";
pub const COL_LOCATION: &str = "location";
pub const COL_LAT: &str = "latitude";
pub const COL_LON: &str = "longitude";

#[derive(Clone, Debug, PartialEq)]
pub struct EventPoint {
    pub year: i32,
    pub category: EventCategory,
    /// Free text the category was derived from.
    pub kind: String,
    pub lon_lat: Option<(f64, f64)>,
    pub code: Option<String>,
    pub location: String,
}

/// Extracts events; rows without a parseable year are dropped.
pub fn event_points(ds: &Dataset) -> Vec<EventPoint> {
    let Some(year_col) = ds.column(COL_YEAR) else {
        return Vec::new();
    };
    let cat_col = ds.column(COL_CATEGORY);
    let code_col = ds.column(COL_CODE);
    let loc_col = ds.column(COL_LOCATION);
    let lat_col = ds.column(COL_LAT);
    let lon_col = ds.column(COL_LON);
    ds.records
        .iter()
        .filter_map(|r| {
            let year = r.year(year_col)?;
            let kind = cat_col.and_then(|c| r.get(c)).unwrap_or_default().to_string();
            let lat = lat_col.and_then(|c| r.number(c)).filter(|v| v.abs() <= 90.0);
            let lon = lon_col.and_then(|c| r.number(c)).filter(|v| v.abs() <= 180.0);
            Some(EventPoint {
                year,
                category: EventCategory::classify(&kind),
                kind,
                lon_lat: lon.zip(lat),
                code: code_col.and_then(|c| r.get(c)).filter(|s| !s.is_empty()).map(str::to_string),
                location: loc_col.and_then(|c| r.get(c)).unwrap_or_default().to_string(),
            })
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayMode {
    /// Only the selected year, fully opaque.
    Steady,
    /// Trailing `window` years fading by `decay` per year of age.
    Playback { window: u32, decay: f64 },
}

/// Opacity of an event from `year` when `selected` is displayed; `None` means hidden.
pub fn opacity(year: i32, selected: i32, mode: OverlayMode) -> Option<f64> {
    let age = selected - year;
    match mode {
        OverlayMode::Steady => (age == 0).then_some(1.0),
        OverlayMode::Playback { window, decay } => {
            if age < 0 || age >= window as i32 {
                return None;
            }
            let a = 1.0 - age as f64 * decay;
            (a > 0.0).then_some(a.min(1.0))
        }
    }
}

pub fn visible_points<'a>(
    points: &'a [EventPoint],
    selected: i32,
    mode: OverlayMode,
    toggles: &CategoryToggles,
) -> Vec<(&'a EventPoint, f64)> {
    points
        .iter()
        .filter(|p| toggles.is_visible(p.category))
        .filter_map(|p| opacity(p.year, selected, mode).map(|o| (p, o)))
        .collect()
}
