//! Rectangle selection over the scatter plot area.
//!
//! A press inside the plot starts a selection; release either zooms into the
//! selected rectangle or, for a near-zero drag, acts as a click that resets an
//! active zoom.

use super::scatter::PlotArea;

/// Selections no larger than this in both dimensions count as a click.
pub const CLICK_THRESHOLD_PX: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    None,
    Reset,
    /// Pixel bounds of the selection, each pair ordered low to high.
    Zoom { x_px: (f64, f64), y_px: (f64, f64) },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragZoom {
    start: Option<(f64, f64)>,
    current: (f64, f64),
}

impl DragZoom {
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    /// Returns false (and ignores the press) outside the plot area.
    pub fn press(&mut self, area: &PlotArea, x: f64, y: f64) -> bool {
        if !area.contains(x, y) {
            return false;
        }
        self.start = Some((x, y));
        self.current = (x, y);
        true
    }

    pub fn move_to(&mut self, area: &PlotArea, x: f64, y: f64) {
        if self.start.is_some() {
            self.current = area.clamp(x, y);
        }
    }

    pub fn selection(&self) -> Option<SelectionRect> {
        let (sx, sy) = self.start?;
        let (cx, cy) = self.current;
        Some(SelectionRect {
            x: sx.min(cx),
            y: sy.min(cy),
            width: (cx - sx).abs(),
            height: (cy - sy).abs(),
        })
    }

    pub fn release(&mut self, area: &PlotArea, x: f64, y: f64, zoomed: bool) -> DragOutcome {
        self.move_to(area, x, y);
        let Some(rect) = self.selection() else {
            return DragOutcome::None;
        };
        self.start = None;
        if rect.width <= CLICK_THRESHOLD_PX && rect.height <= CLICK_THRESHOLD_PX {
            return if zoomed { DragOutcome::Reset } else { DragOutcome::None };
        }
        // A flat selection still zooms; the thin axis keeps at least the threshold span.
        let grow = |lo: f64, len: f64, min: f64, max: f64| {
            if len > CLICK_THRESHOLD_PX {
                return (lo, lo + len);
            }
            let mid = lo + len / 2.0;
            let half = CLICK_THRESHOLD_PX / 2.0;
            ((mid - half).max(min), (mid + half).min(max))
        };
        DragOutcome::Zoom {
            x_px: grow(rect.x, rect.width, area.left, area.right()),
            y_px: grow(rect.y, rect.height, area.top, area.bottom()),
        }
    }

    /// Pointer left the canvas mid-drag.
    pub fn cancel(&mut self) {
        self.start = None;
    }
}
