//! Animated interpolation between two scatter frames.

use super::scatter::{continuous_ticks, suppress_edge_labels, Axis, PlotPoint, ScatterFrame};
use crate::scale::{lerp, LinearScale};
use std::collections::HashMap;

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    from: ScatterFrame,
    to: ScatterFrame,
    start_ms: f64,
    duration_ms: f64,
}

impl Transition {
    pub fn new(from: ScatterFrame, to: ScatterFrame, start_ms: f64, duration_ms: f64) -> Self {
        Self { from, to, start_ms, duration_ms }
    }

    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// True when no transition is still moving at `now_ms`, so the displayed
    /// frame matches the state's own scales.
    pub fn settled(running: Option<&Transition>, now_ms: f64) -> bool {
        running.is_none_or(|t| t.is_done(now_ms))
    }

    /// Frame to draw at `now_ms`. Matching points move; points present on one
    /// side only fade in or out in place.
    pub fn frame_at(&self, now_ms: f64) -> ScatterFrame {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to.clone();
        }
        let t = ease_cubic_in_out(p);
        let area = self.to.area;

        let from_by_row: HashMap<usize, &PlotPoint> = self.from.points.iter().map(|p| (p.row, p)).collect();
        let mut points: Vec<PlotPoint> = self
            .to
            .points
            .iter()
            .map(|end| match from_by_row.get(&end.row) {
                Some(start) => PlotPoint {
                    row: end.row,
                    x: lerp(start.x, end.x, t),
                    y: lerp(start.y, end.y, t),
                    opacity: lerp(start.opacity, end.opacity, t),
                },
                None => PlotPoint { opacity: end.opacity * t, ..end.clone() },
            })
            .collect();
        let kept: std::collections::HashSet<usize> = self.to.points.iter().map(|p| p.row).collect();
        points.extend(
            self.from
                .points
                .iter()
                .filter(|p| !kept.contains(&p.row))
                .map(|p| PlotPoint { opacity: p.opacity * (1.0 - t), ..p.clone() }),
        );

        ScatterFrame {
            area,
            x_axis: tween_axis(&self.from.x_axis, &self.to.x_axis, area.x_range(), t, false),
            y_axis: tween_axis(&self.from.y_axis, &self.to.y_axis, area.y_range(), t, true),
            points,
        }
    }
}

fn tween_axis(from: &Axis, to: &Axis, range: (f64, f64), t: f64, vertical: bool) -> Axis {
    let domain = (lerp(from.domain.0, to.domain.0, t), lerp(from.domain.1, to.domain.1, t));
    let scale = LinearScale::new(domain, range);
    let ticks = if to.discrete {
        // Year ticks jump to their final values and only slide with the scale.
        to.ticks
            .iter()
            .map(|tk| super::scatter::Tick { px: scale.map(tk.value), ..tk.clone() })
            .collect()
    } else {
        let mut ticks = continuous_ticks(&scale);
        if vertical {
            suppress_edge_labels(&mut ticks);
        }
        ticks
    };
    Axis { label: to.label.clone(), domain, discrete: to.discrete, ticks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scatter::{PlotArea, Tick};
    use pretty_assertions::assert_eq;

    fn axis(domain: (f64, f64), discrete: bool) -> Axis {
        Axis { label: "x".into(), domain, discrete, ticks: Vec::new() }
    }

    fn frame(points: Vec<PlotPoint>, domain: (f64, f64)) -> ScatterFrame {
        ScatterFrame {
            area: PlotArea { left: 0.0, top: 0.0, width: 100.0, height: 100.0 },
            x_axis: axis(domain, false),
            y_axis: axis(domain, false),
            points,
        }
    }

    fn pt(row: usize, x: f64, y: f64) -> PlotPoint {
        PlotPoint { row, x, y, opacity: 1.0 }
    }

    #[test]
    fn easing_is_symmetric_and_bounded() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_eq!(ease_cubic_in_out(2.0), 1.0);
        assert!((ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn points_move_and_fade() {
        let from = frame(vec![pt(0, 0.0, 0.0), pt(1, 50.0, 50.0)], (0.0, 10.0));
        let to = frame(vec![pt(0, 100.0, 100.0), pt(2, 20.0, 20.0)], (0.0, 20.0));
        let tr = Transition::new(from, to.clone(), 1000.0, 750.0);

        let mid = tr.frame_at(1375.0);
        assert_eq!(mid.points.len(), 3);
        assert_eq!((mid.points[0].x, mid.points[0].y), (50.0, 50.0));
        assert_eq!(mid.points[1].opacity, 0.5);
        assert_eq!((mid.points[2].row, mid.points[2].opacity), (1, 0.5));
        assert_eq!(mid.x_axis.domain, (0.0, 15.0));

        assert!(tr.is_done(1750.0));
        assert_eq!(tr.frame_at(2000.0), to);
        assert_eq!(tr.frame_at(0.0).points[0].x, 0.0);
    }

    #[test]
    fn discrete_ticks_keep_their_values() {
        let mut from = frame(Vec::new(), (1990.0, 2020.0));
        let mut to = frame(Vec::new(), (2000.0, 2010.0));
        from.x_axis.discrete = true;
        to.x_axis.discrete = true;
        to.x_axis.ticks = [2000.0, 2005.0, 2010.0]
            .iter()
            .map(|v| Tick { value: *v, px: 0.0, label: format!("{v}"), opacity: 1.0 })
            .collect();
        let mid = Transition::new(from, to, 0.0, 100.0).frame_at(50.0);
        let values: Vec<f64> = mid.x_axis.ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![2000.0, 2005.0, 2010.0]);
        assert_eq!(mid.x_axis.domain, (1995.0, 2015.0));
        assert_eq!(mid.x_axis.ticks[1].px, 50.0);
    }

    #[test]
    fn input_waits_for_a_running_transition() {
        let tr = Transition::new(frame(Vec::new(), (0.0, 1.0)), frame(Vec::new(), (0.0, 2.0)), 100.0, 750.0);
        assert!(Transition::settled(None, 0.0));
        assert!(!Transition::settled(Some(&tr), 400.0));
        assert!(Transition::settled(Some(&tr), 850.0));
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let to = frame(vec![pt(0, 1.0, 1.0)], (0.0, 1.0));
        let tr = Transition::new(frame(Vec::new(), (0.0, 1.0)), to.clone(), 0.0, 0.0);
        assert_eq!(tr.frame_at(0.0), to);
    }
}
