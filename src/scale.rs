//! Numeric scales: continuous linear mapping with d3-compatible ticks and
//! "nice" rounding, and a quantile scale for choropleth binning.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count as f64)
    }

    pub fn contains(&self, v: f64) -> bool {
        let (lo, hi) = ordered(self.domain);
        v >= lo && v <= hi
    }
}

pub fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let pos = 10f64.powf(-power) / factor;
        i1 = (start * pos).round();
        i2 = (stop * pos).round();
        if i1 / pos < start {
            i1 += 1.0;
        }
        if i2 / pos > stop {
            i2 -= 1.0;
        }
        inc = -pos;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick step; negative values encode the reciprocal of a sub-unit step.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Round, evenly spaced values covering `[start, stop]` (either order).
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count <= 0.0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count);
    if !(i2 >= i1) || !inc.is_finite() {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Extends a domain outward to round tick boundaries.
pub fn nice(domain: (f64, f64), count: f64) -> (f64, f64) {
    let reverse = domain.1 < domain.0;
    let (mut start, mut stop) = ordered(domain);
    if !(start < stop) || !start.is_finite() || !stop.is_finite() {
        return domain;
    }
    let mut prestep: Option<f64> = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) {
            break;
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }
    if reverse { (stop, start) } else { (start, stop) }
}

/// R-7 quantile of sorted values, `p` in [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if p <= 0.0 || n < 2 {
        return sorted.first().copied();
    }
    if p >= 1.0 {
        return sorted.last().copied();
    }
    let i = (n - 1) as f64 * p;
    let i0 = i.floor() as usize;
    let v0 = sorted[i0];
    let v1 = sorted[i0 + 1];
    Some(v0 + (v1 - v0) * (i - i0 as f64))
}

/// Equal-frequency binning: `bins` buckets over the observed values.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantileScale {
    thresholds: Vec<f64>,
}

impl QuantileScale {
    pub fn new(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let bins = bins.max(1);
        let thresholds = if sorted.is_empty() {
            Vec::new()
        } else {
            (1..bins)
                .filter_map(|i| quantile_sorted(&sorted, i as f64 / bins as f64))
                .collect()
        };
        Self { thresholds }
    }

    /// Bin index in `0..bins`, or `None` when the scale saw no values.
    pub fn bin(&self, v: f64) -> Option<usize> {
        if self.thresholds.is_empty() || !v.is_finite() {
            return None;
        }
        Some(self.thresholds.partition_point(|t| *t <= v))
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len(), "{a:?} vs {b:?}");
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn map_and_invert_round_trip_pixels() {
        let s = LinearScale::new((0.0, 100.0), (40.0, 440.0));
        assert_eq!(s.map(50.0), 240.0);
        assert_eq!(s.invert(240.0), 50.0);
        let flipped = LinearScale::new((0.0, 10.0), (300.0, 0.0));
        assert_eq!(flipped.map(10.0), 0.0);
        assert_eq!(flipped.invert(150.0), 5.0);
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert_eq!(s.map(5.0), 50.0);
    }

    #[test]
    fn ticks_match_d3() {
        approx(&ticks(0.0, 1.0, 10.0), &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]);
        approx(&ticks(0.0, 10.0, 5.0), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        approx(&ticks(-10.0, 10.0, 4.0), &[-10.0, -5.0, 0.0, 5.0, 10.0]);
        approx(&ticks(1.0, 0.0, 5.0), &[1.0, 0.8, 0.6, 0.4, 0.2, 0.0]);
        approx(&ticks(3.0, 3.0, 10.0), &[3.0]);
    }

    #[test]
    fn nice_extends_to_round_values() {
        assert_eq!(nice((0.5, 9.5), 10.0), (0.0, 10.0));
        assert_eq!(nice((1.1, 10.9), 10.0), (1.0, 11.0));
        assert_eq!(nice((41.3, 83.7), 10.0), (40.0, 85.0));
        assert_eq!(nice((10.9, 1.1), 10.0), (11.0, 1.0));
    }

    #[test]
    fn quantile_bins_span_min_to_max() {
        let q = QuantileScale::new((1..=100).map(|v| v as f64), 10);
        assert_eq!(q.thresholds().len(), 9);
        assert_eq!(q.bin(1.0), Some(0));
        assert_eq!(q.bin(100.0), Some(9));
        assert_eq!(q.bin(50.0), Some(4));
        assert_eq!(q.bin(51.0), Some(5));
    }

    #[test]
    fn empty_quantile_scale_bins_nothing() {
        let q = QuantileScale::new(Vec::new(), 10);
        assert_eq!(q.bin(3.0), None);
    }

    #[test]
    fn r7_quantiles() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }
}
