// Touch/pinch gesture state for the map canvas.
#[derive(Default, Debug, Clone)]
pub struct TouchState {
    pub single_active: bool,
    pub pinch: bool,
    pub last_pinch_dist: f64,
}

impl TouchState {
    pub fn begin_single(&mut self) {
        self.single_active = true;
        self.pinch = false;
    }

    pub fn begin_pinch(&mut self, dist: f64) {
        self.pinch = true;
        self.single_active = false;
        self.last_pinch_dist = dist;
    }

    /// Incremental zoom factor since the previous pinch sample.
    pub fn pinch_factor(&mut self, dist: f64) -> Option<f64> {
        if !self.pinch || self.last_pinch_dist <= 0.0 || dist <= 0.0 {
            return None;
        }
        let f = dist / self.last_pinch_dist;
        self.last_pinch_dist = dist;
        Some(f)
    }

    pub fn end(&mut self, remaining: u32) {
        self.pinch = false;
        self.single_active = remaining == 1;
    }
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}
