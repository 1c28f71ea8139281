// Map pan/zoom camera: the current {x, y, k} transform plus drag bookkeeping.

/// Screen = content × k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, k: 1.0 }
    }
}

impl ZoomTransform {
    #[cfg(test)]
    pub fn apply(&self, (cx, cy): (f64, f64)) -> (f64, f64) {
        (cx * self.k + self.x, cy * self.k + self.y)
    }

    pub fn invert(&self, (sx, sy): (f64, f64)) -> (f64, f64) {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }
}

#[derive(Debug, Clone)]
pub struct MapCamera {
    pub transform: ZoomTransform,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub viewport: (f64, f64),
    pub panning: bool,
    pub last_x: f64,
    pub last_y: f64,
}

impl Default for MapCamera {
    fn default() -> Self {
        Self {
            transform: ZoomTransform::default(),
            min_zoom: 1.0,
            max_zoom: 8.0,
            viewport: (0.0, 0.0),
            panning: false,
            last_x: 0.0,
            last_y: 0.0,
        }
    }
}

impl MapCamera {
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self { min_zoom, max_zoom, ..Self::default() }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width.max(0.0), height.max(0.0));
        self.clamp();
    }

    /// Keeps content (the viewport-sized map at k = 1) covering the viewport.
    fn clamp(&mut self) {
        let t = &mut self.transform;
        t.k = t.k.clamp(self.min_zoom, self.max_zoom);
        let (w, h) = self.viewport;
        t.x = t.x.clamp((w * (1.0 - t.k)).min(0.0), 0.0);
        t.y = t.y.clamp((h * (1.0 - t.k)).min(0.0), 0.0);
    }

    /// Zooms by `factor` keeping the screen point `(fx, fy)` fixed.
    pub fn zoom_about(&mut self, factor: f64, fx: f64, fy: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (cx, cy) = self.transform.invert((fx, fy));
        let k = (self.transform.k * factor).clamp(self.min_zoom, self.max_zoom);
        self.transform = ZoomTransform { x: fx - cx * k, y: fy - cy * k, k };
        self.clamp();
    }

    pub fn zoom_center(&mut self, factor: f64) {
        let (w, h) = self.viewport;
        self.zoom_about(factor, w / 2.0, h / 2.0);
    }

    /// Wheel zoom; negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f64, fx: f64, fy: f64) {
        self.zoom_about((-delta_y * 0.002).exp(), fx, fy);
    }

    pub fn can_pan(&self) -> bool {
        self.transform.k > self.min_zoom
    }

    /// Starts a pointer drag; refused at minimum zoom.
    pub fn begin_pan(&mut self, x: f64, y: f64) -> bool {
        if !self.can_pan() {
            return false;
        }
        self.panning = true;
        self.last_x = x;
        self.last_y = y;
        true
    }

    pub fn pan_to(&mut self, x: f64, y: f64) {
        if !self.panning {
            return;
        }
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        self.last_x = x;
        self.last_y = y;
        self.pan_by(dx, dy);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform.x += dx;
        self.transform.y += dy;
        self.clamp();
    }

    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    pub fn reset(&mut self) {
        self.transform = ZoomTransform::default();
        self.panning = false;
        self.clamp();
    }
}
