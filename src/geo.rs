//! Boundary geometry: GeoJSON decoding, projection to the viewport and
//! point-in-region hit testing.

use crate::error::LoadError;
use serde_json::Value;

/// Property names that conventionally carry a three-letter region code.
pub const CODE_PROPERTIES: [&str; 5] = ["ISO_A3", "ADM0_A3", "iso_a3", "ISO3", "id"];
pub const NAME_PROPERTIES: [&str; 3] = ["NAME", "ADMIN", "name"];

/// Longitude/latitude ring, degrees.
pub type Ring = Vec<(f64, f64)>;

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Raw code candidates in property priority order (unnormalised).
    pub codes: Vec<String>,
    pub name: Option<String>,
    /// Polygons, each an outer ring followed by holes.
    pub polygons: Vec<Vec<Ring>>,
}

pub fn parse_regions(raw: &str) -> Result<Vec<Region>, LoadError> {
    let doc: Value = serde_json::from_str(raw)?;
    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .map(|f| f.as_slice())
        .unwrap_or_default();
    let mut out = Vec::with_capacity(features.len());
    for f in features {
        let props = f.get("properties");
        let lookup = |key: &str| -> Option<String> {
            let v = props.and_then(|p| p.get(key)).or_else(|| (key == "id").then(|| f.get("id")).flatten())?;
            match v {
                Value::String(s) => Some(s.clone()),
                _ => None,
            }
        };
        let codes: Vec<String> = CODE_PROPERTIES.iter().filter_map(|k| lookup(*k)).collect();
        let name = NAME_PROPERTIES.iter().find_map(|k| lookup(*k));
        let polygons = f.get("geometry").map(parse_geometry).unwrap_or_default();
        if polygons.is_empty() {
            continue;
        }
        out.push(Region { codes, name, polygons });
    }
    if out.is_empty() {
        return Err(LoadError::EmptyGeometry);
    }
    Ok(out)
}

fn parse_ring(v: &Value) -> Ring {
    v.as_array()
        .map(|pts| {
            pts.iter()
                .filter_map(|p| {
                    let p = p.as_array()?;
                    Some((p.first()?.as_f64()?, p.get(1)?.as_f64()?))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_polygon(v: &Value) -> Vec<Ring> {
    v.as_array()
        .map(|rings| rings.iter().map(parse_ring).filter(|r| r.len() >= 3).collect())
        .unwrap_or_default()
}

fn parse_geometry(g: &Value) -> Vec<Vec<Ring>> {
    let coords = g.get("coordinates");
    match (g.get("type").and_then(Value::as_str), coords) {
        (Some("Polygon"), Some(c)) => {
            let p = parse_polygon(c);
            if p.is_empty() { Vec::new() } else { vec![p] }
        }
        (Some("MultiPolygon"), Some(Value::Array(polys))) => {
            polys.iter().map(parse_polygon).filter(|p| !p.is_empty()).collect()
        }
        _ => Vec::new(),
    }
}

/// Natural Earth I pseudo-cylindrical projection, fitted to a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

fn natural_earth_raw(lon: f64, lat: f64) -> (f64, f64) {
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda * (0.8707 - 0.131979 * phi2 + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, -y)
}

impl Projection {
    /// Fits the given regions into `width × height` with `pad` pixels of margin.
    pub fn fit(regions: &[Region], width: f64, height: f64, pad: f64) -> Self {
        let (mut x0, mut y0, mut x1, mut y1) = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in regions
            .iter()
            .flat_map(|r| r.polygons.iter())
            .flat_map(|p| p.first())
            .flat_map(|ring| ring.iter())
            .map(|&(lon, lat)| natural_earth_raw(lon, lat))
        {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        if !x0.is_finite() || x1 <= x0 || y1 <= y0 {
            return Self { scale: 1.0, tx: width / 2.0, ty: height / 2.0 };
        }
        let avail_w = (width - 2.0 * pad).max(1.0);
        let avail_h = (height - 2.0 * pad).max(1.0);
        let scale = (avail_w / (x1 - x0)).min(avail_h / (y1 - y0));
        let tx = (width - scale * (x0 + x1)) / 2.0;
        let ty = (height - scale * (y0 + y1)) / 2.0;
        Self { scale, tx, ty }
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = natural_earth_raw(lon, lat);
        (self.tx + self.scale * x, self.ty + self.scale * y)
    }
}

/// A region in un-zoomed viewport pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedRegion {
    pub region: usize,
    pub polygons: Vec<Vec<Vec<(f64, f64)>>>,
    pub bbox: (f64, f64, f64, f64),
}

impl ProjectedRegion {
    pub fn centroid(&self) -> (f64, f64) {
        // Largest outer ring's vertex mean; good enough for a marker.
        let largest = self
            .polygons
            .iter()
            .filter_map(|p| p.first())
            .max_by(|a, b| ring_area(a).total_cmp(&ring_area(b)));
        match largest {
            Some(ring) if !ring.is_empty() => {
                let n = ring.len() as f64;
                let (sx, sy) = ring.iter().fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
                (sx / n, sy / n)
            }
            _ => ((self.bbox.0 + self.bbox.2) / 2.0, (self.bbox.1 + self.bbox.3) / 2.0),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (x0, y0, x1, y1) = self.bbox;
        if x < x0 || x > x1 || y < y0 || y > y1 {
            return false;
        }
        self.polygons.iter().any(|poly| {
            let mut rings = poly.iter();
            match rings.next() {
                Some(outer) if ring_contains(outer, x, y) => !rings.any(|hole| ring_contains(hole, x, y)),
                _ => false,
            }
        })
    }
}

fn ring_area(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    let mut a = 0.0;
    for i in 0..n {
        let (x0, y0) = ring[i];
        let (x1, y1) = ring[(i + 1) % n];
        a += x0 * y1 - x1 * y0;
    }
    (a / 2.0).abs()
}

fn ring_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

pub fn project_regions(regions: &[Region], proj: &Projection) -> Vec<ProjectedRegion> {
    regions
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut bbox = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
            let polygons = r
                .polygons
                .iter()
                .map(|poly| {
                    poly.iter()
                        .map(|ring| {
                            ring.iter()
                                .map(|&(lon, lat)| {
                                    let (x, y) = proj.project(lon, lat);
                                    bbox = (bbox.0.min(x), bbox.1.min(y), bbox.2.max(x), bbox.3.max(y));
                                    (x, y)
                                })
                                .collect()
                        })
                        .collect()
                })
                .collect();
            ProjectedRegion { region: i, polygons, bbox }
        })
        .collect()
}

/// Index of the topmost region containing the content-space point.
pub fn region_at(projected: &[ProjectedRegion], x: f64, y: f64) -> Option<usize> {
    projected.iter().rev().find(|p| p.contains(x, y)).map(|p| p.region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GEO: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        { "type": "Feature", "properties": { "ISO_A3": "-99", "ADM0_A3": "FRA", "NAME": "France" },
          "geometry": { "type": "Polygon", "coordinates": [[[0,40],[10,40],[10,50],[0,50],[0,40]]] } },
        { "type": "Feature", "id": "CHL", "properties": { "name": "Chile" },
          "geometry": { "type": "MultiPolygon", "coordinates": [
            [[[-75,-50],[-70,-50],[-70,-20],[-75,-20],[-75,-50]]],
            [[[-80,-34],[-79,-34],[-79,-33],[-80,-34]]] ] } },
        { "type": "Feature", "properties": { "iso_a3": "XXX" }, "geometry": null }
      ]
    }"#;

    #[test]
    fn reads_codes_under_every_conventional_name() {
        let regions = parse_regions(GEO).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].codes, vec!["-99".to_string(), "FRA".to_string()]);
        assert_eq!(regions[0].name.as_deref(), Some("France"));
        assert_eq!(regions[1].codes, vec!["CHL".to_string()]);
        assert_eq!(regions[1].polygons.len(), 2);
    }

    #[test]
    fn empty_collection_is_an_error() {
        let err = parse_regions(r#"{"type":"FeatureCollection","features":[]}"#).unwrap_err();
        assert!(matches!(err, LoadError::EmptyGeometry));
    }

    #[test]
    fn fitted_projection_stays_inside_viewport() {
        let regions = parse_regions(GEO).unwrap();
        let proj = Projection::fit(&regions, 800.0, 400.0, 10.0);
        for p in project_regions(&regions, &proj) {
            assert!(p.bbox.0 >= 9.999 && p.bbox.2 <= 790.001, "{:?}", p.bbox);
            assert!(p.bbox.1 >= 9.999 && p.bbox.3 <= 390.001, "{:?}", p.bbox);
        }
    }

    #[test]
    fn north_is_up() {
        let proj = Projection { scale: 100.0, tx: 0.0, ty: 0.0 };
        let (_, y_north) = proj.project(0.0, 60.0);
        let (_, y_south) = proj.project(0.0, -60.0);
        assert!(y_north < y_south);
        assert_eq!(proj.project(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn hit_testing_respects_holes() {
        let square = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let hole = vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)];
        let r = ProjectedRegion { region: 0, polygons: vec![vec![square, hole]], bbox: (0.0, 0.0, 10.0, 10.0) };
        assert!(r.contains(2.0, 2.0));
        assert!(!r.contains(5.0, 5.0));
        assert!(!r.contains(12.0, 5.0));
        assert_eq!(r.centroid(), (5.0, 5.0));
        assert_eq!(region_at(&[r], 2.0, 2.0), Some(0));
    }

    #[test]
    fn region_lookup_by_content_point() {
        let regions = parse_regions(GEO).unwrap();
        let proj = Projection::fit(&regions, 800.0, 400.0, 10.0);
        let projected = project_regions(&regions, &proj);
        let (fx, fy) = proj.project(5.0, 45.0);
        assert_eq!(region_at(&projected, fx, fy), Some(0));
        let (cx, cy) = proj.project(-72.5, -35.0);
        assert_eq!(region_at(&projected, cx, cy), Some(1));
        let (ox, oy) = proj.project(-30.0, 0.0);
        assert_eq!(region_at(&projected, ox, oy), None);
    }
}
