//! Year-indexed choropleth: region lookup, decile binning and fills.

use crate::geo::Region;
use crate::model::Dataset;
use crate::scale::QuantileScale;
use crate::util::format_value;
use std::collections::HashMap;

pub const COL_CODE: &str = "country_code";
pub const COL_NAME: &str = "country_name";
pub const COL_YEAR: &str = "year";
pub const COL_VALUE: &str = "population";

pub const BINS: usize = 10;
pub const PALETTE: [&str; BINS] = [
    "#fff5eb", "#fee6ce", "#fdd0a2", "#fdae6b", "#fd8d3c",
    "#f16913", "#d94801", "#a63603", "#7f2704", "#4a1702",
];
pub const NO_DATA_FILL: &str = "#2d333b";

/// Boundary-file codes that differ from the tabular source's codes.
pub const CODE_ALIASES: &[(&str, &str)] = &[
    ("KOS", "XKX"),
    ("SDS", "SSD"),
    ("PSX", "PSE"),
    ("SAH", "ESH"),
    ("ALD", "ALA"),
];

/// Trimmed, uppercased three-letter code, or `None` for placeholders like `-99`.
pub fn normalize_code(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.len() == 3 && t.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(t.to_ascii_uppercase())
    } else {
        None
    }
}

/// Normalised code with the alias table applied.
pub fn canonical_code(raw: &str) -> Option<String> {
    let code = normalize_code(raw)?;
    Some(
        CODE_ALIASES
            .iter()
            .find(|(from, _)| *from == code)
            .map(|(_, to)| to.to_string())
            .unwrap_or(code),
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct Choropleth {
    pub year: i32,
    by_code: HashMap<String, f64>,
    by_name: HashMap<String, f64>,
    scale: QuantileScale,
}

impl Choropleth {
    pub fn for_year(ds: &Dataset, year: i32) -> Self {
        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();
        // Every accepted row feeds the bins, whether or not its code resolves.
        let mut values = Vec::new();
        let cols = (ds.column(COL_YEAR), ds.column(COL_VALUE));
        if let (Some(year_col), Some(value_col)) = cols {
            let code_col = ds.column(COL_CODE);
            let name_col = ds.column(COL_NAME);
            for r in ds.records.iter().filter(|r| r.year(year_col) == Some(year)) {
                let Some(v) = r.number(value_col).filter(|v| *v >= 0.0) else {
                    continue;
                };
                values.push(v);
                if let Some(code) = code_col.and_then(|c| r.get(c)).and_then(canonical_code) {
                    by_code.insert(code, v);
                }
                if let Some(name) = name_col.and_then(|c| r.get(c)).filter(|n| !n.is_empty()) {
                    by_name.insert(name.to_lowercase(), v);
                }
            }
        }
        let scale = QuantileScale::new(values, BINS);
        Self { year, by_code, by_name, scale }
    }

    #[cfg(test)]
    pub fn lookup_code(&self, code: &str) -> Option<f64> {
        self.by_code.get(&canonical_code(code)?).copied()
    }

    /// Value for a boundary region: first valid code, then a case-insensitive name match.
    pub fn resolve(&self, region: &Region) -> Option<f64> {
        let by_code = region
            .codes
            .iter()
            .find_map(|c| canonical_code(c))
            .and_then(|code| self.by_code.get(&code).copied());
        by_code.or_else(|| {
            region
                .name
                .as_ref()
                .and_then(|n| self.by_name.get(&n.to_lowercase()).copied())
        })
    }

    pub fn bin(&self, v: f64) -> Option<usize> {
        self.scale.bin(v)
    }

    pub fn fill_for(&self, value: Option<f64>) -> &'static str {
        value
            .and_then(|v| self.bin(v))
            .map(|b| PALETTE[b.min(BINS - 1)])
            .unwrap_or(NO_DATA_FILL)
    }

    pub fn fill(&self, region: &Region) -> &'static str {
        self.fill_for(self.resolve(region))
    }

    /// Legend rows: palette colour with the bin's lower bound (`None` for the first bin).
    pub fn legend(&self) -> Vec<(&'static str, Option<f64>)> {
        if self.scale.thresholds().is_empty() {
            return Vec::new();
        }
        PALETTE
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, i.checked_sub(1).and_then(|j| self.scale.thresholds().get(j).copied())))
            .collect()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty() && self.by_name.is_empty()
    }

    /// Tooltip text for a hovered region.
    pub fn describe(&self, region: &Region) -> String {
        let name = region
            .name
            .clone()
            .or_else(|| region.codes.iter().find_map(|c| normalize_code(c)))
            .unwrap_or_else(|| "Unknown".to_string());
        match self.resolve(region) {
            Some(v) => format!("{name}: {}", format_value(v)),
            None => format!("{name}: no data"),
        }
    }
}

/// Canonical code → region index, for placing code-only events.
pub fn code_index(regions: &[Region]) -> HashMap<String, usize> {
    let mut out = HashMap::new();
    for (i, r) in regions.iter().enumerate() {
        for code in r.codes.iter().filter_map(|c| canonical_code(c)) {
            out.entry(code).or_insert(i);
        }
    }
    out
}
