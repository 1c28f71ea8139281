//! Tabular data model shared by both views.
//! Every source table is loaded as strings and coerced on use.

use crate::error::LoadError;
use std::collections::BTreeSet;
use std::rc::Rc;

/// One row of a source table. Values are indexed by the dataset's header.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub values: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Parses a cell as a finite number. Empty, textual and non-finite cells are absent.
pub fn parse_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a cell as a calendar year; accepts "1999" and "1999.0".
pub fn parse_year(raw: &str) -> Option<i32> {
    let v = parse_number(raw)?;
    if v.fract() != 0.0 || v.abs() > 1e6 {
        return None;
    }
    Some(v as i32)
}

impl Dataset {
    pub fn from_csv(text: &str) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            // Short rows are padded so every record has one value per header.
            let mut values: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            values.resize(headers.len(), String::new());
            records.push(Record { values });
        }
        Ok(Self { headers, records })
    }

    pub fn fields(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.column(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn value<'a>(&'a self, rec: &'a Record, field: &str) -> Option<&'a str> {
        self.column(field).and_then(|i| rec.get(i))
    }

    /// Fields with at least one finite numeric value, in header order.
    pub fn numeric_fields(&self) -> Vec<String> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(i, _)| self.records.iter().any(|r| r.number(*i).is_some()))
            .map(|(_, h)| h.clone())
            .collect()
    }

    /// Min/max over the finite values of a field.
    pub fn extent(&self, field: &str) -> Option<(f64, f64)> {
        let col = self.column(field)?;
        let mut out: Option<(f64, f64)> = None;
        for v in self.records.iter().filter_map(|r| r.number(col)) {
            out = Some(match out {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        out
    }

    pub fn distinct_years(&self, field: &str) -> Vec<i32> {
        let Some(col) = self.column(field) else {
            return Vec::new();
        };
        let set: BTreeSet<i32> = self.records.iter().filter_map(|r| r.year(col)).collect();
        set.into_iter().collect()
    }
}

impl Record {
    pub fn get(&self, col: usize) -> Option<&str> {
        self.values.get(col).map(|s| s.as_str())
    }

    pub fn number(&self, col: usize) -> Option<f64> {
        self.get(col).and_then(parse_number)
    }

    pub fn year(&self, col: usize) -> Option<i32> {
        self.get(col).and_then(parse_year)
    }
}

/// All sources the app has loaded. Map sources are empty on failure; the
/// scatter table keeps its error so only the scatter view reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct DataBundle {
    pub scatter: Result<Rc<Dataset>, String>,
    pub population: Rc<Dataset>,
    pub events: Rc<Dataset>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "country,year,gdp_per_capita,life_expectancy\n\
                       Chile,2000,5000,76.5\n\
                       Chile,2010,,79.1\n\
                       Peru,2010,abc,74.0\n\
                       Peru,2015\n";

    #[test]
    fn parses_headers_and_pads_short_rows() {
        let ds = Dataset::from_csv(CSV).unwrap();
        assert_eq!(ds.fields(), &["country", "year", "gdp_per_capita", "life_expectancy"]);
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.records[3].values.len(), 4);
        assert_eq!(ds.value(&ds.records[3], "life_expectancy"), Some(""));
    }

    #[test]
    fn unparseable_numbers_are_absent() {
        let ds = Dataset::from_csv(CSV).unwrap();
        let col = ds.column("gdp_per_capita").unwrap();
        assert_eq!(ds.records[0].number(col), Some(5000.0));
        assert_eq!(ds.records[1].number(col), None);
        assert_eq!(ds.records[2].number(col), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn numeric_fields_skip_text_columns() {
        let ds = Dataset::from_csv(CSV).unwrap();
        assert_eq!(ds.numeric_fields(), vec!["year", "gdp_per_capita", "life_expectancy"]);
    }

    #[test]
    fn extent_and_years() {
        let ds = Dataset::from_csv(CSV).unwrap();
        assert_eq!(ds.extent("life_expectancy"), Some((74.0, 79.1)));
        assert_eq!(ds.extent("gdp_per_capita"), Some((5000.0, 5000.0)));
        assert_eq!(ds.extent("missing"), None);
        assert_eq!(ds.distinct_years("year"), vec![2000, 2010, 2015]);
    }

    #[test]
    fn year_parsing_rejects_fractions() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("1999.0"), Some(1999));
        assert_eq!(parse_year("1999.5"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn missing_column_is_reported() {
        let ds = Dataset::from_csv(CSV).unwrap();
        assert!(matches!(ds.require("population"), Err(LoadError::MissingColumn(c)) if c == "population"));
    }
}
