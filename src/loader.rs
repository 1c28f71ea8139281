//! HTTP loading of configuration, tabular datasets and boundaries.

use crate::config::{AppConfig, CONFIG_URL};
use crate::error::LoadError;
use crate::geo::{parse_regions, Region};
use crate::model::{DataBundle, Dataset};
use crate::state::{choropleth, overlay};
use crate::util::{cerror, clog, cwarn};
use gloo_net::http::Request;
use std::rc::Rc;

pub async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let resp = Request::get(url).send().await.map_err(|e| LoadError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if !resp.ok() {
        return Err(LoadError::Status { url: url.to_string(), status: resp.status() });
    }
    resp.text().await.map_err(|e| LoadError::Network { url: url.to_string(), message: e.to_string() })
}

/// Built-in defaults, overridden by `static/config.json` when it loads.
pub fn config_from(fetched: Result<String, LoadError>) -> AppConfig {
    match fetched.and_then(|raw| AppConfig::from_json(&raw)) {
        Ok(cfg) => cfg,
        Err(e) => {
            clog(&format!("using default config ({e})"));
            AppConfig::default()
        }
    }
}

/// A source the views can live without: failures, including a missing
/// `required` column, become an empty dataset.
pub fn optional_dataset(label: &str, fetched: Result<String, LoadError>, required: &[&str]) -> Rc<Dataset> {
    let parsed = fetched.and_then(|raw| Dataset::from_csv(&raw)).and_then(|ds| {
        for col in required {
            ds.require(col)?;
        }
        Ok(ds)
    });
    match parsed {
        Ok(ds) => {
            clog(&format!("{label}: {} rows", ds.len()));
            Rc::new(ds)
        }
        Err(e) => {
            cwarn(&format!("{label} unavailable: {e}"));
            Rc::new(Dataset::default())
        }
    }
}

/// Assembles the sources independently: a scatter failure is kept for the
/// scatter view and never blocks the map tables.
pub fn bundle_from(
    scatter: Result<String, LoadError>,
    population: Result<String, LoadError>,
    events: Result<String, LoadError>,
) -> DataBundle {
    let scatter = match scatter.and_then(|raw| Dataset::from_csv(&raw)) {
        Ok(ds) => {
            clog(&format!("scatter: {} rows, fields {:?}", ds.len(), ds.fields()));
            Ok(Rc::new(ds))
        }
        Err(e) => {
            cerror(&format!("scatter data failed: {e}"));
            Err(e.to_string())
        }
    };
    DataBundle {
        scatter,
        population: optional_dataset(
            "population",
            population,
            &[choropleth::COL_CODE, choropleth::COL_YEAR, choropleth::COL_VALUE],
        ),
        events: optional_dataset("events", events, &[overlay::COL_YEAR, overlay::COL_CATEGORY]),
    }
}

pub async fn load_config() -> AppConfig {
    config_from(fetch_text(CONFIG_URL).await)
}

pub async fn load_bundle(cfg: &AppConfig) -> DataBundle {
    let scatter = fetch_text(&cfg.scatter_url).await;
    let population = fetch_text(&cfg.population_url).await;
    let events = fetch_text(&cfg.events_url).await;
    bundle_from(scatter, population, events)
}

pub async fn load_boundaries(cfg: &AppConfig) -> Result<Vec<Region>, LoadError> {
    let raw = fetch_text(&cfg.boundaries_url).await?;
    let regions = parse_regions(&raw)?;
    clog(&format!("boundaries: {} regions", regions.len()));
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn missing(url: &str) -> Result<String, LoadError> {
        Err(LoadError::Status { url: url.into(), status: 404 })
    }

    #[test]
    fn optional_sources_degrade_to_empty() {
        let b = bundle_from(Ok("country,year\nChile,2000\n".into()), missing("p.csv"), missing("e.csv"));
        assert_eq!(b.scatter.map(|ds| ds.len()), Ok(1));
        assert!(b.population.is_empty());
        assert!(b.events.is_empty());
    }

    #[test]
    fn map_tables_survive_a_scatter_failure() {
        let b = bundle_from(
            missing("countries.csv"),
            Ok("country_code,country_name,year,population\nFRA,France,2019,67000000\n".into()),
            Ok("year,disaster_type\n2019,Flood\n".into()),
        );
        assert_eq!(b.scatter, Err("countries.csv answered with HTTP 404".to_string()));
        assert_eq!(b.population.len(), 1);
        assert_eq!(b.events.len(), 1);
    }

    #[test]
    fn optional_source_without_key_columns_is_dropped() {
        let ds = optional_dataset("population", Ok("country_code,year\nFRA,2019\n".into()), &["country_code", "population"]);
        assert!(ds.is_empty());
        let ds = optional_dataset("population", Ok("country_code,year,population\nFRA,2019,67\n".into()), &["population"]);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn config_falls_back_on_bad_json() {
        assert_eq!(config_from(Ok("{ nope".into())), AppConfig::default());
        assert_eq!(config_from(missing(CONFIG_URL)), AppConfig::default());
        assert_eq!(config_from(Ok(r#"{"anchor_year": 2030}"#.into())).anchor_year, 2030);
    }
}
