//! Application configuration.
//!
//! Everything has a built-in default; `static/config.json` may override any
//! subset of fields at start-up.

use serde::Deserialize;

pub const CONFIG_URL: &str = "static/config.json";

/// Local storage keys.
pub const KEY_X_FIELD: &str = "wv_x_field";
pub const KEY_Y_FIELD: &str = "wv_y_field";
pub const KEY_CATEGORIES: &str = "wv_categories";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scatter_url: String,
    pub population_url: String,
    pub events_url: String,
    pub boundaries_url: String,
    pub default_x_field: String,
    pub default_y_field: String,
    /// Column treated as a discrete year axis.
    pub year_field: String,
    /// Column naming the entity behind each scatter point (tooltips).
    pub label_field: String,
    /// Always part of the playback sequence, even outside the data range.
    pub anchor_year: i32,
    pub playback_duration_ms: u32,
    /// Number of trailing years kept visible during playback.
    pub playback_window: u32,
    /// Opacity lost per year of age during playback.
    pub decay_rate: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub transition_ms: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scatter_url: "static/data/countries.csv".into(),
            population_url: "static/data/population.csv".into(),
            events_url: "static/data/disasters.csv".into(),
            boundaries_url: "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson".into(),
            default_x_field: "gdp_per_capita".into(),
            default_y_field: "life_expectancy".into(),
            year_field: "year".into(),
            label_field: "country".into(),
            anchor_year: 2024,
            playback_duration_ms: 15_000,
            playback_window: 5,
            decay_rate: 0.2,
            min_zoom: 1.0,
            max_zoom: 8.0,
            transition_ms: 750.0,
        }
    }
}

impl AppConfig {
    /// Parses a (possibly partial) JSON override.
    pub fn from_json(raw: &str) -> Result<Self, crate::error::LoadError> {
        Ok(serde_json::from_str(raw)?)
    }
}
