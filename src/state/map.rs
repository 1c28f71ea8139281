//! Map view state: selected year, playback and category visibility.

use super::category::{CategoryToggles, EventCategory};
use super::choropleth::{self, Choropleth};
use super::overlay::{event_points, visible_points, EventPoint, OverlayMode};
use super::playback::{step_interval_ms, year_sequence, Playback};
use crate::config::AppConfig;
use crate::model::Dataset;
use std::rc::Rc;
use yew::Reducible;

#[derive(Clone, Debug, PartialEq)]
pub struct MapState {
    pub population: Rc<Dataset>,
    pub events: Rc<Vec<EventPoint>>,
    pub playback: Playback,
    pub toggles: CategoryToggles,
    window: u32,
    decay: f64,
    step_ms: u32,
    pub version: u64,
}

impl MapState {
    pub fn new(population: Rc<Dataset>, events: &Dataset, toggles: CategoryToggles, cfg: &AppConfig) -> Self {
        let events = event_points(events);
        let pop_years = population.distinct_years(choropleth::COL_YEAR);
        let event_years: Vec<i32> = events.iter().map(|e| e.year).collect();
        let years = year_sequence(&[&pop_years, &event_years], cfg.anchor_year);
        // Open on the most recent year that has choropleth data.
        let initial = pop_years.last().copied().unwrap_or(cfg.anchor_year);
        let step_ms = step_interval_ms(cfg.playback_duration_ms, years.len());
        Self {
            population,
            events: Rc::new(events),
            playback: Playback::new(years, initial),
            toggles,
            window: cfg.playback_window,
            decay: cfg.decay_rate,
            step_ms,
            version: 0,
        }
    }

    pub fn year(&self) -> i32 {
        self.playback.year().unwrap_or_default()
    }

    pub fn step_ms(&self) -> u32 {
        self.step_ms
    }

    pub fn mode(&self) -> OverlayMode {
        if self.playback.is_playing() {
            OverlayMode::Playback { window: self.window, decay: self.decay }
        } else {
            OverlayMode::Steady
        }
    }

    pub fn choropleth(&self) -> Choropleth {
        Choropleth::for_year(&self.population, self.year())
    }

    pub fn visible_events(&self) -> Vec<(&EventPoint, f64)> {
        visible_points(&self.events, self.year(), self.mode(), &self.toggles)
    }
}

#[derive(Clone, Debug)]
pub enum MapAction {
    TogglePlay,
    Tick,
    SelectIndex(usize),
    ToggleCategory(EventCategory),
}

impl Reducible for MapState {
    type Action = MapAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            MapAction::TogglePlay => {
                if new.playback.is_playing() {
                    new.playback.pause();
                } else if !new.playback.play() {
                    return self;
                }
            }
            MapAction::Tick => {
                if !new.playback.is_playing() {
                    return self;
                }
                new.playback.tick();
            }
            MapAction::SelectIndex(i) => {
                if new.playback.is_playing() || i == new.playback.index() {
                    return self;
                }
                new.playback.select_index(i);
            }
            MapAction::ToggleCategory(c) => new.toggles.toggle(c),
        }
        new.version = new.version.wrapping_add(1);
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POP: &str = "country_code,country_name,year,population\n\
                       FRA,France,2018,66900000\n\
                       FRA,France,2019,67000000\n\
                       DEU,Germany,2019,83000000\n";
    const EVENTS: &str = "year,disaster_type,country_code,location,latitude,longitude\n\
                          2017,Flood,FRA,Paris,48.8,2.3\n\
                          2019,Storm,DEU,Hamburg,53.5,10.0\n\
                          2019,Flood,FRA,Nice,43.7,7.2\n";

    fn state() -> Rc<MapState> {
        Rc::new(MapState::new(
            Rc::new(Dataset::from_csv(POP).unwrap()),
            &Dataset::from_csv(EVENTS).unwrap(),
            CategoryToggles::default(),
            &AppConfig::default(),
        ))
    }

    #[test]
    fn years_union_both_sources_and_anchor() {
        let s = state();
        assert_eq!(s.playback.years(), &[2017, 2018, 2019, 2024]);
        assert_eq!(s.year(), 2019);
        assert_eq!(s.step_ms(), 3750);
    }

    #[test]
    fn playback_runs_to_the_end_and_stops() {
        let mut s = state().reduce(MapAction::SelectIndex(0)).reduce(MapAction::TogglePlay);
        assert!(s.playback.is_playing());
        assert!(matches!(s.mode(), OverlayMode::Playback { .. }));
        for _ in 0..5 {
            s = s.reduce(MapAction::Tick);
        }
        assert_eq!(s.year(), 2024);
        assert!(!s.playback.is_playing());
        assert_eq!(s.mode(), OverlayMode::Steady);
    }

    #[test]
    fn slider_does_nothing_while_playing() {
        let s = state().reduce(MapAction::SelectIndex(0)).reduce(MapAction::TogglePlay);
        let same = s.clone().reduce(MapAction::SelectIndex(2));
        assert!(Rc::ptr_eq(&s, &same));
    }

    #[test]
    fn steady_overlay_and_category_toggle() {
        let s = state();
        assert_eq!(s.visible_events().len(), 2);
        let s = s.reduce(MapAction::ToggleCategory(EventCategory::Flood));
        let shown = s.visible_events();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0.category, EventCategory::Storm);
    }

    #[test]
    fn choropleth_follows_selected_year() {
        let s = state();
        assert_eq!(s.choropleth().lookup_code("DEU"), Some(83_000_000.0));
        let s = s.reduce(MapAction::SelectIndex(1));
        assert_eq!(s.year(), 2018);
        assert_eq!(s.choropleth().lookup_code("DEU"), None);
    }
}
