//! Event categories: keyword classification, palette and visibility toggles.

use crate::config::KEY_CATEGORIES;
use crate::storage::KeyValueStore;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventCategory {
    Earthquake,
    Flood,
    Storm,
    MassMovement,
    Volcanic,
    Drought,
    Wildfire,
    ExtremeTemperature,
    /// Anything no rule matched.
    Other,
}

/// Classification rules in priority order; the first rule with a keyword
/// contained in the (lowercased) text wins.
pub const RULES: &[(&[&str], EventCategory)] = &[
    (&["earthquake", "seismic", "tsunami"], EventCategory::Earthquake),
    (&["flood", "inundation"], EventCategory::Flood),
    (&["storm", "cyclone", "hurricane", "typhoon", "tornado"], EventCategory::Storm),
    (&["mass movement", "landslide", "avalanche", "mudslide"], EventCategory::MassMovement),
    (&["volcan", "eruption"], EventCategory::Volcanic),
    (&["drought"], EventCategory::Drought),
    (&["wildfire", "fire"], EventCategory::Wildfire),
    (&["extreme temperature", "heat wave", "cold wave", "heatwave"], EventCategory::ExtremeTemperature),
];

impl EventCategory {
    pub const ALL: [EventCategory; 9] = [
        EventCategory::Earthquake,
        EventCategory::Flood,
        EventCategory::Storm,
        EventCategory::MassMovement,
        EventCategory::Volcanic,
        EventCategory::Drought,
        EventCategory::Wildfire,
        EventCategory::ExtremeTemperature,
        EventCategory::Other,
    ];

    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, c)| *c)
            .unwrap_or(EventCategory::Other)
    }

    pub fn slug(self) -> &'static str {
        match self {
            EventCategory::Earthquake => "earthquake",
            EventCategory::Flood => "flood",
            EventCategory::Storm => "storm",
            EventCategory::MassMovement => "mass_movement",
            EventCategory::Volcanic => "volcanic",
            EventCategory::Drought => "drought",
            EventCategory::Wildfire => "wildfire",
            EventCategory::ExtremeTemperature => "extreme_temperature",
            EventCategory::Other => "other",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Earthquake => "Earthquake",
            EventCategory::Flood => "Flood",
            EventCategory::Storm => "Storm",
            EventCategory::MassMovement => "Mass movement",
            EventCategory::Volcanic => "Volcanic activity",
            EventCategory::Drought => "Drought",
            EventCategory::Wildfire => "Wildfire",
            EventCategory::ExtremeTemperature => "Extreme temperature",
            EventCategory::Other => "Other / unknown",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            EventCategory::Earthquake => "#f0883e",
            EventCategory::Flood => "#58a6ff",
            EventCategory::Storm => "#a371f7",
            EventCategory::MassMovement => "#a5673f",
            EventCategory::Volcanic => "#f85149",
            EventCategory::Drought => "#d29922",
            EventCategory::Wildfire => "#ff7b72",
            EventCategory::ExtremeTemperature => "#db61a2",
            EventCategory::Other => "#8b949e",
        }
    }
}

/// Per-category visibility. Every category is visible unless switched off.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryToggles {
    hidden: BTreeSet<EventCategory>,
}

impl CategoryToggles {
    pub fn is_visible(&self, c: EventCategory) -> bool {
        !self.hidden.contains(&c)
    }

    pub fn set_visible(&mut self, c: EventCategory, visible: bool) {
        if visible {
            self.hidden.remove(&c);
        } else {
            self.hidden.insert(c);
        }
    }

    pub fn toggle(&mut self, c: EventCategory) {
        let v = self.is_visible(c);
        self.set_visible(c, !v);
    }

    /// Restores toggles from the store. Unknown slugs and non-boolean values
    /// are ignored; unreadable JSON yields the defaults.
    pub fn restore(store: &dyn KeyValueStore) -> Self {
        let mut out = Self::default();
        let Some(raw) = store.get(KEY_CATEGORIES) else {
            return out;
        };
        let Ok(map) = serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) else {
            crate::util::clog("stored category toggles unreadable; using defaults");
            return out;
        };
        for (slug, v) in map {
            if let (Some(c), Some(visible)) = (EventCategory::from_slug(&slug), v.as_bool()) {
                out.set_visible(c, visible);
            }
        }
        out
    }

    pub fn persist(&self, store: &dyn KeyValueStore) {
        let map: BTreeMap<&str, bool> =
            EventCategory::ALL.iter().map(|c| (c.slug(), self.is_visible(*c))).collect();
        if let Ok(s) = serde_json::to_string(&map) {
            store.set(KEY_CATEGORIES, &s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(EventCategory::classify("Flash Flood"), EventCategory::Flood);
        assert_eq!(EventCategory::classify("Tropical cyclone"), EventCategory::Storm);
        assert_eq!(EventCategory::classify("Landslide (wet)"), EventCategory::MassMovement);
        assert_eq!(EventCategory::classify("Volcanic activity"), EventCategory::Volcanic);
        assert_eq!(EventCategory::classify("Heat wave"), EventCategory::ExtremeTemperature);
        assert_eq!(EventCategory::classify("Glacial lake outburst"), EventCategory::Other);
        assert_eq!(EventCategory::classify(""), EventCategory::Other);
    }

    #[test]
    fn overlapping_keywords_resolve_by_rule_order() {
        assert_eq!(
            EventCategory::classify("Mass movement (dry) triggered by earthquake"),
            EventCategory::Earthquake
        );
    }

    #[test]
    fn slugs_round_trip() {
        for c in EventCategory::ALL {
            assert_eq!(EventCategory::from_slug(c.slug()), Some(c));
        }
        assert_eq!(EventCategory::from_slug("meteor"), None);
    }

    #[test]
    fn toggles_persist_and_restore() {
        let store = MemoryStore::default();
        let mut t = CategoryToggles::default();
        t.toggle(EventCategory::Storm);
        t.persist(&store);
        let back = CategoryToggles::restore(&store);
        assert!(!back.is_visible(EventCategory::Storm));
        assert!(back.is_visible(EventCategory::Flood));
        assert_eq!(back, t);
    }

    #[test]
    fn stale_or_invalid_entries_fall_back() {
        let store = MemoryStore::with(&[(KEY_CATEGORIES, r#"{"meteor": false, "flood": "no", "drought": false}"#)]);
        let t = CategoryToggles::restore(&store);
        assert!(t.is_visible(EventCategory::Flood));
        assert!(!t.is_visible(EventCategory::Drought));

        let broken = MemoryStore::with(&[(KEY_CATEGORIES, "not json")]);
        assert_eq!(CategoryToggles::restore(&broken), CategoryToggles::default());
    }
}
