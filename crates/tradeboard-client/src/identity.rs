//! Vendor identity folding and territory lookup.
//!
//! Names typed into the vendor sheet drift in case, accents and spacing
//! ("Márcia", "marcia ", "MARCIA"). [`normalize`] folds them onto a single
//! lookup key, and [`TerritoryMap`] maps `(team, key)` to the area label the
//! program assigns to that salesperson.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::Team;

/// Label returned when a vendor has no territory entry.
pub const UNRESOLVED_AREA: &str = "Área ?";

/// Lowercases, trims, strips diacritics and collapses whitespace runs.
pub fn normalize(name: &str) -> String {
    let folded = name
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|character| !is_combining_mark(*character))
        .collect::<String>();

    folded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

const PROGRAM_TERRITORIES: [(Team, &str, &str); 13] = [
    (Team::Manoel, "eduardo", "Área 1"),
    (Team::Manoel, "joaquim b.", "Área 2"),
    (Team::Manoel, "joaquim b", "Área 2"),
    (Team::Manoel, "dorivan", "Área 3"),
    (Team::Manoel, "márcia", "Área 4"),
    (Team::Manoel, "marcia", "Área 4"),
    (Team::Manoel, "joaquim jr", "Área 5"),
    (Team::Manoel, "joaquim j.r", "Área 5"),
    (Team::Wellington, "jocimar", "Área 1"),
    (Team::Wellington, "josé neto", "Área 2"),
    (Team::Wellington, "jose neto", "Área 2"),
    (Team::Wellington, "felipe", "Área 3"),
    (Team::Wellington, "thayna", "Área 4"),
];

/// Immutable team → normalized name → area table.
#[derive(Debug, Clone, Default)]
pub struct TerritoryMap {
    by_team: HashMap<Team, HashMap<String, String>>,
}

impl TerritoryMap {
    /// Builds a map from raw entries. Names are normalized on the way in, so
    /// accented and unaccented spellings of a key collapse onto one entry.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Team, &'a str, &'a str)>,
    {
        let mut by_team: HashMap<Team, HashMap<String, String>> = HashMap::new();
        for (team, name, area) in entries {
            by_team
                .entry(team)
                .or_default()
                .insert(normalize(name), area.to_string());
        }
        Self { by_team }
    }

    /// The territory assignments currently in force for the program.
    pub fn program_default() -> Self {
        Self::from_entries(PROGRAM_TERRITORIES)
    }

    /// Resolves an already-normalized name. Tries the name as given, then
    /// with periods removed ("joaquim b." vs "joaquim b"). Falls back to
    /// [`UNRESOLVED_AREA`].
    pub fn resolve(&self, team: Team, normalized_name: &str) -> String {
        let Some(names) = self.by_team.get(&team) else {
            return UNRESOLVED_AREA.to_string();
        };

        if let Some(area) = names.get(normalized_name) {
            return area.clone();
        }

        let without_periods = normalized_name.replace('.', "");
        names
            .get(&without_periods)
            .cloned()
            .unwrap_or_else(|| UNRESOLVED_AREA.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_team.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
