use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Year → zero-based month → record.
pub type IndicatorYears = BTreeMap<i32, BTreeMap<u8, IndicatorRecord>>;

/// One month of aggregate program scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub itb: u32,
    pub pdv: u32,
    pub fachada: u32,
    pub pitstop: u32,
    pub academia: u32,
    #[serde(default)]
    pub evolucao: String,
    #[serde(default)]
    pub real: u32,
    #[serde(default)]
    pub performance: f64,
}

impl IndicatorRecord {
    pub fn score(&self, key: IndicatorKey) -> u32 {
        match key {
            IndicatorKey::Itb => self.itb,
            IndicatorKey::Pdv => self.pdv,
            IndicatorKey::Fachada => self.fachada,
            IndicatorKey::Pitstop => self.pitstop,
            IndicatorKey::Academia => self.academia,
        }
    }

    pub fn set_score(&mut self, key: IndicatorKey, value: u32) {
        match key {
            IndicatorKey::Itb => self.itb = value,
            IndicatorKey::Pdv => self.pdv = value,
            IndicatorKey::Fachada => self.fachada = value,
            IndicatorKey::Pitstop => self.pitstop = value,
            IndicatorKey::Academia => self.academia = value,
        }
    }

    /// Sum of the five indicator scores.
    pub fn total(&self) -> u64 {
        IndicatorKey::ALL
            .iter()
            .map(|key| u64::from(self.score(*key)))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKey {
    Itb,
    Pdv,
    Fachada,
    Pitstop,
    Academia,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 5] = [
        IndicatorKey::Itb,
        IndicatorKey::Pdv,
        IndicatorKey::Fachada,
        IndicatorKey::Pitstop,
        IndicatorKey::Academia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Itb => "itb",
            Self::Pdv => "pdv",
            Self::Fachada => "fachada",
            Self::Pitstop => "pitstop",
            Self::Academia => "academia",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == lowered.as_str())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Itb => "ITB",
            Self::Pdv => "PDV de Sucesso",
            Self::Fachada => "Fachada",
            Self::Pitstop => "PitStop",
            Self::Academia => "Academia Moura",
        }
    }

    pub fn target(&self) -> u32 {
        match self {
            Self::Itb => 20,
            Self::Pdv => 25,
            Self::Fachada => 20,
            Self::Pitstop => 15,
            Self::Academia => 20,
        }
    }
}

/// Sales team. The program has exactly two.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Team {
    Manoel,
    Wellington,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Manoel, Team::Wellington];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manoel => "Manoel",
            Self::Wellington => "Wellington",
        }
    }

    /// Exact, case-sensitive match against the team literal.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|team| team.as_str() == value)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MetaReal {
    pub meta: u32,
    pub real: u32,
}

impl MetaReal {
    pub fn new(meta: u32, real: u32) -> Self {
        Self { meta, real }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub name: String,
    pub team: Team,
    pub area: String,
    pub month: u8,
    pub year: i32,
    pub pdv: MetaReal,
    pub fachadas: MetaReal,
    #[serde(rename = "pitStop")]
    pub pit_stop: MetaReal,
    pub academia: MetaReal,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VendorMetric {
    Pdv,
    Fachadas,
    PitStop,
    Academia,
}

impl VendorMetric {
    pub const ALL: [VendorMetric; 4] = [
        VendorMetric::Pdv,
        VendorMetric::Fachadas,
        VendorMetric::PitStop,
        VendorMetric::Academia,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdv => "PDV",
            Self::Fachadas => "Fachadas",
            Self::PitStop => "PitStop",
            Self::Academia => "Academia",
        }
    }
}

impl VendorRecord {
    pub fn metric(&self, metric: VendorMetric) -> MetaReal {
        match metric {
            VendorMetric::Pdv => self.pdv,
            VendorMetric::Fachadas => self.fachadas,
            VendorMetric::PitStop => self.pit_stop,
            VendorMetric::Academia => self.academia,
        }
    }
}
