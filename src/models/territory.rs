use serde::{Deserialize, Serialize};
use std::fmt;

/// Levels of the territory tree, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerritoryLevel {
    Regional,
    Branch,
    Wok,
    Sto,
}

impl TerritoryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regional => "regional",
            Self::Branch => "branch",
            Self::Wok => "wok",
            Self::Sto => "sto",
        }
    }

    pub fn child(&self) -> Option<Self> {
        match self {
            Self::Regional => Some(Self::Branch),
            Self::Branch => Some(Self::Wok),
            Self::Wok => Some(Self::Sto),
            Self::Sto => None,
        }
    }
}

impl fmt::Display for TerritoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a fact sits in the hierarchy. Every warehouse row carries one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TerritoryPath {
    pub regional: String,
    pub branch: String,
    pub wok: String,
    pub sto: String,
}

impl TerritoryPath {
    pub fn new(regional: &str, branch: &str, wok: &str, sto: &str) -> Self {
        Self {
            regional: regional.into(),
            branch: branch.into(),
            wok: wok.into(),
            sto: sto.into(),
        }
    }

    pub fn name_at(&self, level: TerritoryLevel) -> &str {
        match level {
            TerritoryLevel::Regional => &self.regional,
            TerritoryLevel::Branch => &self.branch,
            TerritoryLevel::Wok => &self.wok,
            TerritoryLevel::Sto => &self.sto,
        }
    }
}

/// One row of a report: a named node at a given level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerritoryNode {
    pub level: TerritoryLevel,
    pub name: String,
}
