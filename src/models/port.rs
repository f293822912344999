use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::TerritoryPath;

/// Traffic-light occupancy status of a distribution point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortStatus {
    Black,
    Red,
    Yellow,
    Green,
}

impl FromStr for PortStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            // Legacy inventory exports still emit BLACKSYSTEM.
            "BLACK" | "BLACKSYSTEM" => Ok(Self::Black),
            "RED" => Ok(Self::Red),
            "YELLOW" => Ok(Self::Yellow),
            "GREEN" => Ok(Self::Green),
            _ => Err(format!("Unknown port status: {}", s)),
        }
    }
}

/// One distribution point in the latest port inventory snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OdpPort {
    pub odp_name: String,
    pub territory: TerritoryPath,
    pub port_total: i64,
    pub port_used: i64,
    pub status: Option<PortStatus>,
}

/// Go-live registry entry for a distribution point.
#[derive(Debug, Clone, PartialEq)]
pub struct OdpGoLive {
    pub odp_name: String,
    pub territory: TerritoryPath,
    pub golive_date: Option<chrono::NaiveDate>,
    pub program_year: Option<i32>,
    pub port_capacity: i64,
}
