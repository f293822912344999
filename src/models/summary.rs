use serde::Serialize;
use std::ops::AddAssign;

use crate::models::TerritoryPath;

/// Channel and package value marking an upstream roll-up row.
pub const ALL: &str = "ALL";

/// Additive facts carried by a summary snapshot row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryFacts {
    pub io: i64,
    pub re: i64,
    pub ps: i64,
    pub revenue: f64,
    pub subscribers: i64,
}

impl AddAssign for SummaryFacts {
    fn add_assign(&mut self, other: Self) {
        self.io += other.io;
        self.re += other.re;
        self.ps += other.ps;
        self.revenue += other.revenue;
        self.subscribers += other.subscribers;
    }
}

/// Summary facts for one sto (and channel, for breakdown reads) over a window.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub territory: TerritoryPath,
    pub channel: String,
    pub facts: SummaryFacts,
}

/// Which rows of a summary table a read may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySlice {
    /// Only `channel = 'ALL' AND package = 'ALL'`; never double counts.
    Total,
    /// Per-channel rows of the all-package roll-up.
    ByChannel,
}
