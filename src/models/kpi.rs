//! Response rows returned by the `/household` endpoints.
//!
//! Percentages are pre-formatted strings such as `"87.50%"`; a `null` means
//! the denominator was missing or zero.

use serde::Serialize;

use crate::models::{FunnelStage, TerritoryNode};
use crate::services::categorizer::{ChannelGroup, DurationBucket, FalloutCategory, SfClass};

/// Envelope for every report: `{ "data": [...] }`.
#[derive(Debug, Clone, Serialize)]
pub struct KpiResponse<T> {
    pub data: Vec<T>,
}

impl<T> KpiResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// A metric over the current month and its comparison periods.
#[derive(Debug, Clone, Serialize)]
pub struct Trend<T> {
    pub mtd: T,
    pub m1: T,
    pub yoy: T,
    pub mom: Option<String>,
    pub yoy_growth: Option<String>,
}

/// Actual against target with run-rate projections.
#[derive(Debug, Clone, Serialize)]
pub struct Attainment {
    pub target: Option<f64>,
    pub actual: f64,
    pub achievement: Option<String>,
    pub run_rate_achievement: Option<String>,
    pub daily_target: Option<f64>,
    pub daily_actual: f64,
    pub required_daily: Option<f64>,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelAttainment {
    pub channel: ChannelGroup,
    pub actual: i64,
    pub target: Option<f64>,
    pub achievement: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IoRePsRow {
    #[serde(flatten)]
    pub node: TerritoryNode,
    pub io: Trend<i64>,
    pub re: Trend<i64>,
    pub ps: Trend<i64>,
    pub ps_ytd: i64,
    pub ps_ytd_prev: i64,
    pub ps_ytd_growth: Option<String>,
    pub re_to_io: Option<String>,
    pub ps_to_re: Option<String>,
    pub ps_attainment: Attainment,
    pub channels: Vec<ChannelAttainment>,
    pub greenfield: i64,
    pub brownfield: i64,
}

/// Distribution points of one occupancy status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBucket {
    pub odp: i64,
    pub port_total: i64,
    pub port_used: i64,
    pub occupancy: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBreakdown {
    pub black: StatusBucket,
    pub red: StatusBucket,
    pub yellow: StatusBucket,
    pub green: StatusBucket,
}

#[derive(Debug, Clone, Serialize)]
pub struct DemandsRow {
    #[serde(flatten)]
    pub node: TerritoryNode,
    pub odp_total: i64,
    pub port_total: i64,
    pub port_used: i64,
    pub port_available: i64,
    pub occupancy: Option<String>,
    pub status: StatusBreakdown,
    pub odp_golive_mtd: i64,
    pub deployed_ports: Trend<i64>,
    pub demand_attainment: Attainment,
}

#[derive(Debug, Clone, Serialize)]
pub struct SfClassCount {
    pub class: SfClass,
    pub agents: i64,
    pub share: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SfClassRow {
    #[serde(flatten)]
    pub node: TerritoryNode,
    pub agents: i64,
    pub classes: Vec<SfClassCount>,
    pub productive: i64,
    pub productivity: Option<String>,
    pub ps_mtd: i64,
    pub ps_per_agent: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueRow {
    #[serde(flatten)]
    pub node: TerritoryNode,
    pub revenue: Trend<f64>,
    pub revenue_ytd: f64,
    pub revenue_ytd_prev: f64,
    pub ytd_growth: Option<String>,
    pub revenue_qtd: f64,
    pub revenue_qtd_prev: f64,
    pub qoq: Option<String>,
    pub subscribers: Trend<i64>,
    pub arpu: Option<f64>,
    pub attainment: Attainment,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelRevenue {
    pub channel: ChannelGroup,
    pub mtd: f64,
    pub m1: f64,
    pub mom: Option<String>,
    pub share: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueChannelRow {
    #[serde(flatten)]
    pub node: TerritoryNode,
    pub total_mtd: f64,
    pub channels: Vec<ChannelRevenue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageCount {
    pub stage: FunnelStage,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryCount {
    pub subcategory: &'static str,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FalloutCategoryCount {
    pub category: FalloutCategory,
    pub total: i64,
    pub subcategories: Vec<SubcategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationCount {
    pub bucket: DurationBucket,
    pub count: i64,
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelRow {
    #[serde(flatten)]
    pub node: TerritoryNode,
    pub in_flight: i64,
    pub stages: Vec<StageCount>,
    pub fallout_total: i64,
    pub fallout: Vec<FalloutCategoryCount>,
    pub duration_known: i64,
    pub durations: Vec<DurationCount>,
}
