use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::TerritoryPath;

/// Funnel stage of a provisioning order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunnelStage {
    Registration,
    ProvisionIssued,
    ProvisionCompleted,
    ActivationCompleted,
    Fallout,
    Cancelled,
    Completed,
    Ps,
    Unknown,
}

impl FunnelStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "REGISTRATION",
            Self::ProvisionIssued => "PROVISION_ISSUED",
            Self::ProvisionCompleted => "PROVISION_COMPLETED",
            Self::ActivationCompleted => "ACTIVATION_COMPLETED",
            Self::Fallout => "FALLOUT",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::Ps => "PS",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Orders in a terminal stage are no longer work in progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Ps | Self::Cancelled)
    }

    /// Provisioning finished successfully.
    pub fn is_ps(&self) -> bool {
        matches!(self, Self::Completed | Self::Ps)
    }

    /// Stages reported in the in-flight funnel, in funnel order.
    pub fn in_flight() -> &'static [FunnelStage] {
        &[
            Self::Registration,
            Self::ProvisionIssued,
            Self::ProvisionCompleted,
            Self::ActivationCompleted,
            Self::Fallout,
        ]
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FunnelStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REGISTRATION" => Ok(Self::Registration),
            "PROVISION_ISSUED" => Ok(Self::ProvisionIssued),
            "PROVISION_COMPLETED" => Ok(Self::ProvisionCompleted),
            "ACTIVATION_COMPLETED" => Ok(Self::ActivationCompleted),
            "FALLOUT" => Ok(Self::Fallout),
            "CANCELLED" => Ok(Self::Cancelled),
            "COMPLETED" => Ok(Self::Completed),
            "PS" => Ok(Self::Ps),
            _ => Err(format!("Unknown funnel stage: {}", s)),
        }
    }
}

/// One order as read from a `sales_detail_YYYY_MM` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub service_id: String,
    pub stage: FunnelStage,
    pub channel: String,
    pub sales_agent: Option<String>,
    pub registered_at: NaiveDate,
    pub provision_start_at: Option<NaiveDate>,
    pub provision_completed_at: Option<NaiveDate>,
    pub fallout_category: Option<String>,
    pub fallout_subcategory: Option<String>,
    pub territory: TerritoryPath,
    pub odp_name: Option<String>,
    pub provisioning_days: Option<f64>,
}

impl OrderRecord {
    /// PS date, if the order completed provisioning.
    pub fn ps_date(&self) -> Option<NaiveDate> {
        if self.stage.is_ps() {
            self.provision_completed_at
        } else {
            None
        }
    }
}
