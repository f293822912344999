use serde::Serialize;

use crate::models::TerritoryPath;

/// Monthly targets for one sto. Any family may be missing upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetValues {
    pub all_sales: Option<f64>,
    pub demand: Option<f64>,
    pub revenue: Option<f64>,
    pub ps_grapari: Option<f64>,
    pub ps_digital: Option<f64>,
    pub ps_community: Option<f64>,
    pub ps_agency: Option<f64>,
}

impl TargetValues {
    /// Sum two target sets; a family stays `None` only if both sides lack it.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            all_sales: sum_opt(self.all_sales, other.all_sales),
            demand: sum_opt(self.demand, other.demand),
            revenue: sum_opt(self.revenue, other.revenue),
            ps_grapari: sum_opt(self.ps_grapari, other.ps_grapari),
            ps_digital: sum_opt(self.ps_digital, other.ps_digital),
            ps_community: sum_opt(self.ps_community, other.ps_community),
            ps_agency: sum_opt(self.ps_agency, other.ps_agency),
        }
    }
}

fn sum_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + y),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// A `household_targets` row joined to the territory table.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    pub periode: String,
    pub territory: TerritoryPath,
    pub values: TargetValues,
}
