use crate::models::TerritoryPath;

/// Active sales-force agent with their home sto.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesAgent {
    pub agent_code: String,
    pub agent_name: String,
    pub territory: TerritoryPath,
}
