pub mod agent;
pub mod kpi;
pub mod order;
pub mod port;
pub mod summary;
pub mod target;
pub mod territory;

pub use agent::SalesAgent;
pub use kpi::KpiResponse;
pub use order::{FunnelStage, OrderRecord};
pub use port::{OdpGoLive, OdpPort, PortStatus};
pub use summary::{SummaryFacts, SummaryRow, SummarySlice};
pub use target::{TargetRecord, TargetValues};
pub use territory::{TerritoryLevel, TerritoryNode, TerritoryPath};
