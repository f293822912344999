pub mod agents;
pub mod orders;
pub mod ports;
pub mod summary;
pub mod targets;
pub mod territories;
