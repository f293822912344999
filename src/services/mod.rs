pub mod achievement;
pub mod aggregator;
pub mod categorizer;
pub mod dedup;
pub mod reports;
pub mod scope;
pub mod targets;
