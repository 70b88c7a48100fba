//! Text boundaries between the engine and its consumers.

/// CSV line protocol for flow records.
pub mod flow_csv;
