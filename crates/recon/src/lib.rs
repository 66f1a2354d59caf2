//! `logirecon-recon`: shipment/sales reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns aggregated results.
//! No CLI or file IO dependencies.

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod table;

pub use config::ReconConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{ManagerSummary, ReconResult, RunStats, ShipmentAggregate, SummaryTotals};
pub use table::{Cell, Table, TableRole};
