//! `residesk-recon` — Residual vs wireline billing reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded feed rows, returns grouped,
//! matched, totaled results. No CLI dependencies; the only IO helpers are
//! the CSV/TOML loaders consumed by callers that already hold the bytes.

pub mod aggregate;
pub mod amount;
pub mod comp;
pub mod config;
pub mod engine;
pub mod error;
pub mod group;
pub mod key;
pub mod matcher;
pub mod model;

pub use comp::{calculate_expected_comp, CompInput, CompResult, RevenueType};
pub use config::ReconConfig;
pub use engine::{combine_residual_data, run};
pub use error::ReconError;
pub use model::{AccountGroup, ReconInput, ReconResult, ResidualRow, TableRecord, WirelineRow};
