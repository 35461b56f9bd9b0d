//! Household financial health scoring.
//!
//! Transactions are decoded at the [`ingest`] boundary, grouped per family and
//! scored by the [`scoring::ScoringEngine`]. The remaining modules carry the
//! service plumbing shared with the HTTP front-end.

pub mod config;
pub mod error;
pub mod ingest;
pub mod scoring;
pub mod telemetry;
