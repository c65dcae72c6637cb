//! Code-switching metrics engine
//!
//! Computes statistical measures over an ordered sequence of per-token
//! language tags: integration indices (M-index, I-index, CMI), span
//! statistics (burstiness, memory), entropies and switch tables.
//!
//! The engine is pure: every metric takes the tag sequence and an
//! immutable [`config::EngineConfig`], and returns a
//! [`error::MetricResult`]. The [`corpus`], [`batch`] and [`reporters`]
//! modules wrap it for command-line use.

pub mod batch;
pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod models;
pub mod reporters;
pub mod segment;
