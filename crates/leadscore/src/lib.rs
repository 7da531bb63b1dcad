//! Deterministic scoring and insights engine for institutional sales leads.
//!
//! The engine turns a lead plus its attached enrichment/engagement signals into a
//! transparent conversion prediction (probability, confidence, value tier, next
//! best action, named factors) and aggregates the current prediction set into a
//! dashboard summary. Scoring is a pure function of its inputs and the injected
//! configuration; the prediction store is the only shared mutable state.

pub mod config;
pub mod error;
pub mod import;
pub mod scoring;
pub mod telemetry;
