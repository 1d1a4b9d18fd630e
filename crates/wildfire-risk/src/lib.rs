//! Wildfire risk scoring for a geographic point and its blending into an
//! AI-generated multi-hazard property report.

pub mod assessment;
pub mod config;
pub mod error;
pub mod geocode;
pub mod indicators;
pub mod report;
pub mod scoring;
pub mod telemetry;
