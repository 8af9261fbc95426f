//! examlens-core — Insight extraction, snapshot joins, and cohort statistics.
//!
//! This crate turns the free-text insight fields of four tabular record
//! collections into structured per-student and per-cohort insight objects.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod report;
pub mod repository;
pub mod statistics;
