//! Shielded Pool Tracker
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod source;
pub mod extractor;
pub mod engine;
pub mod storage;
pub mod fmt;
