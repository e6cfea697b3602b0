//! Core engine — the fetch → extract → merge → save pass.

pub mod merger;
pub mod runner;
