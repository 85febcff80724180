//! Number frequency service.
//!
//! Accepts free-form text or an uploaded PNG/JPEG, extracts every run of
//! decimal digits, and returns how often each one occurs.

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod ocr;
pub mod tally;
