//! Data models: document types, records, reports, configuration and logs.

pub mod config;
pub mod document;
pub mod log;
pub mod record;
pub mod validation;
