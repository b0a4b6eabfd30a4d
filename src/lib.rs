//! lichen-curator library
//!
//! SQLite data access and curation helpers for a taxonomic database of
//! lichens. The CLI binary is a thin layer over these modules.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial library structure

pub mod commands;
pub mod config;
pub mod db;
pub mod output;
pub mod taxa;
