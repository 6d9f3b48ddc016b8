//! # Film Scout
//!
//! Opponent tendency analytics over charted game film.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, plays, report statistics)
//! - **storage**: Play record store trait and the JSONL data lake
//! - **analytics**: Filtering, grouping and tendency report computation
//! - **api**: REST API endpoints
//! - **ingest**: Validated import of charted games and plays
//! - **config**: Configuration loading and validation

pub mod analytics;
pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
