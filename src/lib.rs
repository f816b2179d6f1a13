//! State-level U.S. energy statistics: cached retrieval of EIA series and
//! the derived consumption-band, generation-mix and intensity tables.

pub mod aggregators;
pub mod cache;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

pub use crate::core::insights::EnergyInsights;
pub use crate::error::{EnergyError, Result};
