//! Derived-table builders. Each exposes a pure function over fetched
//! series plus an async entry point that pulls its inputs through the cache.

pub mod generation_mix;
pub mod intensity;
pub mod retail_sales;

pub use generation_mix::{cumulative_shares, generation_mix, variance_order};
pub use intensity::{intensity_history, intensity_table};
pub use retail_sales::{consumption_history, month_band, seasonal_bands, MonthBand};
