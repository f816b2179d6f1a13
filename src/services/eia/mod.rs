//! EIA (U.S. Energy Information Administration) series source.

pub mod client;
pub mod messages;

pub use client::EiaClient;
pub use messages::{decode_series, parse_date_code, parse_value};
