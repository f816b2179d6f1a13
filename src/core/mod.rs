//! Core application primitives (query facade, HTTP surface)

pub mod http;
pub mod insights;

pub use http::*;
pub use insights::*;
