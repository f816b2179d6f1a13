//! Error types shared by the fetch, cache and query layers.
//!
//! `EnergyError` is `Clone` so that one fetch outcome can be handed to every
//! caller waiting on the same cache key.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnergyError {
    /// Network or HTTP failure reaching the remote source. Safe to retry.
    #[error("transport error fetching {series_id}: {message}")]
    Transport { series_id: String, message: String },

    /// A response arrived but carried no decodable series payload.
    #[error("malformed response for {series_id}: {reason}")]
    MalformedResponse { series_id: String, reason: String },

    /// The source has no dedicated series under this identifier.
    #[error("no series {series_id} at the remote source")]
    SeriesNotFound { series_id: String },

    #[error("unknown region code '{0}'")]
    UnknownRegion(String),

    #[error("unknown fuel code '{0}'")]
    UnknownFuel(String),

    #[error("invalid year window {start}..={end}")]
    InvalidWindow { start: i32, end: i32 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl EnergyError {
    pub fn transport(series_id: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            series_id: series_id.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed(series_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedResponse {
            series_id: series_id.into(),
            reason: reason.to_string(),
        }
    }

    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::SeriesNotFound { .. } => "series_not_found",
            Self::UnknownRegion(_) => "unknown_region",
            Self::UnknownFuel(_) => "unknown_fuel",
            Self::InvalidWindow { .. } => "invalid_window",
            Self::Config(_) => "config",
        }
    }

    /// True for the failure kinds that abort a query outright.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::MalformedResponse { .. })
    }
}

pub type Result<T> = std::result::Result<T, EnergyError>;
