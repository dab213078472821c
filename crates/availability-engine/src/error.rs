//! Error types for availability-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("Invalid day of week: {0}")]
    InvalidDayOfWeek(String),

    #[error("Invalid appointment status: {0}")]
    InvalidStatus(String),

    /// A rule that would be rejected at the authoring boundary.
    /// `rule_id` is `None` for rules the store has not yet assigned an id to.
    #[error("Invalid rule {}: {reason}", .rule_id.as_deref().unwrap_or("<new>"))]
    InvalidRule {
        rule_id: Option<String>,
        reason: String,
    },

    /// Wire rule carrying both or neither of `dayOfWeek` / `specificDate`.
    #[error("Rule scope must set exactly one of dayOfWeek or specificDate: {0}")]
    AmbiguousScope(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by an external rule or appointment source.
    #[error("Source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
