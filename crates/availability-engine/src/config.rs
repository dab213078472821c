//! Engine configuration.
//!
//! Every field has a default, so `{}` is a valid configuration document.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};
use crate::occupancy::OccupancyPolicy;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;
pub const DEFAULT_BOOKING_HORIZON_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Which appointment statuses occupy a slot.
    pub occupancy_policy: OccupancyPolicy,
    /// How long a cached day schedule is served before it is recomputed.
    pub cache_ttl_secs: u64,
    /// How many days after today are offered for booking.
    pub booking_horizon_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            occupancy_policy: OccupancyPolicy::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            booking_horizon_days: DEFAULT_BOOKING_HORIZON_DAYS,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns `AvailabilityError::Json` for malformed JSON or unknown keys and
    /// `AvailabilityError::InvalidConfig` for a zero cache TTL.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        if config.cache_ttl_secs == 0 {
            return Err(AvailabilityError::InvalidConfig(
                "cacheTtlSecs must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
