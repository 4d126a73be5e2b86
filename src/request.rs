//! Request building for the SMARD download endpoint
//!
//! Turns a time range and a set of module identifiers into the JSON payload
//! the `nip-download-manager` endpoint expects.
//!
//! # Payload
//!
//! ```json
//! {"request_form":[{"format":"CSV","language":"de","moduleIds":[5000410],
//!   "region":"de","timestamp_from":1663452000000,"timestamp_to":1663480800000,
//!   "type":"discrete"}]}
//! ```
//!
//! Language and region are fixed to `de`: the decoders only understand the
//! German number and date format.

use serde::Serialize;

use crate::error::ApiError;
use crate::transformations::to_epoch_millis;
use crate::types::TimePoint;

/// Response format requested from SMARD
pub const REQUEST_FORMAT: &str = "CSV";

/// Language of headers and number formatting
pub const REQUEST_LANGUAGE: &str = "de";

/// Market region
pub const REQUEST_REGION: &str = "de";

/// Resolution type; `discrete` returns the native quarter-hour values
pub const REQUEST_TYPE: &str = "discrete";

// ============================================================================
// Data Structures
// ============================================================================

/// Closed time range of a series request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    from: TimePoint,
    to: TimePoint,
}

impl TimeRange {
    /// Create a range, rejecting `from > to`
    ///
    /// # Example
    ///
    /// ```
    /// # use chrono::{Duration, Local};
    /// # use smard_market_data::request::TimeRange;
    /// let now = Local::now();
    /// assert!(TimeRange::new(now - Duration::hours(8), now).is_ok());
    /// assert!(TimeRange::new(now, now - Duration::hours(8)).is_err());
    /// ```
    pub fn new(from: TimePoint, to: TimePoint) -> Result<Self, ApiError> {
        if from > to {
            return Err(ApiError::InvalidTimeRange(format!(
                "start {} is after end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }

        Ok(Self { from, to })
    }

    pub fn from(&self) -> TimePoint {
        self.from
    }

    pub fn to(&self) -> TimePoint {
        self.to
    }
}

/// One entry of the `request_form` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestForm {
    pub format: String,
    pub language: String,
    #[serde(rename = "moduleIds")]
    pub module_ids: Vec<u32>,
    pub region: String,
    pub timestamp_from: i64,
    pub timestamp_to: i64,
    #[serde(rename = "type")]
    pub request_type: String,
}

/// Complete POST body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestBody {
    pub request_form: Vec<RequestForm>,
}

// ============================================================================
// Building
// ============================================================================

/// Build the POST body for `module_ids` over `range`
pub fn build_request_body(range: &TimeRange, module_ids: &[u32]) -> RequestBody {
    RequestBody {
        request_form: vec![RequestForm {
            format: REQUEST_FORMAT.to_string(),
            language: REQUEST_LANGUAGE.to_string(),
            module_ids: module_ids.to_vec(),
            region: REQUEST_REGION.to_string(),
            timestamp_from: to_epoch_millis(&range.from),
            timestamp_to: to_epoch_millis(&range.to),
            request_type: REQUEST_TYPE.to_string(),
        }],
    }
}
