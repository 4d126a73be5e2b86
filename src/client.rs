//! SMARD client
//!
//! Glues the pieces together: pick the series' module identifiers and schema
//! from the catalog, fetch the raw CSV through a `RawSeriesSource`, and run
//! the parser over the body.
//!
//! # Example
//!
//! ```no_run
//! use chrono::{Local, TimeZone};
//! use smard_market_data::SmardClient;
//!
//! let client = SmardClient::new()?;
//! let from = Local.with_ymd_and_hms(2022, 9, 18, 0, 0, 0).unwrap();
//! let to = Local.with_ymd_and_hms(2022, 9, 18, 8, 0, 0).unwrap();
//!
//! for row in client.get_production_data(from, to)? {
//!     println!("{} biomass={} W", row.timestamp, row.biomass);
//! }
//! # Ok::<(), smard_market_data::SmardError>(())
//! ```

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::catalog::{Series, SeriesCatalog};
use crate::config::ClientConfig;
use crate::csv_parser::parse_series_csv;
use crate::error::{ApiError, Result};
use crate::request::{build_request_body, TimeRange};
use crate::types::{
    ConsumptionRow, ProductionForecastRow, ProductionRow, Record, SeriesRow, TimePoint,
};

/// Anything that can return the raw CSV body for a set of module identifiers
///
/// The HTTP implementation is `HttpSource`; closures with the same signature
/// also qualify, which keeps tests off the network.
pub trait RawSeriesSource {
    fn fetch_raw_series(&self, range: &TimeRange, module_ids: &[u32]) -> Result<String>;
}

impl<F> RawSeriesSource for F
where
    F: Fn(&TimeRange, &[u32]) -> Result<String>,
{
    fn fetch_raw_series(&self, range: &TimeRange, module_ids: &[u32]) -> Result<String> {
        self(range, module_ids)
    }
}

// ============================================================================
// HTTP Source
// ============================================================================

/// Blocking HTTP source posting to the SMARD download endpoint
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RawSeriesSource for HttpSource {
    /// POST the request form and return the body verbatim
    ///
    /// # Error Handling
    ///
    /// - Transport failure (DNS, TLS, timeout) → `ApiError::NetworkError`
    /// - Non-2xx status → `ApiError::HttpError` with the response body
    fn fetch_raw_series(&self, range: &TimeRange, module_ids: &[u32]) -> Result<String> {
        let request = build_request_body(range, module_ids);

        info!(
            endpoint = %self.endpoint,
            modules = module_ids.len(),
            from = %range.from(),
            to = %range.to(),
            "fetching SMARD market data"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| {
                ApiError::NetworkError(format!("POST {} failed: {}", self.endpoint, e))
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| {
            ApiError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "SMARD download failed");
            return Err(ApiError::HttpError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Series client over any `RawSeriesSource`
#[derive(Debug, Clone)]
pub struct SmardClient<S = HttpSource> {
    source: S,
    catalog: SeriesCatalog,
}

impl SmardClient<HttpSource> {
    /// Client for the public endpoint with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Client configured from `SMARD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(&ClientConfig::from_env()?)
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_source(HttpSource::new(config)?))
    }
}

impl<S: RawSeriesSource> SmardClient<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            catalog: SeriesCatalog::new(),
        }
    }

    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    /// Raw CSV body of `series` between `from` and `to`
    pub fn fetch_raw(&self, series: Series, from: TimePoint, to: TimePoint) -> Result<String> {
        let range = TimeRange::new(from, to)?;
        self.source
            .fetch_raw_series(&range, self.catalog.module_ids(series))
    }

    /// All decodable records of `series` between `from` and `to`
    ///
    /// Transport failures fail the whole call; undecodable lines are dropped
    /// and undecodable cells read `-1`.
    pub fn get_series(&self, series: Series, from: TimePoint, to: TimePoint) -> Result<Vec<Record>> {
        let body = self.fetch_raw(series, from, to)?;
        let records = parse_series_csv(&body, self.catalog.schema(series));

        info!(series = %series, records = records.len(), "decoded SMARD series");
        Ok(records)
    }

    /// Typed rows of the series belonging to `R`
    pub fn get_rows<R: SeriesRow>(&self, from: TimePoint, to: TimePoint) -> Result<Vec<R>> {
        Ok(self
            .get_series(R::SERIES, from, to)?
            .into_iter()
            .filter_map(R::from_record)
            .collect())
    }

    pub fn get_production_data(&self, from: TimePoint, to: TimePoint) -> Result<Vec<ProductionRow>> {
        self.get_rows(from, to)
    }

    pub fn get_production_forecast_data(
        &self,
        from: TimePoint,
        to: TimePoint,
    ) -> Result<Vec<ProductionForecastRow>> {
        self.get_rows(from, to)
    }

    pub fn get_consumption_data(
        &self,
        from: TimePoint,
        to: TimePoint,
    ) -> Result<Vec<ConsumptionRow>> {
        self.get_rows(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmardError;
    use chrono::{Local, TimeZone};
    use std::cell::RefCell;

    const CONSUMPTION_BODY: &str = "Datum;Uhrzeit;Netzlast [MWh];Residuallast [MWh];Pumpspeicher [MWh]\n\
                                    18.09.2022;07:30;11.012;4.100;-\n\
                                    18.09.2022;07:45;11.087;4.192;518\n";

    fn from() -> TimePoint {
        Local.with_ymd_and_hms(2022, 9, 18, 0, 0, 0).unwrap()
    }

    fn to() -> TimePoint {
        Local.with_ymd_and_hms(2022, 9, 18, 8, 0, 0).unwrap()
    }

    /// Source that records the module ids it was asked for
    struct RecordingSource {
        body: String,
        requested: RefCell<Vec<Vec<u32>>>,
    }

    impl RecordingSource {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl RawSeriesSource for RecordingSource {
        fn fetch_raw_series(&self, _range: &TimeRange, module_ids: &[u32]) -> Result<String> {
            self.requested.borrow_mut().push(module_ids.to_vec());
            Ok(self.body.clone())
        }
    }

    #[test]
    fn test_get_consumption_data() {
        let client = SmardClient::with_source(RecordingSource::new(CONSUMPTION_BODY));

        let rows = client.get_consumption_data(from(), to()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pumped_storage, -1);
        let last = rows.last().unwrap();
        assert_eq!(last.grid_load, 11_087_000_000);
        assert_eq!(last.residual_load, 4_192_000_000);
        assert_eq!(last.pumped_storage, 518_000_000);
    }

    #[test]
    fn test_requests_catalog_module_ids() {
        let client = SmardClient::with_source(RecordingSource::new(""));

        client.get_series(Series::Consumption, from(), to()).unwrap();
        client.get_production_data(from(), to()).unwrap();

        let requested = client.source.requested.borrow();
        assert_eq!(requested[0], vec![5000410, 5004387, 5004359]);
        assert_eq!(requested[1].len(), 12);
        assert_eq!(requested[1][0], 1001224);
    }

    #[test]
    fn test_closure_source_receives_range() {
        let source = |range: &TimeRange, _ids: &[u32]| -> Result<String> {
            assert_eq!(range.from(), from());
            assert_eq!(range.to(), to());
            Ok(CONSUMPTION_BODY.to_string())
        };
        let client = SmardClient::with_source(source);

        let records = client.get_series(Series::Consumption, from(), to()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.series() == Series::Consumption));
    }

    #[test]
    fn test_transport_error_propagates() {
        let source = |_: &TimeRange, _: &[u32]| -> Result<String> {
            Err(ApiError::NetworkError("connection reset".to_string()).into())
        };
        let client = SmardClient::with_source(source);

        let result = client.get_production_forecast_data(from(), to());
        assert!(matches!(
            result,
            Err(SmardError::Api(ApiError::NetworkError(_)))
        ));
    }

    #[test]
    fn test_reversed_range_rejected_before_fetch() {
        let client = SmardClient::with_source(RecordingSource::new(CONSUMPTION_BODY));

        let result = client.get_consumption_data(to(), from());

        assert!(matches!(
            result,
            Err(SmardError::Api(ApiError::InvalidTimeRange(_)))
        ));
        assert!(client.source.requested.borrow().is_empty());
    }

    #[test]
    fn test_wrong_schema_body_yields_sentinels_not_errors() {
        // A consumption body decoded as production keeps timestamps and
        // reads missing columns as -1
        let client = SmardClient::with_source(RecordingSource::new(CONSUMPTION_BODY));

        let rows = client.get_production_data(from(), to()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].biomass, 11_087_000_000);
        assert_eq!(rows[1].other_conventional, -1);
    }

    #[test]
    fn test_http_source_uses_config_endpoint() {
        let config = ClientConfig {
            endpoint: "http://127.0.0.1:9/download".to_string(),
            ..ClientConfig::default()
        };
        let source = HttpSource::new(&config).unwrap();
        assert_eq!(source.endpoint(), "http://127.0.0.1:9/download");
    }
}
