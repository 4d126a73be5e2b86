//! Series catalog
//!
//! Static description of the three SMARD series this crate understands: which
//! module identifiers to request and at which column each quantity lands.
//!
//! Decoding is position-based. The field order of each schema must match the
//! column order SMARD emits for that set of module identifiers; the header
//! row is never consulted.
//!
//! # Example
//!
//! ```rust
//! use smard_market_data::catalog::{Field, Series, SeriesCatalog};
//!
//! let catalog = SeriesCatalog::new();
//! let schema = catalog.schema(Series::Consumption);
//!
//! assert_eq!(schema.len(), 3);
//! assert_eq!(schema.column_of(Field::GridLoad), Some(2));
//! assert_eq!(catalog.module_ids(Series::Consumption), &[5000410, 5004387, 5004359]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;

/// Column holding the `DD.MM.YYYY` date
pub const DATE_COLUMN: usize = 0;

/// Column holding the `HH:MM` time of day
pub const TIME_COLUMN: usize = 1;

/// First quantity column; schemas bind their fields from here on
pub const FIRST_VALUE_COLUMN: usize = 2;

/// Supported data series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Series {
    Production,
    ProductionForecast,
    Consumption,
}

impl Series {
    pub const ALL: [Series; 3] = [
        Series::Production,
        Series::ProductionForecast,
        Series::Consumption,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Series::Production => "production",
            Series::ProductionForecast => "production-forecast",
            Series::Consumption => "consumption",
        }
    }

    fn index(self) -> usize {
        match self {
            Series::Production => 0,
            Series::ProductionForecast => 1,
            Series::Consumption => 2,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Series {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "production" => Ok(Series::Production),
            "production-forecast" => Ok(Series::ProductionForecast),
            "consumption" => Ok(Series::Consumption),
            _ => Err(ParseError::UnknownSeries(s.to_string())),
        }
    }
}

/// Named quantity column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Biomass,
    Hydropower,
    WindOffshore,
    WindOnshore,
    Photovoltaic,
    OtherRenewables,
    Nuclear,
    Lignite,
    HardCoal,
    NaturalGas,
    PumpedStorage,
    OtherConventional,
    Total,
    PhotovoltaicAndWind,
    Other,
    GridLoad,
    ResidualLoad,
}

/// Binds one field to its column position in a raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    pub field: Field,
    pub column: usize,
}

/// Ordered field-to-column mapping for one series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    series: Series,
    bindings: Vec<ColumnBinding>,
}

impl Schema {
    /// Bind `fields` in order to consecutive columns starting after date and time
    pub fn new(series: Series, fields: &[Field]) -> Self {
        let bindings = fields
            .iter()
            .enumerate()
            .map(|(offset, field)| ColumnBinding {
                field: *field,
                column: FIRST_VALUE_COLUMN + offset,
            })
            .collect();

        Self { series, bindings }
    }

    pub fn series(&self) -> Series {
        self.series
    }

    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn column_of(&self, field: Field) -> Option<usize> {
        self.bindings
            .iter()
            .find(|b| b.field == field)
            .map(|b| b.column)
    }
}

/// Catalog entry: what to request and how to decode it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesEntry {
    pub series: Series,
    pub module_ids: Vec<u32>,
    pub schema: Schema,
}

const PRODUCTION_MODULE_IDS: [u32; 12] = [
    1001224, 1004066, 1004067, 1004068, 1001223, 1004069, 1004071, 1004070, 1001226, 1001228,
    1001227, 1001225,
];

const PRODUCTION_FIELDS: [Field; 12] = [
    Field::Biomass,
    Field::Hydropower,
    Field::WindOffshore,
    Field::WindOnshore,
    Field::Photovoltaic,
    Field::OtherRenewables,
    Field::Nuclear,
    Field::Lignite,
    Field::HardCoal,
    Field::NaturalGas,
    Field::PumpedStorage,
    Field::OtherConventional,
];

const PRODUCTION_FORECAST_MODULE_IDS: [u32; 6] =
    [2000122, 2005097, 2000715, 2000125, 2003791, 2000123];

const PRODUCTION_FORECAST_FIELDS: [Field; 6] = [
    Field::Total,
    Field::PhotovoltaicAndWind,
    Field::WindOffshore,
    Field::WindOnshore,
    Field::Photovoltaic,
    Field::Other,
];

const CONSUMPTION_MODULE_IDS: [u32; 3] = [5000410, 5004387, 5004359];

const CONSUMPTION_FIELDS: [Field; 3] = [Field::GridLoad, Field::ResidualLoad, Field::PumpedStorage];

/// Read-only table of all supported series
///
/// Built once (typically when a client is constructed) and shared by
/// reference afterwards; it has no interior mutability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCatalog {
    entries: [SeriesEntry; 3],
}

impl SeriesCatalog {
    pub fn new() -> Self {
        let entry = |series, module_ids: &[u32], fields: &[Field]| SeriesEntry {
            series,
            module_ids: module_ids.to_vec(),
            schema: Schema::new(series, fields),
        };

        Self {
            entries: [
                entry(
                    Series::Production,
                    &PRODUCTION_MODULE_IDS,
                    &PRODUCTION_FIELDS,
                ),
                entry(
                    Series::ProductionForecast,
                    &PRODUCTION_FORECAST_MODULE_IDS,
                    &PRODUCTION_FORECAST_FIELDS,
                ),
                entry(
                    Series::Consumption,
                    &CONSUMPTION_MODULE_IDS,
                    &CONSUMPTION_FIELDS,
                ),
            ],
        }
    }

    pub fn entry(&self, series: Series) -> &SeriesEntry {
        &self.entries[series.index()]
    }

    pub fn schema(&self, series: Series) -> &Schema {
        &self.entry(series).schema
    }

    pub fn module_ids(&self, series: Series) -> &[u32] {
        &self.entry(series).module_ids
    }

    pub fn entries(&self) -> impl Iterator<Item = &SeriesEntry> {
        self.entries.iter()
    }
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_field_counts() {
        let catalog = SeriesCatalog::new();
        assert_eq!(catalog.schema(Series::Production).len(), 12);
        assert_eq!(catalog.schema(Series::ProductionForecast).len(), 6);
        assert_eq!(catalog.schema(Series::Consumption).len(), 3);
    }

    #[test]
    fn test_module_ids_match_field_counts() {
        let catalog = SeriesCatalog::new();
        for entry in catalog.entries() {
            assert_eq!(entry.module_ids.len(), entry.schema.len(), "{}", entry.series);
        }
    }

    #[test]
    fn test_entry_lookup_matches_series() {
        let catalog = SeriesCatalog::new();
        for series in Series::ALL {
            assert_eq!(catalog.entry(series).series, series);
            assert_eq!(catalog.schema(series).series(), series);
        }
    }

    #[test]
    fn test_production_column_order() {
        let catalog = SeriesCatalog::new();
        let schema = catalog.schema(Series::Production);

        assert_eq!(schema.column_of(Field::Biomass), Some(2));
        assert_eq!(schema.column_of(Field::Photovoltaic), Some(6));
        assert_eq!(schema.column_of(Field::Nuclear), Some(8));
        assert_eq!(schema.column_of(Field::OtherConventional), Some(13));
        assert_eq!(schema.column_of(Field::GridLoad), None);
    }

    #[test]
    fn test_forecast_column_order() {
        let catalog = SeriesCatalog::new();
        let fields: Vec<Field> = catalog
            .schema(Series::ProductionForecast)
            .bindings()
            .iter()
            .map(|b| b.field)
            .collect();

        assert_eq!(fields, PRODUCTION_FORECAST_FIELDS.to_vec());
    }

    #[test]
    fn test_consumption_module_ids() {
        let catalog = SeriesCatalog::new();
        assert_eq!(
            catalog.module_ids(Series::Consumption),
            &[5000410, 5004387, 5004359]
        );
        assert_eq!(catalog.module_ids(Series::Production)[0], 1001224);
    }

    #[test]
    fn test_series_from_str() {
        assert_eq!("production".parse::<Series>().unwrap(), Series::Production);
        assert_eq!(
            "Production_Forecast".parse::<Series>().unwrap(),
            Series::ProductionForecast
        );
        assert_eq!(" consumption ".parse::<Series>().unwrap(), Series::Consumption);
        assert!(matches!(
            "prices".parse::<Series>(),
            Err(ParseError::UnknownSeries(_))
        ));
    }

    #[test]
    fn test_series_display_round_trips() {
        for series in Series::ALL {
            assert_eq!(series.to_string().parse::<Series>().unwrap(), series);
        }
    }
}
