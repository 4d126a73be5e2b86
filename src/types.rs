//! Data structures for decoded SMARD rows
//!
//! One struct per series plus the `Record` enum that the schema-driven
//! decoder produces. All quantities are in W (the CSV carries MW).

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::catalog::{Field, Series};

/// Point in time of a row, local timezone, minute precision
pub type TimePoint = DateTime<Local>;

/// Value stored in a numeric field whose cell could not be decoded
///
/// Covers both malformed cells (e.g. `-`) and cells missing from a short row.
pub const MISSING_VALUE: i64 = -1;

/// Numeric field values decoded from one row, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: Vec<(Field, i64)>,
}

impl FieldValues {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, field: Field, value: i64) {
        self.values.push((field, value));
    }

    /// Value bound to `field`, or `MISSING_VALUE` if the schema has no such field
    pub fn get(&self, field: Field) -> i64 {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
            .unwrap_or(MISSING_VALUE)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Actual electricity generation per energy source
///
/// Decoded from the `production` series (12 quantity columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionRow {
    pub timestamp: TimePoint,
    pub biomass: i64,
    pub hydropower: i64,
    pub wind_offshore: i64,
    pub wind_onshore: i64,
    pub photovoltaic: i64,
    pub other_renewables: i64,
    pub nuclear: i64,
    pub lignite: i64,
    pub hard_coal: i64,
    pub natural_gas: i64,
    pub pumped_storage: i64,
    pub other_conventional: i64,
}

/// Day-ahead generation forecast
///
/// Decoded from the `production-forecast` series (6 quantity columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionForecastRow {
    pub timestamp: TimePoint,
    pub total: i64,
    pub photovoltaic_and_wind: i64,
    pub wind_offshore: i64,
    pub wind_onshore: i64,
    pub photovoltaic: i64,
    pub other: i64,
}

/// Actual electricity consumption
///
/// Decoded from the `consumption` series (3 quantity columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumptionRow {
    pub timestamp: TimePoint,
    pub grid_load: i64,
    pub residual_load: i64,
    pub pumped_storage: i64,
}

impl ProductionRow {
    pub fn from_fields(timestamp: TimePoint, fields: &FieldValues) -> Self {
        Self {
            timestamp,
            biomass: fields.get(Field::Biomass),
            hydropower: fields.get(Field::Hydropower),
            wind_offshore: fields.get(Field::WindOffshore),
            wind_onshore: fields.get(Field::WindOnshore),
            photovoltaic: fields.get(Field::Photovoltaic),
            other_renewables: fields.get(Field::OtherRenewables),
            nuclear: fields.get(Field::Nuclear),
            lignite: fields.get(Field::Lignite),
            hard_coal: fields.get(Field::HardCoal),
            natural_gas: fields.get(Field::NaturalGas),
            pumped_storage: fields.get(Field::PumpedStorage),
            other_conventional: fields.get(Field::OtherConventional),
        }
    }
}

impl ProductionForecastRow {
    pub fn from_fields(timestamp: TimePoint, fields: &FieldValues) -> Self {
        Self {
            timestamp,
            total: fields.get(Field::Total),
            photovoltaic_and_wind: fields.get(Field::PhotovoltaicAndWind),
            wind_offshore: fields.get(Field::WindOffshore),
            wind_onshore: fields.get(Field::WindOnshore),
            photovoltaic: fields.get(Field::Photovoltaic),
            other: fields.get(Field::Other),
        }
    }
}

impl ConsumptionRow {
    pub fn from_fields(timestamp: TimePoint, fields: &FieldValues) -> Self {
        Self {
            timestamp,
            grid_load: fields.get(Field::GridLoad),
            residual_load: fields.get(Field::ResidualLoad),
            pumped_storage: fields.get(Field::PumpedStorage),
        }
    }
}

/// One decoded row of any series
///
/// Serializes as the inner row so CSV and JSON output keep flat columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Production(ProductionRow),
    ProductionForecast(ProductionForecastRow),
    Consumption(ConsumptionRow),
}

impl Record {
    pub fn timestamp(&self) -> TimePoint {
        match self {
            Record::Production(row) => row.timestamp,
            Record::ProductionForecast(row) => row.timestamp,
            Record::Consumption(row) => row.timestamp,
        }
    }

    pub fn series(&self) -> Series {
        match self {
            Record::Production(_) => Series::Production,
            Record::ProductionForecast(_) => Series::ProductionForecast,
            Record::Consumption(_) => Series::Consumption,
        }
    }

    /// Raw field value including the `-1` sentinel; `None` if the series has no such field
    pub fn raw_value(&self, field: Field) -> Option<i64> {
        let value = match (self, field) {
            (Record::Production(r), Field::Biomass) => r.biomass,
            (Record::Production(r), Field::Hydropower) => r.hydropower,
            (Record::Production(r), Field::WindOffshore) => r.wind_offshore,
            (Record::Production(r), Field::WindOnshore) => r.wind_onshore,
            (Record::Production(r), Field::Photovoltaic) => r.photovoltaic,
            (Record::Production(r), Field::OtherRenewables) => r.other_renewables,
            (Record::Production(r), Field::Nuclear) => r.nuclear,
            (Record::Production(r), Field::Lignite) => r.lignite,
            (Record::Production(r), Field::HardCoal) => r.hard_coal,
            (Record::Production(r), Field::NaturalGas) => r.natural_gas,
            (Record::Production(r), Field::PumpedStorage) => r.pumped_storage,
            (Record::Production(r), Field::OtherConventional) => r.other_conventional,
            (Record::ProductionForecast(r), Field::Total) => r.total,
            (Record::ProductionForecast(r), Field::PhotovoltaicAndWind) => r.photovoltaic_and_wind,
            (Record::ProductionForecast(r), Field::WindOffshore) => r.wind_offshore,
            (Record::ProductionForecast(r), Field::WindOnshore) => r.wind_onshore,
            (Record::ProductionForecast(r), Field::Photovoltaic) => r.photovoltaic,
            (Record::ProductionForecast(r), Field::Other) => r.other,
            (Record::Consumption(r), Field::GridLoad) => r.grid_load,
            (Record::Consumption(r), Field::ResidualLoad) => r.residual_load,
            (Record::Consumption(r), Field::PumpedStorage) => r.pumped_storage,
            _ => return None,
        };
        Some(value)
    }

    /// Field value with the `-1` sentinel mapped to `None`
    pub fn value(&self, field: Field) -> Option<i64> {
        self.raw_value(field).filter(|v| *v != MISSING_VALUE)
    }
}

/// Typed row that can be pulled out of a `Record`
///
/// Lets callers ask for `Vec<ProductionRow>` instead of matching on `Record`.
pub trait SeriesRow: Sized {
    const SERIES: Series;

    fn from_record(record: Record) -> Option<Self>;
}

impl SeriesRow for ProductionRow {
    const SERIES: Series = Series::Production;

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Production(row) => Some(row),
            _ => None,
        }
    }
}

impl SeriesRow for ProductionForecastRow {
    const SERIES: Series = Series::ProductionForecast;

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::ProductionForecast(row) => Some(row),
            _ => None,
        }
    }
}

impl SeriesRow for ConsumptionRow {
    const SERIES: Series = Series::Consumption;

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Consumption(row) => Some(row),
            _ => None,
        }
    }
}
