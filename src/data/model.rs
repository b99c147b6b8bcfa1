use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// NumericField – the fixed set of numeric columns
// ---------------------------------------------------------------------------

/// Every numeric column a [`Dataset`] can carry, under its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Longitude,
    Latitude,
    HousingMedianAge,
    MedianIncome,
    MedianHouseValue,
    AverageRooms,
    AverageBedrooms,
    Population,
    AverageOccupants,
    RoomsPerHousehold,
    BedroomsPerRoom,
    PopulationDensity,
}

impl NumericField {
    /// Canonical snake_case column name.
    pub fn column_name(self) -> &'static str {
        match self {
            NumericField::Longitude => "longitude",
            NumericField::Latitude => "latitude",
            NumericField::HousingMedianAge => "housing_median_age",
            NumericField::MedianIncome => "median_income",
            NumericField::MedianHouseValue => "median_house_value",
            NumericField::AverageRooms => "average_rooms",
            NumericField::AverageBedrooms => "average_bedrooms",
            NumericField::Population => "population",
            NumericField::AverageOccupants => "average_occupants",
            NumericField::RoomsPerHousehold => "rooms_per_household",
            NumericField::BedroomsPerRoom => "bedrooms_per_room",
            NumericField::PopulationDensity => "population_density",
        }
    }

    /// Human-readable axis / table label.
    pub fn label(self) -> &'static str {
        match self {
            NumericField::Longitude => "Longitude",
            NumericField::Latitude => "Latitude",
            NumericField::HousingMedianAge => "Housing median age",
            NumericField::MedianIncome => "Median income (10k USD)",
            NumericField::MedianHouseValue => "Median house value",
            NumericField::AverageRooms => "Average rooms",
            NumericField::AverageBedrooms => "Average bedrooms",
            NumericField::Population => "Population",
            NumericField::AverageOccupants => "Average occupants",
            NumericField::RoomsPerHousehold => "Rooms per household",
            NumericField::BedroomsPerRoom => "Bedrooms per room",
            NumericField::PopulationDensity => "Population density",
        }
    }

    /// Read this field from a record. `None` when the record does not carry
    /// the column or the value is undefined.
    pub fn value(self, record: &HousingRecord) -> Option<f64> {
        let household = record.household.as_ref();
        let derived = record.derived.as_ref();
        match self {
            NumericField::Longitude => Some(record.longitude),
            NumericField::Latitude => Some(record.latitude),
            NumericField::HousingMedianAge => record.housing_median_age,
            NumericField::MedianIncome => Some(record.median_income),
            NumericField::MedianHouseValue => Some(record.median_house_value),
            NumericField::AverageRooms => household.map(|h| h.average_rooms),
            NumericField::AverageBedrooms => household.map(|h| h.average_bedrooms),
            NumericField::Population => household.map(|h| h.population),
            NumericField::AverageOccupants => household.map(|h| h.average_occupants),
            NumericField::RoomsPerHousehold => derived.and_then(|d| d.rooms_per_household),
            NumericField::BedroomsPerRoom => derived.and_then(|d| d.bedrooms_per_room),
            NumericField::PopulationDensity => derived.and_then(|d| d.population_density),
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// HousingRecord – one row of the table
// ---------------------------------------------------------------------------

/// Household composition columns, only present in the reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdProfile {
    pub average_rooms: f64,
    pub average_bedrooms: f64,
    pub population: f64,
    pub average_occupants: f64,
}

/// Ratios computed from a [`HouseholdProfile`].
///
/// A ratio whose denominator is zero (or whose result is not finite) is
/// `None`; the record itself is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedFields {
    pub rooms_per_household: Option<f64>,
    pub bedrooms_per_room: Option<f64>,
    pub population_density: Option<f64>,
}

impl DerivedFields {
    pub fn from_profile(profile: &HouseholdProfile) -> Self {
        DerivedFields {
            rooms_per_household: ratio(profile.average_rooms, profile.average_occupants),
            bedrooms_per_room: ratio(profile.average_bedrooms, profile.average_rooms),
            population_density: ratio(profile.population, profile.average_occupants),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let q = numerator / denominator;
    q.is_finite().then_some(q)
}

/// A single housing observation (one block group).
#[derive(Debug, Clone, PartialEq)]
pub struct HousingRecord {
    pub longitude: f64,
    pub latitude: f64,
    /// Filtering key, in units of 10 000 USD.
    pub median_income: f64,
    /// USD for cleaned files, 100 000 USD for the reference table.
    pub median_house_value: f64,
    pub housing_median_age: Option<f64>,
    pub household: Option<HouseholdProfile>,
    pub derived: Option<DerivedFields>,
}

impl HousingRecord {
    /// Record with only the four mandatory columns.
    pub fn new(
        longitude: f64,
        latitude: f64,
        median_income: f64,
        median_house_value: f64,
    ) -> Self {
        HousingRecord {
            longitude,
            latitude,
            median_income,
            median_house_value,
            housing_median_age: None,
            household: None,
            derived: None,
        }
    }

    /// Attach household columns and compute the derived ratios from them.
    pub fn with_household(mut self, profile: HouseholdProfile) -> Self {
        self.derived = Some(DerivedFields::from_profile(&profile));
        self.household = Some(profile);
        self
    }

    /// Check coordinate ranges and sign constraints.
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(format!("latitude {} outside [-90, 90]", self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(format!("longitude {} outside [-180, 180]", self.longitude));
        }
        if !self.median_income.is_finite() || self.median_income < 0.0 {
            return Err(format!(
                "median income {} is not a finite non-negative number",
                self.median_income
            ));
        }
        if !self.median_house_value.is_finite() || self.median_house_value < 0.0 {
            return Err(format!(
                "median house value {} is not a finite non-negative number",
                self.median_house_value
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the loaded table
// ---------------------------------------------------------------------------

/// Where a dataset came from; decides its columns and value units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Cleaned delimited file with snake_case columns.
    CleanFile,
    /// Reference table in the `MedInc … MedHouseVal` layout.
    Reference,
}

impl SourceKind {
    /// USD per unit of `median_house_value`.
    pub fn house_value_unit(self) -> f64 {
        match self {
            SourceKind::CleanFile => 1.0,
            SourceKind::Reference => 100_000.0,
        }
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// One point handed to the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub value: f64,
}

/// An ordered, immutable table of housing records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<HousingRecord>,
    /// Numeric columns this dataset carries, in display order.
    pub columns: Vec<NumericField>,
    pub kind: SourceKind,
}

impl Dataset {
    pub fn new(records: Vec<HousingRecord>, columns: Vec<NumericField>, kind: SourceKind) -> Self {
        Dataset {
            records,
            columns,
            kind,
        }
    }

    /// A dataset with the same columns and kind but different rows.
    pub fn with_records(&self, records: Vec<HousingRecord>) -> Self {
        Dataset {
            records,
            columns: self.columns.clone(),
            kind: self.kind,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed `(min, max)` of `median_income`, `None` when empty.
    pub fn income_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().map(|r| r.median_income).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Mean of the visible coordinates. An empty dataset has no centroid.
    pub fn centroid(&self) -> Option<GeoPoint> {
        if self.records.is_empty() {
            return None;
        }
        let n = self.records.len() as f64;
        let (lon, lat) = self
            .records
            .iter()
            .fold((0.0, 0.0), |(lon, lat), r| (lon + r.longitude, lat + r.latitude));
        Some(GeoPoint {
            longitude: lon / n,
            latitude: lat / n,
        })
    }

    /// `(longitude, latitude, median_house_value)` triples in record order.
    pub fn map_points(&self) -> impl Iterator<Item = MapPoint> + '_ {
        self.records.iter().map(|r| MapPoint {
            longitude: r.longitude,
            latitude: r.latitude,
            value: r.median_house_value,
        })
    }

    /// All defined values of one column, in record order.
    pub fn column_values(&self, field: NumericField) -> Vec<f64> {
        self.records.iter().filter_map(|r| field.value(r)).collect()
    }
}
