use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Column names of the listings file
// ---------------------------------------------------------------------------

pub const LOCATION: &str = "location";
pub const PROPERTY_TYPE: &str = "property_type";
pub const FURNISHED: &str = "furnished";
pub const MONTHLY_RENT: &str = "monthly_rent";
pub const NEAR_TRANSIT: &str = "near ktm/lrt";
pub const ADS_ID: &str = "ads_id";
pub const COMPLETION_YEAR: &str = "completion_year";

/// Columns loaded but never shown in the raw data table.
pub const HIDDEN_COLUMNS: [&str; 2] = [ADS_ID, COMPLETION_YEAR];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common dataframe dtypes.
/// Used in `BTreeSet`s downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Guess the type of a raw text cell.
    ///
    /// Empty → `Null`, then integer, float, boolean (case-insensitive
    /// `true`/`false`), falling back to a string.
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_nan() {
                return CellValue::Null;
            }
            return CellValue::Float(f);
        }
        if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
            return CellValue::Bool(s.eq_ignore_ascii_case("true"));
        }
        CellValue::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Interpret the value as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Categorical label of the value; `None` when missing.
    pub fn as_category(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Interpret the value as a yes/no flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Integer(0) => Some(false),
            CellValue::Integer(1) => Some(true),
            CellValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" => Some(true),
                "false" | "no" | "n" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Furnishing – tri-state furnishing category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Furnishing {
    Fully,
    Partially,
    Unfurnished,
    /// A label outside the three known states, kept verbatim.
    Other(String),
}

impl Furnishing {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "fully furnished" | "furnished" => Furnishing::Fully,
            "partially furnished" => Furnishing::Partially,
            "not furnished" | "unfurnished" => Furnishing::Unfurnished,
            _ => Furnishing::Other(label.trim().to_string()),
        }
    }
}

impl fmt::Display for Furnishing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Furnishing::Fully => write!(f, "Fully Furnished"),
            Furnishing::Partially => write!(f, "Partially Furnished"),
            Furnishing::Unfurnished => write!(f, "Not Furnished"),
            Furnishing::Other(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single rental listing.
///
/// The filterable attributes are decoded into typed fields; `cells` keeps
/// every original value in source column order.
#[derive(Debug, Clone)]
pub struct Listing {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub furnished: Option<Furnishing>,
    pub monthly_rent: Option<f64>,
    pub near_transit: Option<bool>,
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// ListingTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after load.
#[derive(Debug, Clone, Default)]
pub struct ListingTable {
    pub listings: Vec<Listing>,
    /// All column names, in source order.
    pub column_names: Vec<String>,
}

impl ListingTable {
    /// Build the table from raw rows whose cells line up with `column_names`.
    pub fn from_records(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, LoadError> {
        let position = |name: &'static str| {
            column_names
                .iter()
                .position(|c| c == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        let location_idx = position(LOCATION)?;
        let property_type_idx = position(PROPERTY_TYPE)?;
        let furnished_idx = position(FURNISHED)?;
        let rent_idx = position(MONTHLY_RENT)?;
        let transit_idx = position(NEAR_TRANSIT)?;

        let mut listings = Vec::with_capacity(rows.len());
        for (row_no, mut cells) in rows.into_iter().enumerate() {
            cells.resize(column_names.len(), CellValue::Null);

            // Undecodable values stay in `cells` but count as missing.
            let monthly_rent = cells[rent_idx]
                .as_f64()
                .filter(|rent| *rent >= 0.0 && rent.is_finite());
            if monthly_rent.is_none() && !cells[rent_idx].is_null() {
                log::debug!("row {row_no}: unusable rent '{}'", cells[rent_idx]);
            }
            let near_transit = cells[transit_idx].as_flag();

            listings.push(Listing {
                location: cells[location_idx].as_category(),
                property_type: cells[property_type_idx].as_category(),
                furnished: cells[furnished_idx].as_category().map(|s| Furnishing::parse(&s)),
                monthly_rent,
                near_transit,
                cells,
            });
        }

        Ok(ListingTable { listings, column_names })
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Observed (min, max) rent over the whole table.
    pub fn rent_bounds(&self) -> Option<(f64, f64)> {
        self.listings
            .iter()
            .filter_map(|l| l.monthly_rent)
            .fold(None, |acc, r| match acc {
                None => Some((r, r)),
                Some((lo, hi)) => Some((lo.min(r), hi.max(r))),
            })
    }

    /// Sorted distinct non-missing values of a categorical column.
    pub fn distinct_values(&self, column: &str) -> BTreeSet<String> {
        let Some(idx) = self.column_index(column) else {
            return BTreeSet::new();
        };
        self.listings
            .iter()
            .filter_map(|l| l.cells[idx].as_category())
            .collect()
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
