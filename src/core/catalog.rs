//! Catalog records and column metadata as delivered by the survey exports.
//!
//! The JSON shapes here follow the deployed metadata files:
//!
//! ```json
//! {
//!   "num_objects": 2,
//!   "columns": {
//!     "abmag_f200w": {
//!       "display": "F200W", "output_units": "AB mag",
//!       "min_val": 18.0, "max_val": 26.0,
//!       "is_magnitude": true, "wl_micron": 1.99
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// One catalog source.
///
/// Values are immutable once a row has been handed to the data store. A
/// column that is absent from `values` reads back as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub values: IndexMap<String, f64>,
}

impl DataRow {
    #[must_use]
    pub fn new(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            values: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    /// Raw column value; `NaN` when the column is missing.
    #[must_use]
    pub fn value(&self, column: &str) -> f64 {
        self.values.get(column).copied().unwrap_or(f64::NAN)
    }

    /// Column value when present and finite.
    #[must_use]
    pub fn finite_value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().filter(|v| v.is_finite())
    }
}

/// Describes one numeric catalog column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub display: String,
    #[serde(default)]
    pub output_units: Option<String>,
    pub min_val: f64,
    pub max_val: f64,
    #[serde(default)]
    pub is_magnitude: bool,
    /// Filter center wavelength; only meaningful for photometry columns.
    #[serde(default)]
    pub wl_micron: Option<f64>,
}

impl ColumnMetadata {
    #[must_use]
    pub fn new(display: impl Into<String>, min_val: f64, max_val: f64) -> Self {
        Self {
            display: display.into(),
            output_units: None,
            min_val,
            max_val,
            is_magnitude: false,
            wl_micron: None,
        }
    }

    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.output_units = Some(units.into());
        self
    }

    #[must_use]
    pub fn magnitude(mut self, wl_micron: Option<f64>) -> Self {
        self.is_magnitude = true;
        self.wl_micron = wl_micron;
        self
    }

    /// Axis title text: `display` followed by the unit in parentheses.
    #[must_use]
    pub fn axis_label(&self) -> String {
        match self.output_units.as_deref() {
            Some(units) if !units.is_empty() => format!("{} ({units})", self.display),
            _ => self.display.clone(),
        }
    }

    /// Expands `[min, max]` outward by `border_fraction` of its span.
    ///
    /// Magnitude columns swap their bounds first, so the bright end lands on
    /// the high side of the returned interval.
    #[must_use]
    pub fn range_with_border(&self, border_fraction: f64) -> (f64, f64) {
        let (mut lo, mut hi) = if self.is_magnitude {
            (self.max_val, self.min_val)
        } else {
            (self.min_val, self.max_val)
        };
        let span = hi - lo;
        lo -= border_fraction * span;
        hi += border_fraction * span;
        (lo, hi)
    }
}

/// Metadata for a whole field, or the merge of several fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogMetadata {
    #[serde(default)]
    pub num_objects: u64,
    #[serde(default)]
    pub columns: IndexMap<String, ColumnMetadata>,
}

/// One entry for an axis selector control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisOption {
    /// Column key, or `None` for the "no color axis" entry.
    pub key: Option<String>,
    pub label: String,
}

impl CatalogMetadata {
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidData(format!("failed to parse catalog metadata: {e}")))
    }

    #[must_use]
    pub fn column(&self, key: &str) -> Option<&ColumnMetadata> {
        self.columns.get(key)
    }

    #[must_use]
    pub fn contains_column(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    /// Column-wise union. Overlapping columns widen to the union of both
    /// ranges; descriptive fields keep the left-hand value.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, column) in &other.columns {
            match merged.columns.get_mut(key) {
                Some(existing) => {
                    existing.min_val = existing.min_val.min(column.min_val);
                    existing.max_val = existing.max_val.max(column.max_val);
                }
                None => {
                    merged.columns.insert(key.clone(), column.clone());
                }
            }
        }
        merged.num_objects += other.num_objects;
        merged
    }

    /// Options for the X/Y selectors, in column order.
    #[must_use]
    pub fn axis_options(&self) -> Vec<AxisOption> {
        self.columns
            .iter()
            .map(|(key, column)| AxisOption {
                key: Some(key.clone()),
                label: column.display.clone(),
            })
            .collect()
    }

    /// Options for the color selector; the first entry clears the color axis.
    #[must_use]
    pub fn color_axis_options(&self) -> Vec<AxisOption> {
        let mut options = Vec::with_capacity(self.columns.len() + 1);
        options.push(AxisOption {
            key: None,
            label: "None".to_owned(),
        });
        options.extend(self.axis_options());
        options
    }

    /// Magnitude columns that carry a wavelength, sorted by wavelength.
    #[must_use]
    pub fn photometry_columns(&self) -> Vec<(&str, f64)> {
        let mut bands: Vec<(&str, f64)> = self
            .columns
            .iter()
            .filter(|(_, column)| column.is_magnitude)
            .filter_map(|(key, column)| column.wl_micron.map(|wl| (key.as_str(), wl)))
            .collect();
        bands.sort_by(|left, right| left.1.total_cmp(&right.1));
        bands
    }
}

/// Rows plus metadata for one field, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldPayload {
    pub rows: Vec<DataRow>,
    pub metadata: CatalogMetadata,
}

impl FieldPayload {
    #[must_use]
    pub fn new(rows: Vec<DataRow>, metadata: CatalogMetadata) -> Self {
        Self { rows, metadata }
    }
}

/// Where to find one field's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub display: String,
    pub data_file: String,
    pub metadata_file: String,
}

/// The fields reference file: field key to descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldIndex {
    pub fields: IndexMap<String, FieldDescriptor>,
}

impl FieldIndex {
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidData(format!("failed to parse fields file: {e}")))
    }

    #[must_use]
    pub fn descriptor(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.get(key)
    }

    /// Field keys that can be offered to the user. Raw exports are skipped.
    pub fn loadable_fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .filter(|(key, _)| !key.ends_with("_raw"))
            .map(|(key, descriptor)| (key.as_str(), descriptor))
    }
}
