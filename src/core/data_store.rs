use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::catalog::{CatalogMetadata, DataRow, FieldPayload};
use crate::error::{PlotError, PlotResult};

/// Stable key of one stored row. Keys are never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey(u64);

impl RowKey {
    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    metadata: CatalogMetadata,
    rows: Vec<RowKey>,
}

/// Authoritative row storage, partitioned by field.
///
/// Metadata is kept per field and the merged view is rebuilt whenever the
/// field set changes, so removing a field shrinks ranges back correctly.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    rows: IndexMap<RowKey, DataRow>,
    fields: IndexMap<String, FieldEntry>,
    merged: CatalogMetadata,
    next_key: u64,
}

impl DataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every row of a field, stamping each with `field_name`.
    ///
    /// Returns the keys of the inserted rows in payload order.
    pub fn insert_field(
        &mut self,
        field_name: &str,
        payload: FieldPayload,
    ) -> PlotResult<Vec<RowKey>> {
        if self.fields.contains_key(field_name) {
            return Err(PlotError::InvalidData(format!(
                "field `{field_name}` is already loaded"
            )));
        }

        let mut keys = Vec::with_capacity(payload.rows.len());
        for mut row in payload.rows {
            row.field = field_name.to_owned();
            let key = RowKey(self.next_key);
            self.next_key += 1;
            self.rows.insert(key, row);
            keys.push(key);
        }

        self.fields.insert(
            field_name.to_owned(),
            FieldEntry {
                metadata: payload.metadata,
                rows: keys.clone(),
            },
        );
        self.rebuild_merged_metadata();
        debug!(
            field = field_name,
            rows = keys.len(),
            total_rows = self.rows.len(),
            "field inserted into data store"
        );
        Ok(keys)
    }

    /// Drops a field and its rows. Returns the removed keys.
    pub fn remove_field(&mut self, field_name: &str) -> Option<Vec<RowKey>> {
        let entry = self.fields.shift_remove(field_name)?;
        let doomed: HashSet<RowKey> = entry.rows.iter().copied().collect();
        self.rows.retain(|key, _| !doomed.contains(key));
        self.rebuild_merged_metadata();
        debug!(
            field = field_name,
            rows = entry.rows.len(),
            total_rows = self.rows.len(),
            "field removed from data store"
        );
        Some(entry.rows)
    }

    #[must_use]
    pub fn row(&self, key: RowKey) -> Option<&DataRow> {
        self.rows.get(&key)
    }

    pub fn rows(&self) -> impl Iterator<Item = (RowKey, &DataRow)> {
        self.rows.iter().map(|(key, row)| (*key, row))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_field(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn field_rows(&self, field_name: &str) -> &[RowKey] {
        self.fields
            .get(field_name)
            .map(|entry| entry.rows.as_slice())
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn field_metadata(&self, field_name: &str) -> Option<&CatalogMetadata> {
        self.fields.get(field_name).map(|entry| &entry.metadata)
    }

    /// Merged metadata of every loaded field.
    #[must_use]
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.merged
    }

    /// Bordered range of a column from the merged metadata.
    ///
    /// Magnitude columns come back swapped (see
    /// [`ColumnMetadata::range_with_border`](crate::core::ColumnMetadata::range_with_border)).
    #[must_use]
    pub fn range_with_border(&self, column: &str, border_fraction: f64) -> Option<(f64, f64)> {
        self.merged
            .column(column)
            .map(|meta| meta.range_with_border(border_fraction))
    }

    fn rebuild_merged_metadata(&mut self) {
        self.merged = self
            .fields
            .values()
            .fold(CatalogMetadata::default(), |acc, entry| {
                merge_metadata(&acc, &entry.metadata)
            });
    }
}

/// Column-wise union of two metadata documents.
#[must_use]
pub fn merge_metadata(left: &CatalogMetadata, right: &CatalogMetadata) -> CatalogMetadata {
    left.merge(right)
}

#[cfg(test)]
mod tests {
    use super::DataStore;
    use crate::core::catalog::{CatalogMetadata, ColumnMetadata, DataRow, FieldPayload};

    fn payload(ids: &[&str], ra_range: (f64, f64)) -> FieldPayload {
        let mut metadata = CatalogMetadata {
            num_objects: ids.len() as u64,
            ..CatalogMetadata::default()
        };
        metadata.columns.insert(
            "ra".to_owned(),
            ColumnMetadata::new("RA", ra_range.0, ra_range.1),
        );
        let rows = ids
            .iter()
            .map(|id| DataRow::new(*id, "").with_value("ra", ra_range.0))
            .collect();
        FieldPayload::new(rows, metadata)
    }

    #[test]
    fn insert_stamps_field_name_on_rows() {
        let mut store = DataStore::new();
        let keys = store
            .insert_field("uncover", payload(&["1", "2"], (0.0, 1.0)))
            .expect("insert");
        assert_eq!(keys.len(), 2);
        for key in keys {
            assert_eq!(store.row(key).map(|row| row.field.as_str()), Some("uncover"));
        }
    }

    #[test]
    fn duplicate_field_insert_is_rejected() {
        let mut store = DataStore::new();
        store
            .insert_field("uncover", payload(&["1"], (0.0, 1.0)))
            .expect("first insert");
        assert!(
            store
                .insert_field("uncover", payload(&["1"], (0.0, 1.0)))
                .is_err()
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removing_a_field_shrinks_merged_ranges() {
        let mut store = DataStore::new();
        store
            .insert_field("a", payload(&["1"], (0.0, 1.0)))
            .expect("insert a");
        store
            .insert_field("b", payload(&["2", "3"], (5.0, 9.0)))
            .expect("insert b");
        assert_eq!(store.metadata().columns["ra"].max_val, 9.0);
        assert_eq!(store.metadata().num_objects, 3);

        let removed = store.remove_field("b").expect("remove b");
        assert_eq!(removed.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.metadata().columns["ra"].max_val, 1.0);
        assert_eq!(store.metadata().num_objects, 1);
        assert!(store.remove_field("b").is_none());
    }

    #[test]
    fn removing_a_middle_field_keeps_other_rows_in_order() {
        let mut store = DataStore::new();
        let a = store
            .insert_field("a", payload(&["1", "2"], (0.0, 1.0)))
            .expect("insert a");
        store
            .insert_field("b", payload(&["3", "4", "5"], (0.0, 1.0)))
            .expect("insert b");
        let c = store
            .insert_field("c", payload(&["6"], (0.0, 1.0)))
            .expect("insert c");

        store.remove_field("b").expect("remove b");

        let remaining: Vec<_> = store.rows().map(|(key, row)| (key, row.id.as_str())).collect();
        assert_eq!(remaining, vec![(a[0], "1"), (a[1], "2"), (c[0], "6")]);
        assert!(store.field_rows("b").is_empty());
    }

    #[test]
    fn range_with_border_reads_merged_metadata() {
        let mut store = DataStore::new();
        store
            .insert_field("a", payload(&["1"], (10.0, 20.0)))
            .expect("insert");
        let (lo, hi) = store.range_with_border("ra", 0.1).expect("ra range");
        assert!((lo - 9.0).abs() <= 1e-9);
        assert!((hi - 21.0).abs() <= 1e-9);
        assert!(store.range_with_border("dec", 0.1).is_none());
    }
}
