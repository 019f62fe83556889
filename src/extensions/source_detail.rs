//! Text and link helpers for the hover pane, detail pane and context menu.

use serde::{Deserialize, Serialize};

use crate::core::DataRow;

/// Pre-formatted summary shown while hovering a source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoverInfo {
    pub id: String,
    pub ra: String,
    pub dec: String,
    pub z_phot: String,
}

impl HoverInfo {
    /// Formats id (no decimals), ra/dec (5 decimals, degrees) and z_phot
    /// (2 decimals). Missing values stay blank.
    #[must_use]
    pub fn from_row(row: &DataRow) -> Self {
        let id = match row.finite_value("id") {
            Some(value) => format!("{value:.0}"),
            None => row.id.clone(),
        };
        Self {
            id,
            ra: row
                .finite_value("ra")
                .map(|value| format!("{value:.5}°"))
                .unwrap_or_default(),
            dec: row
                .finite_value("dec")
                .map(|value| format!("{value:.5}°"))
                .unwrap_or_default(),
            z_phot: row
                .finite_value("z_phot")
                .map(|value| format!("{value:.2}"))
                .unwrap_or_default(),
        }
    }
}

/// Text copied by the context menu for the selected source.
#[must_use]
pub fn clipboard_text(row: &DataRow, x_column: &str, y_column: &str) -> String {
    format!(
        "id: {}, ra: {}, dec: {}, {x_column}: {}, {y_column}: {}",
        row.id,
        row.value("ra"),
        row.value("dec"),
        row.value(x_column),
        row.value(y_column),
    )
}

/// Resolves an external cutout image for a source.
pub trait CutoutResolver {
    fn cutout_url(&self, id: &str, field: &str) -> Option<String>;
}

/// Fills `{id}` in a URL template with the zero-padded numeric id, for a
/// fixed set of fields only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCutoutResolver {
    pub template: String,
    pub fields: Vec<String>,
    #[serde(default = "default_id_width")]
    pub id_width: usize,
}

impl PatternCutoutResolver {
    #[must_use]
    pub fn new(template: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            template: template.into(),
            fields,
            id_width: default_id_width(),
        }
    }
}

impl CutoutResolver for PatternCutoutResolver {
    fn cutout_url(&self, id: &str, field: &str) -> Option<String> {
        if !self.fields.iter().any(|candidate| candidate == field) {
            return None;
        }
        let numeric = id.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
        let id = format!("{:0width$}", numeric.trunc() as i64, width = self.id_width);
        Some(self.template.replace("{id}", &id))
    }
}

fn default_id_width() -> usize {
    5
}

/// Summary of the selected source handed to a context menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDetail {
    pub row: DataRow,
    pub hover: HoverInfo,
    pub clipboard: String,
}

impl SourceDetail {
    #[must_use]
    pub fn new(row: DataRow, x_column: &str, y_column: &str) -> Self {
        Self {
            hover: HoverInfo::from_row(&row),
            clipboard: clipboard_text(&row, x_column, y_column),
            row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CutoutResolver, HoverInfo, PatternCutoutResolver, clipboard_text};
    use crate::core::DataRow;

    fn row() -> DataRow {
        DataRow::new("42", "test")
            .with_value("id", 42.0)
            .with_value("ra", 3.5871234567)
            .with_value("dec", -30.4)
            .with_value("abmag_f200w", 24.5)
    }

    #[test]
    fn hover_info_uses_fixed_precision() {
        let info = HoverInfo::from_row(&row());
        assert_eq!(info.id, "42");
        assert_eq!(info.ra, "3.58712°");
        assert_eq!(info.dec, "-30.40000°");
        assert_eq!(info.z_phot, "");
    }

    #[test]
    fn clipboard_lists_position_and_axes() {
        assert_eq!(
            clipboard_text(&row(), "abmag_f200w", "dec"),
            "id: 42, ra: 3.5871234567, dec: -30.4, abmag_f200w: 24.5, dec: -30.4"
        );
    }

    #[test]
    fn cutouts_are_zero_padded_for_known_fields_only() {
        let resolver = PatternCutoutResolver::new(
            "/data/cutouts/f200w/uncover_f200w_{id}_cutout.jpg",
            vec!["test".to_owned()],
        );
        assert_eq!(
            resolver.cutout_url("42", "test").as_deref(),
            Some("/data/cutouts/f200w/uncover_f200w_00042_cutout.jpg")
        );
        assert_eq!(resolver.cutout_url("42", "other"), None);
        assert_eq!(resolver.cutout_url("abc", "test"), None);
    }
}
