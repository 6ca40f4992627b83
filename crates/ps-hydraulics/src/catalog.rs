//! Discrete nominal pipe sizes.

use ps_core::imperial::{inches, to_inches};
use ps_core::numeric::ensure_positive;
use ps_core::units::{Area, Length, m2};
use ps_core::{Tolerances, nearly_equal};
use tracing::debug;

use crate::error::{HydraulicError, HydraulicResult};

/// Raw catalog row as it appears in study files.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeRecord {
    pub label: String,
    pub nominal_in: f64,
    pub inside_diameter_in: f64,
}

impl PipeRecord {
    pub fn new(label: impl Into<String>, nominal_in: f64, inside_diameter_in: f64) -> Self {
        Self {
            label: label.into(),
            nominal_in,
            inside_diameter_in,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipeCatalogEntry {
    pub label: String,
    pub nominal_in: f64,
    pub inside_diameter: Length,
    /// Position in the sorted catalog, 0 = smallest.
    pub rank: usize,
}

impl PipeCatalogEntry {
    pub fn flow_area(&self) -> Area {
        let d = self.inside_diameter.value;
        m2(std::f64::consts::PI * d * d / 4.0)
    }

    pub fn inside_diameter_in(&self) -> f64 {
        to_inches(self.inside_diameter)
    }
}

/// Pipe sizes ordered by strictly increasing inside diameter.
///
/// Never empty once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeCatalog {
    entries: Vec<PipeCatalogEntry>,
}

// (label, nominal in, inside diameter in)
const SCHEDULE_40: [(&str, f64, f64); 21] = [
    ("1 in Sch 40", 1.0, 1.049),
    ("1-1/4 in Sch 40", 1.25, 1.380),
    ("1-1/2 in Sch 40", 1.5, 1.610),
    ("2 in Sch 40", 2.0, 2.067),
    ("2-1/2 in Sch 40", 2.5, 2.469),
    ("3 in Sch 40", 3.0, 3.068),
    ("4 in Sch 40", 4.0, 4.026),
    ("5 in Sch 40", 5.0, 5.047),
    ("6 in Sch 40", 6.0, 6.065),
    ("8 in Sch 40", 8.0, 7.981),
    ("10 in Sch 40", 10.0, 10.020),
    ("12 in Sch 40", 12.0, 11.938),
    ("14 in Sch 40", 14.0, 13.124),
    ("16 in Sch 40", 16.0, 15.000),
    ("18 in Sch 40", 18.0, 16.876),
    ("20 in Sch 40", 20.0, 18.812),
    ("24 in Sch 40", 24.0, 22.624),
    ("30 in Sch 40", 30.0, 28.750),
    ("36 in Sch 40", 36.0, 34.500),
    ("42 in Sch 40", 42.0, 40.250),
    ("48 in Sch 40", 48.0, 46.000),
];

impl PipeCatalog {
    /// Builds a catalog from raw rows.
    ///
    /// Rows are sorted by inside diameter; a row whose diameter matches an
    /// earlier one is dropped. Non-positive or non-finite diameters are
    /// rejected.
    pub fn from_records<I>(records: I) -> HydraulicResult<Self>
    where
        I: IntoIterator<Item = PipeRecord>,
    {
        let mut rows = Vec::new();
        for record in records {
            ensure_positive(record.inside_diameter_in, "pipe inside diameter")?;
            ensure_positive(record.nominal_in, "pipe nominal size")?;
            rows.push(record);
        }

        if rows.is_empty() {
            return Err(HydraulicError::EmptyCatalog);
        }

        rows.sort_by(|a, b| a.inside_diameter_in.total_cmp(&b.inside_diameter_in));

        let tol = Tolerances::default();
        let mut entries: Vec<PipeCatalogEntry> = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(last) = entries.last()
                && nearly_equal(last.inside_diameter_in(), row.inside_diameter_in, tol)
            {
                debug!(label = %row.label, kept = %last.label, "dropping duplicate pipe diameter");
                continue;
            }
            let rank = entries.len();
            entries.push(PipeCatalogEntry {
                label: row.label,
                nominal_in: row.nominal_in,
                inside_diameter: inches(row.inside_diameter_in),
                rank,
            });
        }

        Ok(Self { entries })
    }

    /// Schedule 40 steel, 1 in through 48 in.
    pub fn schedule_40() -> Self {
        let entries = SCHEDULE_40
            .iter()
            .enumerate()
            .map(|(rank, &(label, nominal_in, id_in))| PipeCatalogEntry {
                label: label.to_string(),
                nominal_in,
                inside_diameter: inches(id_in),
                rank,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PipeCatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PipeCatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn smallest(&self) -> &PipeCatalogEntry {
        &self.entries[0]
    }

    pub fn largest(&self) -> &PipeCatalogEntry {
        &self.entries[self.entries.len() - 1]
    }

    pub fn records(&self) -> Vec<PipeRecord> {
        self.entries
            .iter()
            .map(|e| PipeRecord::new(e.label.clone(), e.nominal_in, e.inside_diameter_in()))
            .collect()
    }
}

impl Default for PipeCatalog {
    fn default() -> Self {
        Self::schedule_40()
    }
}

impl<'a> IntoIterator for &'a PipeCatalog {
    type Item = &'a PipeCatalogEntry;
    type IntoIter = std::slice::Iter<'a, PipeCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_strictly_increasing(catalog: &PipeCatalog) {
        for pair in catalog.entries().windows(2) {
            assert!(pair[0].inside_diameter.value < pair[1].inside_diameter.value);
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }
    }

    #[test]
    fn schedule_40_is_sorted() {
        let catalog = PipeCatalog::schedule_40();
        assert_eq!(catalog.len(), 21);
        assert_strictly_increasing(&catalog);
        assert_eq!(catalog.smallest().label, "1 in Sch 40");
        assert_eq!(catalog.largest().label, "48 in Sch 40");
    }

    #[test]
    fn schedule_40_survives_rebuild() {
        let catalog = PipeCatalog::schedule_40();
        let rebuilt = PipeCatalog::from_records(catalog.records()).unwrap();
        assert_eq!(rebuilt.len(), catalog.len());
        for (a, b) in catalog.iter().zip(rebuilt.iter()) {
            assert_eq!(a.label, b.label);
            assert!((a.inside_diameter.value - b.inside_diameter.value).abs() < 1e-12);
        }
    }

    #[test]
    fn from_records_sorts_and_dedups() {
        let catalog = PipeCatalog::from_records([
            PipeRecord::new("12", 12.0, 11.938),
            PipeRecord::new("6", 6.0, 6.065),
            PipeRecord::new("6 dup", 6.0, 6.065),
            PipeRecord::new("8", 8.0, 7.981),
        ])
        .unwrap();

        let labels: Vec<_> = catalog.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["6", "8", "12"]);
        assert_strictly_increasing(&catalog);
    }

    #[test]
    fn from_records_rejects_bad_rows() {
        assert_eq!(
            PipeCatalog::from_records(Vec::new()),
            Err(HydraulicError::EmptyCatalog)
        );
        assert!(PipeCatalog::from_records([PipeRecord::new("x", 1.0, 0.0)]).is_err());
        assert!(PipeCatalog::from_records([PipeRecord::new("x", 1.0, -2.0)]).is_err());
        assert!(PipeCatalog::from_records([PipeRecord::new("x", 1.0, f64::NAN)]).is_err());
    }

    #[test]
    fn flow_area_of_thirty_inch() {
        let catalog = PipeCatalog::schedule_40();
        let thirty = catalog.iter().find(|e| e.nominal_in == 30.0).unwrap();
        // 28.75 in ID
        assert!((thirty.flow_area().value - 0.41883).abs() < 1e-4);
    }
}
