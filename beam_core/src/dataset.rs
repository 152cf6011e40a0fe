//! # Beam Force Dataset
//!
//! The in-memory table the whole report is built from: one [`Sample`] per
//! spreadsheet row, holding a position along the beam and the shear force and
//! bending moment measured there.
//!
//! Column headers are resolved through [`Field::resolve`], which compares
//! headers case- and whitespace-insensitively against a fixed alias set and
//! ignores a trailing unit annotation, so `"Shear Force"`, `"shear force"`
//! and `"Shear force (kN)"` all select the same column.
//!
//! Rows are kept in file order. Interpolation requires strictly increasing
//! positions, but sorting is left to whoever produced the data.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ReportError, ReportResult};
use crate::units::{KiloNewtonMeters, KiloNewtons, Meters};

/// Minimum number of complete rows needed to draw a curve
pub const MIN_SAMPLES: usize = 3;

/// One row of the force table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: Meters,
    pub shear_force: KiloNewtons,
    pub bending_moment: KiloNewtonMeters,
}

impl Sample {
    pub fn new(position: f64, shear_force: f64, bending_moment: f64) -> Self {
        Sample {
            position: Meters(position),
            shear_force: KiloNewtons(shear_force),
            bending_moment: KiloNewtonMeters(bending_moment),
        }
    }

    /// Raw value of a field
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Position => self.position.0,
            Field::ShearForce => self.shear_force.0,
            Field::BendingMoment => self.bending_moment.0,
        }
    }
}

/// The three columns a force table must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Position,
    ShearForce,
    BendingMoment,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Position, Field::ShearForce, Field::BendingMoment];

    /// Human-readable field name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Field::Position => "position",
            Field::ShearForce => "shear force",
            Field::BendingMoment => "bending moment",
        }
    }

    /// Accepted header spellings, already in normalized form
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Position => &["x", "position", "pos", "distance", "location"],
            Field::ShearForce => &["shearforce", "shear", "sf", "v"],
            Field::BendingMoment => &["bendingmoment", "moment", "bm", "m"],
        }
    }

    /// Index of the first header matching one of this field's aliases.
    ///
    /// # Example
    ///
    /// ```rust
    /// use beam_core::dataset::Field;
    ///
    /// let headers = vec!["x".to_string(), "Shear Force".to_string(), "Bending moment".to_string()];
    /// assert_eq!(Field::ShearForce.resolve(&headers).unwrap(), 1);
    /// ```
    pub fn resolve(&self, headers: &[String]) -> ReportResult<usize> {
        let aliases = self.aliases();
        headers
            .iter()
            .position(|h| aliases.contains(&normalize_header(h).as_str()))
            .ok_or_else(|| ReportError::missing_column(self.name(), headers))
    }
}

/// Lowercase a header, drop a trailing `(unit)` / `[unit]` and remove all
/// whitespace and underscores.
pub fn normalize_header(header: &str) -> String {
    let trimmed = header.trim();
    let without_unit = match trimmed.char_indices().rev().find(|&(_, c)| c == '(' || c == '[') {
        Some((idx, _)) if trimmed.ends_with(')') || trimmed.ends_with(']') => &trimmed[..idx],
        _ => trimmed,
    };
    without_unit
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Header row plus numeric cells as read from a spreadsheet.
///
/// A cell is `None` when it is empty or not a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// Validated force table, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Wrap samples, requiring at least [`MIN_SAMPLES`] of them.
    pub fn new(samples: Vec<Sample>) -> ReportResult<Self> {
        if samples.len() < MIN_SAMPLES {
            return Err(ReportError::insufficient_data(samples.len(), MIN_SAMPLES));
        }
        Ok(Dataset { samples })
    }

    /// Build a dataset from a raw table.
    ///
    /// Every required column is resolved before any row is inspected, so a
    /// missing column is reported even when the table has no data rows.
    /// Rows with an empty or non-numeric value in any required column are
    /// dropped.
    pub fn from_table(table: &RawTable) -> ReportResult<Self> {
        let position = Field::Position.resolve(&table.headers)?;
        let shear = Field::ShearForce.resolve(&table.headers)?;
        let moment = Field::BendingMoment.resolve(&table.headers)?;
        debug!(position, shear, moment, "resolved force table columns");

        let mut samples = Vec::with_capacity(table.rows.len());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = |i: usize| row.get(i).copied().flatten();
            match (cell(position), cell(shear), cell(moment)) {
                (Some(x), Some(v), Some(m)) => samples.push(Sample::new(x, v, m)),
                _ => debug!(row = row_idx + 2, "dropping incomplete row"),
            }
        }

        Dataset::new(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All values of one column, in row order
    pub fn column(&self, field: Field) -> Vec<f64> {
        self.samples.iter().map(|s| s.get(field)).collect()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.column(Field::Position)
    }

    /// Smallest and largest value of a column
    pub fn range(&self, field: Field) -> (f64, f64) {
        self.samples
            .iter()
            .map(|s| s.get(field))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }

    /// Distance between the first and last position
    pub fn span(&self) -> Meters {
        let (lo, hi) = self.range(Field::Position);
        Meters(hi - lo)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The simply supported beam example: 15 m span, 6 kN/m.
    pub(crate) fn documentation_example() -> Dataset {
        let samples = (0..=10)
            .map(|i| {
                let x = i as f64 * 1.5;
                Sample::new(x, 45.0 - 6.0 * x, 45.0 * x - 3.0 * x * x)
            })
            .collect();
        Dataset::new(samples).unwrap()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_documentation_example_rows() {
        let ds = documentation_example();
        assert_eq!(ds.len(), 11);
        assert_eq!(ds.samples()[1], Sample::new(1.5, 36.0, 60.75));
        assert_eq!(ds.samples()[5], Sample::new(7.5, 0.0, 168.75));
        assert_eq!(ds.samples()[10], Sample::new(15.0, -45.0, 0.0));
        assert_eq!(ds.span(), Meters(15.0));
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Shear Force "), "shearforce");
        assert_eq!(normalize_header("Bending Moment (kN·m)"), "bendingmoment");
        assert_eq!(normalize_header("x [m]"), "x");
        assert_eq!(normalize_header("bending_moment"), "bendingmoment");
    }

    #[test]
    fn test_shear_alias_capitalization() {
        let lower = headers(&["x", "Shear force", "Bending Moment"]);
        let upper = headers(&["x", "Shear Force", "Bending Moment"]);
        assert_eq!(
            Field::ShearForce.resolve(&lower).unwrap(),
            Field::ShearForce.resolve(&upper).unwrap()
        );
    }

    #[test]
    fn test_position_aliases() {
        assert_eq!(Field::Position.resolve(&headers(&["Position", "V", "M"])).unwrap(), 0);
        assert_eq!(Field::Position.resolve(&headers(&["V", "M", "x (m)"])).unwrap(), 2);
    }

    #[test]
    fn test_missing_shear_column() {
        let table = RawTable {
            headers: headers(&["x", "Load", "Bending Moment"]),
            rows: vec![vec![Some(0.0), Some(1.0), Some(0.0)]; 5],
        };
        match Dataset::from_table(&table) {
            Err(ReportError::MissingColumn { field, available }) => {
                assert_eq!(field, "shear force");
                assert!(available.contains("Load"));
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let table = RawTable {
            headers: headers(&["x", "Shear force", "Bending moment"]),
            rows: vec![
                vec![Some(0.0), Some(10.0), Some(0.0)],
                vec![Some(1.0), None, Some(5.0)],
                vec![Some(2.0), Some(0.0), Some(10.0)],
                vec![Some(3.0), Some(-10.0)],
                vec![Some(4.0), Some(-10.0), Some(0.0)],
            ],
        };
        let ds = Dataset::from_table(&table).unwrap();
        assert_eq!(ds.positions(), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_insufficient_after_drop() {
        let table = RawTable {
            headers: headers(&["x", "Shear force", "Bending moment"]),
            rows: vec![
                vec![Some(0.0), Some(10.0), Some(0.0)],
                vec![None, Some(0.0), Some(5.0)],
                vec![Some(2.0), Some(0.0), Some(10.0)],
            ],
        };
        assert_eq!(
            Dataset::from_table(&table),
            Err(ReportError::insufficient_data(2, MIN_SAMPLES))
        );
    }

    #[test]
    fn test_range_and_column() {
        let ds = documentation_example();
        assert_eq!(ds.range(Field::ShearForce), (-45.0, 45.0));
        assert_eq!(ds.column(Field::BendingMoment)[5], 168.75);
    }
}
