//! `C×R×F` layout parsing and hall naming.

use std::fmt;
use std::str::FromStr;

use crate::error::{LayoutError, LayoutResult};

/// Two-letter column names run out at `ZZ`.
pub const MAX_COLUMNS: u32 = 26 + 26 * 26;

/// Upper bound on halls in one building; every hall is materialized.
pub const MAX_HALLS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutSpec {
    pub columns: u32,
    pub rows: u32,
    pub floors: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutStats {
    pub columns: u32,
    pub rows: u32,
    pub floors: u32,
    pub total_halls: u32,
    pub halls_per_floor: u32,
}

/// Position of one hall. `column` is 0-based; `row` and `floor` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HallId {
    pub floor: u32,
    pub column: u32,
    pub row: u32,
}

impl HallId {
    pub fn column_name(&self) -> String {
        column_letters(self.column)
    }

    /// `A1` without floors, `A1-F2` with.
    pub fn name(&self, include_floors: bool) -> String {
        if include_floors {
            format!("{}{}-F{}", self.column_name(), self.row, self.floor)
        } else {
            format!("{}{}", self.column_name(), self.row)
        }
    }
}

/// Letters for a 0-based column index: A..Z, then AA, AB, ... ZZ.
pub fn column_letters(index: u32) -> String {
    let letter = |i: u32| char::from(b'A' + (i % 26) as u8);
    if index < 26 {
        letter(index).to_string()
    } else {
        let mut s = String::with_capacity(2);
        s.push(letter(index / 26 - 1));
        s.push(letter(index % 26));
        s
    }
}

/// Parses `C×R×F`, accepting `x`, `X` or `×` between three positive integers.
pub fn parse_layout(input: &str) -> LayoutResult<LayoutSpec> {
    let normalized = input.trim().replace(['×', 'X'], "x");
    if normalized.is_empty() {
        return Err(LayoutError::invalid_layout(input, "layout cannot be empty"));
    }

    let parts: Vec<&str> = normalized.split('x').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(LayoutError::invalid_layout(
            input,
            "expected columns x rows x floors",
        ));
    }

    let mut dims = [0u32; 3];
    for (dim, part) in dims.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LayoutError::invalid_layout(
                input,
                format!("'{part}' is not a positive integer"),
            ));
        }
        *dim = part
            .parse()
            .map_err(|_| LayoutError::invalid_layout(input, format!("'{part}' is out of range")))?;
        if *dim == 0 {
            return Err(LayoutError::invalid_layout(
                input,
                "all dimensions must be positive",
            ));
        }
    }

    let [columns, rows, floors] = dims;
    LayoutSpec::new(columns, rows, floors).map_err(|e| match e {
        LayoutError::InvalidLayout { reason, .. } => LayoutError::invalid_layout(input, reason),
        other => other,
    })
}

impl LayoutSpec {
    pub fn new(columns: u32, rows: u32, floors: u32) -> LayoutResult<Self> {
        let spec = Self {
            columns,
            rows,
            floors,
        };
        if columns == 0 || rows == 0 || floors == 0 {
            return Err(LayoutError::invalid_layout(
                &spec.to_string(),
                "all dimensions must be positive",
            ));
        }
        if columns > MAX_COLUMNS {
            return Err(LayoutError::invalid_layout(
                &spec.to_string(),
                format!("at most {MAX_COLUMNS} columns can be named"),
            ));
        }
        let halls = columns.checked_mul(rows).and_then(|n| n.checked_mul(floors));
        if !halls.is_some_and(|n| n <= MAX_HALLS) {
            return Err(LayoutError::invalid_layout(
                &spec.to_string(),
                format!("at most {MAX_HALLS} halls are supported"),
            ));
        }
        Ok(spec)
    }

    pub fn halls_per_floor(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn total_halls(&self) -> u32 {
        self.halls_per_floor() * self.floors
    }

    pub fn stats(&self) -> LayoutStats {
        LayoutStats {
            columns: self.columns,
            rows: self.rows,
            floors: self.floors,
            total_halls: self.total_halls(),
            halls_per_floor: self.halls_per_floor(),
        }
    }

    /// All halls, floor-major, then column, then row.
    pub fn halls(&self) -> impl Iterator<Item = HallId> + '_ {
        (1..=self.floors).flat_map(move |floor| {
            (0..self.columns).flat_map(move |column| {
                (1..=self.rows).map(move |row| HallId { floor, column, row })
            })
        })
    }

    /// Hall names in generation order.
    ///
    /// Without floor suffixes names repeat on every floor, so that form is
    /// only accepted for single-floor layouts.
    pub fn hall_names(&self, include_floors: bool) -> LayoutResult<Vec<String>> {
        self.check_naming(include_floors)?;
        Ok(self.halls().map(|h| h.name(include_floors)).collect())
    }

    pub(crate) fn check_naming(&self, include_floors: bool) -> LayoutResult<()> {
        if !include_floors && self.floors > 1 {
            return Err(LayoutError::invalid_layout(
                &self.to_string(),
                "multi-floor layouts need floor suffixes in hall names",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for LayoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.columns, self.rows, self.floors)
    }
}

impl FromStr for LayoutSpec {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_layout(s)
    }
}
