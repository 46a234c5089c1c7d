//! Column layouts: which column of a delimited line holds which field.
//!
//! A [`ColumnLayout`] is a plain value object. It is not validated against the
//! file when constructed; a column index that is out of range for some line is
//! only detected when that line is read. Indices need not be distinct or
//! contiguous, so any column order (or repetition) can be described.

use serde::{Deserialize, Serialize};

use crate::error::Rejection;

/// A single column reference, either an index into the split line or absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Index(usize),
    #[default]
    Absent,
}

impl Column {
    /// Return the column index, or `None` if the column is absent.
    pub fn index(&self) -> Option<usize> {
        match self {
            Column::Index(i) => Some(*i),
            Column::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Column::Absent)
    }

    /// Look this column up in a set of split fields.
    ///
    /// Returns `None` both when the column is absent and when the
    /// line has too few fields; use [`Column::lookup`] to tell these apart.
    pub fn get<'a>(&self, fields: &[&'a str]) -> Option<&'a str> {
        self.index().and_then(|i| fields.get(i).copied())
    }

    /// Look this column up, distinguishing an absent column (`Ok(None)`) from a
    /// configured column that is out of range for this line, which is a
    /// [`Rejection::MissingColumn`] naming the field.
    pub fn lookup<'a>(
        &self,
        name: &'static str,
        fields: &[&'a str],
    ) -> Result<Option<&'a str>, Rejection> {
        match self {
            Column::Absent => Ok(None),
            Column::Index(i) => fields
                .get(*i)
                .copied()
                .map(Some)
                .ok_or(Rejection::MissingColumn(name, fields.len())),
        }
    }
}

/// Any negative index is the "absent" sentinel.
impl From<i64> for Column {
    fn from(index: i64) -> Self {
        if index < 0 {
            Column::Absent
        } else {
            Column::Index(index as usize)
        }
    }
}

impl From<usize> for Column {
    fn from(index: usize) -> Self {
        Column::Index(index)
    }
}

impl From<Option<usize>> for Column {
    fn from(index: Option<usize>) -> Self {
        index.map_or(Column::Absent, Column::Index)
    }
}

/// The core column layout shared by all formats.
///
/// The chromosome and left-position columns are mandatory; the right position
/// and strand may be absent. Format-specific columns live on the record
/// builders (e.g. [`PeakColumns`]).
///
/// [`PeakColumns`]: crate::io::parsers::peak::PeakColumns
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub chromosome: usize,
    pub left: usize,
    pub right: Column,
    pub strand: Column,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::bed()
    }
}

impl ColumnLayout {
    pub fn new(chromosome: usize, left: usize, right: Column, strand: Column) -> Self {
        Self {
            chromosome,
            left,
            right,
            strand,
        }
    }

    /// The BED3 layout: chromosome, left and right in the first three columns,
    /// no strand.
    pub fn bed() -> Self {
        Self::new(0, 1, Column::Index(2), Column::Absent)
    }

    /// The standard nine column GTF layout.
    pub fn gtf() -> Self {
        Self::new(0, 3, Column::Index(4), Column::Index(6))
    }

    /// The VCF layout: `CHROM` and `POS` only; the right position is derived.
    pub fn vcf() -> Self {
        Self::new(0, 1, Column::Absent, Column::Absent)
    }

    /// Read a column from a split line; `None` if absent or out of range.
    pub fn get<'a>(fields: &[&'a str], column: Column) -> Option<&'a str> {
        column.get(fields)
    }

    pub fn with_strand(mut self, strand: impl Into<Column>) -> Self {
        self.strand = strand.into();
        self
    }

    pub fn with_right(mut self, right: impl Into<Column>) -> Self {
        self.right = right.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_sentinel_is_absent() {
        assert_eq!(Column::from(-1i64), Column::Absent);
        assert_eq!(Column::from(-42i64), Column::Absent);
        assert_eq!(Column::from(3i64), Column::Index(3));
    }

    #[test]
    fn test_lookup() {
        let fields = vec!["chr1", "10", "20"];
        assert_eq!(Column::Index(2).lookup("right", &fields), Ok(Some("20")));
        assert_eq!(
            Column::Index(3).lookup("name", &fields),
            Err(Rejection::MissingColumn("name", 3))
        );
        assert_eq!(Column::Absent.lookup("name", &fields), Ok(None));
        assert_eq!(Column::Index(3).get(&fields), None);
    }

    #[test]
    fn test_repeated_columns_are_legal() {
        let layout = ColumnLayout::new(0, 1, Column::Index(1), Column::Absent);
        let fields = vec!["chr1", "10"];
        assert_eq!(layout.right.get(&fields), Some("10"));
        assert_eq!(ColumnLayout::get(&fields, layout.strand), None);
        assert_eq!(ColumnLayout::get(&fields, Column::Index(0)), Some("chr1"));
    }
}
