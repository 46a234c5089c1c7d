//! Interval records and strands.
//!

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    traits::{Interval, TsvSerialize, ValuedData, ValuedInterval},
    Position,
};

/// Nucleotide strand.
///
/// Parsing is permissive: anything other than exactly `+`, `-` or `*` is
/// treated as [`Strand::Unstranded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unstranded,
}

impl Strand {
    /// Parse a strand column, coercing anything unrecognized to `*`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unstranded,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unstranded => '*',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The left and right positions read by the parser before a record is built.
///
/// `right` is `None` when the layout has no right column; record builders
/// decide what it defaults to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawInterval {
    pub left: Position,
    pub right: Option<Position>,
}

/// A parsed interval, carrying its identity hash and some format-specific data.
///
/// The interval is half-open, `[left, right)`. Note that `right > left` is
/// *not* enforced here: builders may produce zero-width intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRecord<U> {
    pub left: Position,
    pub right: Position,
    pub hash: u32,
    pub data: U,
}

impl<U> IntervalRecord<U> {
    pub fn new(left: Position, right: Position, hash: u32, data: U) -> Self {
        Self {
            left,
            right,
            hash,
            data,
        }
    }
}

impl<U> Interval for IntervalRecord<U> {
    fn left(&self) -> Position {
        self.left
    }
    fn right(&self) -> Position {
        self.right
    }
}

impl<U: ValuedData> ValuedInterval for IntervalRecord<U> {
    fn value(&self) -> f64 {
        self.data.value()
    }
}

impl<U: TsvSerialize> TsvSerialize for IntervalRecord<U> {
    fn to_tsv(&self) -> String {
        format!("{}\t{}\t{}", self.left, self.right, self.data.to_tsv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_lenient_parse() {
        assert_eq!(Strand::parse_lenient("+"), Strand::Forward);
        assert_eq!(Strand::parse_lenient("-"), Strand::Reverse);
        assert_eq!(Strand::parse_lenient("*"), Strand::Unstranded);
        assert_eq!(Strand::parse_lenient("Z"), Strand::Unstranded);
        assert_eq!(Strand::parse_lenient("."), Strand::Unstranded);
        assert_eq!(Strand::parse_lenient("+-"), Strand::Unstranded);
        assert_eq!(Strand::parse_lenient(""), Strand::Unstranded);
    }

    #[test]
    fn test_width() {
        let record = IntervalRecord::new(10, 25, 0, ());
        assert_eq!(record.width(), 15);
        let empty = IntervalRecord::new(25, 10, 0, ());
        assert_eq!(empty.width(), 0);
    }
}
