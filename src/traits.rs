//! Traits used by the genomodel library.
//!

use crate::{
    error::Rejection,
    io::parsers::engine::LineContext,
    ranges::{IntervalRecord, RawInterval},
    Position,
};

/// The [`Interval`] trait defines common functionality for all interval types.
pub trait Interval {
    fn left(&self) -> Position;
    fn right(&self) -> Position;
    /// The width of the half-open interval, or zero if `right < left`.
    fn width(&self) -> Position {
        self.right().saturating_sub(self.left())
    }
}

/// An [`Interval`] that also carries a numeric value, e.g. a p-value.
pub trait ValuedInterval: Interval {
    fn value(&self) -> f64;
}

/// Format-specific data that carries a numeric value. Any
/// [`IntervalRecord<U>`] with `U: ValuedData` is a [`ValuedInterval`].
pub trait ValuedData {
    fn value(&self) -> f64;
}

/// A streaming statistics accumulator over items of type `I`.
///
/// Implementations must update in O(1) per observation and never revisit
/// earlier items.
pub trait StatisticsAccumulator<I> {
    fn update(&mut self, item: &I);
    /// Number of items observed so far.
    fn count(&self) -> usize;
}

/// The capability every file format supplies to the parser: turn an already
/// split line into an [`IntervalRecord`], or reject the line.
///
/// The parser has already parsed the left (and if configured, right)
/// positions and handles the chromosome and strand columns itself. A builder
/// is responsible for its own format-specific columns, for the final right
/// position, and for the record's identity hash (see
/// [`LineContext::identity_hash()`]).
pub trait RecordBuilder {
    /// The format-specific data stored in each record.
    type Payload;
    /// The statistics kept per chromosome and per file.
    type Statistics: StatisticsAccumulator<IntervalRecord<Self::Payload>> + Default;

    fn build(
        &self,
        fields: &[&str],
        interval: RawInterval,
        context: &mut LineContext,
    ) -> Result<IntervalRecord<Self::Payload>, Rejection>;
}

/// Defines how to serialize something to TSV.
pub trait TsvSerialize {
    // Serialize something to a TSV [`String`].
    fn to_tsv(&self) -> String;
}
