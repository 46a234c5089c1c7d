//! # genomodel: streaming genomic interval parsing
//!
//! genomodel reads tab-delimited genomic interval files (peak/BED files, GTF
//! feature tables, RefSeq gene tables and VCF variant calls) into a
//! [`GenomeIndex`](genome::GenomeIndex): records grouped by chromosome, then
//! strand, with running statistics kept for each chromosome and for the whole
//! file.
//!
//! ```
//! use genomodel::prelude::*;
//!
//! let config = ParserConfig::new(ColumnLayout::bed())
//!     .with_assembly(Assembly::Hg38, false);
//! let parser = Parser::new(config, PeakBuilder::default());
//! let parsed = parser.parse("tests_data/peaks.bed").unwrap();
//!
//! let chr1 = parsed.index().chromosome("chr1").unwrap();
//! assert!(chr1.statistics().width.count() > 0);
//! ```
//!
//! The column layout is configurable, so files with extra columns or columns
//! in a different order can be read. Lines that can't be parsed are dropped
//! and reported in [`ParsedFile::messages()`](io::ParsedFile::messages), never
//! raised as errors.

pub use indexmap;

pub mod assembly;
pub mod commands;
pub mod error;
pub mod genome;
pub mod hashing;
pub mod io;
pub mod layout;
pub mod ranges;
pub mod reporting;
pub mod statistics;
pub mod test_utilities;
pub mod traits;

pub use error::GenomeModelError;

/// The type used to store genomic positions.
#[cfg(not(feature = "big-position"))]
pub type Position = u32;
#[cfg(feature = "big-position")]
pub type Position = u64;

/// Create an [`IndexMap`](indexmap::IndexMap) of sequence names and their
/// lengths, e.g. for a custom [`Assembly`](assembly::Assembly).
///
/// ```
/// use genomodel::seqlens;
///
/// let sl = seqlens! { "chr1" => 100, "chr2" => 200 };
/// assert_eq!(sl["chr2"], 200);
/// ```
#[macro_export]
macro_rules! seqlens {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::indexmap::indexmap!($($key.to_string() => $value),*)
    };
}

pub mod prelude {
    pub use crate::assembly::{Assembly, ChromosomeComparison};
    pub use crate::error::{GenomeModelError, Rejection};
    pub use crate::genome::{Chromosome, GenomeIndex};
    pub use crate::hashing::HashFunction;
    pub use crate::io::parsers::{
        GtfBuilder, GtfColumns, IntervalFormat, ParsedFile, Parser, ParserConfig, PeakBuilder,
        PeakColumns, Progress, RefSeqBuilder, RefSeqColumns, ValueFormat, VcfBuilder, VcfColumns,
    };
    pub use crate::layout::{Column, ColumnLayout};
    pub use crate::ranges::{IntervalRecord, Strand};
    pub use crate::statistics::{
        IntervalStatistics, RunningStats, SummaryStatistics, ValueStatistics,
    };
    pub use crate::traits::{Interval, RecordBuilder, StatisticsAccumulator, TsvSerialize};
    pub use crate::seqlens;
}
