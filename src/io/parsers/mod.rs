//! Parsers for genomic interval formats.
//!
//! Every format is read by the same streaming [`Parser`], which is generic over
//! a [`RecordBuilder`]. The parser owns the read loop, the core columns
//! (chromosome, left, right and strand), chromosome normalization, progress
//! reporting and error accounting; a builder turns the remaining columns of a
//! line into the format's record type.
//!
//! | Format | Builder | Record data | Statistics |
//! | --- | --- | --- | --- |
//! | Peak/BED | [`PeakBuilder`] | [`Peak`] | [`PeakStatistics`] |
//! | GTF | [`GtfBuilder`] | [`GtfFeature`] | [`GtfStatistics`] |
//! | RefSeq | [`RefSeqBuilder`] | [`Gene`] | [`IntervalStatistics`] |
//! | VCF | [`VcfBuilder`] | [`Variant`] | [`VariantStatistics`] |
//!
//! # Errors
//!
//! Problems with single lines never abort a parse. The line is dropped and the
//! reason recorded in [`ParsedFile::messages()`]. A parse only fails if the
//! file cannot be opened or read.
//!
//! [`RecordBuilder`]: crate::traits::RecordBuilder
//! [`IntervalStatistics`]: crate::statistics::IntervalStatistics

pub mod detect;
pub mod engine;
pub mod gtf;
pub mod peak;
pub mod refseq;
pub mod utils;
pub mod vcf;

pub use detect::IntervalFormat;
pub use engine::{LineContext, ParsedFile, Parser, ParserConfig, Progress};
pub use gtf::{GtfBuilder, GtfColumns, GtfFeature, GtfStatistics};
pub use peak::{Peak, PeakBuilder, PeakColumns, PeakStatistics, ValueFormat};
pub use refseq::{Gene, RefSeqBuilder, RefSeqColumns};
pub use vcf::{Variant, VariantStatistics, VcfBuilder, VcfColumns};
