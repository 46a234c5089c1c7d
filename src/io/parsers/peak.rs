//! Peak files: BED-like intervals with a name, a numeric value (usually a
//! p-value or q-value) and a summit position.
//!
//! Peak callers write values in several scales (raw, `-log10`, `-10 log10`,
//! ...). The [`ValueFormat`] says how to decode a value column back to the
//! raw scale, so that statistics over values from different callers are
//! comparable.
//!
//! ```
//! use genomodel::prelude::*;
//!
//! let builder = PeakBuilder::default()
//!     .with_value_format(ValueFormat::MinusTenLog10)
//!     .with_drop_invalid_value(true);
//! let parser = Parser::new(ParserConfig::default(), builder);
//! let parsed = parser.parse("tests_data/peaks.bed").unwrap();
//! assert_eq!(parsed.record_count(), 6);
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    error::Rejection,
    layout::Column,
    ranges::{IntervalRecord, RawInterval},
    statistics::ValueStatistics,
    traits::{RecordBuilder, TsvSerialize, ValuedData},
    Position,
};

use super::engine::{parse_position, LineContext};

/// The value used when a peak has no valid value.
pub const DEFAULT_PEAK_VALUE: f64 = 1e-8;

/// How values in the value column are encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ValueFormat {
    /// The value is used as is.
    #[default]
    SameAsInput,
    /// `-log10(v)`
    MinusOneLog10,
    /// `-10 log10(v)`
    MinusTenLog10,
    /// `-100 log10(v)`
    MinusHundredLog10,
}

impl ValueFormat {
    /// Decode a column value back to the raw scale.
    pub fn decode(&self, value: f64) -> f64 {
        match self {
            ValueFormat::SameAsInput => value,
            ValueFormat::MinusOneLog10 => 10f64.powf(-value),
            ValueFormat::MinusTenLog10 => 10f64.powf(-value / 10.0),
            ValueFormat::MinusHundredLog10 => 10f64.powf(-value / 100.0),
        }
    }
}

/// The peak-specific columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakColumns {
    pub name: Column,
    pub value: Column,
    pub summit: Column,
}

/// BED5-style: name in column 4, value in column 5, no summit.
impl Default for PeakColumns {
    fn default() -> Self {
        Self {
            name: Column::Index(3),
            value: Column::Index(4),
            summit: Column::Absent,
        }
    }
}

/// One peak.
#[derive(Clone, Debug, PartialEq)]
pub struct Peak {
    pub name: String,
    pub value: f64,
    pub summit: Position,
}

impl ValuedData for Peak {
    fn value(&self) -> f64 {
        self.value
    }
}

impl TsvSerialize for Peak {
    fn to_tsv(&self) -> String {
        format!("{}\t{}\t{}", self.name, self.value, self.summit)
    }
}

pub type PeakRecord = IntervalRecord<Peak>;
pub type PeakStatistics = ValueStatistics<Peak>;

/// The [`RecordBuilder`] for peak files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakBuilder {
    pub columns: PeakColumns,
    pub value_format: ValueFormat,
    pub default_value: f64,
    /// Reject lines with an unparsable value, rather than using `default_value`.
    pub drop_invalid_value: bool,
}

impl Default for PeakBuilder {
    fn default() -> Self {
        Self {
            columns: PeakColumns::default(),
            value_format: ValueFormat::default(),
            default_value: DEFAULT_PEAK_VALUE,
            drop_invalid_value: false,
        }
    }
}

impl PeakBuilder {
    pub fn new(columns: PeakColumns) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// A builder for plain BED3 files: no name, value or summit columns.
    pub fn bed3() -> Self {
        Self::new(PeakColumns {
            name: Column::Absent,
            value: Column::Absent,
            summit: Column::Absent,
        })
    }

    pub fn with_value_format(mut self, value_format: ValueFormat) -> Self {
        self.value_format = value_format;
        self
    }

    pub fn with_default_value(mut self, default_value: f64) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_drop_invalid_value(mut self, drop_invalid_value: bool) -> Self {
        self.drop_invalid_value = drop_invalid_value;
        self
    }

    /// The decoded value. An absent value column always gives the default;
    /// a value missing from the line or unparsable is dropped if
    /// `drop_invalid_value` is set, and defaulted otherwise.
    fn value(&self, fields: &[&str], context: &mut LineContext) -> Result<f64, Rejection> {
        let raw = match self.columns.value.lookup("value", fields) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                context.mark_defaulted();
                return Ok(self.default_value);
            }
            Err(rejection) if self.drop_invalid_value => return Err(rejection),
            Err(_) => {
                context.mark_defaulted();
                return Ok(self.default_value);
            }
        };
        match raw.trim().parse::<f64>() {
            Ok(value) => Ok(self.value_format.decode(value)),
            Err(_) if self.drop_invalid_value => Err(Rejection::InvalidValue(raw.to_string())),
            Err(_) => {
                context.mark_defaulted();
                Ok(self.default_value)
            }
        }
    }
}

impl RecordBuilder for PeakBuilder {
    type Payload = Peak;
    type Statistics = PeakStatistics;

    fn build(
        &self,
        fields: &[&str],
        interval: RawInterval,
        context: &mut LineContext,
    ) -> Result<PeakRecord, Rejection> {
        let left = interval.left;
        let right = interval.right.unwrap_or(left);

        let name = self
            .columns
            .name
            .lookup("name", fields)?
            .map(|name| name.trim().to_string())
            .unwrap_or_default();
        let value = self.value(fields, context)?;
        let summit = self
            .columns
            .summit
            .get(fields)
            .and_then(parse_position)
            .unwrap_or_else(|| left + right.saturating_sub(left) / 2);

        let hash = context.identity_hash(&[&left, &right, &name, &value, &summit]);
        Ok(IntervalRecord::new(
            left,
            right,
            hash,
            Peak {
                name,
                value,
                summit,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hashing::HashFunction,
        io::parsers::{Parser, ParserConfig},
        ranges::Strand,
        test_utilities::temp_file_with,
    };

    fn context() -> LineContext {
        LineContext::new(1, 12345, HashFunction::OneAtATime)
    }

    fn interval(left: Position, right: Position) -> RawInterval {
        RawInterval {
            left,
            right: Some(right),
        }
    }

    #[test]
    fn test_value_formats() {
        assert_eq!(ValueFormat::SameAsInput.decode(0.25), 0.25);
        assert!((ValueFormat::MinusOneLog10.decode(2.0) - 0.01).abs() < 1e-12);
        assert!((ValueFormat::MinusTenLog10.decode(30.0) - 0.001).abs() < 1e-12);
        assert!((ValueFormat::MinusHundredLog10.decode(500.0) - 1e-5).abs() < 1e-15);
    }

    #[test]
    fn test_build_peak() {
        let builder = PeakBuilder::default();
        let mut ctx = context();
        let fields = vec!["chr1", "100", "200", "peak_1", "0.001"];
        let record = builder.build(&fields, interval(100, 200), &mut ctx).unwrap();

        assert_eq!(record.right, 200);
        assert_eq!(record.data.name, "peak_1");
        assert_eq!(record.data.value, 0.001);
        assert_eq!(record.data.summit, 150);
        assert!(!ctx.is_defaulted());
    }

    #[test]
    fn test_invalid_value_defaults_or_drops() {
        let fields = vec!["chr1", "100", "200", "peak_1", "NA"];

        let mut ctx = context();
        let record = PeakBuilder::default()
            .with_default_value(0.5)
            .build(&fields, interval(100, 200), &mut ctx)
            .unwrap();
        assert_eq!(record.data.value, 0.5);
        assert!(ctx.is_defaulted());

        let result = PeakBuilder::default()
            .with_drop_invalid_value(true)
            .build(&fields, interval(100, 200), &mut context());
        assert_eq!(result, Err(Rejection::InvalidValue("NA".to_string())));
    }

    #[test]
    fn test_absent_columns() {
        let mut ctx = context();
        let fields = vec!["chr1", "10", "21"];
        let record = PeakBuilder::bed3()
            .build(&fields, interval(10, 21), &mut ctx)
            .unwrap();
        assert_eq!(record.data.name, "");
        assert_eq!(record.data.value, DEFAULT_PEAK_VALUE);
        assert_eq!(record.data.summit, 15);
        assert!(ctx.is_defaulted());
    }

    #[test]
    fn test_missing_configured_column() {
        let fields = vec!["chr1", "10", "21"];
        let result = PeakBuilder::default().build(&fields, interval(10, 21), &mut context());
        assert_eq!(result, Err(Rejection::MissingColumn("name", 3)));
    }

    #[test]
    fn test_missing_value_column_defaults_or_drops() {
        let fields = vec!["chr1", "10", "21", "peak_1"];

        let mut ctx = context();
        let record = PeakBuilder::default()
            .build(&fields, interval(10, 21), &mut ctx)
            .unwrap();
        assert_eq!(record.data.value, DEFAULT_PEAK_VALUE);
        assert!(ctx.is_defaulted());

        let result = PeakBuilder::default()
            .with_drop_invalid_value(true)
            .build(&fields, interval(10, 21), &mut context());
        assert_eq!(result, Err(Rejection::MissingColumn("value", 4)));
    }

    #[test]
    fn test_bed4_line_among_bed5_lines() {
        let file = temp_file_with(
            "chr1\t10\t20\tp1\t0.5\nchr1\t30\t40\tp2\nchr1\t50\t60\tp3\t0.1\n",
            ".bed",
        );

        let parsed = Parser::new(ParserConfig::default(), PeakBuilder::default())
            .parse(file.path())
            .unwrap();
        assert_eq!(parsed.record_count(), 3);
        assert_eq!(parsed.dropped_count(), 0);
        assert_eq!(parsed.defaulted_count(), 1);
        let records = parsed.index().strand("chr1", Strand::Unstranded).unwrap();
        assert_eq!(records[1].data.value, DEFAULT_PEAK_VALUE);

        let builder = PeakBuilder::default().with_drop_invalid_value(true);
        let parsed = Parser::new(ParserConfig::default(), builder)
            .parse(file.path())
            .unwrap();
        assert_eq!(parsed.record_count(), 2);
        assert_eq!(parsed.dropped_count(), 1);
        assert_eq!(parsed.defaulted_count(), 0);
        assert_eq!(
            parsed.messages()[1],
            "Line 2: missing value column (line has 4 columns)"
        );
    }

    #[test]
    fn test_summit_column() {
        let builder = PeakBuilder::new(PeakColumns {
            summit: Column::Index(5),
            ..PeakColumns::default()
        });
        let fields = vec!["chr1", "100", "200", "p", "1e-5", "180"];
        let record = builder
            .build(&fields, interval(100, 200), &mut context())
            .unwrap();
        assert_eq!(record.data.summit, 180);

        // invalid summits fall back to the midpoint
        let fields = vec!["chr1", "100", "200", "p", "1e-5", "x"];
        let record = builder
            .build(&fields, interval(100, 200), &mut context())
            .unwrap();
        assert_eq!(record.data.summit, 150);
    }

    #[test]
    fn test_hash_depends_on_line() {
        let builder = PeakBuilder::default();
        let fields = vec!["chr1", "100", "200", "peak_1", "0.001"];
        let a = builder
            .build(&fields, interval(100, 200), &mut LineContext::new(1, 7, HashFunction::Fnv))
            .unwrap();
        let b = builder
            .build(&fields, interval(100, 200), &mut LineContext::new(2, 7, HashFunction::Fnv))
            .unwrap();
        let c = builder
            .build(&fields, interval(100, 200), &mut LineContext::new(1, 7, HashFunction::Fnv))
            .unwrap();
        assert_ne!(a.hash, b.hash);
        assert_eq!(a.hash, c.hash);
    }
}
