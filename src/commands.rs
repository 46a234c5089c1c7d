//! Command functions for the `genomodel` command line tool.
//!
//! Each command parses one file with the parser for its format, writes TSV
//! output, and returns a [`CommandOutput`] whose [`Report`] holds the parse
//! diagnostics.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    assembly::Assembly,
    error::GenomeModelError,
    hashing::HashFunction,
    io::{
        parsers::{
            peak::DEFAULT_PEAK_VALUE, GtfBuilder, IntervalFormat, ParsedFile, Parser,
            ParserConfig, PeakBuilder, RefSeqBuilder, ValueFormat, VcfBuilder,
        },
        OutputFile,
    },
    reporting::{CommandOutput, Report},
    statistics::{RunningStats, SummaryStatistics},
    traits::{RecordBuilder, TsvSerialize},
    Position,
};

/// The options shared by all commands that parse an interval file.
#[derive(Args, Clone, Debug)]
pub struct ParseOptions {
    /// an input interval file (plaintext or gzip-compressed)
    #[arg(required = true)]
    pub input: PathBuf,

    /// the file format (detected from the extension if not specified)
    #[arg(long, value_enum)]
    pub format: Option<IntervalFormat>,

    /// a built-in assembly (hg19, hg38, mm10, dm6), or the name of the
    /// assembly given with --genome
    #[arg(long)]
    pub assembly: Option<String>,

    /// a TSV genome file of chromosome names and their lengths
    #[arg(long)]
    pub genome: Option<PathBuf>,

    /// drop records on chromosomes that are not in the assembly
    #[arg(long)]
    pub restrict: bool,

    /// number of header lines to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// maximum number of lines to read after the header
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// the hash function used for record identity hashes
    #[arg(long, value_enum, default_value_t = HashFunction::OneAtATime)]
    pub hash: HashFunction,

    /// the column delimiter
    #[arg(long, default_value_t = '\t')]
    pub delimiter: char,

    /// how peak values are encoded
    #[arg(long, value_enum, default_value_t = ValueFormat::SameAsInput)]
    pub value_format: ValueFormat,

    /// the value used for peaks with a missing or invalid value
    #[arg(long, default_value_t = DEFAULT_PEAK_VALUE)]
    pub default_value: f64,

    /// drop peaks with an invalid value instead of using the default value
    #[arg(long)]
    pub drop_invalid: bool,

    /// print the parsing progress to standard error
    #[arg(long)]
    pub progress: bool,
}

impl ParseOptions {
    /// The format given with `--format`, or detected from the extension.
    pub fn format(&self) -> Result<IntervalFormat, GenomeModelError> {
        match self.format {
            Some(format) => Ok(format),
            None => IntervalFormat::detect(&self.input),
        }
    }

    /// The assembly: a custom one if a genome file is given, otherwise a
    /// built-in one, otherwise [`Assembly::Unknown`].
    pub fn assembly(&self) -> Result<Assembly, GenomeModelError> {
        match (&self.genome, &self.assembly) {
            (Some(genome), name) => {
                let name = name.as_deref().unwrap_or("custom");
                Assembly::from_genome_file(name, genome)
            }
            (None, Some(name)) => name.parse(),
            (None, None) => Ok(Assembly::Unknown),
        }
    }

    pub fn config(&self, format: IntervalFormat) -> Result<ParserConfig, GenomeModelError> {
        let mut config = ParserConfig::new(format.default_layout())
            .with_read_offset(self.skip)
            .with_hash_function(self.hash)
            .with_assembly(self.assembly()?, self.restrict)
            .with_delimiter(self.delimiter);
        if let Some(max_lines) = self.max_lines {
            config = config.with_max_lines(max_lines);
        }
        if let Some(prefix) = format.comment_prefix() {
            config = config.with_comment_prefix(prefix);
        }
        debug!("parser configuration: {:?}", config);
        Ok(config)
    }

    pub fn peak_builder(&self) -> PeakBuilder {
        PeakBuilder::default()
            .with_value_format(self.value_format)
            .with_default_value(self.default_value)
            .with_drop_invalid_value(self.drop_invalid)
    }

    fn parse<B: RecordBuilder>(
        &self,
        parser: &Parser<B>,
    ) -> Result<ParsedFile<B::Payload, B::Statistics>, GenomeModelError> {
        if !self.progress {
            return parser.parse(&self.input);
        }
        let parsed = parser.parse_with_progress(&self.input, |progress| {
            eprint!("\rparsing {}%", progress);
        });
        eprintln!();
        parsed
    }
}

/// Build an [`OutputFile`] for an optional output path (standard output if `None`).
fn output_file(output: Option<&PathBuf>) -> OutputFile {
    output.map_or(OutputFile::new_stdout(None), |file| {
        OutputFile::new(file, None)
    })
}

/// Collect the diagnostics of a parse into a [`Report`].
fn parse_report<U, S>(parsed: &ParsedFile<U, S>) -> Report {
    let mut report = Report::new();
    for message in parsed.messages() {
        report.add_issue(message.clone());
    }
    if !parsed.excess_chromosomes().is_empty() {
        report.add_issue(format!(
            "{} chromosome(s) not in the {} assembly: {}",
            parsed.excess_chromosomes().len(),
            parsed.assembly(),
            parsed.excess_chromosomes().join(", ")
        ));
    }
    if !parsed.missing_chromosomes().is_empty() {
        report.add_issue(format!(
            "{} chromosome(s) of the {} assembly have no records",
            parsed.missing_chromosomes().len(),
            parsed.assembly()
        ));
    }
    report
}

/// One row of the summary table.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    chromosome: &'a str,
    records: usize,
    width_min: Option<Position>,
    width_max: Option<Position>,
    width_mean: f64,
    width_sd: f64,
    value_mean: Option<f64>,
    value_sd: Option<f64>,
}

impl<'a> SummaryRow<'a> {
    fn new<S: SummaryStatistics>(chromosome: &'a str, statistics: &S) -> Self {
        let width: &RunningStats<Position> = statistics.width();
        let value = statistics.value().filter(|value| !value.is_empty());
        Self {
            chromosome,
            records: width.count(),
            width_min: (!width.is_empty()).then(|| width.min()),
            width_max: (!width.is_empty()).then(|| width.max()),
            width_mean: width.mean(),
            width_sd: width.stdev(),
            value_mean: value.map(|value| value.mean()),
            value_sd: value.map(|value| value.stdev()),
        }
    }
}

fn write_summary<B>(
    options: &ParseOptions,
    parser: Parser<B>,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, GenomeModelError>
where
    B: RecordBuilder,
    B::Statistics: SummaryStatistics,
{
    let parsed = options.parse(&parser)?;
    let writer = output_file(output).writer()?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    for (name, chromosome) in parsed.index().chromosomes() {
        writer.serialize(SummaryRow::new(name, chromosome.statistics()))?;
    }
    writer.serialize(SummaryRow::new("all", parsed.statistics()))?;
    writer.flush()?;

    Ok(CommandOutput::new((), parse_report(&parsed)))
}

/// Parse a file and write per-chromosome and whole-file summary statistics
/// as TSV.
pub fn genomodel_summary(
    options: &ParseOptions,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, GenomeModelError> {
    let format = options.format()?;
    let config = options.config(format)?;
    match format {
        IntervalFormat::Peak => {
            write_summary(options, Parser::new(config, options.peak_builder()), output)
        }
        IntervalFormat::Gtf => {
            write_summary(options, Parser::new(config, GtfBuilder::default()), output)
        }
        IntervalFormat::RefSeq => {
            write_summary(options, Parser::new(config, RefSeqBuilder::default()), output)
        }
        IntervalFormat::Vcf => {
            write_summary(options, Parser::new(config, VcfBuilder::default()), output)
        }
    }
}

fn write_records<B>(
    options: &ParseOptions,
    parser: Parser<B>,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, GenomeModelError>
where
    B: RecordBuilder,
    B::Payload: TsvSerialize,
{
    let parsed = options.parse(&parser)?;
    let mut writer = output_file(output).writer()?;
    for (chromosome, strand, record) in parsed.index().iter_records() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            chromosome,
            record.to_tsv(),
            strand,
            record.hash
        )?;
    }
    writer.flush()?;
    Ok(CommandOutput::new((), parse_report(&parsed)))
}

/// Parse a file and write the accepted records, grouped by chromosome and
/// strand, as TSV: chromosome, left, right, the format's own columns, strand
/// and identity hash.
pub fn genomodel_records(
    options: &ParseOptions,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<()>, GenomeModelError> {
    let format = options.format()?;
    let config = options.config(format)?;
    match format {
        IntervalFormat::Peak => {
            write_records(options, Parser::new(config, options.peak_builder()), output)
        }
        IntervalFormat::Gtf => {
            write_records(options, Parser::new(config, GtfBuilder::default()), output)
        }
        IntervalFormat::RefSeq => {
            write_records(options, Parser::new(config, RefSeqBuilder::default()), output)
        }
        IntervalFormat::Vcf => {
            write_records(options, Parser::new(config, VcfBuilder::default()), output)
        }
    }
}

/// Check a genome file, returning its number of sequences and total length.
pub fn genomodel_check_genome(
    genome: &Path,
) -> Result<CommandOutput<(usize, u64)>, GenomeModelError> {
    let assembly = Assembly::from_genome_file("custom", genome)?;
    let seqlens = assembly.seqlens();
    let total: u64 = seqlens.values().map(|&length| length as u64).sum();
    Ok(CommandOutput::new((seqlens.len(), total), Report::new()))
}
