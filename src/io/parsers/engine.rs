//! The streaming parser shared by every format.
//!
//! A [`Parser<B>`] reads a delimited file line by line:
//!
//!  1. The first `read_offset` lines are skipped (they still count toward line
//!     numbers in messages).
//!  2. Each following line (up to `max_lines` of them) is skipped if blank,
//!     otherwise split on the delimiter. The left and (if configured) right
//!     positions are parsed, the format's [`RecordBuilder`] builds the record,
//!     then the chromosome and strand are resolved.
//!  3. An accepted record goes into the [`GenomeIndex`]; a rejected line is
//!     counted and its reason recorded, and parsing continues.
//!  4. At the end, the chromosomes seen are compared to the assembly.
//!
//! Only an empty path, a missing file, or an I/O failure aborts a parse. A
//! file where every line is rejected still parses, to an empty index.
//!
//! All per-parse state lives in a [`ParseSession`] created for each call, so a
//! [`Parser`] is never mutated by parsing and can be reused, or shared between
//! threads when its builder allows it.

use std::fmt::{self, Write};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    assembly::Assembly,
    error::{GenomeModelError, Rejection},
    genome::GenomeIndex,
    hashing::HashFunction,
    io::file::InputFile,
    layout::ColumnLayout,
    ranges::{IntervalRecord, RawInterval, Strand},
    reporting::Report,
    traits::RecordBuilder,
    Position,
};

/// The parse settings common to all formats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub layout: ColumnLayout,
    /// Number of header lines to skip.
    pub read_offset: usize,
    /// Maximum number of lines to read after the header.
    pub max_lines: Option<usize>,
    pub hash_function: HashFunction,
    pub assembly: Assembly,
    /// Reject lines on chromosomes that are not in the assembly.
    pub restrict_to_assembly: bool,
    pub delimiter: char,
    /// Lines starting with this character are skipped, like blank lines.
    pub comment_prefix: Option<char>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            read_offset: 0,
            max_lines: None,
            hash_function: HashFunction::default(),
            assembly: Assembly::Unknown,
            restrict_to_assembly: false,
            delimiter: '\t',
            comment_prefix: None,
        }
    }
}

impl ParserConfig {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn with_read_offset(mut self, read_offset: usize) -> Self {
        self.read_offset = read_offset;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = Some(max_lines);
        self
    }

    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    /// Set the assembly. If `restrict` is true, lines on chromosomes outside
    /// the assembly are rejected.
    pub fn with_assembly(mut self, assembly: Assembly, restrict: bool) -> Self {
        self.assembly = assembly;
        self.restrict_to_assembly = restrict;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_comment_prefix(mut self, prefix: char) -> Self {
        self.comment_prefix = Some(prefix);
        self
    }
}

/// A progress report, as a percentage of the file's bytes consumed.
///
/// Its [`fmt::Display`] output is the bare number, `"0"` to `"100"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Progress(u8);

impl Progress {
    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-line information handed to a [`RecordBuilder`].
#[derive(Clone, Debug)]
pub struct LineContext {
    line_number: usize,
    seed: String,
    hash_function: HashFunction,
    defaulted: bool,
}

impl LineContext {
    /// Create the context of a line. The per-line seed is the file hash
    /// followed by the line number.
    pub fn new(line_number: usize, file_hash: u32, hash_function: HashFunction) -> Self {
        Self {
            line_number,
            seed: format!("{}{}", file_hash, line_number),
            hash_function,
            defaulted: false,
        }
    }

    /// The 1-based line number, counting header lines.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Hash a record's structural fields, followed by this line's seed.
    pub fn identity_hash(&self, fields: &[&dyn fmt::Display]) -> u32 {
        let mut key = String::with_capacity(64);
        for field in fields {
            // writing to a String cannot fail
            let _ = write!(key, "{}", field);
        }
        key.push_str(&self.seed);
        self.hash_function.hash(&key)
    }

    /// Flag that this line used a default in place of a missing or invalid value.
    pub fn mark_defaulted(&mut self) {
        self.defaulted = true;
    }

    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }
}

/// The mutable state of one parse.
struct ParseSession<U, S> {
    line_number: usize,
    lines_read: usize,
    line_bytes: u64,
    accepted: usize,
    dropped: usize,
    defaulted: usize,
    last_progress: Option<Progress>,
    report: Report,
    index: GenomeIndex<U, S>,
}

impl<U, S: Default> ParseSession<U, S> {
    fn new() -> Self {
        Self {
            line_number: 0,
            lines_read: 0,
            line_bytes: 0,
            accepted: 0,
            dropped: 0,
            defaulted: 0,
            last_progress: None,
            report: Report::new(),
            index: GenomeIndex::default(),
        }
    }

    /// Report progress if the rounded percentage changed since the last report.
    fn report_progress<F: FnMut(Progress)>(&mut self, progress: Progress, on_progress: &mut F) {
        if self.last_progress != Some(progress) {
            self.last_progress = Some(progress);
            on_progress(progress);
        }
    }

    fn progress<F: FnMut(Progress)>(&mut self, consumed: u64, file_size: u64, on_progress: &mut F) {
        let percent = if file_size == 0 {
            0
        } else {
            ((consumed as f64 * 100.0 / file_size as f64).round() as u64).min(100) as u8
        };
        self.report_progress(Progress(percent), on_progress);
    }
}

/// The result of parsing one file.
#[derive(Clone, Debug)]
pub struct ParsedFile<U, S> {
    file_name: String,
    file_path: PathBuf,
    file_hash: u32,
    assembly: Assembly,
    accepted: usize,
    dropped: usize,
    defaulted: usize,
    messages: Vec<String>,
    excess_chromosomes: Vec<String>,
    missing_chromosomes: Vec<String>,
    index: GenomeIndex<U, S>,
}

impl<U, S> ParsedFile<U, S> {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The absolute path of the parsed file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// The hash of the absolute path, used to seed record identity hashes.
    pub fn file_hash(&self) -> u32 {
        self.file_hash
    }

    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    /// Number of records accepted into the index.
    pub fn record_count(&self) -> usize {
        self.accepted
    }

    /// Number of lines rejected.
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Number of accepted records that used a default value.
    pub fn defaulted_count(&self) -> usize {
        self.defaulted
    }

    /// Diagnostic messages: a `"<n> Lines dropped"` summary (if any line was
    /// dropped), then one `"Line <n>: <reason>"` message per dropped line.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Chromosomes seen in the file but not in the assembly.
    pub fn excess_chromosomes(&self) -> &[String] {
        &self.excess_chromosomes
    }

    /// Assembly chromosomes not seen in the file.
    pub fn missing_chromosomes(&self) -> &[String] {
        &self.missing_chromosomes
    }

    pub fn index(&self) -> &GenomeIndex<U, S> {
        &self.index
    }

    /// The file-level statistics.
    pub fn statistics(&self) -> &S {
        self.index.statistics()
    }

    pub fn into_index(self) -> GenomeIndex<U, S> {
        self.index
    }
}

/// The parser, configured once with a [`ParserConfig`] and a format's
/// [`RecordBuilder`].
#[derive(Clone, Debug)]
pub struct Parser<B> {
    config: ParserConfig,
    builder: B,
}

impl<B: RecordBuilder> Parser<B> {
    pub fn new(config: ParserConfig, builder: B) -> Self {
        Self { config, builder }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Parse a file.
    pub fn parse(
        &self,
        filepath: impl AsRef<Path>,
    ) -> Result<ParsedFile<B::Payload, B::Statistics>, GenomeModelError> {
        self.parse_with_progress(filepath, |_| {})
    }

    /// Parse a file, calling `on_progress` each time the percentage of the
    /// file consumed changes. The first report is `0`, the last is `100`.
    ///
    /// The callback runs synchronously inside the parse loop, so a slow
    /// callback slows down parsing.
    pub fn parse_with_progress<F>(
        &self,
        filepath: impl AsRef<Path>,
        mut on_progress: F,
    ) -> Result<ParsedFile<B::Payload, B::Statistics>, GenomeModelError>
    where
        F: FnMut(Progress),
    {
        let filepath = filepath.as_ref();
        if filepath.as_os_str().is_empty() {
            return Err(GenomeModelError::EmptyPath);
        }
        if !filepath.exists() {
            return Err(GenomeModelError::FileNotFound(filepath.to_path_buf()));
        }
        let file_path = filepath.canonicalize()?;
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_hash = self
            .config
            .hash_function
            .hash(&file_path.to_string_lossy());
        debug!(
            "parsing {} (assembly: {}, restricted: {}, read offset: {})",
            file_path.display(),
            self.config.assembly,
            self.config.restrict_to_assembly,
            self.config.read_offset
        );

        let mut session = ParseSession::new();
        self.read_lines(&file_path, file_hash, &mut session, &mut on_progress)?;

        if session.dropped > 0 {
            session
                .report
                .prepend(format!("{} Lines dropped", session.dropped));
        }

        let comparison = self
            .config
            .assembly
            .compare(session.index.chromosomes().map(|(name, _)| name))
            .unwrap_or_default();
        if !comparison.excess.is_empty() {
            warn!(
                "{}: {} chromosome(s) not in the {} assembly: {}",
                file_name,
                comparison.excess.len(),
                self.config.assembly,
                comparison.excess.join(", ")
            );
        }
        info!(
            "{}: {} records accepted, {} lines dropped, {} values defaulted",
            file_name, session.accepted, session.dropped, session.defaulted
        );

        Ok(ParsedFile {
            file_name,
            file_path,
            file_hash,
            assembly: self.config.assembly.clone(),
            accepted: session.accepted,
            dropped: session.dropped,
            defaulted: session.defaulted,
            messages: session.report.into_entries(),
            excess_chromosomes: comparison.excess,
            missing_chromosomes: comparison.missing,
            index: session.index,
        })
    }

    /// The read phase. The file handle is owned here, and closed on return.
    fn read_lines<F: FnMut(Progress)>(
        &self,
        file_path: &Path,
        file_hash: u32,
        session: &mut ParseSession<B::Payload, B::Statistics>,
        on_progress: &mut F,
    ) -> Result<(), GenomeModelError> {
        let input = InputFile::new(file_path);
        let file_size = input.size()?;
        let (mut reader, consumed) = input.progress_reader()?;
        let mut buffer = Vec::with_capacity(512);

        session.progress(0, file_size, on_progress);

        while session.line_number < self.config.read_offset {
            buffer.clear();
            let n = reader.read_until(b'\n', &mut buffer)?;
            if n == 0 {
                break;
            }
            session.line_number += 1;
            session.line_bytes += n as u64;
            session.progress(consumed.get(session.line_bytes), file_size, on_progress);
        }

        loop {
            if self
                .config
                .max_lines
                .map_or(false, |max| session.lines_read >= max)
            {
                break;
            }
            buffer.clear();
            let n = reader.read_until(b'\n', &mut buffer)?;
            if n == 0 {
                break;
            }
            session.line_number += 1;
            session.lines_read += 1;
            session.line_bytes += n as u64;

            let mut context =
                LineContext::new(session.line_number, file_hash, self.config.hash_function);
            let outcome = match std::str::from_utf8(&buffer) {
                Ok(line) => self.process_line(line, &mut context),
                Err(_) => Err(Rejection::InvalidUtf8),
            };
            match outcome {
                Ok(Some((record, chromosome, strand))) => {
                    session.index.add(record, &chromosome, strand);
                    session.accepted += 1;
                    if context.is_defaulted() {
                        session.defaulted += 1;
                    }
                }
                Ok(None) => {}
                Err(rejection) => {
                    session.report.add_rejection(session.line_number, &rejection);
                    session.dropped += 1;
                }
            }
            session.progress(consumed.get(session.line_bytes), file_size, on_progress);
        }

        // the line cap may stop reading before the end of the file
        session.report_progress(Progress(100), on_progress);
        Ok(())
    }

    /// Turn one line into a record with its chromosome and strand.
    ///
    /// Returns `Ok(None)` for lines that are skipped (blank or comment lines).
    fn process_line(
        &self,
        line: &str,
        context: &mut LineContext,
    ) -> Result<Option<(IntervalRecord<B::Payload>, String, Strand)>, Rejection> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return Ok(None);
        }
        if let Some(prefix) = self.config.comment_prefix {
            if line.starts_with(prefix) {
                return Ok(None);
            }
        }

        let layout = &self.config.layout;
        let fields: Vec<&str> = line.split(self.config.delimiter).collect();

        let left = fields
            .get(layout.left)
            .ok_or(Rejection::MissingColumn("left", fields.len()))?;
        let left = parse_position(left).ok_or_else(|| Rejection::InvalidLeft(left.to_string()))?;
        let right = match layout.right.lookup("right", &fields)? {
            Some(right) => Some(
                parse_position(right).ok_or_else(|| Rejection::InvalidRight(right.to_string()))?,
            ),
            None => None,
        };

        let record = self
            .builder
            .build(&fields, RawInterval { left, right }, context)?;

        let raw_chromosome = fields
            .get(layout.chromosome)
            .ok_or(Rejection::MissingColumn("chromosome", fields.len()))?;
        let assembly = &self.config.assembly;
        let chromosome = assembly.normalize_chromosome(raw_chromosome);
        if self.config.restrict_to_assembly
            && !assembly.is_unknown()
            && !assembly.contains(&chromosome)
        {
            return Err(Rejection::UnknownChromosome(
                chromosome,
                assembly.name().to_string(),
            ));
        }

        let strand = layout
            .strand
            .get(&fields)
            .map_or(Strand::Unstranded, Strand::parse_lenient);

        Ok(Some((record, chromosome, strand)))
    }
}

/// Parse a position column, allowing surrounding whitespace.
pub fn parse_position(value: &str) -> Option<Position> {
    value.trim().parse::<Position>().ok()
}
