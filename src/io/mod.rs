//! Types and methods for reading and parsing input and writing output.

pub mod file;
pub mod parsers;

pub use file::{read_seqlens, InputFile, OutputFile};
pub use parsers::{IntervalFormat, ParsedFile, Parser, ParserConfig, Progress};
