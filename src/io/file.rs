//! Input/Output file handling with [`InputFile`] and [`OutputFile`].
//!
//! These types abstract over reading/writing both plaintext and gzip-compressed
//! input/output.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use indexmap::IndexMap;
use std::cell::Cell;
use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::GenomeModelError;
use crate::Position;

/// Read a tab-delimited *genome file* of sequence (i.e. chromosome) names and their lengths.
pub fn read_seqlens(
    filepath: impl Into<PathBuf>,
) -> Result<IndexMap<String, Position>, GenomeModelError> {
    let input_file = InputFile::new(filepath);
    let reader = input_file.reader()?;

    let mut seqlens = IndexMap::new();
    for result in reader.lines() {
        let line = result?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut columns = line.split('\t');
        let (seqname, length) = match (columns.next(), columns.next()) {
            (Some(seqname), Some(length)) => (seqname, length),
            _ => {
                return Err(GenomeModelError::InvalidGenomeFile(format!(
                    "line '{}' does not have two columns",
                    line
                )))
            }
        };
        let length: Position = length.trim().parse()?;
        if seqlens.contains_key(seqname) {
            return Err(GenomeModelError::InvalidGenomeFile(format!(
                "sequence '{}' is duplicated",
                seqname
            )));
        }
        seqlens.insert(seqname.to_string(), length);
    }
    Ok(seqlens)
}

/// Check if a file is a gzipped by looking for the magic numbers
fn is_gzipped_file(file_path: impl Into<PathBuf>) -> io::Result<bool> {
    let mut file = File::open(file_path.into())?;
    let mut buffer = [0; 2];
    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1f, 0x8b]),
        // files shorter than two bytes cannot be gzipped
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// A [`Read`] adapter counting the bytes pulled through it.
struct CountingReader<R> {
    inner: R,
    count: Rc<Cell<u64>>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.set(self.count.get() + n as u64);
        Ok(n)
    }
}

/// How far a reader has progressed through the file on disk.
///
/// For plaintext input the consumer counts the bytes of the lines it reads;
/// for gzip-compressed input, the compressed bytes read from disk are counted,
/// since the decompressed size is unknown up front.
#[derive(Clone, Debug)]
pub enum BytesConsumed {
    Lines,
    Compressed(Rc<Cell<u64>>),
}

impl BytesConsumed {
    /// The bytes consumed, given the running total of line bytes.
    pub fn get(&self, line_bytes: u64) -> u64 {
        match self {
            BytesConsumed::Lines => line_bytes,
            BytesConsumed::Compressed(count) => count.get(),
        }
    }
}

/// Represents an input file.
///
/// This struct is used to handle operations on an input file, such as reading from the file.
/// This abstracts how data is read in, allowing for both plaintext and gzip-compressed input
/// to be read through a common interface.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub filepath: PathBuf,
}

impl InputFile {
    /// Constructs a new `InputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - A string slice that holds the path to the file. If the file
    /// starts with the gzip magic number, `InputFile` will automatically uncompress the input.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Opens the file and returns a buffered reader.
    ///
    /// If the file is gzip-compressed, this method will
    /// automatically handle the decompression.
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let (reader, _) = self.progress_reader()?;
        Ok(reader)
    }

    /// Like [`InputFile::reader()`], but also returns a [`BytesConsumed`] to
    /// track reading progress against [`InputFile::size()`].
    pub fn progress_reader(&self) -> io::Result<(BufReader<Box<dyn Read>>, BytesConsumed)> {
        let file = File::open(&self.filepath)?;
        if is_gzipped_file(&self.filepath)? {
            let count = Rc::new(Cell::new(0));
            let counted = CountingReader {
                inner: file,
                count: Rc::clone(&count),
            };
            let reader: Box<dyn Read> = Box::new(GzDecoder::new(counted));
            Ok((BufReader::new(reader), BytesConsumed::Compressed(count)))
        } else {
            let reader: Box<dyn Read> = Box::new(file);
            Ok((BufReader::new(reader), BytesConsumed::Lines))
        }
    }

    /// The size of the file on disk, in bytes.
    pub fn size(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.filepath)?.len())
    }
}

enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Represents an output file.
///
/// This struct is used to handle operations on an output file, such as writing to the file.
/// This abstracts writing both plaintext and gzip-compressed files.
pub struct OutputFile {
    destination: OutputDestination,
    pub header: Option<Vec<String>>,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - A string slice that holds the path to the file. If the file extension is
    /// `.gz`, `OutputFile` will automatically write gzip-compressed output.
    /// * `header` - An optional vector of strings representing commented header lines to be written to the file.
    pub fn new(filepath: impl Into<PathBuf>, header: Option<Vec<String>>) -> Self {
        Self {
            destination: OutputDestination::File(filepath.into()),
            header,
        }
    }

    /// Constructs a new [`OutputFile`] for standard output.
    pub fn new_stdout(header: Option<Vec<String>>) -> Self {
        Self {
            destination: OutputDestination::Stdout,
            header,
        }
    }

    /// Opens the file and returns a writer.
    ///
    /// If the file path ends with ".gz", the file is treated as gzip-compressed, and the
    /// function will handle compression automatically. If a header is set, it will be written
    /// to the file.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let mut writer: Box<dyn Write> = match &self.destination {
            OutputDestination::File(path) => {
                let is_gzip = path.extension().map_or(false, |ext| ext == "gz");
                if is_gzip {
                    Box::new(BufWriter::new(GzEncoder::new(
                        File::create(path)?,
                        Compression::default(),
                    )))
                } else {
                    Box::new(BufWriter::new(File::create(path)?))
                }
            }
            OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        };
        // write header if one is set
        if let Some(entries) = &self.header {
            for entry in entries {
                writeln!(writer, "#{}", entry)?;
            }
        }
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_seqlens() {
        let seqlens = read_seqlens("tests_data/toy_genome.tsv").unwrap();
        assert_eq!(seqlens.get("chr1"), Some(&1000));
        assert_eq!(seqlens.len(), 3);
    }

    #[test]
    fn test_read_seqlens_duplicated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t10\nchr1\t20").unwrap();
        let result = read_seqlens(file.path());
        assert!(matches!(result, Err(GenomeModelError::InvalidGenomeFile(_))));
    }

    #[test]
    fn test_gzip_input_is_decompressed() {
        let file = tempfile::Builder::new().suffix(".bed.gz").tempfile().unwrap();
        {
            let output = OutputFile::new(file.path(), None);
            let mut writer = output.writer().unwrap();
            writeln!(writer, "chr1\t1\t2").unwrap();
        }
        let input = InputFile::new(file.path());
        let (reader, consumed) = input.progress_reader().unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t1\t2"]);
        assert!(matches!(consumed, BytesConsumed::Compressed(_)));
        assert_eq!(consumed.get(0), input.size().unwrap());
    }
}
