//! Test cases and test utility functions.
//!

use rand::{seq::SliceRandom, thread_rng, Rng};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::Position;

// range length
pub const MIN_LEN: Position = 1;
pub const MAX_LEN: Position = 10000;

// number of chromosome sequences
pub const NCHROM: usize = 22;

// chromosome size for random peaks
pub const CHROM_LEN: Position = 50_000_000;

// relative tolerance for comparing running statistics
pub const STATS_TOLERANCE: f64 = 1e-9;

/// Build a random range start/end on a sequence of `max_len`.
/// 0-indexed, right exclusive
pub fn random_range(chrom_len: Position) -> (Position, Position) {
    let mut rng = thread_rng();
    let len = rng.gen_range(MIN_LEN..MAX_LEN);
    let start = rng.gen_range(0..chrom_len - len + 1);
    (start, start + len)
}

/// Sample a random chromosome
pub fn random_chrom() -> String {
    let mut rng = thread_rng();
    format!("chr{}", rng.gen_range(1..NCHROM + 1))
}

/// Sample a random strand column value.
pub fn random_strand() -> &'static str {
    let mut rng = thread_rng();
    ["+", "-", "."].choose(&mut rng).copied().unwrap_or(".")
}

/// Build `n` random interval widths.
pub fn random_widths(n: usize) -> Vec<Position> {
    let mut rng = thread_rng();
    (0..n).map(|_| rng.gen_range(MIN_LEN..MAX_LEN)).collect()
}

/// Build a random BED6-like peak line: chromosome, start, end, name, p-value
/// and strand.
pub fn random_peak_line(name: &str) -> String {
    let mut rng = thread_rng();
    let (start, end) = random_range(CHROM_LEN);
    let pvalue: f64 = rng.gen_range(1e-12..0.05);
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        random_chrom(),
        start,
        end,
        name,
        pvalue,
        random_strand()
    )
}

/// Write `contents` to a new temporary file with the given suffix (e.g.
/// `".bed"`). The file is deleted when the handle is dropped.
pub fn temp_file_with(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("could not create temporary file");
    file.write_all(contents.as_bytes())
        .expect("could not write temporary file");
    file.flush().expect("could not flush temporary file");
    file
}

/// Write `n` random peak lines to a temporary `.bed` file.
pub fn random_peak_file(n: usize) -> NamedTempFile {
    let contents: String = (0..n)
        .map(|i| random_peak_line(&format!("peak_{}", i)) + "\n")
        .collect();
    temp_file_with(&contents, ".bed")
}
