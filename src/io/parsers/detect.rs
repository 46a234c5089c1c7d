//! Filetype detection functionality.
//!

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::utils::get_base_extension;
use crate::{error::GenomeModelError, layout::ColumnLayout};

/// The supported interval file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum IntervalFormat {
    /// BED-like peak files (`.bed`, `.narrowPeak`, `.broadPeak`, `.peak`).
    Peak,
    /// GTF/GFF feature tables.
    Gtf,
    /// RefSeq gene tables (`.refseq`, `.refgene`).
    #[value(name = "refseq")]
    RefSeq,
    Vcf,
}

impl IntervalFormat {
    /// Detect the format from the file extension, ignoring any compression
    /// extension (`foo.vcf.gz` is VCF).
    pub fn detect(filepath: impl AsRef<Path>) -> Result<Self, GenomeModelError> {
        let filepath = filepath.as_ref();
        let extension = get_base_extension(filepath).ok_or_else(|| {
            GenomeModelError::UnsupportedFileFormat(filepath.display().to_string())
        })?;
        match extension.to_ascii_lowercase().as_str() {
            "bed" | "peak" | "narrowpeak" | "broadpeak" => Ok(IntervalFormat::Peak),
            "gtf" | "gff" | "gff2" => Ok(IntervalFormat::Gtf),
            "refseq" | "refgene" => Ok(IntervalFormat::RefSeq),
            "vcf" => Ok(IntervalFormat::Vcf),
            _ => Err(GenomeModelError::UnsupportedFileFormat(
                filepath.display().to_string(),
            )),
        }
    }

    /// The core column layout usually used by this format.
    pub fn default_layout(&self) -> ColumnLayout {
        match self {
            IntervalFormat::Peak | IntervalFormat::RefSeq => ColumnLayout::bed(),
            IntervalFormat::Gtf => ColumnLayout::gtf(),
            IntervalFormat::Vcf => ColumnLayout::vcf(),
        }
    }

    /// The comment character usually found in files of this format.
    pub fn comment_prefix(&self) -> Option<char> {
        match self {
            IntervalFormat::Gtf | IntervalFormat::Vcf => Some('#'),
            IntervalFormat::Peak | IntervalFormat::RefSeq => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(IntervalFormat::detect("a/peaks.bed").unwrap(), IntervalFormat::Peak);
        assert_eq!(
            IntervalFormat::detect("x.narrowPeak.gz").unwrap(),
            IntervalFormat::Peak
        );
        assert_eq!(IntervalFormat::detect("genes.gtf").unwrap(), IntervalFormat::Gtf);
        assert_eq!(
            IntervalFormat::detect("calls.vcf.gz").unwrap(),
            IntervalFormat::Vcf
        );
        assert_eq!(
            IntervalFormat::detect("hg38.refGene").unwrap(),
            IntervalFormat::RefSeq
        );
        assert!(matches!(
            IntervalFormat::detect("reads.bam"),
            Err(GenomeModelError::UnsupportedFileFormat(_))
        ));
        assert!(IntervalFormat::detect("noextension").is_err());
    }
}
