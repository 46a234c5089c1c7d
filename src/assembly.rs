//! Reference assemblies, chromosome name normalization, and the post-parse
//! comparison of observed vs. expected chromosomes.
//!
//! All chromosome comparisons against an assembly table are ASCII
//! case-insensitive, both when restricting records to an assembly while
//! parsing and when reporting missing/excess chromosomes afterwards.

use std::{fmt, path::PathBuf, str::FromStr};

use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::{error::GenomeModelError, io::file::read_seqlens, seqlens, Position};

lazy_static! {
    static ref EMPTY: ChromosomeTable = ChromosomeTable::default();

    /// GRCh37/hg19 primary chromosomes.
    static ref HG19: ChromosomeTable = ChromosomeTable::new(seqlens! {
        "chr1" => 249_250_621, "chr2" => 243_199_373, "chr3" => 198_022_430,
        "chr4" => 191_154_276, "chr5" => 180_915_260, "chr6" => 171_115_067,
        "chr7" => 159_138_663, "chr8" => 146_364_022, "chr9" => 141_213_431,
        "chr10" => 135_534_747, "chr11" => 135_006_516, "chr12" => 133_851_895,
        "chr13" => 115_169_878, "chr14" => 107_349_540, "chr15" => 102_531_392,
        "chr16" => 90_354_753, "chr17" => 81_195_210, "chr18" => 78_077_248,
        "chr19" => 59_128_983, "chr20" => 63_025_520, "chr21" => 48_129_895,
        "chr22" => 51_304_566, "chrX" => 155_270_560, "chrY" => 59_373_566,
        "chrM" => 16_571,
    });

    /// GRCh38/hg38 primary chromosomes.
    static ref HG38: ChromosomeTable = ChromosomeTable::new(seqlens! {
        "chr1" => 248_956_422, "chr2" => 242_193_529, "chr3" => 198_295_559,
        "chr4" => 190_214_555, "chr5" => 181_538_259, "chr6" => 170_805_979,
        "chr7" => 159_345_973, "chr8" => 145_138_636, "chr9" => 138_394_717,
        "chr10" => 133_797_422, "chr11" => 135_086_622, "chr12" => 133_275_309,
        "chr13" => 114_364_328, "chr14" => 107_043_718, "chr15" => 101_991_189,
        "chr16" => 90_338_345, "chr17" => 83_257_441, "chr18" => 80_373_285,
        "chr19" => 58_617_616, "chr20" => 64_444_167, "chr21" => 46_709_983,
        "chr22" => 50_818_468, "chrX" => 156_040_895, "chrY" => 57_227_415,
        "chrM" => 16_569,
    });

    /// GRCm38/mm10 primary chromosomes.
    static ref MM10: ChromosomeTable = ChromosomeTable::new(seqlens! {
        "chr1" => 195_471_971, "chr2" => 182_113_224, "chr3" => 160_039_680,
        "chr4" => 156_508_116, "chr5" => 151_834_684, "chr6" => 149_736_546,
        "chr7" => 145_441_459, "chr8" => 129_401_213, "chr9" => 124_595_110,
        "chr10" => 130_694_993, "chr11" => 122_082_543, "chr12" => 120_129_022,
        "chr13" => 120_421_639, "chr14" => 124_902_244, "chr15" => 104_043_685,
        "chr16" => 98_207_768, "chr17" => 94_987_271, "chr18" => 90_702_639,
        "chr19" => 61_431_566, "chrX" => 171_031_299, "chrY" => 91_744_698,
        "chrM" => 16_299,
    });

    /// BDGP6/dm6 primary chromosomes.
    static ref DM6: ChromosomeTable = ChromosomeTable::new(seqlens! {
        "chr2L" => 23_513_712, "chr2R" => 25_286_936, "chr3L" => 28_110_227,
        "chr3R" => 32_079_331, "chr4" => 1_348_131, "chrX" => 23_542_271,
        "chrY" => 3_667_352, "chrM" => 19_524,
    });
}

/// A chromosome → length table, with a lowercase index for case-insensitive
/// lookups in constant time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, Position>",
    into = "IndexMap<String, Position>"
)]
pub struct ChromosomeTable {
    seqlens: IndexMap<String, Position>,
    lowercase: IndexMap<String, usize>,
}

impl ChromosomeTable {
    /// Build the table. If two names differ only in case, case-insensitive
    /// lookups find the first one.
    pub fn new(seqlens: IndexMap<String, Position>) -> Self {
        let mut lowercase = IndexMap::with_capacity(seqlens.len());
        for (i, name) in seqlens.keys().enumerate() {
            lowercase.entry(name.to_ascii_lowercase()).or_insert(i);
        }
        Self { seqlens, lowercase }
    }

    pub fn seqlens(&self) -> &IndexMap<String, Position> {
        &self.seqlens
    }

    pub fn len(&self) -> usize {
        self.seqlens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqlens.is_empty()
    }

    /// The table's spelling of a chromosome name, matched case-insensitively.
    pub fn canonical_name(&self, chromosome: &str) -> Option<&str> {
        let i = *self.lowercase.get(chromosome.to_ascii_lowercase().as_str())?;
        self.seqlens.get_index(i).map(|(name, _)| name.as_str())
    }
}

impl From<IndexMap<String, Position>> for ChromosomeTable {
    fn from(seqlens: IndexMap<String, Position>) -> Self {
        Self::new(seqlens)
    }
}

impl From<ChromosomeTable> for IndexMap<String, Position> {
    fn from(table: ChromosomeTable) -> Self {
        table.seqlens
    }
}

/// A reference genome assembly: the authoritative chromosome → length table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Assembly {
    /// No assembly; chromosomes are not validated.
    #[default]
    Unknown,
    Hg19,
    Hg38,
    Mm10,
    Dm6,
    /// An assembly read from a genome file (see [`Assembly::from_genome_file()`]).
    Custom {
        name: String,
        seqlens: ChromosomeTable,
    },
}

impl Assembly {
    /// Build a custom assembly from a tab-delimited genome file of chromosome
    /// names and lengths.
    pub fn from_genome_file(
        name: impl Into<String>,
        filepath: impl Into<PathBuf>,
    ) -> Result<Self, GenomeModelError> {
        Ok(Assembly::custom(name, read_seqlens(filepath)?))
    }

    /// A custom assembly from a chromosome → length table.
    pub fn custom(name: impl Into<String>, seqlens: IndexMap<String, Position>) -> Self {
        Assembly::Custom {
            name: name.into(),
            seqlens: seqlens.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Assembly::Unknown => "unknown",
            Assembly::Hg19 => "hg19",
            Assembly::Hg38 => "hg38",
            Assembly::Mm10 => "mm10",
            Assembly::Dm6 => "dm6",
            Assembly::Custom { name, .. } => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Assembly::Unknown)
    }

    /// The chromosome → length table; empty for [`Assembly::Unknown`].
    pub fn seqlens(&self) -> &IndexMap<String, Position> {
        self.table().seqlens()
    }

    pub fn table(&self) -> &ChromosomeTable {
        match self {
            Assembly::Unknown => &EMPTY,
            Assembly::Hg19 => &HG19,
            Assembly::Hg38 => &HG38,
            Assembly::Mm10 => &MM10,
            Assembly::Dm6 => &DM6,
            Assembly::Custom { seqlens, .. } => seqlens,
        }
    }

    /// Find the assembly's spelling of a chromosome name, case-insensitively.
    pub fn canonical_name(&self, chromosome: &str) -> Option<&str> {
        self.table().canonical_name(chromosome)
    }

    pub fn contains(&self, chromosome: &str) -> bool {
        self.canonical_name(chromosome).is_some()
    }

    /// Normalize a raw chromosome column value:
    ///
    ///  1. a value starting with `chr` (any case) gets a lowercase `chr` prefix,
    ///     the rest kept as is (`Chr1` → `chr1`);
    ///  2. an integer `N` becomes `chrN`;
    ///  3. if `chr` + the value is a chromosome of this assembly, the assembly's
    ///     name is used (`X` → `chrX`);
    ///  4. otherwise the value is used unchanged.
    ///
    /// If the result is in the assembly (case-insensitively), the assembly's
    /// own spelling is returned.
    pub fn normalize_chromosome(&self, raw: &str) -> String {
        let raw = raw.trim();
        let has_prefix = raw
            .get(..3)
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case("chr"));
        let normalized = if has_prefix {
            format!("chr{}", &raw[3..])
        } else if let Ok(number) = raw.parse::<u64>() {
            format!("chr{}", number)
        } else if let Some(name) = self.canonical_name(&format!("chr{}", raw)) {
            name.to_string()
        } else {
            raw.to_string()
        };
        match self.canonical_name(&normalized) {
            Some(name) => name.to_string(),
            None => normalized,
        }
    }

    /// Compare observed chromosome names against this assembly.
    ///
    /// Returns `None` for [`Assembly::Unknown`], since there is nothing to
    /// compare against.
    pub fn compare<'a>(
        &self,
        observed: impl IntoIterator<Item = &'a str>,
    ) -> Option<ChromosomeComparison> {
        if self.is_unknown() {
            return None;
        }
        let mut seen = IndexSet::new();
        let mut excess = Vec::new();
        for name in observed {
            match self.canonical_name(name) {
                Some(canonical) => {
                    seen.insert(canonical);
                }
                None => excess.push(name.to_string()),
            }
        }
        let missing = self
            .seqlens()
            .keys()
            .filter(|name| !seen.contains(name.as_str()))
            .cloned()
            .collect();
        Some(ChromosomeComparison { excess, missing })
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse one of the built-in assembly names (case-insensitive).
impl FromStr for Assembly {
    type Err = GenomeModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(Assembly::Unknown),
            "hg19" | "grch37" => Ok(Assembly::Hg19),
            "hg38" | "grch38" => Ok(Assembly::Hg38),
            "mm10" | "grcm38" => Ok(Assembly::Mm10),
            "dm6" => Ok(Assembly::Dm6),
            _ => Err(GenomeModelError::UnknownAssembly(s.to_string())),
        }
    }
}

/// The chromosomes seen in a file that are not in the assembly (`excess`),
/// and the assembly chromosomes never seen in the file (`missing`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChromosomeComparison {
    pub excess: Vec<String>,
    pub missing: Vec<String>,
}
