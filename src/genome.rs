//! The [`GenomeIndex`]: parsed records by chromosome and strand.
//!
//! # Design
//!
//! A [`GenomeIndex<U, S>`] is a two-level map, chromosome → strand → records,
//! generic over:
//!
//! 1. The format-specific **record data** (`U`), e.g. [`Peak`] or [`Variant`].
//!
//! 2. The **statistics accumulator** (`S`) kept for each chromosome and for the
//!    whole file. Both levels are updated synchronously on every
//!    [`GenomeIndex::add()`]; there is no lazy or batch recomputation.
//!
//! Records are kept in insertion order and duplicates are allowed. Adding is the
//! only mutation: an index is append-only.
//!
//! [`Peak`]: crate::io::parsers::peak::Peak
//! [`Variant`]: crate::io::parsers::vcf::Variant

use indexmap::IndexMap;

use crate::{
    ranges::{IntervalRecord, Strand},
    traits::StatisticsAccumulator,
};

/// All records on one chromosome, grouped by strand, with their statistics.
#[derive(Clone, Debug)]
pub struct Chromosome<U, S> {
    strands: IndexMap<Strand, Vec<IntervalRecord<U>>>,
    statistics: S,
}

impl<U, S: Default> Default for Chromosome<U, S> {
    fn default() -> Self {
        Self {
            strands: IndexMap::new(),
            statistics: S::default(),
        }
    }
}

impl<U, S> Chromosome<U, S> {
    /// Get the records on a strand.
    pub fn strand(&self, strand: Strand) -> Option<&[IntervalRecord<U>]> {
        self.strands.get(&strand).map(|records| records.as_slice())
    }

    /// Iterate over the strands present on this chromosome, in first-seen order.
    pub fn strands(&self) -> impl Iterator<Item = (Strand, &[IntervalRecord<U>])> {
        self.strands
            .iter()
            .map(|(strand, records)| (*strand, records.as_slice()))
    }

    /// The total number of records, over all strands.
    pub fn len(&self) -> usize {
        self.strands.values().map(|records| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> &S {
        &self.statistics
    }
}

/// Parsed records indexed by chromosome, then strand.
#[derive(Clone, Debug)]
pub struct GenomeIndex<U, S> {
    chromosomes: IndexMap<String, Chromosome<U, S>>,
    statistics: S,
}

impl<U, S: Default> Default for GenomeIndex<U, S> {
    fn default() -> Self {
        Self {
            chromosomes: IndexMap::new(),
            statistics: S::default(),
        }
    }
}

impl<U, S> GenomeIndex<U, S>
where
    S: StatisticsAccumulator<IntervalRecord<U>> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, creating its chromosome and strand entries on first use,
    /// and update both the chromosome and file statistics.
    pub fn add(&mut self, record: IntervalRecord<U>, chromosome: &str, strand: Strand) {
        let position = match self.chromosomes.get_index_of(chromosome) {
            Some(position) => position,
            None => {
                self.chromosomes
                    .insert_full(chromosome.to_string(), Chromosome::default())
                    .0
            }
        };
        let entry = &mut self.chromosomes[position];
        entry.statistics.update(&record);
        self.statistics.update(&record);
        entry.strands.entry(strand).or_default().push(record);
    }
}

impl<U, S> GenomeIndex<U, S> {
    /// Get the total number of records.
    pub fn len(&self) -> usize {
        self.chromosomes.values().map(|chrom| chrom.len()).sum()
    }

    /// Return whether the index is empty (contains no records).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn chromosome(&self, name: &str) -> Option<&Chromosome<U, S>> {
        self.chromosomes.get(name)
    }

    /// Iterate over chromosomes, in first-seen order.
    pub fn chromosomes(&self) -> impl Iterator<Item = (&str, &Chromosome<U, S>)> {
        self.chromosomes
            .iter()
            .map(|(name, chrom)| (name.as_str(), chrom))
    }

    /// Get the chromosome names, in first-seen order.
    pub fn chromosome_names(&self) -> Vec<String> {
        self.chromosomes.keys().cloned().collect()
    }

    /// Get the records on one strand of one chromosome.
    pub fn strand(&self, chromosome: &str, strand: Strand) -> Option<&[IntervalRecord<U>]> {
        self.chromosomes
            .get(chromosome)
            .and_then(|chrom| chrom.strand(strand))
    }

    /// Iterate over all records as `(chromosome, strand, record)`.
    pub fn iter_records(&self) -> impl Iterator<Item = (&str, Strand, &IntervalRecord<U>)> {
        self.chromosomes.iter().flat_map(|(name, chrom)| {
            chrom.strands.iter().flat_map(move |(strand, records)| {
                records.iter().map(move |record| (name.as_str(), *strand, record))
            })
        })
    }

    /// Find a record by its identity hash.
    ///
    /// Identity hashes are not collision-proof. If two records share a hash,
    /// this returns the first one in iteration order.
    pub fn find_by_hash(&self, hash: u32) -> Option<(&str, Strand, &IntervalRecord<U>)> {
        self.iter_records().find(|(_, _, record)| record.hash == hash)
    }

    /// The file-level statistics.
    pub fn statistics(&self) -> &S {
        &self.statistics
    }
}
