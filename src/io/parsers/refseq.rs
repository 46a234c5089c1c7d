//! RefSeq gene tables: intervals with a RefSeq accession and a gene symbol.
//!
//! By default the accession and symbol are read from the 4th and 5th columns
//! of a BED-like file. [`RefSeqBuilder::ucsc_refgene()`] gives the layout of
//! the UCSC `refGene.txt` table.

use serde::{Deserialize, Serialize};

use crate::{
    error::Rejection,
    layout::{Column, ColumnLayout},
    ranges::{IntervalRecord, RawInterval},
    statistics::IntervalStatistics,
    traits::{RecordBuilder, TsvSerialize},
};

use super::engine::LineContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefSeqColumns {
    pub refseq_id: Column,
    pub gene_symbol: Column,
}

impl Default for RefSeqColumns {
    fn default() -> Self {
        Self {
            refseq_id: Column::Index(3),
            gene_symbol: Column::Index(4),
        }
    }
}

/// A RefSeq gene (or transcript) annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gene {
    pub refseq_id: String,
    pub gene_symbol: String,
}

impl TsvSerialize for Gene {
    fn to_tsv(&self) -> String {
        format!("{}\t{}", self.refseq_id, self.gene_symbol)
    }
}

pub type GeneRecord = IntervalRecord<Gene>;

/// The [`RecordBuilder`] for RefSeq tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefSeqBuilder {
    pub columns: RefSeqColumns,
}

impl RefSeqBuilder {
    pub fn new(columns: RefSeqColumns) -> Self {
        Self { columns }
    }

    /// The columns and core layout of UCSC's `refGene.txt`: `name` (1),
    /// `chrom` (2), `strand` (3), `txStart` (4), `txEnd` (5) and `name2` (12).
    pub fn ucsc_refgene() -> (ColumnLayout, Self) {
        let layout = ColumnLayout::new(2, 4, Column::Index(5), Column::Index(3));
        let builder = Self::new(RefSeqColumns {
            refseq_id: Column::Index(1),
            gene_symbol: Column::Index(12),
        });
        (layout, builder)
    }
}

impl RecordBuilder for RefSeqBuilder {
    type Payload = Gene;
    type Statistics = IntervalStatistics;

    fn build(
        &self,
        fields: &[&str],
        interval: RawInterval,
        context: &mut LineContext,
    ) -> Result<GeneRecord, Rejection> {
        let left = interval.left;
        let right = interval.right.unwrap_or(left);
        let refseq_id = self
            .columns
            .refseq_id
            .lookup("RefSeq id", fields)?
            .map(|id| id.trim().to_string())
            .unwrap_or_default();
        let gene_symbol = self
            .columns
            .gene_symbol
            .lookup("gene symbol", fields)?
            .map(|symbol| symbol.trim().to_string())
            .unwrap_or_default();

        let hash = context.identity_hash(&[&left, &right, &refseq_id, &gene_symbol]);
        Ok(IntervalRecord::new(
            left,
            right,
            hash,
            Gene {
                refseq_id,
                gene_symbol,
            },
        ))
    }
}
