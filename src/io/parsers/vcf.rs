//! VCF variant records.
//!
//! Only the fixed columns of the data lines are read (`CHROM`, `POS`, `ID`,
//! `REF`, `ALT`, `QUAL`, `FILTER`, `INFO`); the `##` meta lines and the
//! `#CHROM` header line should be skipped with a comment prefix of `#`, or a
//! read offset. Sample columns are ignored.
//!
//! A variant covers the single position `[POS, POS + 1)`, whatever the length
//! of its alleles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::Rejection,
    layout::Column,
    ranges::{IntervalRecord, RawInterval},
    statistics::ValueStatistics,
    traits::{RecordBuilder, TsvSerialize, ValuedData},
};

use super::engine::LineContext;

/// A base pair code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
    N,
}

impl Base {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            'N' => Some(Base::N),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
            Base::N => 'N',
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A non-empty sequence of bases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Allele(Vec<Base>);

impl Allele {
    /// Parse an allele; `None` if it is empty or has a non-base character.
    pub fn parse(value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        value.chars().map(Base::from_char).collect::<Option<Vec<_>>>().map(Allele)
    }

    pub fn bases(&self) -> &[Base] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in &self.0 {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcfColumns {
    pub id: Column,
    pub reference: Column,
    pub alternate: Column,
    pub quality: Column,
    pub filter: Column,
    pub info: Column,
}

impl Default for VcfColumns {
    fn default() -> Self {
        Self {
            id: Column::Index(2),
            reference: Column::Index(3),
            alternate: Column::Index(4),
            quality: Column::Index(5),
            filter: Column::Index(6),
            info: Column::Index(7),
        }
    }
}

/// One variant. A missing quality (`.`) is NaN, and `.` in `ALT` is an empty
/// list of alternate alleles.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub id: String,
    pub reference: Allele,
    pub alternate: Vec<Allele>,
    pub quality: f64,
    pub filter: String,
    pub info: String,
}

impl Variant {
    /// The `ALT` column as written in VCF.
    pub fn alternate_string(&self) -> String {
        if self.alternate.is_empty() {
            return ".".to_string();
        }
        self.alternate
            .iter()
            .map(|allele| allele.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// A single-base substitution, with one alternate allele.
    pub fn is_snv(&self) -> bool {
        self.reference.len() == 1 && self.alternate.len() == 1 && self.alternate[0].len() == 1
    }
}

impl ValuedData for Variant {
    fn value(&self) -> f64 {
        self.quality
    }
}

impl TsvSerialize for Variant {
    fn to_tsv(&self) -> String {
        let quality = if self.quality.is_nan() {
            ".".to_string()
        } else {
            self.quality.to_string()
        };
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.reference,
            self.alternate_string(),
            quality,
            self.filter,
            self.info
        )
    }
}

pub type VariantRecord = IntervalRecord<Variant>;
pub type VariantStatistics = ValueStatistics<Variant>;

/// The [`RecordBuilder`] for VCF files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcfBuilder {
    pub columns: VcfColumns,
}

impl VcfBuilder {
    pub fn new(columns: VcfColumns) -> Self {
        Self { columns }
    }
}

fn text_or_dot(column: Column, name: &'static str, fields: &[&str]) -> Result<String, Rejection> {
    Ok(column
        .lookup(name, fields)?
        .map_or_else(|| ".".to_string(), |value| value.trim().to_string()))
}

fn parse_alternate(raw: &str) -> Result<Vec<Allele>, Rejection> {
    if raw == "." {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|allele| {
            Allele::parse(allele).ok_or_else(|| Rejection::InvalidBase("ALT", raw.to_string()))
        })
        .collect()
}

fn parse_quality(raw: &str) -> Result<f64, Rejection> {
    if raw == "." {
        return Ok(f64::NAN);
    }
    raw.parse()
        .map_err(|_| Rejection::InvalidQuality(raw.to_string()))
}

impl RecordBuilder for VcfBuilder {
    type Payload = Variant;
    type Statistics = VariantStatistics;

    fn build(
        &self,
        fields: &[&str],
        interval: RawInterval,
        context: &mut LineContext,
    ) -> Result<VariantRecord, Rejection> {
        let left = interval.left;
        let right = left.saturating_add(1);
        let columns = &self.columns;

        let id = text_or_dot(columns.id, "ID", fields)?;
        let reference = match columns.reference.lookup("REF", fields)? {
            Some(raw) => {
                let raw = raw.trim();
                Allele::parse(raw).ok_or_else(|| Rejection::InvalidBase("REF", raw.to_string()))?
            }
            None => Allele::default(),
        };
        let alternate = match columns.alternate.lookup("ALT", fields)? {
            Some(raw) => parse_alternate(raw.trim())?,
            None => Vec::new(),
        };
        let quality = match columns.quality.lookup("QUAL", fields)? {
            Some(raw) => parse_quality(raw.trim())?,
            None => f64::NAN,
        };
        let filter = text_or_dot(columns.filter, "FILTER", fields)?;
        let info = text_or_dot(columns.info, "INFO", fields)?;

        let variant = Variant {
            id,
            reference,
            alternate,
            quality,
            filter,
            info,
        };
        let hash = context.identity_hash(&[
            &left,
            &right,
            &variant.reference,
            &variant.alternate_string(),
        ]);
        Ok(IntervalRecord::new(left, right, hash, variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashFunction;

    fn build(line: &str) -> Result<VariantRecord, Rejection> {
        let fields: Vec<&str> = line.split('\t').collect();
        let interval = RawInterval {
            left: fields[1].parse().unwrap(),
            right: None,
        };
        let mut context = LineContext::new(1, 0, HashFunction::OneAtATime);
        VcfBuilder::default().build(&fields, interval, &mut context)
    }

    #[test]
    fn test_build_variant() {
        let record = build("chr1\t12345\trs1\tA\tG,TT\t50.5\tPASS\tDP=10").unwrap();
        assert_eq!(record.left, 12345);
        assert_eq!(record.right, 12346);
        assert_eq!(record.data.reference.to_string(), "A");
        assert_eq!(record.data.alternate_string(), "G,TT");
        assert_eq!(record.data.quality, 50.5);
        assert!(!record.data.is_snv());
        assert_eq!(record.data.to_tsv(), "rs1\tA\tG,TT\t50.5\tPASS\tDP=10");
    }

    #[test]
    fn test_missing_values() {
        let record = build("chr1\t100\t.\tacgt\t.\t.\t.\t.").unwrap();
        assert_eq!(record.data.reference.to_string(), "ACGT");
        assert!(record.data.alternate.is_empty());
        assert!(record.data.quality.is_nan());
        assert_eq!(record.data.to_tsv(), ".\tACGT\t.\t.\t.\t.");
    }

    #[test]
    fn test_invalid_fields() {
        assert_eq!(
            build("chr1\t100\t.\tAX\tG\t10\tPASS\t."),
            Err(Rejection::InvalidBase("REF", "AX".to_string()))
        );
        assert_eq!(
            build("chr1\t100\t.\tA\tG,<DEL>\t10\tPASS\t."),
            Err(Rejection::InvalidBase("ALT", "G,<DEL>".to_string()))
        );
        assert_eq!(
            build("chr1\t100\t.\tA\tG\thigh\tPASS\t."),
            Err(Rejection::InvalidQuality("high".to_string()))
        );
        assert_eq!(
            build("chr1\t100\t.\tA"),
            Err(Rejection::MissingColumn("ALT", 4))
        );
    }
}
