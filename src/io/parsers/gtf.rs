//! GTF-style feature tables.
//!
//! The nine GTF columns are `seqname`, `source`, `feature`, `start`, `end`,
//! `score`, `strand`, `frame` and `attribute`. The core columns (chromosome,
//! start, end and strand) come from the [`ColumnLayout`], and the rest from
//! [`GtfColumns`], so files with the columns in any order can be read.
//!
//! Positions are stored as they appear in the file.
//!
//! [`ColumnLayout`]: crate::layout::ColumnLayout

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::Rejection,
    layout::Column,
    ranges::{IntervalRecord, RawInterval},
    statistics::{RunningStats, SummaryStatistics},
    traits::{Interval, RecordBuilder, StatisticsAccumulator, TsvSerialize},
    Position,
};

use super::engine::LineContext;

/// The GTF-specific columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtfColumns {
    pub source: Column,
    pub feature: Column,
    pub score: Column,
    pub frame: Column,
    pub attribute: Column,
}

impl Default for GtfColumns {
    fn default() -> Self {
        Self {
            source: Column::Index(1),
            feature: Column::Index(2),
            score: Column::Index(5),
            frame: Column::Index(7),
            attribute: Column::Index(8),
        }
    }
}

/// One GTF feature. A missing score or frame (`.`) is `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct GtfFeature {
    pub source: String,
    pub feature: String,
    pub score: Option<f64>,
    pub frame: Option<u8>,
    pub attribute: String,
}

impl GtfFeature {
    /// Look up a key in the attribute column, e.g. `gene_id "ENSG01";`.
    /// Surrounding quotes are removed from the value.
    pub fn attribute_value(&self, key: &str) -> Option<&str> {
        self.attribute
            .split(';')
            .filter_map(|pair| pair.trim().split_once(' '))
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value.trim().trim_matches('"'))
    }
}

fn missing_to_dot<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| ".".to_string(), |v| v.to_string())
}

impl TsvSerialize for GtfFeature {
    fn to_tsv(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.source,
            self.feature,
            missing_to_dot(&self.score),
            missing_to_dot(&self.frame),
            self.attribute
        )
    }
}

pub type GtfRecord = IntervalRecord<GtfFeature>;

/// Width statistics plus the number of records of each feature type, in
/// first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GtfStatistics {
    pub width: RunningStats<Position>,
    features: IndexMap<String, usize>,
}

impl GtfStatistics {
    pub fn feature_counts(&self) -> &IndexMap<String, usize> {
        &self.features
    }

    pub fn feature_count(&self, feature: &str) -> usize {
        self.features.get(feature).copied().unwrap_or(0)
    }
}

impl StatisticsAccumulator<GtfRecord> for GtfStatistics {
    fn update(&mut self, item: &GtfRecord) {
        self.width.push(item.width());
        match self.features.get_mut(&item.data.feature) {
            Some(count) => *count += 1,
            None => {
                self.features.insert(item.data.feature.clone(), 1);
            }
        }
    }
    fn count(&self) -> usize {
        self.width.count()
    }
}

impl SummaryStatistics for GtfStatistics {
    fn width(&self) -> &RunningStats<Position> {
        &self.width
    }
}

/// The [`RecordBuilder`] for GTF files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtfBuilder {
    pub columns: GtfColumns,
}

impl GtfBuilder {
    pub fn new(columns: GtfColumns) -> Self {
        Self { columns }
    }
}

fn text(column: Column, name: &'static str, fields: &[&str]) -> Result<String, Rejection> {
    Ok(column
        .lookup(name, fields)?
        .map(|value| value.trim().to_string())
        .unwrap_or_default())
}

fn parse_score(raw: Option<&str>) -> Result<Option<f64>, Rejection> {
    match raw.map(str::trim) {
        None | Some(".") => Ok(None),
        Some(score) => score
            .parse()
            .map(Some)
            .map_err(|_| Rejection::InvalidScore(score.to_string())),
    }
}

fn parse_frame(raw: Option<&str>) -> Result<Option<u8>, Rejection> {
    match raw.map(str::trim) {
        None | Some(".") => Ok(None),
        Some("0") => Ok(Some(0)),
        Some("1") => Ok(Some(1)),
        Some("2") => Ok(Some(2)),
        Some(frame) => Err(Rejection::InvalidFrame(frame.to_string())),
    }
}

impl RecordBuilder for GtfBuilder {
    type Payload = GtfFeature;
    type Statistics = GtfStatistics;

    fn build(
        &self,
        fields: &[&str],
        interval: RawInterval,
        context: &mut LineContext,
    ) -> Result<GtfRecord, Rejection> {
        let left = interval.left;
        let right = interval.right.unwrap_or(left);
        let columns = &self.columns;

        let source = text(columns.source, "source", fields)?;
        let feature = text(columns.feature, "feature", fields)?;
        let score = parse_score(columns.score.lookup("score", fields)?)?;
        let frame = parse_frame(columns.frame.lookup("frame", fields)?)?;
        let attribute = text(columns.attribute, "attribute", fields)?;

        let hash = context.identity_hash(&[&left, &right, &source, &feature, &attribute]);
        Ok(IntervalRecord::new(
            left,
            right,
            hash,
            GtfFeature {
                source,
                feature,
                score,
                frame,
                attribute,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashFunction;

    const LINE: &str =
        "chr1\tHAVANA\texon\t11869\t12227\t.\t+\t.\tgene_id \"ENSG00000223972\"; gene_name \"DDX11L1\";";

    fn build(fields: &[&str]) -> Result<GtfRecord, Rejection> {
        let interval = RawInterval {
            left: fields[3].parse().unwrap(),
            right: Some(fields[4].parse().unwrap()),
        };
        let mut context = LineContext::new(1, 0, HashFunction::OneAtATime);
        GtfBuilder::default().build(fields, interval, &mut context)
    }

    #[test]
    fn test_build_feature() {
        let fields: Vec<&str> = LINE.split('\t').collect();
        let record = build(&fields).unwrap();
        assert_eq!(record.left, 11869);
        assert_eq!(record.right, 12227);
        assert_eq!(record.data.source, "HAVANA");
        assert_eq!(record.data.feature, "exon");
        assert_eq!(record.data.score, None);
        assert_eq!(record.data.frame, None);
        assert_eq!(record.data.attribute_value("gene_name"), Some("DDX11L1"));
        assert_eq!(record.data.attribute_value("transcript_id"), None);
    }

    #[test]
    fn test_score_and_frame() {
        let mut fields: Vec<&str> = LINE.split('\t').collect();
        fields[5] = "12.5";
        fields[7] = "2";
        let record = build(&fields).unwrap();
        assert_eq!(record.data.score, Some(12.5));
        assert_eq!(record.data.frame, Some(2));
        assert_eq!(record.data.to_tsv().split('\t').nth(3), Some("2"));

        fields[7] = "3";
        assert_eq!(build(&fields), Err(Rejection::InvalidFrame("3".to_string())));

        fields[7] = "0";
        fields[5] = "high";
        assert_eq!(build(&fields), Err(Rejection::InvalidScore("high".to_string())));
    }

    #[test]
    fn test_feature_counts() {
        let fields: Vec<&str> = LINE.split('\t').collect();
        let exon = build(&fields).unwrap();
        let mut gene = exon.clone();
        gene.data.feature = "gene".to_string();

        let mut stats = GtfStatistics::default();
        stats.update(&exon);
        stats.update(&gene);
        stats.update(&exon);

        assert_eq!(stats.count(), 3);
        assert_eq!(stats.feature_count("exon"), 2);
        assert_eq!(stats.feature_count("CDS"), 0);
        let order: Vec<&String> = stats.feature_counts().keys().collect();
        assert_eq!(order, vec!["exon", "gene"]);
    }
}
