//! Parsing the sample files in `tests_data/`, one test per format.

use genomodel::{
    io::parsers::{gtf::GtfStatistics, PeakStatistics},
    prelude::*,
    statistics::IntervalStatistics,
};

#[test]
fn test_peaks_default_values() {
    let parser = Parser::new(ParserConfig::default(), PeakBuilder::default());
    let parsed = parser.parse("tests_data/peaks.bed").unwrap();

    assert_eq!(parsed.file_name(), "peaks.bed");
    assert!(parsed.file_path().is_absolute());
    assert_eq!(parsed.record_count(), 7);
    assert_eq!(parsed.dropped_count(), 0);
    assert_eq!(parsed.defaulted_count(), 1);
    assert!(parsed.messages().is_empty());

    let names = parsed.index().chromosome_names();
    assert_eq!(names, vec!["chr1", "chr2", "chr3", "chrUn_KI270302v1"]);
    assert_eq!(parsed.index().chromosome("chr2").unwrap().len(), 2);

    let stats: &PeakStatistics = parsed.statistics();
    assert_eq!(stats.width.count(), 7);
    assert_eq!(stats.width.min(), 20);
    assert_eq!(stats.width.max(), 250);
    assert_eq!(stats.most_permissive().unwrap().data.name, "peak_4");
    assert_eq!(stats.most_stringent().unwrap().data.name, "peak_3");
    assert_eq!(stats.most_stringent().unwrap().data.value, 1e-8);
}

#[test]
fn test_peaks_log_scale_and_drop_invalid() {
    let builder = PeakBuilder::default()
        .with_value_format(ValueFormat::MinusTenLog10)
        .with_drop_invalid_value(true);
    let parsed = Parser::new(ParserConfig::default(), builder)
        .parse("tests_data/peaks.bed")
        .unwrap();

    assert_eq!(parsed.record_count(), 6);
    assert_eq!(parsed.dropped_count(), 1);
    assert_eq!(parsed.defaulted_count(), 0);
    assert_eq!(parsed.messages()[0], "1 Lines dropped");
    assert_eq!(parsed.messages()[1], "Line 3: invalid value 'NA'");

    // the largest -10 log10 value is the smallest p-value
    let stats = parsed.statistics();
    assert_eq!(stats.most_stringent().unwrap().data.name, "peak_4");
    assert_eq!(stats.most_permissive().unwrap().data.name, "peak_7");
    assert!((stats.most_permissive().unwrap().data.value - 0.1).abs() < 1e-12);
}

#[test]
fn test_peaks_custom_assembly() {
    let assembly = Assembly::from_genome_file("toy", "tests_data/toy_genome.tsv").unwrap();

    let restricted = ParserConfig::default().with_assembly(assembly.clone(), true);
    let parsed = Parser::new(restricted, PeakBuilder::default())
        .parse("tests_data/peaks.bed")
        .unwrap();
    assert_eq!(parsed.record_count(), 6);
    assert_eq!(parsed.dropped_count(), 1);
    assert_eq!(
        parsed.messages()[1],
        "Line 7: chromosome 'chrUn_KI270302v1' is not in the toy assembly"
    );
    assert!(parsed.excess_chromosomes().is_empty());
    assert!(parsed.missing_chromosomes().is_empty());

    let unrestricted = ParserConfig::default().with_assembly(assembly, false);
    let parsed = Parser::new(unrestricted, PeakBuilder::default())
        .parse("tests_data/peaks.bed")
        .unwrap();
    assert_eq!(parsed.record_count(), 7);
    assert_eq!(parsed.excess_chromosomes(), &["chrUn_KI270302v1".to_string()]);
    assert_eq!(parsed.assembly().name(), "toy");
}

#[test]
fn test_gtf() {
    let config = ParserConfig::new(ColumnLayout::gtf()).with_comment_prefix('#');
    let parsed = Parser::new(config, GtfBuilder::default())
        .parse("tests_data/genes.gtf")
        .unwrap();

    assert_eq!(parsed.record_count(), 7);
    assert_eq!(parsed.dropped_count(), 1);
    assert_eq!(
        parsed.messages()[1],
        "Line 8: invalid frame '3': must be 0, 1, 2 or '.'"
    );

    let index = parsed.index();
    assert_eq!(index.strand("chr1", Strand::Forward).unwrap().len(), 5);
    assert_eq!(index.strand("chr1", Strand::Reverse).unwrap().len(), 1);
    assert_eq!(index.strand("chrX", Strand::Reverse).unwrap().len(), 1);

    let stats: &GtfStatistics = parsed.statistics();
    assert_eq!(stats.feature_count("exon"), 3);
    assert_eq!(stats.feature_count("gene"), 2);
    assert_eq!(stats.feature_count("transcript"), 1);
    assert_eq!(stats.feature_count("CDS"), 1);

    let chr_x = index.chromosome("chrX").unwrap().statistics();
    assert_eq!(chr_x.feature_counts().len(), 1);

    let cds = &index.strand("chr1", Strand::Forward).unwrap()[4];
    assert_eq!(cds.data.frame, Some(0));
    assert_eq!(cds.data.attribute_value("gene_name"), Some("OR4F5"));
}

#[test]
fn test_refseq() {
    let layout = ColumnLayout::bed().with_strand(Column::Index(5));
    let parsed = Parser::new(ParserConfig::new(layout), RefSeqBuilder::default())
        .parse("tests_data/genes.refseq")
        .unwrap();

    assert_eq!(parsed.record_count(), 4);
    assert_eq!(parsed.dropped_count(), 1);
    assert!(parsed.messages()[1].starts_with("Line 5: missing RefSeq id column"));

    let index = parsed.index();
    let reverse = index.strand("chr1", Strand::Reverse).unwrap();
    assert_eq!(reverse.len(), 2);
    assert_eq!(reverse[1].data.gene_symbol, "MIR6859-1");
    assert_eq!(
        index.strand("chr2", Strand::Unstranded).unwrap()[0].data.refseq_id,
        "NM_001077710"
    );

    let stats: &IntervalStatistics = parsed.statistics();
    assert_eq!(stats.width.min(), 68);
}

#[test]
fn test_vcf() {
    let config = ParserConfig::new(ColumnLayout::vcf())
        .with_comment_prefix('#')
        .with_assembly(Assembly::Hg19, false);
    let parsed = Parser::new(config, VcfBuilder::default())
        .parse("tests_data/variants.vcf")
        .unwrap();

    assert_eq!(parsed.record_count(), 5);
    assert_eq!(parsed.dropped_count(), 1);
    assert_eq!(
        parsed.messages()[1],
        "Line 8: invalid base pair code in ALT '<DEL>'"
    );
    assert_eq!(parsed.index().chromosome_names(), vec!["chr1", "chrX"]);
    assert_eq!(parsed.missing_chromosomes().len(), 23);

    for (_, _, record) in parsed.index().iter_records() {
        assert_eq!(record.right, record.left + 1);
    }

    let stats = parsed.statistics();
    assert_eq!(stats.value.count(), 4);
    assert_eq!(stats.most_permissive().unwrap().left, 10177);
    assert_eq!(stats.most_stringent().unwrap().left, 13110);

    let snv = &parsed.index().strand("chrX", Strand::Unstranded).unwrap()[0];
    assert_eq!(snv.data.reference.to_string(), "T");
    assert_eq!(snv.data.alternate_string(), "C,G");
}

#[test]
fn test_hash_lookup() {
    let parsed = Parser::new(ParserConfig::default(), PeakBuilder::default())
        .parse("tests_data/peaks.bed")
        .unwrap();
    for (chromosome, strand, record) in parsed.index().iter_records() {
        let (found_chromosome, found_strand, found) =
            parsed.index().find_by_hash(record.hash).unwrap();
        assert_eq!(found_chromosome, chromosome);
        assert_eq!(found_strand, strand);
        assert_eq!(found.data.name, record.data.name);
    }
}
