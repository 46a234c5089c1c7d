use criterion::{criterion_group, criterion_main, Criterion};
use genomodel::prelude::*;
use genomodel::test_utilities::random_peak_file;

const PEAK_FILE_LENGTH: usize = 100_000;

fn bench_parse_peaks(c: &mut Criterion) {
    // create the benchmark group
    let mut group = c.benchmark_group("parse");

    // create the test data
    let input_bedfile = random_peak_file(PEAK_FILE_LENGTH);

    // configure the sample size for the group
    group.sample_size(10);

    for hash_function in [HashFunction::Fnv, HashFunction::OneAtATime] {
        let config = ParserConfig::default().with_hash_function(hash_function);
        let parser = Parser::new(config, PeakBuilder::default());
        group.bench_function(format!("peaks_{:?}", hash_function), |b| {
            b.iter(|| {
                let parsed = parser.parse(input_bedfile.path()).unwrap();
                parsed.record_count()
            });
        });
    }

    let restricted = ParserConfig::default().with_assembly(Assembly::Hg38, true);
    let parser = Parser::new(restricted, PeakBuilder::default());
    group.bench_function("peaks_hg38_restricted", |b| {
        b.iter(|| {
            let parsed = parser.parse(input_bedfile.path()).unwrap();
            parsed.record_count()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parse_peaks);
criterion_main!(benches);
