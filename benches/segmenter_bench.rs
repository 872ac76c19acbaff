use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sentencify::segmenter::{segment_substitution, QuoteAwareSegmenter};

const SAMPLE: &str = "The lamp flickered twice. He said, \"Hold still. Don't move.\" Nobody did! \
今天天气很好。真的吗？（当然。）Then the room went quiet?! A long pause followed, \
and the narrator kept going without any terminal punctuation for a while before ending. ";

fn bench_segmenters(c: &mut Criterion) {
    let text = SAMPLE.repeat(500);
    let segmenter = QuoteAwareSegmenter::with_default_rules();

    let mut group = c.benchmark_group("segmenter");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("quote_aware", |b| {
        b.iter(|| segmenter.segment(black_box(&text)))
    });

    group.bench_function("substitution", |b| {
        b.iter(|| segment_substitution(black_box(&text)))
    });

    group.finish();
}

criterion_group!(benches, bench_segmenters);
criterion_main!(benches);
