use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use timex_engine::DateTimeRecognizer;

const SENTENCES: &[&str] = &[
    "I'll go back Oct. 2",
    "let's meet tomorrow at 5pm for 2 hours",
    "the report is due before next Monday",
    "every other week on Fridays from 5 to 7pm",
    "I was out from Oct 2 to Oct 9 and again 3 days ago",
];

fn criterion_benchmark(c: &mut Criterion) {
    let recognizer = DateTimeRecognizer::english().unwrap();
    let reference = NaiveDate::from_ymd_opt(2016, 11, 7)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let mut group = c.benchmark_group("recognize");
    for (i, sentence) in SENTENCES.iter().enumerate() {
        group.bench_function(format!("sentence_{i}"), |b| {
            b.iter(|| recognizer.recognize(black_box(sentence), reference).unwrap())
        });
    }
    group.finish();

    c.bench_function("english_config", |b| {
        b.iter(|| DateTimeRecognizer::english().unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
