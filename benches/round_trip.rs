use criterion::{criterion_group, criterion_main, Criterion};
use tsv_table::export::write_tsv_to_writer;
use tsv_table::ingestion::{ingest_tsv_from_reader, reader_builder, IngestOptions};
use tsv_table::{RowArg, Table, Vector3};

fn sample_table(rows: usize) -> Table {
    let mut t = Table::new();
    for i in 0..rows {
        let f = i as f64;
        t.add_row(vec![
            "id".into(),
            f.into(),
            "pos".into(),
            Vector3::new(f, f * 2.0, f * 3.0).into(),
            RowArg::mapping([("speed", f / 10.0)]),
        ])
        .expect("add row");
    }
    t
}

fn bench_round_trip(c: &mut Criterion) {
    let table = sample_table(10_000);
    let mut encoded = Vec::new();
    write_tsv_to_writer(&table, &mut encoded, b'\t').expect("write");

    c.bench_function("write_10k_rows", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(encoded.len());
            write_tsv_to_writer(&table, &mut buf, b'\t').expect("write");
            buf
        })
    });

    c.bench_function("ingest_10k_rows", |b| {
        b.iter(|| {
            let mut rdr = reader_builder(b'\t').from_reader(encoded.as_slice());
            ingest_tsv_from_reader(&mut rdr, &IngestOptions::default()).expect("ingest")
        })
    });
}

criterion_group!(benches, bench_round_trip);
criterion_main!(benches);
