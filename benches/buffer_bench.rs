// SPDX-License-Identifier: MIT
//! Buffer editing and struct decoding benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use hexview::inspect::find_strings;
use hexview::{ByteBuffer, StructCodec};

fn splice_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("splice");

    for size in [4 * 1024, 256 * 1024, 4 * 1024 * 1024].iter() {
        let size = *size;
        group.throughput(Throughput::Bytes(size as u64));

        // Repeated single-byte inserts at the front, the worst case for shifting
        group.bench_with_input(BenchmarkId::new("insert_front", size), &size, |b, &s| {
            let data = vec![0xabu8; s];
            b.iter(|| {
                let mut buffer = ByteBuffer::from_bytes(&data).unwrap();
                for _ in 0..64 {
                    buffer.insert(black_box(&[1]), 0).unwrap();
                }
                buffer
            })
        });

        // Appends that force the reallocation path
        group.bench_with_input(BenchmarkId::new("append_chunks", size), &size, |b, &s| {
            let chunk = vec![0x55u8; 1024];
            b.iter(|| {
                let mut buffer = ByteBuffer::new();
                while buffer.len() < s {
                    let end = buffer.len();
                    buffer.splice(black_box(&chunk), end, end).unwrap();
                }
                buffer
            })
        });
    }

    group.finish();
}

fn codec_benchmarks(c: &mut Criterion) {
    let codec = StructCodec::compile(
        "<4sHHI16B2d",
        Some(
            ["magic", "major", "minor", "size", "digest", "bounds"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
    )
    .unwrap();
    let data = vec![0x11u8; codec.schema().total_size()];

    c.bench_function("decode_named_map", |b| {
        b.iter(|| {
            let record = codec.attach(black_box(data.clone())).unwrap();
            record.to_named_map().unwrap()
        })
    });
}

fn strings_benchmark(c: &mut Criterion) {
    let data: Vec<u8> = (0..1024 * 1024).map(|i| (i % 97) as u8).collect();
    let mut group = c.benchmark_group("strings");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("find_strings_1mb", |b| {
        b.iter(|| find_strings(black_box(&data), 3))
    });
    group.finish();
}

criterion_group!(benches, splice_benchmarks, codec_benchmarks, strings_benchmark);
criterion_main!(benches);
