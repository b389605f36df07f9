#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use mhf_protocol::core::cursor::ByteCursor;
use std::hint::black_box;
use std::io::SeekFrom;

fn bench_cursor_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_primitives");
    let counts = [16usize, 256, 4096];

    for &count in &counts {
        group.throughput(Throughput::Bytes((count * 4) as u64));
        group.bench_function(format!("write_u32_x{count}"), |b| {
            b.iter(|| {
                let mut cursor = ByteCursor::with_capacity(count * 4);
                for i in 0..count {
                    cursor.write_u32(black_box(i as u32));
                }
                cursor
            })
        });

        let mut filled = ByteCursor::new();
        for i in 0..count {
            filled.write_u32(i as u32);
        }
        group.bench_function(format!("read_u32_x{count}"), |b| {
            b.iter_batched(
                || filled.clone(),
                |mut cursor| {
                    cursor.seek(SeekFrom::Start(0)).unwrap();
                    for _ in 0..count {
                        black_box(cursor.read_u32().unwrap());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    let text = vec![b'a'; 200];
    group.bench_function("null_terminated_200b", |b| {
        b.iter(|| {
            let mut cursor = ByteCursor::new();
            cursor.write_null_terminated_bytes(black_box(&text));
            cursor.seek(SeekFrom::Start(0)).unwrap();
            black_box(cursor.read_null_terminated_bytes())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_cursor_primitives);
criterion_main!(benches);
