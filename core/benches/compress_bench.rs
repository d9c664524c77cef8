//! Parallel compression throughput across worker counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use partstream_core::{Codec, CompressionConfig, OrderedParallelCompressor, ParallelismProfile};

fn compress_input(data: &[u8], chunk_size: usize, workers: usize) -> usize {
    let cfg = CompressionConfig {
        codec: Codec::Gzip,
        level: 1,
        chunk_size,
        profile: ParallelismProfile::with_workers(workers),
    };
    let mut compressor = OrderedParallelCompressor::new(Vec::new(), &cfg).unwrap();
    for chunk in data.chunks(chunk_size) {
        compressor.write_bytes(chunk).unwrap();
    }
    compressor.close().unwrap();
    compressor.into_inner().len()
}

fn bench_parallel_compress(c: &mut Criterion) {
    let mut data = vec![0u8; 8 * 1024 * 1024];
    StdRng::seed_from_u64(42).fill_bytes(&mut data);

    let mut group = c.benchmark_group("parallel_compress");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| compress_input(&data, 512 * 1024, workers));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parallel_compress);
criterion_main!(benches);
