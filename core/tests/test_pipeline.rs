// End-to-end: split/compress to part files on disk, then stitch, decode,
// and compare. Covers gzip and zstd, part-capacity invariants, empty input,
// and randomized round-trips.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, RngCore, SeedableRng};

    use partstream_core::stream::pipeline::{run_concat_decompress, run_split_compress};
    use partstream_core::stream::sink::fs_part_limit;
    use partstream_core::{
        Codec, CompressionConfig, ParallelismProfile, SegmentedSink, StreamError,
    };

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn part_prefix(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    fn config(codec: Codec, level: i32, chunk_size: usize) -> CompressionConfig {
        CompressionConfig {
            codec,
            level,
            chunk_size,
            profile: ParallelismProfile { workers: 4, pending_limit: 8 },
        }
    }

    /// Incompressible payload, so compressed size tracks raw size and small
    /// part capacities still produce multi-part output.
    fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut data = vec![0u8; len];
        StdRng::seed_from_u64(seed).fill_bytes(&mut data);
        data
    }

    fn roundtrip(data: &[u8], codec: Codec, level: i32, chunk_size: usize, part_size: u64) {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let prefix = part_prefix(&dir, "archive.part_");

        let sink = SegmentedSink::create(&prefix, part_size).unwrap();
        let snapshot =
            run_split_compress(Cursor::new(data.to_vec()), sink, &config(codec, level, chunk_size))
                .unwrap();
        assert_eq!(snapshot.bytes_raw, data.len() as u64);

        if data.is_empty() {
            // Zero input, zero parts; restore has nothing to discover.
            assert_eq!(snapshot.parts, 0);
            assert_eq!(snapshot.bytes_compressed, 0);
            let err = run_concat_decompress(&format!("{prefix}*"), codec, Vec::new()).unwrap_err();
            assert!(matches!(err, StreamError::Discovery(_)));
            return;
        }

        let mut restored = Vec::new();
        let bytes = run_concat_decompress(&format!("{prefix}*"), codec, &mut restored).unwrap();
        assert_eq!(bytes, data.len() as u64);
        assert_eq!(restored, data);
    }

    // ------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------
    #[test]
    fn gzip_roundtrip_across_many_parts() -> anyhow::Result<()> {
        init_tracing();
        let data = random_bytes(300 * 1024, 7);
        let dir = tempfile::tempdir()?;
        let prefix = part_prefix(&dir, "big.tar.gz.part_");

        let sink = SegmentedSink::create(&prefix, 50_000)?;
        let snapshot =
            run_split_compress(Cursor::new(data.clone()), sink, &config(Codec::Gzip, 6, 64 * 1024))?;

        // Incompressible input: more than one part, every part except the
        // last filled to capacity.
        assert!(snapshot.parts > 1);
        assert!(!snapshot.single_part);
        let mut sizes: Vec<u64> = (0..snapshot.parts)
            .map(|i| std::fs::metadata(format!("{prefix}{i:03}")).map(|m| m.len()))
            .collect::<std::io::Result<_>>()?;
        let last = sizes.pop().unwrap();
        assert!(sizes.iter().all(|&s| s == 50_000));
        assert!(last <= 50_000 && last > 0);

        let mut restored = Vec::new();
        run_concat_decompress(&format!("{prefix}*"), Codec::Gzip, &mut restored)?;
        assert_eq!(restored, data);
        Ok(())
    }

    #[test]
    fn zstd_roundtrip_across_many_parts() {
        roundtrip(&random_bytes(200 * 1024, 11), Codec::Zstd, 3, 32 * 1024, 40_000);
    }

    #[test]
    fn empty_input_yields_no_parts_and_no_errors() {
        roundtrip(&[], Codec::Gzip, 6, 1024, 1024);
    }

    #[test]
    fn one_byte_roundtrip() {
        roundtrip(&[0x42], Codec::Gzip, 6, 1024, 64);
    }

    #[test]
    fn exact_chunk_multiple_roundtrip() -> anyhow::Result<()> {
        init_tracing();
        let chunk = 8 * 1024;
        let data = random_bytes(chunk * 3, 23);
        let dir = tempfile::tempdir()?;
        let prefix = part_prefix(&dir, "exact.part_");

        let sink = SegmentedSink::create(&prefix, 1 << 20)?;
        let snapshot =
            run_split_compress(Cursor::new(data.clone()), sink, &config(Codec::Gzip, 6, chunk))?;
        assert_eq!(snapshot.chunks, 3);

        let mut restored = Vec::new();
        run_concat_decompress(&format!("{prefix}*"), Codec::Gzip, &mut restored)?;
        assert_eq!(restored, data);
        Ok(())
    }

    #[test]
    fn small_output_is_a_single_part() {
        init_tracing();
        let data = random_bytes(10 * 1024, 31);
        let dir = tempfile::tempdir().unwrap();
        let prefix = part_prefix(&dir, "small.part_");

        let sink = SegmentedSink::create(&prefix, 1 << 30).unwrap();
        let snapshot =
            run_split_compress(Cursor::new(data), sink, &config(Codec::Gzip, 1, 4096)).unwrap();

        assert_eq!(snapshot.parts, 1);
        assert!(snapshot.single_part);
    }

    #[test]
    fn repeated_runs_produce_identical_parts() {
        init_tracing();
        let data = random_bytes(120 * 1024, 43);
        let cfg = config(Codec::Gzip, 6, 16 * 1024);

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let dir = tempfile::tempdir().unwrap();
            let prefix = part_prefix(&dir, "det.part_");
            let sink = SegmentedSink::create(&prefix, 30_000).unwrap();
            let snapshot = run_split_compress(Cursor::new(data.clone()), sink, &cfg).unwrap();
            let mut stream = Vec::new();
            for i in 0..snapshot.parts {
                stream.extend(std::fs::read(format!("{prefix}{i:03}")).unwrap());
            }
            outputs.push(stream);
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn snapshot_is_serializable() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let prefix = part_prefix(&dir, "snap.part_");
        let sink = SegmentedSink::create(&prefix, 1 << 20).unwrap();
        let snapshot = run_split_compress(
            Cursor::new(random_bytes(4096, 3)),
            sink,
            &config(Codec::Gzip, 6, 1024),
        )
        .unwrap();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"bytes_raw\":4096"));
        assert!(json.contains("\"single_part\":true"));
    }

    #[test]
    fn part_limit_probe_is_harmless() {
        // Value depends on the host filesystem; the call itself must not
        // fail, and any reported limit is below 4 GiB.
        let dir = tempfile::tempdir().unwrap();
        if let Some(limit) = fs_part_limit(dir.path()) {
            assert!(limit < 4 * 1024 * 1024 * 1024);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn randomized_roundtrip(
            seed in any::<u64>(),
            len in 0usize..40_000,
            chunk_size in 512usize..8192,
            part_size in 1_000u64..20_000,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            // Mix compressible and incompressible inputs.
            let data: Vec<u8> = if seed % 2 == 0 {
                (0..len).map(|i| (i % 17) as u8).collect()
            } else {
                let mut d = vec![0u8; len];
                rng.fill_bytes(&mut d);
                d
            };
            let codec = if rng.gen_bool(0.5) { Codec::Gzip } else { Codec::Zstd };
            let level = if codec == Codec::Gzip { 1 } else { 3 };
            roundtrip(&data, codec, level, chunk_size, part_size);
        }
    }
}
