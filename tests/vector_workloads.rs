// ==============================================
// LOADER + WORKLOAD INTEGRATION TESTS
// ==============================================
//
// The loaders produce the payloads that real request streams carry into the
// cache. These tests write real files, load them back, and drive a cache
// with a generated key sequence mapped onto the loaded vectors.

use std::io::Write;
use std::path::Path;

use delaycache::builder::{CacheBuilder, EvictionPolicy};
use delaycache::io::{ElementType, GroundTruth, QueryVectors, VectorProfile};
use delaycache::traits::CacheRequest;
use delaycache::workload::{frequency_histogram, KeyDistribution, KeyStream};

fn write_query_file(path: &Path, dimension: u32, vectors: &[Vec<u8>]) {
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&(vectors.len() as u32).to_le_bytes()).unwrap();
    file.write_all(&dimension.to_le_bytes()).unwrap();
    for vector in vectors {
        file.write_all(vector).unwrap();
    }
}

fn write_ground_truth_file(path: &Path, top_k: u32, records: &[Vec<u32>]) {
    let mut file = std::fs::File::create(path).unwrap();
    file.write_all(&(records.len() as u32).to_le_bytes()).unwrap();
    file.write_all(&top_k.to_le_bytes()).unwrap();
    for record in records {
        for id in record {
            file.write_all(&id.to_le_bytes()).unwrap();
        }
    }
}

#[test]
fn loaded_vectors_flow_through_the_cache() {
    let dir = tempfile::tempdir().unwrap();
    let query_path = dir.path().join("query.bin");

    let dimension = 16u32;
    let vectors: Vec<Vec<u8>> = (0..32u8).map(|i| vec![i; dimension as usize]).collect();
    write_query_file(&query_path, dimension, &vectors);

    let profile = VectorProfile::new(ElementType::U8, dimension as usize);
    let queries = QueryVectors::load(&query_path, profile).unwrap();
    assert_eq!(queries.len(), 32);

    // Room for 8 of the 16-byte vectors.
    let mut cache = CacheBuilder::new(128).policy(EvictionPolicy::Lru).build();
    let mut stream =
        KeyStream::new(queries.len() as u64, KeyDistribution::Zipfian { exponent: 0.99 }, 3)
            .unwrap();

    let operations = 500;
    for _ in 0..operations {
        let key = stream.next_key();
        let bytes = queries.get(key as usize).unwrap().as_slice();
        if let Some(found) = cache.get_immediate(CacheRequest::new(key, bytes)) {
            assert_eq!(found, bytes);
        } else {
            stream.record_insert();
        }
        assert!(cache.current_size() <= cache.capacity());
    }

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, operations);
    // A skewed stream against an 8-entry cache must see some locality.
    assert!(stats.hits > 0);
}

#[test]
fn ground_truth_records_align_with_queries() {
    let dir = tempfile::tempdir().unwrap();
    let gt_path = dir.path().join("gt.bin");

    let records: Vec<Vec<u32>> = (0..10u32)
        .map(|i| (0..5).map(|j| i * 100 + j).collect())
        .collect();
    write_ground_truth_file(&gt_path, 5, &records);

    let gt = GroundTruth::load(&gt_path).unwrap();
    assert_eq!(gt.len(), 10);
    assert_eq!(gt.top_k(), 5);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(gt.neighbors(index), Some(record.as_slice()));
    }
}

#[test]
fn truncated_ground_truth_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let gt_path = dir.path().join("gt.bin");

    let mut file = std::fs::File::create(&gt_path).unwrap();
    file.write_all(&4u32.to_le_bytes()).unwrap();
    file.write_all(&10u32.to_le_bytes()).unwrap();
    file.write_all(&[0u8; 40]).unwrap(); // one record of four declared

    assert!(GroundTruth::load(&gt_path).is_err());
}

#[test]
fn float_vectors_load_with_four_byte_components() {
    let dir = tempfile::tempdir().unwrap();
    let query_path = dir.path().join("query.bin");

    let dimension = 3u32;
    let vectors: Vec<Vec<u8>> = (0..4)
        .map(|i| {
            let mut bytes = Vec::new();
            for j in 0..dimension {
                bytes.extend_from_slice(&((i * 10 + j) as f32).to_le_bytes());
            }
            bytes
        })
        .collect();
    write_query_file(&query_path, dimension, &vectors);

    let profile = VectorProfile::new(ElementType::F32, dimension as usize);
    assert_eq!(profile.record_len(), 12);

    let queries = QueryVectors::load(&query_path, profile).unwrap();
    assert_eq!(queries.len(), 4);
    for (index, vector) in vectors.iter().enumerate() {
        assert_eq!(queries.get(index).unwrap().as_slice(), vector.as_slice());
    }
}

#[test]
fn histogram_of_a_generated_sequence_covers_the_sequence() {
    let mut stream =
        KeyStream::new(100, KeyDistribution::Latest { exponent: 0.99 }, 11).unwrap();
    for _ in 0..50 {
        stream.record_insert();
    }
    let sequence = stream.generate(1_000);

    let histogram = frequency_histogram(&sequence);
    let total: usize = histogram.iter().map(|(_, count)| count).sum();
    assert_eq!(total, sequence.len());
    assert!(histogram.windows(2).all(|pair| pair[0].1 >= pair[1].1));
    assert!(histogram.len() <= 100);
}
