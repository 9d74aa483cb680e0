use rankflow_common::types::AdjacencyRankRecord;
use rankflow_runtime::algorithms::ranker::{RankOrder, Ranker};
use rankflow_runtime::dataset::{PartitionedDataset, StageExecutor};
use std::collections::HashMap;

#[test]
fn test_rank_order_is_descending_then_by_id() {
    let mut keys = vec![
        RankOrder::new(0.2, 3),
        RankOrder::new(0.5, 9),
        RankOrder::new(0.2, 1),
        RankOrder::new(0.1, 0),
    ];
    keys.sort();
    let ids: Vec<u64> = keys.iter().map(|k| k.node_id).collect();
    assert_eq!(ids, vec![9, 1, 3, 0]);
}

#[test]
fn test_ranker_sorts_and_labels() {
    let records = vec![
        AdjacencyRankRecord::new(0, 0.2, vec![1]),
        AdjacencyRankRecord::new(1, 0.5, Vec::new()),
        AdjacencyRankRecord::new(2, 0.2, vec![0, 1]),
        AdjacencyRankRecord::new(3, 0.1, vec![2]),
    ];
    let labels: HashMap<u64, String> = [(1, "b.example".to_string())].into_iter().collect();

    let executor = StageExecutor::new(3).unwrap();
    let ranker = Ranker::new(labels);
    let out = executor
        .run(PartitionedDataset::split(records, 3), &ranker, 1)
        .unwrap();

    assert_eq!(out.partitions(), 1);
    let entries = out.into_records();
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["b.example", "0", "2", "3"]);

    for pair in entries.windows(2) {
        assert!(pair[0].rank >= pair[1].rank);
        if pair[0].rank == pair[1].rank {
            assert!(pair[0].node_id < pair[1].node_id);
        }
    }
}
