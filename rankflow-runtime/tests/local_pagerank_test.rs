use rankflow_common::error::RankFlowError;
use rankflow_common::types::AdjacencyRankRecord;
use rankflow_runtime::algorithms::propagator::{
    dangling_mass, PropagatorConfig, RankPropagator,
};
use rankflow_runtime::dataset::{PartitionedDataset, StageExecutor};

fn propagate(
    records: Vec<AdjacencyRankRecord>,
    nodes_count: u64,
    dangling: f64,
    partitions: usize,
) -> Result<Vec<AdjacencyRankRecord>, RankFlowError> {
    let executor = StageExecutor::new(2).unwrap();
    let propagator = RankPropagator::new(PropagatorConfig {
        damping_factor: 0.85,
        nodes_count,
        dangling_mass: dangling,
    });
    let input = PartitionedDataset::split(records, 2);
    let mut out = executor.run(input, &propagator, partitions)?.into_records();
    out.sort_by_key(|r| r.node_id);
    Ok(out)
}

fn uniform(edges: Vec<Vec<u64>>) -> Vec<AdjacencyRankRecord> {
    let n = edges.len() as f64;
    edges
        .into_iter()
        .enumerate()
        .map(|(id, e)| AdjacencyRankRecord::new(id as u64, 1.0 / n, e))
        .collect()
}

#[test]
fn test_single_edge_round() {
    let out = propagate(uniform(vec![vec![1], vec![]]), 2, 0.0, 2).unwrap();

    assert_eq!(out.len(), 2);
    assert!((out[0].rank - 0.075).abs() < 1e-9);
    assert!((out[1].rank - 0.5).abs() < 1e-9);
    assert_eq!(out[0].edges, vec![1]);
    assert!(out[1].edges.is_empty());

    let total: f64 = out.iter().map(|r| r.rank).sum();
    assert!(total < 1.0);
}

#[test]
fn test_three_cycle_is_fixed_point() {
    let out = propagate(uniform(vec![vec![1], vec![2], vec![0]]), 3, 0.0, 3).unwrap();

    assert_eq!(out.len(), 3);
    for r in &out {
        assert!((r.rank - 1.0 / 3.0).abs() < 1e-12);
    }
}

#[test]
fn test_destination_without_record_is_unknown() {
    let records = vec![AdjacencyRankRecord::new(0, 0.5, vec![1])];
    let err = propagate(records, 2, 0.0, 2).unwrap_err();
    assert!(matches!(err, RankFlowError::UnknownNode { node_id: 1, .. }));
}

#[test]
fn test_record_outside_node_range_is_unknown() {
    let records = vec![
        AdjacencyRankRecord::new(0, 0.5, vec![0]),
        AdjacencyRankRecord::new(5, 0.5, Vec::new()),
    ];
    let err = propagate(records, 2, 0.0, 1).unwrap_err();
    assert!(matches!(err, RankFlowError::UnknownNode { node_id: 5, .. }));
}

#[test]
fn test_duplicate_record_is_malformed() {
    let records = vec![
        AdjacencyRankRecord::new(0, 0.5, vec![1]),
        AdjacencyRankRecord::new(0, 0.5, vec![1]),
        AdjacencyRankRecord::new(1, 0.5, vec![0]),
    ];
    let err = propagate(records, 2, 0.0, 2).unwrap_err();
    assert!(matches!(err, RankFlowError::MalformedInput { .. }));
}

#[test]
fn test_mass_conserved_without_dangling_nodes() {
    let mut records = uniform(vec![
        vec![1, 2],
        vec![2],
        vec![0, 3],
        vec![0, 1, 2],
    ]);
    for _ in 0..10 {
        records = propagate(records, 4, 0.0, 3).unwrap();
        let total: f64 = records.iter().map(|r| r.rank).sum();
        assert!((total - 1.0).abs() < 1e-9, "total={total}");
    }
}

#[test]
fn test_dangling_mass_never_exceeds_one() {
    let mut records = uniform(vec![vec![1, 2], vec![2], vec![], vec![0]]);
    for _ in 0..5 {
        records = propagate(records, 4, 0.0, 2).unwrap();
        let total: f64 = records.iter().map(|r| r.rank).sum();
        assert!(total < 1.0 && total > 0.0, "total={total}");
    }
}

#[test]
fn test_dangling_redistribution_restores_mass() {
    let records = uniform(vec![vec![1], vec![]]);
    let dangling = dangling_mass(&PartitionedDataset::split(records.clone(), 1));
    assert!((dangling - 0.5).abs() < 1e-12);

    let out = propagate(records, 2, dangling, 2).unwrap();
    assert!((out[0].rank - 0.2875).abs() < 1e-9);
    assert!((out[1].rank - 0.7125).abs() < 1e-9);
    let total: f64 = out.iter().map(|r| r.rank).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_partitioning_does_not_change_ranks() {
    let edges: Vec<Vec<u64>> = (0..50u64)
        .map(|i| vec![(i * 7 + 1) % 50, (i * 13 + 5) % 50, (i + 1) % 50])
        .collect();
    let mut a = uniform(edges.clone());
    let mut b = uniform(edges);
    for _ in 0..5 {
        a = propagate(a, 50, 0.0, 1).unwrap();
        b = propagate(b, 50, 0.0, 7).unwrap();
    }
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.node_id, y.node_id);
        assert_eq!(x.edges, y.edges);
        assert!((x.rank - y.rank).abs() < 1e-12);
    }
}
