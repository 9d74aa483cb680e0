use rankflow_api::function::{StageFunction, TransformContext};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use rankflow_runtime::dataset::{PartitionedDataset, StageExecutor};

struct WordCount;

impl StageFunction<String, String, u64, (String, u64)> for WordCount {
    fn name(&self) -> &str {
        "word-count"
    }

    fn transform(
        &self,
        line: String,
        context: &mut dyn TransformContext<String, u64>,
    ) -> RankFlowResult<()> {
        for word in line.split_whitespace() {
            if word == "boom" {
                return Err(RankFlowError::malformed("line", "boom"));
            }
            context.emit(word.to_string(), 1);
        }
        Ok(())
    }

    fn aggregate(
        &self,
        key: &String,
        values: &mut dyn Iterator<Item = u64>,
    ) -> RankFlowResult<Option<(String, u64)>> {
        Ok(Some((key.clone(), values.sum())))
    }
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_every_key_aggregated_once() {
    let executor = StageExecutor::new(3).unwrap();
    let input = PartitionedDataset::split(lines(&["a b a", "c a", "b", "d d d d"]), 3);

    let out = executor.run(input, &WordCount, 4).unwrap();
    assert_eq!(out.partitions(), 4);

    let mut counts = out.into_records();
    counts.sort();
    assert_eq!(
        counts,
        vec![
            ("a".to_string(), 3),
            ("b".to_string(), 2),
            ("c".to_string(), 1),
            ("d".to_string(), 4),
        ]
    );
}

#[test]
fn test_single_partition_is_key_ordered() {
    let executor = StageExecutor::new(2).unwrap();
    let input = PartitionedDataset::split(lines(&["z y", "x", "y w"]), 2);

    let out = executor.run(input, &WordCount, 1).unwrap();
    let keys: Vec<String> = out.into_records().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["w", "x", "y", "z"]);
}

#[test]
fn test_task_error_fails_the_pass() {
    let executor = StageExecutor::new(2).unwrap();
    let input = PartitionedDataset::split(lines(&["a", "b boom", "c"]), 3);

    let err = executor.run(input, &WordCount, 2).unwrap_err();
    assert!(matches!(err, RankFlowError::MalformedInput { .. }));
}

#[test]
fn test_split_keeps_order_and_covers_all() {
    let data = PartitionedDataset::split((0..10).collect::<Vec<u32>>(), 3);
    assert_eq!(data.partitions(), 3);
    assert_eq!(data.partition(0), &[0, 1, 2, 3]);
    assert_eq!(data.len(), 10);
    assert_eq!(data.into_records(), (0..10).collect::<Vec<u32>>());

    let empty = PartitionedDataset::<u32>::split(Vec::new(), 4);
    assert!(empty.is_empty());
    assert_eq!(empty.partitions(), 4);
}
