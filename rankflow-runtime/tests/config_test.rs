use rankflow_common::config::{keys, Configuration};
use rankflow_common::error::RankFlowError;
use rankflow_runtime::plan::execution_plan::ExecutionPlan;
use rankflow_runtime::plan::run_spec::{DanglingPolicy, RunSpec, DEFAULT_MAX_ROUNDS};
use std::path::PathBuf;

fn base() -> Configuration {
    let mut c = Configuration::new();
    c.put(keys::INPUT_PATH, "in");
    c.put(keys::OUTPUT_PATH, "out");
    c.put(keys::GRAPH_PATH, "graph.txt");
    c
}

#[test]
fn test_defaults_from_configuration() {
    let spec = RunSpec::from_configuration(&base()).unwrap();
    assert_eq!(spec.damping_factor, 0.85);
    assert_eq!(spec.max_rounds, DEFAULT_MAX_ROUNDS);
    assert_eq!(spec.convergence_threshold, 0.01);
    assert!(!spec.delete_prior_output);
    assert_eq!(spec.dangling_policy, DanglingPolicy::Drop);
}

#[test]
fn test_assignments_override() {
    let mut c = base();
    c.put_assignment("rankflow.damping.factor=0.9").unwrap();
    c.put_assignment(&format!("{}= redistribute", keys::DANGLING_POLICY))
        .unwrap();
    c.put(keys::MAX_ROUNDS, "12");

    let spec = RunSpec::from_configuration(&c).unwrap();
    assert_eq!(spec.damping_factor, 0.9);
    assert_eq!(spec.max_rounds, 12);
    assert_eq!(spec.dangling_policy, DanglingPolicy::Redistribute);
}

#[test]
fn test_invalid_values_are_configuration_errors() {
    for (key, value) in [
        (keys::DAMPING_FACTOR, "1.0"),
        (keys::DAMPING_FACTOR, "0"),
        (keys::DAMPING_FACTOR, "abc"),
        (keys::CONVERGENCE_THRESHOLD, "-0.1"),
        (keys::MAX_ROUNDS, "-1"),
        (keys::PARALLELISM, "0"),
        (keys::DELETE_OUTPUT, "maybe"),
        (keys::DANGLING_POLICY, "keep"),
    ] {
        let mut c = base();
        c.put(key, value);
        let err = RunSpec::from_configuration(&c).unwrap_err();
        assert!(
            matches!(err, RankFlowError::Configuration(_)),
            "{key}={value} gave {err:?}"
        );
    }
}

#[test]
fn test_missing_path_is_configuration_error() {
    let mut c = Configuration::new();
    c.put(keys::INPUT_PATH, "in");
    assert!(matches!(
        RunSpec::from_configuration(&c),
        Err(RankFlowError::Configuration(_))
    ));
    assert!(Configuration::new().put_assignment("no-equals").is_err());
}

#[test]
fn test_plan_locations() {
    let spec = RunSpec::new("in", "/tmp/pr", "graph.txt");
    let plan = ExecutionPlan::from_run_spec(&spec);
    assert_eq!(plan.round_dir(0), PathBuf::from("/tmp/pr/ranks0"));
    assert_eq!(plan.round_dir(12), PathBuf::from("/tmp/pr/ranks12"));
    assert_eq!(plan.ranking_dir(), PathBuf::from("/tmp/pr/ranking"));
    assert_eq!(plan.summary_path(), PathBuf::from("/tmp/pr/_summary.json"));
    assert_eq!(plan.partitions, spec.parallelism);
}
