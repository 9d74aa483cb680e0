use rankflow_runtime::job::RankJob;
use rankflow_runtime::plan::run_spec::RunSpec;

#[test]
fn test_write_results_lists_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let graph = dir.path().join("graph.txt");
    std::fs::write(&graph, "3\n0 1\n1 2\n2 0\nlabel 2 gamma\n").unwrap();
    let job = RankJob::local(RunSpec::new(&graph, dir.path().join("out"), &graph)).unwrap();
    assert!(job.execute().result.success);

    let mut out = Vec::new();
    job.write_results(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("0\t"));
    assert!(lines[2].starts_with("gamma\t"));
}

#[test]
fn test_write_results_without_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let graph = dir.path().join("graph.txt");
    let job = RankJob::local(RunSpec::new(&graph, dir.path().join("out"), &graph)).unwrap();

    let mut out = Vec::new();
    job.write_results(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("The ranking at "));
    assert!(text.trim_end().ends_with("doesn't exist."));
}
