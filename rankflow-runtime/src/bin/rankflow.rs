use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use rankflow_api::pipeline::PipelineResult;
use rankflow_common::config::{keys, Configuration};
use rankflow_common::error::RankFlowError;
use rankflow_runtime::job::RankJob;
use rankflow_runtime::observability::{init_prometheus, init_tracing};
use rankflow_runtime::plan::execution_plan::ExecutionPlan;
use rankflow_runtime::plan::run_spec::{
    RunSpec, DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_DAMPING_FACTOR, DEFAULT_MAX_ROUNDS,
    DEFAULT_PARALLELISM,
};
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Dangling {
    Drop,
    Redistribute,
}

#[derive(Debug, Parser)]
#[command(name = "rankflow", about = "Iterative PageRank over partitioned stages")]
struct Args {
    /// Edge list file or directory read by the loader.
    #[arg(long)]
    input: String,

    /// Directory receiving every round and the final ranking.
    #[arg(long)]
    output: String,

    /// Graph data file holding the node-count header and node labels.
    #[arg(long)]
    graph: String,

    #[arg(long, default_value_t = DEFAULT_DAMPING_FACTOR)]
    damping_factor: f64,

    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: u64,

    #[arg(long, default_value_t = DEFAULT_CONVERGENCE_THRESHOLD)]
    min_diff: f64,

    #[arg(long)]
    delete_output: bool,

    #[arg(long)]
    show_results: bool,

    #[arg(long, default_value_t = DEFAULT_PARALLELISM)]
    parallelism: usize,

    #[arg(long, value_enum, default_value_t = Dangling::Drop)]
    dangling: Dangling,

    /// Extra `key=value` settings, applied after the flags above.
    #[arg(long = "conf")]
    conf: Vec<String>,

    #[arg(long)]
    metrics_listen: Option<SocketAddr>,

    /// Print the resolved run spec and plan, then exit.
    #[arg(long)]
    dry_run: bool,
}

fn build_configuration(args: &Args) -> Result<Configuration, RankFlowError> {
    let mut config = Configuration::new();
    config.put(keys::INPUT_PATH, args.input.as_str());
    config.put(keys::OUTPUT_PATH, args.output.as_str());
    config.put(keys::GRAPH_PATH, args.graph.as_str());
    config.put(keys::DAMPING_FACTOR, args.damping_factor.to_string());
    config.put(keys::MAX_ROUNDS, args.max_rounds.to_string());
    config.put(keys::CONVERGENCE_THRESHOLD, args.min_diff.to_string());
    config.put(keys::DELETE_OUTPUT, args.delete_output.to_string());
    config.put(keys::SHOW_RESULTS, args.show_results.to_string());
    config.put(keys::PARALLELISM, args.parallelism.to_string());
    config.put(
        keys::DANGLING_POLICY,
        match args.dangling {
            Dangling::Drop => "drop",
            Dangling::Redistribute => "redistribute",
        },
    );
    for assignment in &args.conf {
        config.put_assignment(assignment)?;
    }
    Ok(config)
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                return ExitCode::FAILURE;
            }
        },
    };
    init_tracing();

    if let Some(addr) = args.metrics_listen {
        if let Err(e) = init_prometheus(addr) {
            error!(error = %e, "metrics exporter not started");
            return ExitCode::FAILURE;
        }
    }

    let spec = match build_configuration(&args).and_then(|c| RunSpec::from_configuration(&c)) {
        Ok(spec) => spec,
        Err(e) => {
            error!(error = %e, "invalid arguments");
            return ExitCode::FAILURE;
        }
    };

    if args.dry_run {
        let plan = ExecutionPlan::from_run_spec(&spec);
        match (
            serde_json::to_string_pretty(&spec),
            serde_json::to_string_pretty(&plan),
        ) {
            (Ok(s), Ok(p)) => {
                println!("{s}");
                println!("{p}");
                return ExitCode::SUCCESS;
            }
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "cannot render run spec");
                return ExitCode::FAILURE;
            }
        }
    }

    let job = match RankJob::local(spec) {
        Ok(job) => job,
        Err(e) => {
            error!(error = %e, "invalid arguments");
            return ExitCode::FAILURE;
        }
    };

    let mut result = job.execute().result;
    if job.spec().show_results {
        result = result.and(PipelineResult::from_stage("show results", &job.show_results()));
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        if let Some(msg) = &result.error_message {
            eprintln!("{msg}");
        }
        ExitCode::FAILURE
    }
}
