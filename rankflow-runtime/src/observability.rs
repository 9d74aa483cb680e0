use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rankflow_common::error::{RankFlowError, RankFlowResult};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Installs the global metrics recorder and serves it over HTTP at `addr`.
pub fn init_prometheus(addr: SocketAddr) -> RankFlowResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install_recorder()
        .map_err(|e| RankFlowError::Configuration(format!("prometheus init: {e}")))
}
