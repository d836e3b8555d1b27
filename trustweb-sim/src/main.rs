//! Entry point for the `trustweb-sim` binary.
//!
//! Configuration comes from `TRUSTWEB_*` environment variables; the report
//! is printed to stdout as JSON.

use tracing::info;
use tracing_subscriber::EnvFilter;
use trustweb_sim::{SimConfig, SimRunner};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match SimConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!(?config, "trustweb-sim starting");

    let report = match SimRunner::new(config).run().await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            std::process::exit(1);
        }
    };

    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode report");
            std::process::exit(1);
        }
    }
}
