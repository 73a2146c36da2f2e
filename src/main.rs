//! Binary entry point for the `provider-openstack` controller.

mod cli;

use std::io::{self, Write};
use std::process;

use camino::Utf8Path;
use clap::Parser;
use thiserror::Error;

use cli::{Cli, CrdCommand, RunCommand};
use provider_openstack::apis::{ManifestError, render_crd, write_crd};
use provider_openstack::config::{ConfigError, ProviderConfig};
use provider_openstack::controller::{self, ReconcileError};
use provider_openstack::external::InstanceExternal;
use provider_openstack::openstack::{OpenStackBackend, OpenStackBackendError};
use provider_openstack::telemetry::{TelemetryError, init_tracing};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging setup failed: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("backend error: {0}")]
    Backend(#[from] OpenStackBackendError),
    #[error("failed to build Kubernetes client: {0}")]
    Kube(#[from] kube::Error),
    #[error("controller error: {0}")]
    Controller(#[from] ReconcileError),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::Run(command) => run_controller(&command).await,
        Cli::Crd(command) => emit_crd(&command, io::stdout()),
    }
}

async fn run_controller(args: &RunCommand) -> Result<(), CliError> {
    let config = ProviderConfig::load_without_cli_args()?;
    init_tracing(config.log_format()?)?;
    let settings = config.settings()?;
    let backend = OpenStackBackend::new(&config)?;
    let client = kube::Client::try_default().await?;

    if args.install_crd {
        controller::install_crd(client.clone(), &settings.field_manager).await?;
    }

    controller::run(client, InstanceExternal::new(backend), settings).await?;
    Ok(())
}

fn emit_crd(args: &CrdCommand, mut stdout: impl Write) -> Result<(), CliError> {
    match args.output.as_deref() {
        Some(path) => write_crd(Utf8Path::new(path))?,
        None => write!(stdout, "{}", render_crd()?)?,
    }
    Ok(())
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_crd_writes_yaml_to_stdout() {
        let mut buf = Vec::new();
        emit_crd(&CrdCommand { output: None }, &mut buf)
            .unwrap_or_else(|err| panic!("emit: {err}"));
        let rendered = String::from_utf8(buf).unwrap_or_else(|err| panic!("utf8: {err}"));
        assert!(rendered.contains("name: instances.compute.openstack.crossplane.io"));
    }

    #[test]
    fn write_error_writes_cli_error() {
        let mut buf = Vec::new();
        let err = CliError::Config(ConfigError::MissingField(String::from("endpoint")));
        write_error(&mut buf, &err);
        let rendered = String::from_utf8(buf).unwrap_or_else(|err| panic!("utf8: {err}"));
        assert!(
            rendered.contains("configuration error: missing configuration field: endpoint"),
            "rendered: {rendered}"
        );
    }
}
