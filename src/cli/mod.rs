//! Command-line interface definitions for the `provider-openstack` binary.
//!
//! The clap parser structures live here so both the binary and the build
//! script can use them; the build script renders the manual page from them.

use clap::Parser;

/// Top-level CLI for the `provider-openstack` binary.
#[derive(Debug, Parser)]
#[command(
    name = "provider-openstack",
    about = "Reconcile OpenStack compute instances declared as Kubernetes resources",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Start the instance controller.
    #[command(name = "run", about = "Start the instance controller")]
    Run(RunCommand),
    /// Print or write the `Instance` CustomResourceDefinition.
    #[command(name = "crd", about = "Print or write the Instance CRD as YAML")]
    Crd(CrdCommand),
}

/// Arguments for the `provider-openstack run` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct RunCommand {
    /// Server-side apply the `Instance` CRD before the controller starts.
    #[arg(long)]
    pub(crate) install_crd: bool,
}

/// Arguments for the `provider-openstack crd` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CrdCommand {
    /// Write the manifest to this file instead of standard output.
    ///
    /// Missing parent directories are created.
    #[arg(long, short, value_name = "PATH")]
    pub(crate) output: Option<String>,
}
