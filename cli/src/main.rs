//! HANA Firewall CLI - generate firewalld service definitions for HANA
//!
//! A command-line tool that expands HANA network service definitions into
//! firewalld service XML files, previews the result, and authors new
//! service definition files.

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hana-firewall")]
#[command(author, version)]
#[command(about = "Generate HANA network service definitions for firewalld")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format (dry-run only)
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate firewalld service XML files according to HANA service
    /// definitions, overwriting previously generated files
    GenerateFirewalldServices,

    /// Display the services that would be generated, without writing anything
    DryRun,

    /// Interactively create a new HANA network service definition
    DefineNewHanaService,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Every command reads or writes configuration under /etc.
    if !is_root::is_root() {
        eprintln!("Please run hana-firewall with root privilege.");
        std::process::exit(1);
    }

    match command {
        Commands::GenerateFirewalldServices => commands::generate::run().await,
        Commands::DryRun => commands::dry_run::run(cli.json).await,
        Commands::DefineNewHanaService => commands::define::run().await,
    }
}
