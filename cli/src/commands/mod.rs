//! CLI subcommand implementations.

pub mod define;
pub mod dry_run;
pub mod generate;

use std::path::Path;

use anyhow::Result;
use hana_firewall_core::{config, Firewalld};

/// Dashed rule separating service listings in command output.
const SEPARATOR: &str = "----------------------------------------------------------";

/// Read the global parameters and all service definitions from their
/// default locations under /etc.
async fn read_config() -> Result<Firewalld> {
    let globals =
        config::load_global_parameters(Path::new(config::DEFAULT_GLOBAL_CONFIG_PATH)).await?;
    let services =
        config::load_service_definitions(Path::new(config::DEFAULT_SERVICE_DEFINITION_DIR)).await?;
    Ok(Firewalld { globals, services })
}
