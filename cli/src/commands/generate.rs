//! Generate command - write firewalld service XML files.

use std::path::Path;

use anyhow::{bail, Result};
use hana_firewall_core::config;

pub async fn run() -> Result<()> {
    let fw = super::read_config().await?;
    let generated = fw.generate()?;
    if generated.is_empty() {
        bail!(
            "HANA instance numbers or service definitions are missing. Please check the {} directory and the {} file.",
            config::DEFAULT_SERVICE_DEFINITION_DIR,
            config::DEFAULT_GLOBAL_CONFIG_PATH
        );
    }

    println!(
        "Generating {} services in {}:",
        generated.len(),
        config::DEFAULT_FIREWALLD_SERVICE_DIR
    );
    for svc in generated.values() {
        println!("{svc}");
        println!("{}", super::SEPARATOR);
    }

    fw.write(Path::new(config::DEFAULT_FIREWALLD_SERVICE_DIR), &generated)
        .await?;

    println!("All done!");
    println!("Please restart firewalld (systemctl restart firewalld.service) to make the new HANA services visible.");
    println!("Remember: transient firewall configuration is lost when firewalld restarts.");
    Ok(())
}
