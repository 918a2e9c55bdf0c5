//! Dry-run command - show the services that would be generated.

use anyhow::Result;

pub async fn run(json: bool) -> Result<()> {
    let fw = super::read_config().await?;
    let generated = fw.generate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
        return Ok(());
    }

    for svc in generated.values() {
        println!("{svc}");
        println!("{}", super::SEPARATOR);
    }
    println!("If you run \"hana-firewall generate-firewalld-services\", the services above will be made available in firewalld.");
    Ok(())
}
