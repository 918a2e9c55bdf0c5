//! Define command - interactively author a new HANA service definition.

use std::io::{self, BufRead};
use std::path::Path;

use anyhow::{bail, Context, Result};
use hana_firewall_core::{config, ServiceDefinition, Sysconfig};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub async fn run() -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("--------------------------------------------------------------");
    println!("How would you like to name the new service? (e.g. \"database application support\")");
    let name = read_trimmed_line(&mut input)?;
    if name.is_empty() {
        bail!("Sorry, you have to give the new service a name.");
    }
    if name.contains('/') || name.contains('.') {
        bail!("Sorry, the name may not contain slash or full-stop characters.");
    }

    println!("--------------------------------------------------------------");
    println!("Which TCP ports are used by the service? Use space to separate multiple ports. If there are none, simply press enter.");
    println!("For a special case, placeholder \"__INST_NUM__\" will be substituted by HANA instance numbers, and \"__INST_NUM+1__\" by HANA instance number plus one.");
    println!("Examples: 3__INST_NUM__01 4__INST_NUM+1__02");
    let tcp = split_port_definitions(&read_trimmed_line(&mut input)?);

    println!("--------------------------------------------------------------");
    println!("Which UDP ports are used by the service? Use space to separate multiple ports. If there are none, simply press enter.");
    println!("The special placeholders may also be used in these UDP ports.");
    let udp = split_port_definitions(&read_trimmed_line(&mut input)?);

    if tcp.is_empty() && udp.is_empty() {
        bail!("Sorry, the service must have at least one TCP or UDP port defined.");
    }

    let def = ServiceDefinition {
        display_name: name.clone(),
        tcp,
        udp,
    };
    let path = Path::new(config::DEFAULT_SERVICE_DEFINITION_DIR).join(&name);
    write_definition(&def, &path).await?;

    println!("--------------------------------------------------------------");
    println!("All done! Remember to run \"hana-firewall generate-firewalld-services\" to make use of the new service.");
    Ok(())
}

/// Write the definition into its sysconfig file with mode 0600, preserving
/// any comments an existing file may carry.
async fn write_definition(def: &ServiceDefinition, path: &Path) -> Result<()> {
    let fail = || format!("failed to create service definition file at \"{}\"", path.display());

    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err).with_context(fail),
    };
    let mut conf = Sysconfig::parse(&text).with_context(fail)?;
    def.write_into(&mut conf);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await.with_context(fail)?;
    file.write_all(conf.to_text().as_bytes())
        .await
        .with_context(fail)?;
    Ok(())
}

fn read_trimmed_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn split_port_definitions(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_port_definitions() {
        assert_eq!(
            split_port_definitions("3__INST_NUM__01  4__INST_NUM+1__02"),
            vec!["3__INST_NUM__01", "4__INST_NUM+1__02"]
        );
        assert!(split_port_definitions("").is_empty());
        assert!(split_port_definitions("   ").is_empty());
    }

    #[test]
    fn test_read_trimmed_line() {
        let mut input = io::Cursor::new("  database client  \n");
        assert_eq!(read_trimmed_line(&mut input).unwrap(), "database client");
    }

    #[tokio::test]
    async fn test_write_definition_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database client");
        let def = ServiceDefinition {
            display_name: "database client".to_string(),
            tcp: vec!["1__INST_NUM__2".to_string()],
            udp: vec!["34".to_string()],
        };

        write_definition(&def, &path).await.unwrap();

        let text = fs::read_to_string(&path).await.unwrap();
        assert_eq!(text, "TCP=\"1__INST_NUM__2\"\nUDP=\"34\"\n");
    }

    #[tokio::test]
    async fn test_write_definition_preserves_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supported");
        fs::write(&path, "# see the administration guide\nTCP=\"9999\"\n")
            .await
            .unwrap();

        let def = ServiceDefinition {
            display_name: "supported".to_string(),
            tcp: vec!["1000".to_string()],
            udp: Vec::new(),
        };
        write_definition(&def, &path).await.unwrap();

        let text = fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            text,
            "# see the administration guide\nTCP=\"1000\"\nUDP=\"\"\n"
        );
    }
}
