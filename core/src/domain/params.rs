//! Global HANA parameters and the port expansion engine.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sysconfig::Sysconfig;

/// Placeholder substituted by each HANA instance number verbatim.
///
/// Given a port definition of `1__INST_NUM__2` and an instance number of
/// `00`, the calculated port number is 1002.
pub const INSTANCE_NUMBER_PLACEHOLDER: &str = "__INST_NUM__";

/// Placeholder substituted by each HANA instance number plus one, rendered
/// zero-padded to two digits.
pub const INSTANCE_NUMBER_PLUS_ONE_PLACEHOLDER: &str = "__INST_NUM+1__";

/// Sysconfig key holding the instance number list in the global
/// configuration file.
pub const GLOBAL_INSTANCE_NUMBERS_KEY: &str = "HANA_INSTANCE_NUMBERS";

/// Global HANA firewall parameters, read once from the global sysconfig file
/// and passed into expansion and generation unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalParameters {
    /// Instance numbers of the participating HANA installations, each a
    /// zero-padded two-digit string such as "00".
    pub instance_numbers: Vec<String>,
}

impl GlobalParameters {
    /// Read the instance number list from a sysconfig document.
    pub fn read_from(&mut self, conf: &Sysconfig) {
        self.instance_numbers = conf.get_string_array(GLOBAL_INSTANCE_NUMBERS_KEY);
    }

    /// Overwrite the instance number list in a sysconfig document.
    pub fn write_into(&self, conf: &mut Sysconfig) {
        conf.set_string_array(GLOBAL_INSTANCE_NUMBERS_KEY, &self.instance_numbers);
    }

    /// Expand a port definition into concrete port numbers, one per instance
    /// number.
    ///
    /// Both placeholders are substituted independently, then the result is
    /// parsed once. A definition without placeholders yields the same port
    /// repeated for every instance number; duplicates are collapsed later by
    /// [`ServiceDefinition::to_firewalld_service`](crate::ServiceDefinition::to_firewalld_service).
    pub fn expand_port_definition(&self, definition: &str) -> Result<Vec<u16>> {
        let mut ports = Vec::with_capacity(self.instance_numbers.len());
        for instance in &self.instance_numbers {
            let expanded = substitute(definition, instance)?;
            let port = expanded.parse::<u16>().map_err(|_| {
                Error::MalformedPortDefinition {
                    definition: definition.to_string(),
                    detail: format!("expanded value \"{expanded}\" is not a valid port number"),
                }
            })?;
            ports.push(port);
        }
        Ok(ports)
    }
}

/// Substitute every placeholder occurrence in a port definition for one
/// instance number.
fn substitute(definition: &str, instance: &str) -> Result<String> {
    let mut expanded = definition.to_string();
    if expanded.contains(INSTANCE_NUMBER_PLACEHOLDER) {
        expanded = expanded.replace(INSTANCE_NUMBER_PLACEHOLDER, instance);
    }
    if expanded.contains(INSTANCE_NUMBER_PLUS_ONE_PLACEHOLDER) {
        let number: u32 = instance.parse().map_err(|_| {
            Error::MalformedPortDefinition {
                definition: definition.to_string(),
                detail: format!("instance number \"{instance}\" is not a valid integer"),
            }
        })?;
        expanded = expanded.replace(
            INSTANCE_NUMBER_PLUS_ONE_PLACEHOLDER,
            &format!("{:02}", number + 1),
        );
    }
    Ok(expanded)
}
