//! HANA service definition model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::GlobalParameters;
use crate::error::Result;
use crate::firewalld::{FirewalldPort, FirewalldService, Protocol};
use crate::sysconfig::Sysconfig;

/// Sysconfig key holding the TCP port definitions of a service.
pub const SERVICE_TCP_KEY: &str = "TCP";

/// Sysconfig key holding the UDP port definitions of a service.
pub const SERVICE_UDP_KEY: &str = "UDP";

/// A HANA network service definition, written in a sysconfig-style text file.
///
/// The display name comes from the definition file's base name; the TCP and
/// UDP lists hold port definition strings that may carry the instance number
/// placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Human-provided service name, also the definition file's base name.
    pub display_name: String,
    /// TCP port definitions.
    pub tcp: Vec<String>,
    /// UDP port definitions.
    pub udp: Vec<String>,
}

impl ServiceDefinition {
    /// Create a definition with a display name and no ports.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            tcp: Vec::new(),
            udp: Vec::new(),
        }
    }

    /// A definition without any TCP or UDP ports is considered undefined and
    /// excluded from generation.
    pub fn is_empty(&self) -> bool {
        self.tcp.is_empty() && self.udp.is_empty()
    }

    /// Derive the firewalld "short name" that identifies the generated
    /// service and names its XML file.
    ///
    /// Digits are kept, letters are lowercased, and every other character
    /// becomes a hyphen, so the result is safe to use as a file name stem.
    pub fn short_name(&self) -> String {
        self.display_name
            .chars()
            .map(|c| {
                if c.is_numeric() {
                    c
                } else if c.is_alphabetic() {
                    c.to_lowercase().next().unwrap_or(c)
                } else {
                    '-'
                }
            })
            .collect()
    }

    /// Read the port definition lists from a sysconfig document.
    pub fn read_from(&mut self, conf: &Sysconfig) {
        self.tcp = conf.get_string_array(SERVICE_TCP_KEY);
        self.udp = conf.get_string_array(SERVICE_UDP_KEY);
    }

    /// Overwrite the port definition lists in a sysconfig document.
    pub fn write_into(&self, conf: &mut Sysconfig) {
        conf.set_string_array(SERVICE_TCP_KEY, &self.tcp);
        conf.set_string_array(SERVICE_UDP_KEY, &self.udp);
    }

    /// Expand this definition into a firewalld service document.
    ///
    /// Every TCP definition is expanded against the full instance number
    /// list, then deduplicated and sorted ascending; the same for UDP. TCP
    /// entries come before UDP entries in the resulting port list. The first
    /// expansion error aborts the whole service, no partial list is returned.
    pub fn to_firewalld_service(&self, globals: &GlobalParameters) -> Result<FirewalldService> {
        let mut tcp_ports = Vec::new();
        for definition in &self.tcp {
            tcp_ports.extend(globals.expand_port_definition(definition)?);
        }
        let mut udp_ports = Vec::new();
        for definition in &self.udp {
            udp_ports.extend(globals.expand_port_definition(definition)?);
        }

        let mut ports = Vec::with_capacity(tcp_ports.len() + udp_ports.len());
        ports.extend(
            unique_sorted(tcp_ports)
                .into_iter()
                .map(|port| FirewalldPort::new(port, Protocol::Tcp)),
        );
        ports.extend(
            unique_sorted(udp_ports)
                .into_iter()
                .map(|port| FirewalldPort::new(port, Protocol::Udp)),
        );

        Ok(FirewalldService {
            short_name: self.short_name(),
            description: self.display_name.clone(),
            ports,
        })
    }
}

/// Deduplicate ports and sort them ascending.
fn unique_sorted(ports: Vec<u16>) -> Vec<u16> {
    ports.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}
