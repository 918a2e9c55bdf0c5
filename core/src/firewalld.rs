//! Firewalld service document model and its XML boundary format.
//!
//! The XML dialect is the one firewalld reads from
//! `/etc/firewalld/services/*.xml`. The serializer is byte-exact (4-space
//! indentation, fixed element order) so regenerating an unchanged
//! configuration reproduces identical files.

use std::fmt;
use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// XML declaration at the top of every generated service file.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

static PORT_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<port\b[^>]*/>").expect("Invalid port element regex"));
static PROTOCOL_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"protocol="([^"]*)""#).expect("Invalid protocol attribute regex"));
static PORT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bport="([^"]*)""#).expect("Invalid port attribute regex"));

/// Transport protocol of an opened port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// The lowercase name used in the XML protocol attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A port to be opened by a firewalld service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirewalldPort {
    /// The port number.
    pub port: u16,
    /// The transport protocol.
    pub protocol: Protocol,
}

impl FirewalldPort {
    pub fn new(port: u16, protocol: Protocol) -> Self {
        Self { port, protocol }
    }
}

/// A firewalld service: short name, description, and the ports it opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewalldService {
    /// Normalized identifier, also the XML file name stem.
    pub short_name: String,
    /// The original display name of the HANA service definition, unmodified.
    pub description: String,
    /// Opened ports: all TCP entries ascending, then all UDP entries
    /// ascending, no duplicates within a protocol.
    pub ports: Vec<FirewalldPort>,
}

impl FirewalldService {
    /// Serialize into a complete firewalld service XML document, including
    /// the XML declaration.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str(XML_HEADER);
        out.push('\n');
        out.push_str("<service>\n");
        let _ = writeln!(out, "    <short>{}</short>", escape_text(&self.short_name));
        let _ = writeln!(
            out,
            "    <description>{}</description>",
            escape_text(&self.description)
        );
        for port in &self.ports {
            let _ = writeln!(
                out,
                "    <port protocol=\"{}\" port=\"{}\"/>",
                port.protocol, port.port
            );
        }
        out.push_str("</service>");
        out
    }

    /// Deserialize a firewalld service XML document.
    ///
    /// Understands exactly the dialect written by [`to_xml`](Self::to_xml),
    /// ignoring surrounding whitespace and attribute order.
    pub fn from_xml(text: &str) -> Result<Self> {
        if !text.contains("<service>") {
            return Err(Error::Xml("missing <service> root element".to_string()));
        }
        let short_name = element_text(text, "short").unwrap_or_default();
        let description = element_text(text, "description").unwrap_or_default();

        let mut ports = Vec::new();
        for element in PORT_ELEMENT.find_iter(text) {
            let element = element.as_str();
            let protocol = PROTOCOL_ATTR
                .captures(element)
                .ok_or_else(|| Error::Xml(format!("{element} is missing a protocol attribute")))?;
            let protocol = match &protocol[1] {
                "tcp" => Protocol::Tcp,
                "udp" => Protocol::Udp,
                other => return Err(Error::Xml(format!("unsupported protocol \"{other}\""))),
            };
            let port = PORT_ATTR
                .captures(element)
                .ok_or_else(|| Error::Xml(format!("{element} is missing a port attribute")))?;
            let port: u16 = port[1]
                .parse()
                .map_err(|_| Error::Xml(format!("\"{}\" is not a valid port number", &port[1])))?;
            ports.push(FirewalldPort::new(port, protocol));
        }

        Ok(Self {
            short_name,
            description,
            ports,
        })
    }
}

impl fmt::Display for FirewalldService {
    /// Easy to read, indented service summary, used by dry-run output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}:", self.short_name, self.description)?;
        for port in &self.ports {
            writeln!(f, "    Allow {} {}", port.protocol, port.port)?;
        }
        Ok(())
    }
}

/// Extract and unescape the text of the first `<name>...</name>` element.
fn element_text(text: &str, name: &str) -> Option<String> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(unescape_text(&text[start..end]))
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&#34;", "\"")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_service() -> FirewalldService {
        FirewalldService {
            short_name: "database-client".to_string(),
            description: "Database Client".to_string(),
            ports: vec![
                FirewalldPort::new(200, Protocol::Tcp),
                FirewalldPort::new(10000, Protocol::Tcp),
                FirewalldPort::new(53, Protocol::Udp),
            ],
        }
    }

    #[test]
    fn test_to_xml_is_byte_exact() {
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                        <service>\n    \
                        <short>database-client</short>\n    \
                        <description>Database Client</description>\n    \
                        <port protocol=\"tcp\" port=\"200\"/>\n    \
                        <port protocol=\"tcp\" port=\"10000\"/>\n    \
                        <port protocol=\"udp\" port=\"53\"/>\n\
                        </service>";
        assert_eq!(sample_service().to_xml(), expected);
    }

    #[test]
    fn test_xml_round_trip() {
        let svc = sample_service();
        assert_eq!(FirewalldService::from_xml(&svc.to_xml()).unwrap(), svc);
    }

    #[test]
    fn test_description_escaping_round_trip() {
        let svc = FirewalldService {
            short_name: "b---vgdf-c-".to_string(),
            description: "B^$&VGDF#C$ <\"quoted\">".to_string(),
            ports: vec![FirewalldPort::new(400, Protocol::Udp)],
        };
        let xml = svc.to_xml();
        assert!(xml.contains("B^$&amp;VGDF#C$ &lt;&#34;quoted&#34;&gt;"));
        assert_eq!(FirewalldService::from_xml(&xml).unwrap(), svc);
    }

    #[test]
    fn test_from_xml_accepts_reordered_attributes() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                   <service>\n\
                   <short>s</short>\n\
                   <description>d</description>\n\
                   <port port=\"80\" protocol=\"tcp\"/>\n\
                   </service>";
        let svc = FirewalldService::from_xml(xml).unwrap();
        assert_eq!(svc.ports, vec![FirewalldPort::new(80, Protocol::Tcp)]);
    }

    #[test]
    fn test_from_xml_rejects_missing_root() {
        assert!(matches!(
            FirewalldService::from_xml("<short>s</short>"),
            Err(Error::Xml(_))
        ));
    }

    #[test]
    fn test_from_xml_rejects_unknown_protocol() {
        let xml = "<service><port protocol=\"sctp\" port=\"80\"/></service>";
        assert!(matches!(
            FirewalldService::from_xml(xml),
            Err(Error::Xml(_))
        ));
    }

    #[test]
    fn test_display_format() {
        let expected = "database-client - Database Client:\n    \
                        Allow tcp 200\n    \
                        Allow tcp 10000\n    \
                        Allow udp 53\n";
        assert_eq!(sample_service().to_string(), expected);
    }
}
