//! Sysconfig-style key/value text documents.
//!
//! HANA firewall configuration lives in sysconfig files: `#` comment lines
//! and `KEY="value1 value2 ..."` data lines, where the quoted string holds a
//! whitespace-separated list of values. Comments and line ordering are
//! preserved, so a document that is parsed and rendered back unchanged
//! reproduces the original text byte-for-byte.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

/// Recognizes a data line and splits it into key and value text.
static DATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=(.*)$").expect("Invalid data line regex"));

#[derive(Debug, Clone)]
enum Line {
    /// Comment, blank, or otherwise unrecognized line, reproduced verbatim.
    Verbatim(String),
    /// A `KEY="..."` data line. The raw text is kept so that untouched lines
    /// round-trip byte-for-byte.
    Entry {
        raw: String,
        key: String,
        values: Vec<String>,
    },
}

/// An ordered sysconfig document.
#[derive(Debug, Clone)]
pub struct Sysconfig {
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl Sysconfig {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: true,
        }
    }

    /// Parse sysconfig text into a document.
    ///
    /// Comment and blank lines are retained verbatim; a data line with an
    /// unterminated quoted value is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut raw_lines: Vec<&str> = text.split('\n').collect();
        let trailing_newline = match raw_lines.last() {
            Some(&"") => {
                raw_lines.pop();
                true
            }
            _ => false,
        };

        let mut lines = Vec::with_capacity(raw_lines.len());
        for (number, raw) in raw_lines.iter().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                lines.push(Line::Verbatim(raw.to_string()));
                continue;
            }
            match DATA_LINE.captures(raw) {
                Some(caps) => {
                    let key = caps[1].to_string();
                    let values = parse_value(caps[2].trim()).map_err(|reason| {
                        Error::SysconfigParse {
                            line: number + 1,
                            reason,
                        }
                    })?;
                    lines.push(Line::Entry {
                        raw: raw.to_string(),
                        key,
                        values,
                    });
                }
                None => lines.push(Line::Verbatim(raw.to_string())),
            }
        }
        Ok(Self {
            lines,
            trailing_newline,
        })
    }

    /// Get the value list stored under a key, or an empty list if the key is
    /// absent.
    pub fn get_string_array(&self, key: &str) -> Vec<String> {
        self.lines
            .iter()
            .find_map(|line| match line {
                Line::Entry { key: k, values, .. } if k == key => Some(values.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Store a value list under a key, rewriting the first matching data line
    /// in place or appending a new line if the key is absent.
    pub fn set_string_array(&mut self, key: &str, values: &[String]) {
        let rendered = format!("{}=\"{}\"", key, values.join(" "));
        for line in &mut self.lines {
            if let Line::Entry {
                raw,
                key: k,
                values: v,
            } = line
            {
                if k == key {
                    *raw = rendered;
                    *v = values.to_vec();
                    return;
                }
            }
        }
        self.lines.push(Line::Entry {
            raw: rendered,
            key: key.to_string(),
            values: values.to_vec(),
        });
    }

    /// Render the document back into sysconfig text.
    pub fn to_text(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self
            .lines
            .iter()
            .map(|line| match line {
                Line::Verbatim(raw) => raw.as_str(),
                Line::Entry { raw, .. } => raw.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// Split the value text of a data line into its whitespace-separated tokens.
fn parse_value(value: &str) -> std::result::Result<Vec<String>, String> {
    let inner = if let Some(rest) = value.strip_prefix('"') {
        match rest.strip_suffix('"') {
            Some(inner) if !rest.is_empty() => inner,
            _ => return Err("unterminated quoted value".to_string()),
        }
    } else {
        value
    };
    Ok(inner.split_whitespace().map(str::to_string).collect())
}
