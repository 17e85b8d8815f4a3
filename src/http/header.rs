// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Raw header block parsing
//!
//! Turns the header lines a transport captured into an ordered map. Repeated names
//! collect their values into a sequence and tab-folded continuation lines extend the
//! value they follow. Names keep the case they were first seen with; two names that
//! differ only in case are separate entries.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Synthetic key the status line is stored under
pub const STATUS_LINE_KEY: &str = "0";

/// Value of a parsed header, single or repeated
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Header seen once
    Single(String),
    /// Header seen more than once, in order
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// All values in order
    pub fn as_slice(&self) -> &[String] {
        match self {
            HeaderValue::Single(v) => std::slice::from_ref(v),
            HeaderValue::Multiple(vs) => vs,
        }
    }

    /// First value
    pub fn first(&self) -> Option<&str> {
        self.as_slice().first().map(String::as_str)
    }

    /// Last value
    pub fn last(&self) -> Option<&str> {
        self.as_slice().last().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            HeaderValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = HeaderValue::Multiple(vec![first, value]);
            }
            HeaderValue::Multiple(vs) => vs.push(value),
        }
    }

    fn last_mut(&mut self) -> Option<&mut String> {
        match self {
            HeaderValue::Single(v) => Some(v),
            HeaderValue::Multiple(vs) => vs.last_mut(),
        }
    }
}

/// Ordered header map produced by [`parse_headers`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeaders {
    entries: Vec<(String, HeaderValue)>,
}

impl ParsedHeaders {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a header by exact name
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Look up a header ignoring ASCII case
    ///
    /// Returns the first entry in map order whose name matches.
    pub fn get_ignore_case(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// All values for a header by exact name
    pub fn get_all(&self, name: &str) -> &[String] {
        self.get(name).map(HeaderValue::as_slice).unwrap_or(&[])
    }

    /// Status line captured under the synthetic key
    pub fn status_line(&self) -> Option<&str> {
        self.get(STATUS_LINE_KEY).and_then(HeaderValue::first)
    }

    /// Check if a header is present by exact name
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl Serialize for ParsedHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Parse a raw header blob
pub fn parse_headers(raw: &str) -> ParsedHeaders {
    let mut headers = ParsedHeaders::new();
    let mut current: Option<usize> = None;

    for line in raw.split('\n') {
        if line.trim().is_empty() {
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            let index = match headers.position(name) {
                Some(index) => {
                    headers.entries[index].1.push(value);
                    index
                }
                None => {
                    headers
                        .entries
                        .push((name.to_string(), HeaderValue::Single(value)));
                    headers.entries.len() - 1
                }
            };
            current = Some(index);
            continue;
        }

        match current {
            Some(index) if line.starts_with('\t') => {
                if let Some(last) = headers.entries[index].1.last_mut() {
                    last.push_str("\r\n\t");
                    last.push_str(line.trim());
                }
            }
            Some(_) => {
                tracing::trace!(line, "Ignoring header line without separator");
            }
            None => {
                let status = HeaderValue::Single(line.trim().to_string());
                match headers.position(STATUS_LINE_KEY) {
                    Some(index) => headers.entries[index].1 = status,
                    None => headers.entries.push((STATUS_LINE_KEY.to_string(), status)),
                }
            }
        }
    }

    headers
}
