// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response snapshot and transfer metadata

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cookie::CookieJar;
use super::header::{parse_headers, ParsedHeaders};
use super::info_keys as keys;
use crate::error::{Error, Result};

/// One metadata value reported by a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InfoValue {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl From<i64> for InfoValue {
    fn from(n: i64) -> Self {
        InfoValue::Int(n)
    }
}

impl From<u16> for InfoValue {
    fn from(n: u16) -> Self {
        InfoValue::Int(i64::from(n))
    }
}

impl From<f64> for InfoValue {
    fn from(n: f64) -> Self {
        InfoValue::Float(n)
    }
}

impl From<&str> for InfoValue {
    fn from(s: &str) -> Self {
        InfoValue::Text(s.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(s: String) -> Self {
        InfoValue::Text(s)
    }
}

impl From<Vec<String>> for InfoValue {
    fn from(list: Vec<String>) -> Self {
        InfoValue::List(list)
    }
}

/// Transfer metadata keyed by name
///
/// Completeness depends on the transport; lookups fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Info {
    values: BTreeMap<String, InfoValue>,
}

impl Info {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InfoValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.values.get(key)
    }

    /// Integer value, `0` when absent
    pub fn int(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(InfoValue::Int(n)) => *n,
            Some(InfoValue::Float(n)) => *n as i64,
            _ => 0,
        }
    }

    /// Floating value, `0.0` when absent
    pub fn float(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(InfoValue::Float(n)) => *n,
            Some(InfoValue::Int(n)) => *n as f64,
            _ => 0.0,
        }
    }

    /// Text value
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(InfoValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// List value, empty when absent
    pub fn list(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(InfoValue::List(list)) => list,
            _ => &[],
        }
    }

    /// Iterate stored keys and values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no metadata was reported
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Completed transfer, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    output: Option<String>,
    info: Info,
    error_number: i32,
    error_message: String,
    headers: Vec<String>,
}

impl Response {
    /// Create a new response
    pub fn new(
        output: Option<String>,
        info: Info,
        error_number: i32,
        error_message: impl Into<String>,
        headers: Vec<String>,
    ) -> Self {
        Self {
            output,
            info,
            error_number,
            error_message: error_message.into(),
            headers,
        }
    }

    /// Parse body as JSON
    pub fn get_json(&self) -> Result<serde_json::Value> {
        self.json()
    }

    /// Deserialize body as JSON into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.output.as_deref().unwrap_or_default()).map_err(Error::InvalidJson)
    }

    /// Response body, `None` when the transfer returned nothing
    pub fn get_output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Transport error code, `0` when none
    pub fn get_error_number(&self) -> i32 {
        self.error_number
    }

    /// Transport error message, empty when none
    pub fn get_error_message(&self) -> &str {
        &self.error_message
    }

    /// Raw header lines in the order the transport delivered them
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Header lines parsed into an ordered map
    pub fn parsed_headers(&self) -> ParsedHeaders {
        parse_headers(&self.headers.join("\n"))
    }

    /// Cookies from every `Set-Cookie` line
    pub fn cookies(&self) -> CookieJar {
        CookieJar::from_set_cookie_headers(
            self.headers
                .iter()
                .filter_map(|line| line.split_once(':'))
                .filter(|(name, _)| name.trim().eq_ignore_ascii_case("set-cookie"))
                .map(|(_, value)| value.trim()),
        )
    }

    /// All transfer metadata
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.get_http_code())
    }

    /// Effective URL after redirects
    pub fn get_url(&self) -> Option<&str> {
        self.info.text(keys::URL)
    }

    pub fn get_content_type(&self) -> Option<&str> {
        self.info.text(keys::CONTENT_TYPE)
    }

    /// Last received status code, `0` when none
    pub fn get_http_code(&self) -> u16 {
        u16::try_from(self.info.int(keys::HTTP_CODE)).unwrap_or(0)
    }

    pub fn get_header_size(&self) -> i64 {
        self.info.int(keys::HEADER_SIZE)
    }

    pub fn get_request_size(&self) -> i64 {
        self.info.int(keys::REQUEST_SIZE)
    }

    pub fn get_filetime(&self) -> i64 {
        self.info.int(keys::FILETIME)
    }

    pub fn get_ssl_verify_result(&self) -> i64 {
        self.info.int(keys::SSL_VERIFY_RESULT)
    }

    pub fn get_redirect_count(&self) -> i64 {
        self.info.int(keys::REDIRECT_COUNT)
    }

    /// Whole transfer duration in seconds
    pub fn get_total_time(&self) -> f64 {
        self.info.float(keys::TOTAL_TIME)
    }

    pub fn get_namelookup_time(&self) -> f64 {
        self.info.float(keys::NAMELOOKUP_TIME)
    }

    pub fn get_connect_time(&self) -> f64 {
        self.info.float(keys::CONNECT_TIME)
    }

    pub fn get_pretransfer_time(&self) -> f64 {
        self.info.float(keys::PRETRANSFER_TIME)
    }

    pub fn get_size_upload(&self) -> i64 {
        self.info.int(keys::SIZE_UPLOAD)
    }

    pub fn get_size_download(&self) -> i64 {
        self.info.int(keys::SIZE_DOWNLOAD)
    }

    /// Average download speed in bytes per second
    pub fn get_speed_download(&self) -> i64 {
        self.info.int(keys::SPEED_DOWNLOAD)
    }

    pub fn get_speed_upload(&self) -> i64 {
        self.info.int(keys::SPEED_UPLOAD)
    }

    pub fn get_download_content_length(&self) -> i64 {
        self.info.int(keys::DOWNLOAD_CONTENT_LENGTH)
    }

    pub fn get_upload_content_length(&self) -> i64 {
        self.info.int(keys::UPLOAD_CONTENT_LENGTH)
    }

    /// Seconds until the first response byte
    pub fn get_starttransfer_time(&self) -> f64 {
        self.info.float(keys::STARTTRANSFER_TIME)
    }

    pub fn get_redirect_time(&self) -> f64 {
        self.info.float(keys::REDIRECT_TIME)
    }

    pub fn get_certinfo(&self) -> &[String] {
        self.info.list(keys::CERTINFO)
    }

    pub fn get_primary_ip(&self) -> Option<&str> {
        self.info.text(keys::PRIMARY_IP)
    }

    pub fn get_primary_port(&self) -> i64 {
        self.info.int(keys::PRIMARY_PORT)
    }

    pub fn get_local_ip(&self) -> Option<&str> {
        self.info.text(keys::LOCAL_IP)
    }

    pub fn get_local_port(&self) -> i64 {
        self.info.int(keys::LOCAL_PORT)
    }

    /// Redirect target that was not followed
    pub fn get_redirect_url(&self) -> Option<&str> {
        self.info.text(keys::REDIRECT_URL)
    }

    /// Outgoing request header block, when recorded
    pub fn get_request_header(&self) -> Option<&str> {
        self.info.text(keys::REQUEST_HEADER)
    }
}
