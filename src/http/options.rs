// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request option set handed to a transport

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use url::form_urlencoded;

/// HTTP request method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Any other verb, stored uppercased
    Custom(String),
}

impl Method {
    /// Parse a method name, case-insensitively
    pub fn parse(method: &str) -> Self {
        let upper = method.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            _ => Method::Custom(upper),
        }
    }

    /// Uppercase verb as sent on the wire
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Custom(verb) => verb,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Method {
    fn from(method: &str) -> Self {
        Method::parse(method)
    }
}

impl From<String> for Method {
    fn from(method: String) -> Self {
        Method::parse(&method)
    }
}

/// Named request options a transport understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestOption {
    /// Target URL
    Url,
    /// Explicit request verb
    CustomRequest,
    /// Force a GET request
    HttpGet,
    /// Force a POST request
    Post,
    /// Encoded request body
    PostFields,
    /// Whole-transfer timeout in seconds
    Timeout,
    /// User-Agent header value
    UserAgent,
    /// Follow `Location` redirects
    FollowLocation,
    /// Keep cookies across redirects within one transfer
    CookieEngine,
    /// Literal `Cookie` header value
    Cookie,
    /// Basic auth credentials
    BasicAuth,
    /// Referer header value
    Referer,
    /// Capture the body instead of writing it to stdout
    ReturnTransfer,
    /// Prefix the body with the raw response header block
    HeaderIn,
    /// Record the outgoing request header block in metadata
    HeaderOut,
    /// Log transfer details
    Verbose,
}

/// Value stored for a [`RequestOption`]
#[derive(Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(u64),
    Text(String),
    Credentials { username: String, password: String },
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "Bool({})", b),
            OptionValue::Int(n) => write!(f, "Int({})", n),
            OptionValue::Text(s) => write!(f, "Text({:?})", s),
            OptionValue::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<u64> for OptionValue {
    fn from(n: u64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

/// Request body accepted by `set_post_fields`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFields {
    /// Body already encoded by the caller
    Raw(String),
    /// Key/value pairs to form-encode
    Form(Vec<(String, String)>),
}

impl PostFields {
    /// Check if there is nothing to send
    pub fn is_empty(&self) -> bool {
        match self {
            PostFields::Raw(body) => body.is_empty(),
            PostFields::Form(pairs) => pairs.is_empty(),
        }
    }

    /// Encoded body
    pub fn encode(&self) -> String {
        match self {
            PostFields::Raw(body) => body.clone(),
            PostFields::Form(pairs) => build_query(pairs),
        }
    }
}

impl From<&str> for PostFields {
    fn from(body: &str) -> Self {
        PostFields::Raw(body.to_string())
    }
}

impl From<String> for PostFields {
    fn from(body: String) -> Self {
        PostFields::Raw(body)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for PostFields {
    fn from(pairs: Vec<(K, V)>) -> Self {
        PostFields::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PostFields {
    fn from(pairs: [(K, V); N]) -> Self {
        PostFields::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for PostFields {
    fn from(map: BTreeMap<K, V>) -> Self {
        PostFields::Form(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Form-encode key/value pairs as `k=v&k2=v2`
pub fn build_query<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}

/// Accumulated request configuration
///
/// Later writes to the same option or header name replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: BTreeMap<RequestOption, OptionValue>,
    headers: Vec<(String, String)>,
    // write sequence per option, used to order method-selecting options
    written: BTreeMap<RequestOption, u64>,
    writes: u64,
}

impl OptionSet {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an option value
    pub fn insert(&mut self, option: RequestOption, value: impl Into<OptionValue>) {
        self.writes += 1;
        self.written.insert(option, self.writes);
        self.options.insert(option, value.into());
    }

    /// Raw option value
    pub fn get(&self, option: RequestOption) -> Option<&OptionValue> {
        self.options.get(&option)
    }

    /// Check if an option was set
    pub fn contains(&self, option: RequestOption) -> bool {
        self.options.contains_key(&option)
    }

    /// Insert or replace a header, matching names case-insensitively
    pub fn insert_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Check if a header was set
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Outgoing headers in insertion order
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Outgoing headers rendered as `Name: value` lines
    pub fn header_lines(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|(n, v)| format!("{}: {}", n, v))
            .collect()
    }

    /// Boolean option, `false` when unset or not a flag
    pub fn flag(&self, option: RequestOption) -> bool {
        matches!(self.get(option), Some(OptionValue::Bool(true)))
    }

    /// Text option
    pub fn text(&self, option: RequestOption) -> Option<&str> {
        match self.get(option) {
            Some(OptionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Target URL
    pub fn url(&self) -> Option<&str> {
        self.text(RequestOption::Url)
    }

    /// Effective method
    ///
    /// An explicit verb wins. Otherwise the later of a GET flag and a POST flag or
    /// body decides, defaulting to GET.
    pub fn method(&self) -> Method {
        if let Some(verb) = self.text(RequestOption::CustomRequest) {
            return Method::parse(verb);
        }

        let get = self
            .flag(RequestOption::HttpGet)
            .then(|| self.written.get(&RequestOption::HttpGet).copied())
            .flatten();
        let post = [
            (RequestOption::Post, self.flag(RequestOption::Post)),
            (RequestOption::PostFields, self.contains(RequestOption::PostFields)),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .filter_map(|(option, _)| self.written.get(&option).copied())
        .max();

        match (get, post) {
            (Some(get), Some(post)) if post > get => Method::Post,
            (Some(_), _) => Method::Get,
            (None, Some(_)) => Method::Post,
            (None, None) => Method::Get,
        }
    }

    /// Encoded request body
    pub fn body(&self) -> Option<&str> {
        self.text(RequestOption::PostFields)
    }

    /// Transfer timeout
    pub fn timeout(&self) -> Option<Duration> {
        match self.get(RequestOption::Timeout) {
            Some(OptionValue::Int(secs)) => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }

    /// Basic auth credentials
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match self.get(RequestOption::BasicAuth) {
            Some(OptionValue::Credentials { username, password }) => {
                Some((username.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}
