// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie model and name-keyed cookie jar

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Format used when rendering `Expires`
pub const EXPIRES_FORMAT: &str = "%a, %d %b %y %H:%M:%S GMT";

/// Naive formats tried after RFC 2822 and RFC 3339
const EXPIRES_FALLBACK_FORMATS: &[&str] = &[
    EXPIRES_FORMAT,
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%a, %d-%b-%y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%a %b %e %H:%M:%S %Y",
];

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (empty for a nameless cookie)
    pub name: String,
    /// Cookie value, URL-decoded
    pub value: String,
    /// Domain the cookie belongs to
    pub domain: Option<String>,
    /// Path the cookie is valid for
    pub path: String,
    /// Lifetime in seconds
    pub max_age: Option<i64>,
    /// Absolute expiration time
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// Discard flag (drop at session end)
    pub discard: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// Attributes without a dedicated field, in header order
    pub extensions: Vec<(String, Option<String>)>,
}

impl Default for Cookie {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: String::new(),
            domain: None,
            path: "/".to_string(),
            max_age: None,
            expires: None,
            secure: false,
            discard: false,
            http_only: false,
            extensions: Vec::new(),
        }
    }
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set Max-Age in seconds
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set discard flag
    pub fn discard(mut self, discard: bool) -> Self {
        self.discard = discard;
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Add an extension attribute (`None` renders as a bare flag)
    pub fn with_extension(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.set_extension(key.into(), value);
        self
    }

    /// Look up an extension attribute by lowercase key
    ///
    /// The outer `Option` is presence, the inner one is the value of a non-flag attribute.
    pub fn extension(&self, key: &str) -> Option<Option<&str>> {
        self.extensions
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref())
    }

    /// Check if the cookie carries a name
    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }

    /// `name=value` fragment as sent in a `Cookie` header
    pub fn to_value_pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    /// Render as a `Set-Cookie` header value
    pub fn to_header(&self) -> String {
        let mut parts = vec![self.to_value_pair()];

        if let Some(ref domain) = self.domain {
            parts.push(format!("Domain={}", domain));
        }
        parts.push(format!("Path={}", self.path));
        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age));
        }
        if let Some(expires) = self.expires {
            parts.push(format!("Expires={}", expires.format(EXPIRES_FORMAT)));
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.discard {
            parts.push("Discard".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        for (key, value) in &self.extensions {
            let key = title_case(key);
            match value {
                Some(value) => parts.push(format!("{}={}", key, value)),
                None => parts.push(key),
            }
        }

        parts.join("; ")
    }

    /// Parse a `Set-Cookie` header value
    ///
    /// Never fails: input without a leading `name=value` pair yields a nameless cookie.
    pub fn from_header(header: &str) -> Self {
        let mut cookie = Cookie::default();
        let mut pieces = header.split(';').map(str::trim).filter(|p| !p.is_empty());

        let Some(first) = pieces.next() else {
            return cookie;
        };
        match first.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                cookie.name = name.trim().to_lowercase();
                cookie.value = url_decode(trim_value(value));
            }
            _ => return cookie,
        }

        for piece in pieces {
            let (key, value) = match piece.split_once('=') {
                Some((key, value)) => (key, Some(url_decode(trim_value(value)))),
                None => (piece, None),
            };
            cookie.apply_attribute(&key.trim().to_lowercase(), value);
        }

        cookie
    }

    fn apply_attribute(&mut self, key: &str, value: Option<String>) {
        match (key, value) {
            ("domain", Some(domain)) => self.domain = Some(domain),
            ("path", Some(path)) => self.path = path,
            ("max-age", Some(raw)) => match raw.parse::<i64>() {
                Ok(seconds) => self.max_age = Some(seconds),
                Err(_) => tracing::trace!(value = %raw, "Dropping unparsable Max-Age"),
            },
            ("expires", Some(raw)) => {
                self.expires = parse_expires(&raw);
                if self.expires.is_none() {
                    tracing::trace!(value = %raw, "Dropping unparsable Expires");
                }
            }
            ("secure", _) => self.secure = true,
            ("discard", _) => self.discard = true,
            ("httponly", _) => self.http_only = true,
            ("domain" | "path" | "max-age" | "expires", None) => {
                tracing::trace!(attribute = key, "Dropping attribute without value");
            }
            (other, value) => self.set_extension(other.to_string(), value),
        }
    }

    fn set_extension(&mut self, key: String, value: Option<String>) {
        match self.extensions.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.extensions.push((key, value)),
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header())
    }
}

/// Ordered cookie collection with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from name/value pairs
    pub fn from_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut jar = Self::new();
        for (name, value) in values {
            jar.add_cookie(Cookie::new(name, value));
        }
        jar
    }

    /// Build a jar from several `Set-Cookie` header values
    pub fn from_set_cookie_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut jar = Self::new();
        for header in headers {
            let cookie = Cookie::from_header(header.as_ref());
            if cookie.is_named() {
                jar.add_cookie(cookie);
            } else {
                tracing::trace!(header = header.as_ref(), "Skipping nameless cookie");
            }
        }
        jar
    }

    /// Add a cookie, replacing any cookie with the same name
    pub fn add_cookie(&mut self, cookie: Cookie) {
        match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }
    }

    /// Get a cookie by name
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    /// Remove a cookie by name
    pub fn remove(&mut self, name: &str) -> Option<Cookie> {
        let index = self.cookies.iter().position(|c| c.name == name)?;
        Some(self.cookies.remove(index))
    }

    /// All cookies in jar order
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Name/value pairs in jar order
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_str()))
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Render as a `Cookie` request header value
    pub fn to_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", form_encode(&c.name), form_encode(&c.value)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.cookies)
    }

    /// Import cookies from JSON, later duplicates replacing earlier ones
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let mut jar = CookieJar::new();
        for cookie in cookies {
            jar.add_cookie(cookie);
        }
        Ok(jar)
    }
}

impl fmt::Display for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header())
    }
}

impl FromIterator<Cookie> for CookieJar {
    fn from_iter<T: IntoIterator<Item = Cookie>>(iter: T) -> Self {
        let mut jar = CookieJar::new();
        for cookie in iter {
            jar.add_cookie(cookie);
        }
        jar
    }
}

/// Parse an `Expires` value; `None` when no known format matches
pub fn parse_expires(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    EXPIRES_FALLBACK_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn trim_value(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, ' ' | '\n' | '\r' | '\t' | '\0' | '\x0B' | '"'))
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn form_encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Decode `+` and `%XX` escapes
fn url_decode(s: &str) -> String {
    // escape the pair separators so the whole input decodes as a single key
    let escaped = s.replace('&', "%26").replace('=', "%3D");
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let cookie = Cookie::from_header("a=1; Path=/x; Secure; Max-Age=60");

        assert_eq!(cookie.name, "a");
        assert_eq!(cookie.value, "1");
        assert_eq!(cookie.path, "/x");
        assert!(cookie.secure);
        assert_eq!(cookie.max_age, Some(60));
        assert!(!cookie.http_only);
    }

    #[test]
    fn test_to_header_round_trip() {
        let cookie = Cookie::from_header("a=1; Path=/x; Secure; Max-Age=60");
        let header = cookie.to_header();

        assert_eq!(header, "a=1; Path=/x; Max-Age=60; Secure");
        assert_eq!(Cookie::from_header(&header), cookie);
    }

    #[test]
    fn test_nameless_cookies() {
        assert!(!Cookie::from_header("").is_named());
        assert!(!Cookie::from_header("novalue").is_named());
        assert!(!Cookie::from_header("=orphan; Path=/").is_named());
        assert!(!Cookie::from_header(" ; ;").is_named());
    }

    #[test]
    fn test_full_attribute_set() {
        let cookie = Cookie::from_header(
            "session=\"abc%20123\"; Domain=example.com; HttpOnly; Discard; \
             Expires=Wed, 21 Oct 2015 07:28:00 GMT; SameSite=Lax",
        );

        assert_eq!(cookie.value, "abc 123");
        assert_eq!(cookie.domain.as_deref(), Some("example.com"));
        assert!(cookie.http_only);
        assert!(cookie.discard);
        assert_eq!(
            cookie.expires,
            Some(Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap())
        );
        assert_eq!(cookie.extension("samesite"), Some(Some("Lax")));
        assert_eq!(
            cookie.to_header(),
            "session=abc 123; Domain=example.com; Path=/; \
             Expires=Wed, 21 Oct 15 07:28:00 GMT; Discard; HttpOnly; Samesite=Lax"
        );
    }

    #[test]
    fn test_expires_formats() {
        let expected = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();

        assert_eq!(parse_expires("Wed, 21-Oct-2015 07:28:00 GMT"), Some(expected));
        assert_eq!(parse_expires("Wed, 21 Oct 15 07:28:00 GMT"), Some(expected));
        assert_eq!(parse_expires("2015-10-21T07:28:00Z"), Some(expected));
        assert_eq!(parse_expires("someday soon"), None);
    }

    #[test]
    fn test_malformed_values_are_dropped() {
        let cookie = Cookie::from_header("id=9; Expires=tomorrow; Max-Age=soon; Domain");

        assert_eq!(cookie.name, "id");
        assert!(cookie.expires.is_none());
        assert!(cookie.max_age.is_none());
        assert!(cookie.domain.is_none());
    }

    #[test]
    fn test_name_is_lowercased() {
        let cookie = Cookie::from_header("SessionID=x; PATH=/admin");
        assert_eq!(cookie.name, "sessionid");
        assert_eq!(cookie.path, "/admin");

        let jar = CookieJar::from_set_cookie_headers(["SID=1; Path=/"]);
        assert_eq!(jar.get("sid").map(|c| c.value.as_str()), Some("1"));
    }

    #[test]
    fn test_cookie_jar_last_write_wins() {
        let mut jar = CookieJar::new();
        jar.add_cookie(Cookie::new("a", "1"));
        jar.add_cookie(Cookie::new("b", "2"));
        jar.add_cookie(Cookie::new("a", "3"));

        assert_eq!(jar.len(), 2);
        assert_eq!(jar.to_string(), "a=3; b=2");
        assert_eq!(jar.get("a").map(|c| c.value.as_str()), Some("3"));
    }

    #[test]
    fn test_cookie_jar_names_unique() {
        let pairs = [("x", "1"), ("y", "2"), ("x", "3"), ("z", "4"), ("y", "5")];
        let jar = CookieJar::from_values(pairs);
        let header = jar.to_header();
        let names: Vec<&str> = header
            .split("; ")
            .map(|pair| pair.split('=').next().unwrap())
            .collect();

        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(header, "x=3; y=5; z=4");
    }

    #[test]
    fn test_cookie_jar_encodes_values() {
        let jar = CookieJar::from_values([("q", "x y;z")]);
        assert_eq!(jar.to_header(), "q=x+y%3Bz");
    }

    #[test]
    fn test_jar_from_set_cookie_headers() {
        let jar = CookieJar::from_set_cookie_headers(["a=1; Path=/", "garbage", "b=2"]);
        assert_eq!(jar.len(), 2);
        assert!(jar.get("b").is_some());
    }

    #[test]
    fn test_jar_json_round_trip() {
        let mut jar = CookieJar::new();
        jar.add_cookie(Cookie::new("token", "abc").secure(true).max_age(30));
        jar.add_cookie(Cookie::new("theme", "dark"));

        let restored = CookieJar::from_json(&jar.to_json().unwrap()).unwrap();
        assert_eq!(restored, jar);
    }

    #[test]
    fn test_url_decode() {
        assert_eq!(url_decode("a%2Fb+c"), "a/b c");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
        assert_eq!(url_decode("a=b&c"), "a=b&c");
        assert_eq!(url_decode(""), "");
    }
}
