// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shorthand request constructors
//!
//! Each constructor returns the builder unexecuted so more options can be added
//! before calling [`Request::execute`].

use url::Url;

use crate::error::Result;
use crate::http::{build_query, Method, Request};

/// Request factory on the default transport
pub struct Curl;

impl Curl {
    /// GET with `data` appended as a query string
    pub fn get<K: AsRef<str>, V: AsRef<str>>(url: &str, data: &[(K, V)]) -> Result<Request> {
        Ok(Request::new()?.set_url(make_url(url, data)).set_get(true))
    }

    /// POST with `data` as a form body
    pub fn post<K: AsRef<str>, V: AsRef<str>>(url: &str, data: &[(K, V)]) -> Result<Request> {
        Ok(Request::new()?
            .set_url(url)
            .set_post(true)
            .set_post_fields(build_query(data)))
    }

    /// PUT with `data` appended as a query string
    pub fn put<K: AsRef<str>, V: AsRef<str>>(url: &str, data: &[(K, V)]) -> Result<Request> {
        Ok(Request::new()?
            .set_url(make_url(url, data))
            .set_method(Method::Put))
    }

    /// PATCH with `data` as a form body
    pub fn patch<K: AsRef<str>, V: AsRef<str>>(url: &str, data: &[(K, V)]) -> Result<Request> {
        Ok(Request::new()?
            .set_url(url)
            .set_method(Method::Patch)
            .set_post_fields(build_query(data)))
    }

    /// DELETE with `data` appended as a query string
    pub fn delete<K: AsRef<str>, V: AsRef<str>>(url: &str, data: &[(K, V)]) -> Result<Request> {
        Ok(Request::new()?
            .set_url(make_url(url, data))
            .set_method(Method::Delete))
    }
}

/// Append form-encoded `data` to `url`, using `&` when a query already exists
pub fn make_url<K: AsRef<str>, V: AsRef<str>>(url: &str, data: &[(K, V)]) -> String {
    if data.is_empty() {
        return url.to_string();
    }

    let has_query = match Url::parse(url) {
        Ok(parsed) => parsed.query().is_some_and(|q| !q.is_empty()),
        Err(_) => url.contains('?'),
    };
    let separator = if has_query { '&' } else { '?' };

    format!("{}{}{}", url, separator, build_query(data))
}
