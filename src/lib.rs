// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # curlwrap - Fluent HTTP Request Builder
//!
//! Build a request declaratively, execute it once, and inspect an immutable
//! response snapshot with status, body, timing metadata and raw headers.
//!
//! ## Features
//!
//! - Fluent builder: method, URL, headers, cookies, body, timeouts, redirects
//! - Pluggable transport: blocking reqwest transport built in, any other via a trait
//! - Cookie model: `Set-Cookie` parsing, jar serialization, last-write-wins merge
//! - Raw header parsing: duplicate names and folded continuation lines
//! - Failed transfers still return their partial response for inspection
//!
//! ## Example
//!
//! ```rust,no_run
//! use curlwrap::{Cookie, Curl};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = Curl::get("https://example.com/search", &[("q", "rust")])?
//!         .add_header("Accept", "application/json")
//!         .add_cookie(Cookie::new("session", "abc123"))
//!         .set_timeout(10)
//!         .execute()?;
//!
//!     println!("{} in {:.3}s", response.get_http_code(), response.get_total_time());
//!     for cookie in response.cookies().cookies() {
//!         println!("Set-Cookie: {}", cookie);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod curl;
pub mod error;
pub mod http;

// Re-exports for convenience

pub use curl::Curl;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    parse_headers, Cookie, CookieJar, HeaderValue, Info, InfoValue, Method, OptionSet,
    OptionValue, ParsedHeaders, PostFields, Request, RequestOption, Response,
};

// Transport
pub use http::{ReqwestTransport, Session, Transfer, Transport, TransportConfig};

/// curlwrap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
