// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request builder
//!
//! A [`Request`] accumulates an [`OptionSet`] and is consumed by [`Request::execute`],
//! so every execution needs a fresh builder.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::cookie::{Cookie, CookieJar};
use super::info_keys as keys;
use super::options::{Method, OptionSet, OptionValue, PostFields, RequestOption};
use super::response::{Info, Response};
use super::transport::{error_codes, ReqwestTransport, Session, Transfer, Transport};
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

type HeaderHook = Box<dyn FnMut(&str) + Send>;

/// Closes the wrapped session when dropped, unwinding included
struct SessionGuard(Option<Box<dyn Session>>);

impl SessionGuard {
    fn perform(&mut self, on_header: &mut dyn FnMut(&str)) -> Transfer {
        self.0
            .as_mut()
            .map_or_else(Transfer::default, |session| session.perform(on_header))
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.0.take() {
            session.close();
        }
    }
}

/// Not-yet-executed HTTP request
pub struct Request {
    transport: Arc<dyn Transport>,
    options: OptionSet,
    cookies: Option<CookieJar>,
    header_hook: Option<HeaderHook>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("options", &self.options)
            .field("cookies", &self.cookies)
            .field("header_hook", &self.header_hook.is_some())
            .finish()
    }
}

impl Request {
    /// Create a request on the default reqwest transport
    pub fn new() -> Result<Self> {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Create a request on a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Result<Self> {
        transport.check_available()?;

        let request = Self {
            transport,
            options: OptionSet::new(),
            cookies: None,
            header_hook: None,
        };

        Ok(request
            .set_return_transfer(true)
            .set_headers_out(true)
            .set_user_agent(DEFAULT_USER_AGENT))
    }

    /// Set a raw option
    pub fn add_option(mut self, option: RequestOption, value: impl Into<OptionValue>) -> Self {
        self.options.insert(option, value);
        self
    }

    /// Set a header, replacing any header with the same name
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert_header(name, value);
        self
    }

    /// Check if a header was set
    pub fn has_header(&self, name: &str) -> bool {
        self.options.has_header(name)
    }

    /// Check if an option was set
    pub fn has_option(&self, option: RequestOption) -> bool {
        self.options.contains(option)
    }

    /// Set basic auth credentials
    pub fn set_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.add_option(
            RequestOption::BasicAuth,
            OptionValue::Credentials {
                username: username.into(),
                password: password.into(),
            },
        )
    }

    /// Attach a cookie jar, replacing any attached one
    pub fn set_cookies(mut self, jar: CookieJar) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// Add a cookie to the attached jar
    ///
    /// An empty jar is attached first when there is none.
    pub fn add_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.get_or_insert_with(CookieJar::new).add_cookie(cookie);
        self
    }

    /// Force a GET request
    pub fn set_get(self, enabled: bool) -> Self {
        self.add_option(RequestOption::HttpGet, enabled)
    }

    /// Force a POST request
    pub fn set_post(self, enabled: bool) -> Self {
        self.add_option(RequestOption::Post, enabled)
    }

    /// Set the request verb
    pub fn set_method(self, method: impl Into<Method>) -> Self {
        let method = method.into();
        self.add_option(RequestOption::CustomRequest, method.as_str())
    }

    /// Set the request body; an empty form is ignored
    pub fn set_post_fields(self, fields: impl Into<PostFields>) -> Self {
        let fields = fields.into();
        if fields.is_empty() {
            return self;
        }
        self.add_option(RequestOption::PostFields, fields.encode())
    }

    /// Capture the body instead of writing it to stdout
    pub fn set_return_transfer(self, enabled: bool) -> Self {
        self.add_option(RequestOption::ReturnTransfer, enabled)
    }

    /// Prefix the body with the raw response header block
    pub fn set_headers_in(self, enabled: bool) -> Self {
        self.add_option(RequestOption::HeaderIn, enabled)
    }

    /// Record the outgoing request header block
    pub fn set_headers_out(self, enabled: bool) -> Self {
        self.add_option(RequestOption::HeaderOut, enabled)
    }

    /// Log transfer details
    pub fn set_verbose(self, enabled: bool) -> Self {
        self.add_option(RequestOption::Verbose, enabled)
    }

    /// Set whole-transfer timeout in seconds
    pub fn set_timeout(self, seconds: u64) -> Self {
        self.add_option(RequestOption::Timeout, seconds)
    }

    /// Set user agent
    pub fn set_user_agent(self, user_agent: impl Into<String>) -> Self {
        self.add_option(RequestOption::UserAgent, user_agent.into())
    }

    /// Set target URL
    pub fn set_url(self, url: impl Into<String>) -> Self {
        self.add_option(RequestOption::Url, url.into())
    }

    /// Set Referer
    pub fn set_referer(self, referer: impl Into<String>) -> Self {
        self.add_option(RequestOption::Referer, referer.into())
    }

    /// Set Content-Type header
    pub fn set_content_type(self, content_type: impl Into<String>) -> Self {
        self.add_header("Content-Type", content_type)
    }

    /// Follow redirects, keeping cookies across hops
    pub fn set_follow_redirects(self, follow: bool) -> Self {
        self.set_follow_redirects_with(follow, true)
    }

    /// Follow redirects, optionally without the cookie engine
    pub fn set_follow_redirects_with(self, follow: bool, cookie_engine: bool) -> Self {
        let request = self.add_option(RequestOption::FollowLocation, follow);
        if follow && cookie_engine {
            request.add_option(RequestOption::CookieEngine, true)
        } else {
            request
        }
    }

    /// Receive every raw response header line as it arrives
    pub fn on_header<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.header_hook = Some(Box::new(hook));
        self
    }

    /// Accumulated options
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Attached cookie jar
    pub fn cookies(&self) -> Option<&CookieJar> {
        self.cookies.as_ref()
    }

    /// Execute the request
    ///
    /// A failed transfer returns [`Error::TransportFailure`] carrying the partial response.
    pub fn execute(self) -> Result<Response> {
        let Request {
            transport,
            mut options,
            cookies,
            mut header_hook,
        } = self;

        if let Some(jar) = cookies.filter(|jar| !jar.is_empty()) {
            options.insert(RequestOption::Cookie, jar.to_header());
        }

        let method = options.method();
        let url = options.url().unwrap_or_default().to_string();
        let start = Instant::now();

        let mut session = match transport.open(&options) {
            Ok(session) => SessionGuard(Some(session)),
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "Failed to open transport session");
                let mut info = Info::new();
                info.insert(keys::URL, url.as_str());
                let response =
                    Response::new(None, info, error_codes::FAILED_INIT, e.to_string(), Vec::new());
                return Err(Error::transport_failure(e.to_string(), response));
            }
        };

        let mut lines = Vec::new();
        let transfer = session.perform(&mut |line: &str| {
            tracing::trace!(line, "Captured header line");
            if let Some(hook) = header_hook.as_mut() {
                hook(line);
            }
            lines.push(line.to_string());
        });
        drop(session);

        let complete = transfer.is_complete();
        let Transfer {
            output,
            info,
            error_number,
            error_message,
        } = transfer;
        let response = Response::new(
            output,
            info.unwrap_or_default(),
            error_number,
            error_message,
            lines,
        );

        if !complete {
            tracing::warn!(
                %method,
                %url,
                code = error_number,
                error = response.get_error_message(),
                "Transfer failed"
            );
            let message = match response.get_error_message() {
                "" => "transport returned no output".to_string(),
                message => message.to_string(),
            };
            return Err(Error::transport_failure(message, response));
        }

        tracing::debug!(
            %method,
            %url,
            status = response.get_http_code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Transfer complete"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = Request::new().unwrap();
        let options = req.options();

        assert!(options.flag(RequestOption::ReturnTransfer));
        assert!(options.flag(RequestOption::HeaderOut));
        assert_eq!(options.text(RequestOption::UserAgent), Some(DEFAULT_USER_AGENT));
        assert!(options.timeout().is_none());
        assert_eq!(options.method(), Method::Get);
    }

    #[test]
    fn test_later_calls_override() {
        let req = Request::new()
            .unwrap()
            .set_url("https://example.com/a")
            .set_url("https://example.com/b")
            .add_header("X-Custom", "1")
            .add_header("X-Custom", "2")
            .set_content_type("text/plain")
            .set_content_type("application/json");

        assert_eq!(req.options().url(), Some("https://example.com/b"));
        assert_eq!(
            req.options().header_lines(),
            vec!["X-Custom: 2", "Content-Type: application/json"]
        );
    }

    #[test]
    fn test_method_and_body() {
        let req = Request::new()
            .unwrap()
            .set_method("patch")
            .set_post_fields([("name", "Ada Lovelace")]);

        assert_eq!(req.options().method(), Method::Patch);
        assert_eq!(req.options().body(), Some("name=Ada+Lovelace"));

        let empty = Request::new()
            .unwrap()
            .set_post_fields(Vec::<(String, String)>::new());
        assert!(!empty.has_option(RequestOption::PostFields));
    }

    #[test]
    fn test_follow_redirects_primes_cookie_engine() {
        let req = Request::new().unwrap().set_follow_redirects(true);
        assert!(req.options().flag(RequestOption::FollowLocation));
        assert!(req.options().flag(RequestOption::CookieEngine));

        let req = Request::new().unwrap().set_follow_redirects_with(true, false);
        assert!(req.options().flag(RequestOption::FollowLocation));
        assert!(!req.has_option(RequestOption::CookieEngine));
    }

    #[test]
    fn test_add_cookie_attaches_jar() {
        let req = Request::new()
            .unwrap()
            .add_cookie(Cookie::new("a", "1"))
            .add_cookie(Cookie::new("a", "2"));

        assert_eq!(req.cookies().map(CookieJar::to_header), Some("a=2".to_string()));
    }

    #[test]
    fn test_basic_auth_and_timeout() {
        let req = Request::new()
            .unwrap()
            .set_basic_auth("user", "pass")
            .set_timeout(5);

        assert_eq!(req.options().basic_auth(), Some(("user", "pass")));
        assert_eq!(req.options().timeout(), Some(std::time::Duration::from_secs(5)));
    }
}
