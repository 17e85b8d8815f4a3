// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam and the reqwest-backed blocking transport
//!
//! A [`Transport`] opens one [`Session`] per request execution. The session performs a
//! single blocking transfer, pushing every raw response header line into the sink it is
//! given, and is closed right after.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Request as WireRequest, Response as WireResponse};
use reqwest::header::{CONTENT_TYPE, COOKIE, LOCATION, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use url::Url;

use super::info_keys as keys;
use super::options::{OptionSet, RequestOption};
use super::response::Info;
use crate::error::{Error, Result};

/// Transfer error codes, numbered like libcurl's
pub mod error_codes {
    pub const OK: i32 = 0;
    pub const FAILED_INIT: i32 = 2;
    pub const URL_MALFORMAT: i32 = 3;
    pub const COULDNT_RESOLVE_HOST: i32 = 6;
    pub const COULDNT_CONNECT: i32 = 7;
    pub const WRITE_ERROR: i32 = 23;
    pub const OPERATION_TIMEDOUT: i32 = 28;
    pub const BAD_FUNCTION_ARGUMENT: i32 = 43;
    pub const TOO_MANY_REDIRECTS: i32 = 47;
    pub const SEND_ERROR: i32 = 55;
    pub const RECV_ERROR: i32 = 56;
    pub const BAD_CONTENT_ENCODING: i32 = 61;
}

/// Raw outcome of one transfer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transfer {
    /// Body, `None` when the transfer failed
    pub output: Option<String>,
    /// Metadata, `None` when the transport could not report any
    pub info: Option<Info>,
    /// Error code, `0` when none
    pub error_number: i32,
    /// Error message, empty when none
    pub error_message: String,
}

impl Transfer {
    /// Successful transfer
    pub fn completed(output: impl Into<String>, info: Info) -> Self {
        Self {
            output: Some(output.into()),
            info: Some(info),
            error_number: error_codes::OK,
            error_message: String::new(),
        }
    }

    /// Failed transfer with whatever metadata was gathered
    pub fn failed(info: Info, error_number: i32, error_message: impl Into<String>) -> Self {
        Self {
            output: None,
            info: Some(info),
            error_number,
            error_message: error_message.into(),
        }
    }

    /// Check if body and metadata are both present
    pub fn is_complete(&self) -> bool {
        self.output.is_some() && self.info.is_some()
    }
}

/// Networking capability a request executes against
pub trait Transport: Send + Sync {
    /// Report whether the capability exists in this environment
    fn check_available(&self) -> Result<()> {
        Ok(())
    }

    /// Acquire a handle configured for one transfer
    fn open(&self, options: &OptionSet) -> Result<Box<dyn Session>>;
}

/// Handle for exactly one transfer
pub trait Session {
    /// Perform the blocking transfer, calling `on_header` once per raw header line
    fn perform(&mut self, on_header: &mut dyn FnMut(&str)) -> Transfer;

    /// Release the handle
    fn close(self: Box<Self>);
}

/// Reqwest transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Maximum redirects to follow when following is enabled
    pub max_redirects: usize,
    /// Connect phase timeout
    pub connect_timeout: Option<Duration>,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Transparent gzip/brotli decoding
    pub decompress: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_redirects: 10,
            connect_timeout: None,
            accept_invalid_certs: false,
            proxy: None,
            decompress: true,
        }
    }
}

impl TransportConfig {
    /// Create a new transport config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Accept invalid certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Enable/disable transparent decompression
    pub fn decompress(mut self, decompress: bool) -> Self {
        self.decompress = decompress;
        self
    }
}

/// Blocking transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Create a transport with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

impl Transport for ReqwestTransport {
    fn open(&self, options: &OptionSet) -> Result<Box<dyn Session>> {
        let redirects = Arc::new(AtomicUsize::new(0));
        let follow = options.flag(RequestOption::FollowLocation);

        let policy = if follow {
            let counter = Arc::clone(&redirects);
            let max = self.config.max_redirects;
            Policy::custom(move |attempt| {
                let hops = attempt.previous().len();
                if hops > max {
                    attempt.error(format!("Maximum ({}) redirects followed", max))
                } else {
                    counter.store(hops, Ordering::Relaxed);
                    attempt.follow()
                }
            })
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .redirect(policy)
            .referer(false)
            .cookie_store(options.flag(RequestOption::CookieEngine))
            .timeout(options.timeout())
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .gzip(self.config.decompress)
            .brotli(self.config.decompress);

        if let Some(timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        if let Some(ref proxy_url) = self.config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(url = ?options.url(), follow, "Opened transport session");

        Ok(Box::new(ReqwestSession {
            client,
            options: options.clone(),
            redirects,
        }))
    }
}

struct ReqwestSession {
    client: Client,
    options: OptionSet,
    redirects: Arc<AtomicUsize>,
}

impl ReqwestSession {
    fn verbose(&self) -> bool {
        self.options.flag(RequestOption::Verbose)
    }

    fn build_request(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> std::result::Result<WireRequest, reqwest::Error> {
        let options = &self.options;
        let mut builder = self.client.request(method, url);

        // explicit headers win over the option-derived ones
        for (name, option) in [
            (USER_AGENT, RequestOption::UserAgent),
            (REFERER, RequestOption::Referer),
            (COOKIE, RequestOption::Cookie),
        ] {
            if let Some(value) = options.text(option) {
                if !options.has_header(name.as_str()) {
                    builder = builder.header(name, value);
                }
            }
        }
        if let Some((username, password)) = options.basic_auth() {
            builder = builder.basic_auth(username, Some(password));
        }
        if let Some(body) = options.body() {
            if !options.has_header(CONTENT_TYPE.as_str()) {
                builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
            }
            builder = builder.body(body.to_string());
        }
        for (name, value) in options.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder.build()
    }

    fn finish(
        &self,
        response: WireResponse,
        mut info: Info,
        start: Instant,
        on_header: &mut dyn FnMut(&str),
    ) -> Transfer {
        info.insert(keys::STARTTRANSFER_TIME, start.elapsed().as_secs_f64());
        info.insert(keys::URL, response.url().as_str());
        info.insert(keys::HTTP_CODE, response.status().as_u16());
        info.insert(keys::REDIRECT_COUNT, self.redirects.load(Ordering::Relaxed) as i64);
        info.insert(
            keys::DOWNLOAD_CONTENT_LENGTH,
            response.content_length().map_or(-1, |len| len as i64),
        );
        if let Some(addr) = response.remote_addr() {
            info.insert(keys::PRIMARY_IP, addr.ip().to_string());
            info.insert(keys::PRIMARY_PORT, i64::from(addr.port()));
        }
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            info.insert(keys::CONTENT_TYPE, content_type);
        }
        if response.status().is_redirection() {
            if let Some(target) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|location| response.url().join(location).ok())
            {
                info.insert(keys::REDIRECT_URL, target.as_str());
            }
        }

        let mut lines = Vec::with_capacity(response.headers().len() + 1);
        lines.push(format!("{:?} {}", response.version(), response.status()));
        for (name, value) in response.headers() {
            lines.push(format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())));
        }
        let header_size: usize = lines.iter().map(|line| line.len() + 2).sum::<usize>() + 2;
        info.insert(keys::HEADER_SIZE, header_size as i64);
        for line in &lines {
            if self.verbose() {
                tracing::info!("< {}", line);
            }
            on_header(line);
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                info.insert(keys::TOTAL_TIME, start.elapsed().as_secs_f64());
                return Transfer::failed(info, map_error(&e), e.to_string());
            }
        };

        let total = start.elapsed().as_secs_f64();
        info.insert(keys::TOTAL_TIME, total);
        info.insert(keys::SIZE_DOWNLOAD, body.len() as i64);
        if total > 0.0 {
            info.insert(keys::SPEED_DOWNLOAD, (body.len() as f64 / total) as i64);
            let uploaded = info.int(keys::SIZE_UPLOAD) as f64;
            info.insert(keys::SPEED_UPLOAD, (uploaded / total) as i64);
        }

        let body = if self.options.flag(RequestOption::HeaderIn) {
            format!("{}\r\n\r\n{}", lines.join("\r\n"), body)
        } else {
            body
        };

        if self.options.flag(RequestOption::ReturnTransfer) {
            return Transfer::completed(body, info);
        }

        let mut stdout = std::io::stdout().lock();
        match stdout.write_all(body.as_bytes()).and_then(|_| stdout.flush()) {
            Ok(()) => Transfer::completed(String::new(), info),
            Err(e) => Transfer::failed(info, error_codes::WRITE_ERROR, e.to_string()),
        }
    }
}

impl Session for ReqwestSession {
    fn perform(&mut self, on_header: &mut dyn FnMut(&str)) -> Transfer {
        let start = Instant::now();
        let mut info = Info::new();

        let Some(raw_url) = self.options.url() else {
            return Transfer::failed(info, error_codes::URL_MALFORMAT, "No URL set");
        };
        info.insert(keys::URL, raw_url);

        let url = match Url::parse(raw_url) {
            Ok(url) => url,
            Err(e) => {
                return Transfer::failed(
                    info,
                    error_codes::URL_MALFORMAT,
                    format!("URL rejected: {}", e),
                )
            }
        };

        let verb = self.options.method();
        let method = match reqwest::Method::from_bytes(verb.as_str().as_bytes()) {
            Ok(method) => method,
            Err(_) => {
                return Transfer::failed(
                    info,
                    error_codes::BAD_FUNCTION_ARGUMENT,
                    format!("Invalid request method: {:?}", verb.as_str()),
                )
            }
        };

        let request = match self.build_request(method, url) {
            Ok(request) => request,
            Err(e) => {
                return Transfer::failed(info, error_codes::BAD_FUNCTION_ARGUMENT, e.to_string())
            }
        };

        let header_block = render_request_header(&request);
        let upload = request
            .body()
            .and_then(|body| body.as_bytes())
            .map_or(0, <[u8]>::len);
        info.insert(keys::REQUEST_SIZE, (header_block.len() + upload) as i64);
        info.insert(keys::SIZE_UPLOAD, upload as i64);
        info.insert(keys::UPLOAD_CONTENT_LENGTH, upload as i64);
        if self.options.flag(RequestOption::HeaderOut) {
            info.insert(keys::REQUEST_HEADER, header_block.as_str());
        }
        if self.verbose() {
            for line in header_block.lines().filter(|l| !l.is_empty()) {
                tracing::info!("> {}", line);
            }
        }

        info.insert(keys::PRETRANSFER_TIME, start.elapsed().as_secs_f64());

        match self.client.execute(request) {
            Ok(response) => self.finish(response, info, start, on_header),
            Err(e) => {
                info.insert(keys::TOTAL_TIME, start.elapsed().as_secs_f64());
                info.insert(keys::REDIRECT_COUNT, self.redirects.load(Ordering::Relaxed) as i64);
                Transfer::failed(info, map_error(&e), e.to_string())
            }
        }
    }

    fn close(self: Box<Self>) {
        tracing::trace!(url = ?self.options.url(), "Closed transport session");
    }
}

/// Outgoing request line and headers as sent
fn render_request_header(request: &WireRequest) -> String {
    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut lines = vec![format!("{} {} HTTP/1.1", request.method(), target)];
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => lines.push(format!("Host: {}:{}", host, port)),
            None => lines.push(format!("Host: {}", host)),
        }
    }
    for (name, value) in request.headers() {
        lines.push(format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())));
    }

    format!("{}\r\n\r\n", lines.join("\r\n"))
}

/// Map a reqwest failure onto a transfer error code
fn map_error(error: &reqwest::Error) -> i32 {
    if error.is_timeout() {
        error_codes::OPERATION_TIMEDOUT
    } else if error.is_redirect() {
        error_codes::TOO_MANY_REDIRECTS
    } else if error.is_connect() {
        if error_chain_contains(error, "dns error") {
            error_codes::COULDNT_RESOLVE_HOST
        } else {
            error_codes::COULDNT_CONNECT
        }
    } else if error.is_builder() {
        error_codes::BAD_FUNCTION_ARGUMENT
    } else if error.is_decode() {
        error_codes::BAD_CONTENT_ENCODING
    } else if error.is_request() {
        error_codes::SEND_ERROR
    } else {
        error_codes::RECV_ERROR
    }
}

fn error_chain_contains(error: &(dyn std::error::Error + 'static), needle: &str) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if err.to_string().contains(needle) {
            return true;
        }
        current = err.source();
    }
    false
}
