// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for curlwrap
//!
//! Request option assembly, the transport seam, response snapshots,
//! cookies and raw header parsing.

mod cookie;
mod header;
mod options;
mod request;
mod response;
mod transport;

pub use cookie::{parse_expires, Cookie, CookieJar, EXPIRES_FORMAT};
pub use header::{parse_headers, HeaderValue, ParsedHeaders, STATUS_LINE_KEY};
pub use options::{build_query, Method, OptionSet, OptionValue, PostFields, RequestOption};
pub use request::Request;
pub use response::{Info, InfoValue, Response};
pub use transport::{
    error_codes, ReqwestTransport, Session, Transfer, Transport, TransportConfig,
};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    concat!("curlwrap/", env!("CARGO_PKG_VERSION"), " (https://github.com/bountyyfi/curlwrap)");

/// Transfer metadata keys
pub mod info_keys {
    pub const URL: &str = "url";
    pub const CONTENT_TYPE: &str = "content_type";
    pub const HTTP_CODE: &str = "http_code";
    pub const HEADER_SIZE: &str = "header_size";
    pub const REQUEST_SIZE: &str = "request_size";
    pub const FILETIME: &str = "filetime";
    pub const SSL_VERIFY_RESULT: &str = "ssl_verify_result";
    pub const REDIRECT_COUNT: &str = "redirect_count";
    pub const TOTAL_TIME: &str = "total_time";
    pub const NAMELOOKUP_TIME: &str = "namelookup_time";
    pub const CONNECT_TIME: &str = "connect_time";
    pub const PRETRANSFER_TIME: &str = "pretransfer_time";
    pub const SIZE_UPLOAD: &str = "size_upload";
    pub const SIZE_DOWNLOAD: &str = "size_download";
    pub const SPEED_DOWNLOAD: &str = "speed_download";
    pub const SPEED_UPLOAD: &str = "speed_upload";
    pub const DOWNLOAD_CONTENT_LENGTH: &str = "download_content_length";
    pub const UPLOAD_CONTENT_LENGTH: &str = "upload_content_length";
    pub const STARTTRANSFER_TIME: &str = "starttransfer_time";
    pub const REDIRECT_TIME: &str = "redirect_time";
    pub const CERTINFO: &str = "certinfo";
    pub const PRIMARY_IP: &str = "primary_ip";
    pub const PRIMARY_PORT: &str = "primary_port";
    pub const LOCAL_IP: &str = "local_ip";
    pub const LOCAL_PORT: &str = "local_port";
    pub const REDIRECT_URL: &str = "redirect_url";
    pub const REQUEST_HEADER: &str = "request_header";
}
