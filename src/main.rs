// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! curlwrap CLI
//!
//! Thin command-line wrapper over the library.

use std::env;
use std::io::Read;
use std::process::ExitCode;

use curlwrap::{parse_headers, Curl, Request, Response};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("curlwrap=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "get" => {
            if args.len() < 3 {
                eprintln!("Usage: curlwrap get <url> [key=value ...]");
                return ExitCode::from(1);
            }
            let data = parse_pairs(&args[3..]);
            run(Curl::get(&args[2], &data))
        }
        "post" => {
            if args.len() < 3 {
                eprintln!("Usage: curlwrap post <url> [key=value ...]");
                return ExitCode::from(1);
            }
            let data = parse_pairs(&args[3..]);
            run(Curl::post(&args[2], &data))
        }
        "headers" => parse_stdin_headers(),
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("curlwrap {}", curlwrap::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"curlwrap - Fluent HTTP request builder

USAGE:
    curlwrap <COMMAND> [OPTIONS]

COMMANDS:
    get <url> [k=v ...]     GET a URL, data appended as query string
    post <url> [k=v ...]    POST form data to a URL
    headers                 Parse a raw header block from stdin into JSON
    help                    Show this help message
    version                 Show version information

EXAMPLES:
    curlwrap get https://example.com q=rust
    curlwrap post https://httpbin.org/post name=curlwrap
    printf 'HTTP/1.1 200 OK\nSet-Cookie: a=1\n' | curlwrap headers

Set RUST_LOG=curlwrap=debug for transfer logging.
"#
    );
}

fn parse_pairs(args: &[String]) -> Vec<(String, String)> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (arg.clone(), String::new()),
        })
        .collect()
}

fn run(request: curlwrap::Result<Request>) -> ExitCode {
    let request = match request {
        Ok(r) => r.set_follow_redirects(true),
        Err(e) => {
            eprintln!("Failed to create request: {}", e);
            return ExitCode::from(1);
        }
    };

    match request.execute() {
        Ok(response) => {
            print_summary(&response);
            println!();
            println!("{}", response.get_output().unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            if let Some(partial) = e.response() {
                eprintln!(
                    "  error {}: {}",
                    partial.get_error_number(),
                    partial.get_error_message()
                );
                eprintln!("  after {:.3}s", partial.get_total_time());
            }
            ExitCode::from(1)
        }
    }
}

fn print_summary(response: &Response) {
    println!("URL:          {}", response.get_url().unwrap_or("-"));
    println!("Status:       {}", response.get_http_code());
    println!("Content-Type: {}", response.get_content_type().unwrap_or("-"));
    println!("Total time:   {:.3}s", response.get_total_time());
    println!("Downloaded:   {} bytes", response.get_size_download());
    println!("Redirects:    {}", response.get_redirect_count());
    if let Some(ip) = response.get_primary_ip() {
        println!("Remote:       {}:{}", ip, response.get_primary_port());
    }

    let cookies = response.cookies();
    if !cookies.is_empty() {
        println!("\nCookies ({}):", cookies.len());
        for cookie in cookies.cookies() {
            println!("  {}", cookie);
        }
    }
}

fn parse_stdin_headers() -> ExitCode {
    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        eprintln!("Failed to read stdin: {}", e);
        return ExitCode::from(1);
    }

    match serde_json::to_string_pretty(&parse_headers(&raw)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize headers: {}", e);
            ExitCode::from(1)
        }
    }
}
