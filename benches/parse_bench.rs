// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use curlwrap::{parse_headers, Cookie, CookieJar};

fn header_parsing_benchmark(c: &mut Criterion) {
    let raw = "HTTP/1.1 200 OK\r\n\
        Date: Wed, 21 Oct 2015 07:28:00 GMT\r\n\
        Content-Type: text/html; charset=utf-8\r\n\
        Set-Cookie: session=abc123; Path=/; HttpOnly\r\n\
        Set-Cookie: theme=dark; Max-Age=3600\r\n\
        Set-Cookie: lang=en\r\n\
        X-Folded: first\r\n\
        \tsecond\r\n\
        Cache-Control: no-cache\r\n\r\n";

    c.bench_function("parse_headers", |b| b.iter(|| parse_headers(black_box(raw))));
}

fn cookie_benchmark(c: &mut Criterion) {
    let headers = [
        "session=abc%20123; Domain=example.com; Path=/; Secure; HttpOnly",
        "theme=dark; Max-Age=3600; Expires=Wed, 21 Oct 2015 07:28:00 GMT",
        "tracking=\"1\"; SameSite=Lax; Discard",
    ];

    c.bench_function("cookie_from_header", |b| {
        b.iter(|| {
            for header in &headers {
                black_box(Cookie::from_header(black_box(header)));
            }
        })
    });

    let jar = CookieJar::from_set_cookie_headers(headers);
    c.bench_function("cookie_jar_to_header", |b| b.iter(|| black_box(jar.to_header())));
}

criterion_group!(benches, header_parsing_benchmark, cookie_benchmark);
criterion_main!(benches);
