// Copyright (C) 2026 The awx-syslog Authors
//
// This file is part of awx-syslog.
//
// awx-syslog is free software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// awx-syslog is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with awx-syslog.  If
// not, see <http://www.gnu.org/licenses/>.

//! HTTP in, syslog out: drive the router against loopback collectors.

use awx_syslog::{
    config::SyslogConfig,
    rfc5424::Rfc5424,
    server::{router, AppState},
    translate::Translator,
};

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use tower::ServiceExt;

use std::{
    io::Read,
    net::{TcpListener, UdpSocket},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

fn app(protocol: &str, server_addr: String, counter: Arc<AtomicU64>) -> axum::Router {
    router(AppState {
        translator: Arc::new(Translator::new(
            Rfc5424::builder()
                .hostname_as_string("bridge".to_string())
                .unwrap()
                .build(),
        )),
        counter,
        syslog: Arc::new(SyslogConfig {
            server_addr,
            protocol: protocol.to_string(),
        }),
        metrics: None,
    })
}

/// Accept one connection & read the single octet-counted frame sent over it.
fn read_frame(collector: &TcpListener) -> String {
    let (mut conn, _) = collector.accept().unwrap();
    let mut text = String::new();
    conn.read_to_string(&mut text).unwrap();
    let (len, msg) = text.split_once(' ').unwrap();
    assert_eq!(len.parse::<usize>().unwrap(), msg.len());
    msg.to_owned()
}

fn post(body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn tcp_messages_are_octet_counted() {
    let collector = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = collector.local_addr().unwrap().to_string();
    let counter = Arc::new(AtomicU64::new(0));

    let response = app("tcp", addr, counter.clone())
        .oneshot(post(
            r#"{"logger_name":"system_tracking","host":"h2","package":{"zlib":"1.3"},"inventory_id":5}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(counter.load(Ordering::Relaxed), 1);

    let frame = read_frame(&collector);
    let parsed = syslog_rfc5424::parse_message(&frame).unwrap();
    assert_eq!(parsed.msgid.as_deref(), Some("SYSTEM_TRACKING"));
    assert_eq!(parsed.msg, "System tracking scan (package) for host h2");
    assert_eq!(
        parsed
            .sd
            .find_tuple("system_tracking", "inventoryid")
            .map(|s| s.as_str()),
        Some("5")
    );
}

#[tokio::test]
async fn multi_line_tracebacks_arrive_whole() {
    let collector = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = collector.local_addr().unwrap().to_string();

    let response = app("tcp", addr, Arc::new(AtomicU64::new(0)))
        .oneshot(post(
            r#"{"logger_name":"awx","level":"ERROR","msg":"boom","traceback":"Traceback (most recent call last):\n  File \"tasks.py\", line 1\nValueError"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let frame = read_frame(&collector);
    let parsed = syslog_rfc5424::parse_message(&frame).unwrap();
    assert_eq!(parsed.msgid.as_deref(), Some("AWX_ERROR"));
    assert_eq!(parsed.msg, "AWX Error: boom");
    assert_eq!(
        parsed.sd.find_tuple("awx_log", "traceback").map(|s| s.as_str()),
        Some("Traceback (most recent call last):\n  File \"tasks.py\", line 1\nValueError")
    );
}

#[tokio::test]
async fn unsupported_protocol_is_refused_after_translation() {
    // A collector that must never hear from us
    let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
    collector.set_nonblocking(true).unwrap();
    let addr = collector.local_addr().unwrap().to_string();
    let counter = Arc::new(AtomicU64::new(0));

    let response = app("smoke-signals", addr, counter.clone())
        .oneshot(post(
            r#"{"logger_name":"job_events","event_host":"h1","task_name":"deploy"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Invalid syslog protocol");
    assert_eq!(counter.load(Ordering::Relaxed), 1);

    let mut buf = [0u8; 64];
    assert!(collector.recv(&mut buf).is_err());
}

#[tokio::test]
async fn malformed_bodies_are_not_forwarded() {
    let collector = UdpSocket::bind("127.0.0.1:0").unwrap();
    collector.set_nonblocking(true).unwrap();
    let addr = collector.local_addr().unwrap().to_string();
    let counter = Arc::new(AtomicU64::new(0));

    let response = app("udp", addr, counter.clone())
        .oneshot(post("this is not JSON"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(counter.load(Ordering::Relaxed), 0);

    let mut buf = [0u8; 64];
    assert!(collector.recv(&mut buf).is_err());
}
