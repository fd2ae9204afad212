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

//! A bridge from [AWX] external logging to [syslog]
//!
//! [AWX]: https://github.com/ansible/awx
//! [syslog]: https://en.wikipedia.org/wiki/Syslog
//!
//! # Introduction
//!
//! AWX (and the Red Hat automation controller built from it) can ship its logs to an external
//! aggregator, but only as JSON over HTTP(S) or raw TCP/UDP. Collectors that speak [RFC 5424]
//! syslog (rsyslog, syslog-ng, most SIEMs) can't make much of that. This crate sits in between:
//! it accepts AWX's JSON events over HTTP, recasts each as an RFC 5424 message, and sends the
//! result on to a syslog collector over UDP, TCP or TLS.
//!
//! [RFC 5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! Each AWX event carries a handful of common fields (`logger_name`, `level`, `@timestamp`,
//! `cluster_host_id` & `path`) plus a set of fields particular to the logger that produced it.
//! The common fields drive the syslog header: `level` picks the severity (the facility is always
//! `LOG_AUDIT`), `@timestamp` becomes the TIMESTAMP and `cluster_host_id` the APP-NAME. The rest
//! become structured data: an `awx_common` element, then an element named for the logger. A
//! human-readable MSG & a MSGID are derived from the logger-specific fields.
//!
//! # Usage
//!
//! ```rust
//! use awx_syslog::{rfc5424::Rfc5424, translate::Translator};
//! use std::sync::atomic::AtomicU64;
//!
//! let translator = Translator::new(
//!     Rfc5424::builder()
//!         .hostname_as_string("bridge.example.com".to_string())
//!         .unwrap()
//!         .build(),
//! );
//! let events = AtomicU64::new(0);
//! let out = translator
//!     .translate(
//!         br#"{"logger_name": "job_events", "level": "INFO", "cluster_host_id": "awx-1",
//!              "event_host": "web01", "task_name": "deploy", "job_id": 42}"#,
//!         &events,
//!     )
//!     .unwrap();
//! assert!(out.wire.starts_with("<110>1 - bridge.example.com awx-controller-awx-1 - JOB_EVENT "));
//! assert!(out.wire.ends_with("Job event on host web01: task 'deploy'"));
//! ```
//!
//! The `awx-syslog` binary wraps this in an HTTP server; see [`server`] & [`config`].

pub mod config;
pub mod error;
pub mod event;
pub mod facility;
pub mod logtype;
pub mod message;
pub mod metrics;
pub mod rfc5424;
pub mod sd;
pub mod server;
pub mod translate;
pub mod transport;
