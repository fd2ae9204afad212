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

//! Prometheus metrics.
//!
//! The only metric we keep is a count of the events we've parsed. The translator is handed an
//! [`EventCounter`] rather than reaching for the global recorder, so that tests can count with
//! an [`AtomicU64`].

use crate::error::{Error, Result};

use backtrace::Backtrace;
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use std::sync::atomic::{AtomicU64, Ordering};

/// Fully-qualified name of the events-received counter
pub const EVENTS_RECEIVED: &str = "awx_syslog_awx_syslog_logs_received";

/// Something that can count received events.
pub trait EventCounter: Send + Sync {
    fn increment(&self);
}

/// Counts into the process-wide `metrics` recorder.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrometheusCounter;

impl EventCounter for PrometheusCounter {
    fn increment(&self) {
        counter!(EVENTS_RECEIVED).increment(1);
    }
}

impl EventCounter for AtomicU64 {
    fn increment(&self) {
        self.fetch_add(1, Ordering::Relaxed);
    }
}

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// May only succeed once per process; the returned handle renders the text exposition format.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|err| Error::Metrics {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
    describe_counter!(EVENTS_RECEIVED, "Number of AWX syslog events received");
    Ok(handle)
}
