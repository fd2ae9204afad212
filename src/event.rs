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

//! Splitting an AWX JSON log event into its common schema & everything else.
//!
//! Every event AWX ships to an external logger carries the same five keys: `cluster_host_id`,
//! `level`, `logger_name`, `@timestamp` & `path`. The rest of the object depends on the logger
//! that produced it. [`parse_event`] pulls the former out into [`CommonFields`] & leaves the latter,
//! untouched, in a [`Residual`] map for the logger-specific stages downstream.

use crate::error::{Error, Result};

use backtrace::Backtrace;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use tracing::debug;

/// The fields of an event that are not part of the common schema, keyed by their JSON name.
pub type Residual = serde_json::Map<String, Value>;

/// Fields present in every AWX log event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommonFields {
    /// Unique identifier of the host within the controller cluster
    pub cluster_host_id: String,
    /// Python log level (INFO, DEBUG, ERROR, &c)
    pub level: String,
    /// Name of the logger (e.g. "activity_stream", "job_events"); empty if absent
    pub logger_name: String,
    /// Time of the event; `None` if absent or not RFC 3339
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Path of the source file that generated the event
    pub path: String,
}

/// One parsed AWX event
#[derive(Clone, Debug, PartialEq)]
pub struct AwxEvent {
    pub common: CommonFields,
    pub residual: Residual,
}

/// Parse `body` into an [`AwxEvent`].
///
/// Fails only if `body` isn't JSON, or is JSON but not an object. A common field of the wrong
/// type is treated as missing, and an unparseable `@timestamp` is dropped; neither is fatal.
pub fn parse_event(body: &[u8]) -> Result<AwxEvent> {
    let raw: Value = serde_json::from_slice(body).map_err(|err| Error::MalformedInput {
        source: err,
        back: Backtrace::new(),
    })?;
    let object = match raw {
        Value::Object(object) => object,
        _ => {
            return Err(Error::NotAnObject {
                back: Backtrace::new(),
            })
        }
    };

    let mut common = CommonFields::default();
    let mut residual = Residual::new();
    for (key, value) in object {
        match key.as_str() {
            "cluster_host_id" => common.cluster_host_id = string_or_default(&key, value),
            "level" => common.level = string_or_default(&key, value),
            "logger_name" => common.logger_name = string_or_default(&key, value),
            "path" => common.path = string_or_default(&key, value),
            "@timestamp" => common.timestamp = parse_timestamp(value),
            _ => {
                residual.insert(key, value);
            }
        }
    }

    Ok(AwxEvent { common, residual })
}

fn string_or_default(key: &str, value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => {
            debug!(field = key, value = %other, "common field is not a string; ignoring it");
            String::new()
        }
    }
}

fn parse_timestamp(value: Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .map_err(|err| {
                debug!(timestamp = %s, error = %err, "@timestamp is not RFC 3339; ignoring it");
            })
            .ok(),
        _ => None,
    }
}
