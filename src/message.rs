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

//! MSGID & human-readable MSG synthesis.
//!
//! These work directly off the residual fields rather than the decoded payload: only string
//! values are consulted, and a value of any other type counts as missing. A present-but-empty
//! string is used as-is.

use crate::{event::Residual, logtype::LoggerType};

use serde_json::Value;

/// Fetch `data[key]` if it's a string, else `default`.
fn string_or<'a>(data: &'a serde_json::Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn activity_stream(residual: &Residual) -> String {
    let actor = string_or(residual, "actor", "unknown");
    let operation = string_or(residual, "operation", "unknown");
    let object = match residual.get("object1") {
        Some(Value::Object(object1)) => format!(
            "{} '{}'",
            string_or(object1, "type", "object"),
            string_or(object1, "name", "unnamed")
        ),
        _ => String::from("object"),
    };
    format!("User {} performed {} on {}", actor, operation, object)
}

fn job_event(residual: &Residual) -> String {
    let host = string_or(residual, "event_host", "unknown");
    match string_or(residual, "task_name", "") {
        "" => format!("Job event on host {}", host),
        task => format!("Job event on host {}: task '{}'", host, task),
    }
}

fn system_tracking(residual: &Residual) -> String {
    let kind = ["services", "package", "files"]
        .into_iter()
        .find(|key| residual.contains_key(*key))
        .unwrap_or("unknown");
    format!(
        "System tracking scan ({}) for host {}",
        kind,
        string_or(residual, "host", "unknown")
    )
}

fn awx(residual: &Residual) -> (&'static str, String) {
    let msg = string_or(residual, "msg", "No message");
    match residual.get("traceback").and_then(Value::as_str) {
        Some(traceback) if !traceback.is_empty() => ("AWX_ERROR", format!("AWX Error: {}", msg)),
        _ => ("AWX_LOG", msg.to_owned()),
    }
}

/// Produce the (MSGID, MSG) pair for an event from `logger`.
pub fn synthesize(logger: &LoggerType, residual: &Residual) -> (&'static str, String) {
    match logger {
        LoggerType::ActivityStream => ("ACTIVITY_STREAM", activity_stream(residual)),
        LoggerType::JobEvents => ("JOB_EVENT", job_event(residual)),
        LoggerType::SystemTracking => ("SYSTEM_TRACKING", system_tracking(residual)),
        LoggerType::Awx => awx(residual),
        LoggerType::Unknown(name) => ("UNKNOWN", format!("Unknown log type: {}", name)),
    }
}
