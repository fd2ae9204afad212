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

//! The AWX loggers we know about, and the shape of their payloads.
//!
//! AWX's external logging documentation describes four loggers: `activity_stream`, `job_events`,
//! `system_tracking` and the catch-all `awx`. [`LoggerType`] names them; [`TypedLogPayload`]
//! carries the logger-specific fields of one event, each variant declaring its fields explicitly.
//!
//! Decoding is lenient. A declared field that is absent, `null`, or of the wrong JSON shape takes
//! its zero value; the last case is reported at debug level, but never fails the event.

use crate::event::Residual;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// A JSON object, as it appears in a payload
pub type JsonObject = serde_json::Map<String, Value>;

/// The logger that produced an event, taken from its `logger_name` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoggerType {
    ActivityStream,
    JobEvents,
    SystemTracking,
    Awx,
    /// Anything else, including the empty string
    Unknown(String),
}

impl LoggerType {
    pub fn from_name(name: &str) -> LoggerType {
        match name {
            "activity_stream" => LoggerType::ActivityStream,
            "job_events" => LoggerType::JobEvents,
            "system_tracking" => LoggerType::SystemTracking,
            "awx" => LoggerType::Awx,
            other => LoggerType::Unknown(other.to_owned()),
        }
    }
    pub fn name(&self) -> &str {
        match self {
            LoggerType::ActivityStream => "activity_stream",
            LoggerType::JobEvents => "job_events",
            LoggerType::SystemTracking => "system_tracking",
            LoggerType::Awx => "awx",
            LoggerType::Unknown(name) => name,
        }
    }
    /// The SD-ID under which this logger's fields are written.
    ///
    /// Note that the generic `awx` logger writes under `awx_log`, not `awx`.
    pub fn sd_id(&self) -> &'static str {
        match self {
            LoggerType::ActivityStream => "activity_stream",
            LoggerType::JobEvents => "job_events",
            LoggerType::SystemTracking => "system_tracking",
            LoggerType::Awx => "awx_log",
            LoggerType::Unknown(_) => "unknown_log",
        }
    }
}

impl std::fmt::Display for LoggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       payload decoding                                         //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Decode `residual[key]` as a `T`, falling back to `T::default()`.
fn field<T: DeserializeOwned + Default>(residual: &Residual, key: &str) -> T {
    match residual.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => <T as serde::Deserialize>::deserialize(value).unwrap_or_else(|err| {
            debug!(
                field = key,
                value = %value,
                error = %err,
                "dropping a field that doesn't match its declared shape"
            );
            T::default()
        }),
    }
}

fn object_param(object: &JsonObject) -> String {
    // `Map` has no `Display`; borrow `Value`'s compact rendering
    serde_json::to_string(object).unwrap_or_else(|_| String::from("{}"))
}

/// Render a JSON value as a structured data parameter value: strings verbatim, everything else
/// as compact JSON.
pub fn value_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Activity stream records: who did what to which object
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityStreamLog {
    /// Username of the user who took the action
    pub actor: String,
    /// Summary of the fields that changed, with their old & new values
    pub changes: JsonObject,
    /// Basic category of change (e.g. "associate")
    pub operation: String,
    /// The primary object being operated on
    pub object1: JsonObject,
    /// The second object involved in the action, if any
    pub object2: JsonObject,
}

impl ActivityStreamLog {
    fn from_residual(residual: &Residual) -> Self {
        ActivityStreamLog {
            actor: field(residual, "actor"),
            changes: field(residual, "changes"),
            operation: field(residual, "operation"),
            object1: field(residual, "object1"),
            object2: field(residual, "object2"),
        }
    }
    fn params(&self) -> Vec<(String, String)> {
        vec![
            ("actor".into(), self.actor.clone()),
            ("changes".into(), object_param(&self.changes)),
            ("operation".into(), self.operation.clone()),
            ("object1".into(), object_param(&self.object1)),
            ("object2".into(), object_param(&self.object2)),
        ]
    }
}

/// Ansible job events
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobEventLog {
    /// The `host` of the job event (renamed by AWX to avoid colliding with the common schema)
    pub event_host: String,
    /// Ansible event-specific data
    pub event_data: JsonObject,
    pub job_id: i64,
    pub task_name: String,
    pub play_name: String,
}

impl JobEventLog {
    fn from_residual(residual: &Residual) -> Self {
        JobEventLog {
            event_host: field(residual, "event_host"),
            event_data: field(residual, "event_data"),
            job_id: field(residual, "job_id"),
            task_name: field(residual, "task_name"),
            play_name: field(residual, "play_name"),
        }
    }
    fn params(&self) -> Vec<(String, String)> {
        vec![
            ("eventhost".into(), self.event_host.clone()),
            ("eventdata".into(), object_param(&self.event_data)),
            ("jobid".into(), self.job_id.to_string()),
            ("taskname".into(), self.task_name.clone()),
            ("playname".into(), self.play_name.clone()),
        ]
    }
}

/// System tracking (fact scan) data
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemTrackingLog {
    /// Services scan results (periods in names replaced with "_")
    pub services: JsonObject,
    /// Package scan results
    pub package: JsonObject,
    /// File scan results
    pub files: JsonObject,
    /// The host to which the scan applies
    pub host: String,
    /// The inventory containing `host`
    pub inventory_id: i64,
}

impl SystemTrackingLog {
    fn from_residual(residual: &Residual) -> Self {
        SystemTrackingLog {
            services: field(residual, "services"),
            package: field(residual, "package"),
            files: field(residual, "files"),
            host: field(residual, "host"),
            inventory_id: field(residual, "inventory_id"),
        }
    }
    fn params(&self) -> Vec<(String, String)> {
        vec![
            ("services".into(), object_param(&self.services)),
            ("package".into(), object_param(&self.package)),
            ("files".into(), object_param(&self.files)),
            ("host".into(), self.host.clone()),
            ("inventoryid".into(), self.inventory_id.to_string()),
        ]
    }
}

/// Generic controller server logs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AwxLog {
    pub msg: String,
    /// Python traceback, for errors
    pub traceback: String,
}

impl AwxLog {
    fn from_residual(residual: &Residual) -> Self {
        AwxLog {
            msg: field(residual, "msg"),
            traceback: field(residual, "traceback"),
        }
    }
    fn params(&self) -> Vec<(String, String)> {
        vec![
            ("msg".into(), self.msg.clone()),
            ("traceback".into(), self.traceback.clone()),
        ]
    }
}

/// The logger-specific portion of one event.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedLogPayload {
    ActivityStream(ActivityStreamLog),
    JobEvent(JobEventLog),
    SystemTracking(SystemTrackingLog),
    GenericAwx(AwxLog),
    /// An unrecognized logger; we keep every residual field as-is
    Unknown(Residual),
}

impl TypedLogPayload {
    /// Decode the residual fields of an event produced by `logger`. Cannot fail.
    pub fn decode(logger: &LoggerType, residual: &Residual) -> TypedLogPayload {
        match logger {
            LoggerType::ActivityStream => {
                TypedLogPayload::ActivityStream(ActivityStreamLog::from_residual(residual))
            }
            LoggerType::JobEvents => TypedLogPayload::JobEvent(JobEventLog::from_residual(residual)),
            LoggerType::SystemTracking => {
                TypedLogPayload::SystemTracking(SystemTrackingLog::from_residual(residual))
            }
            LoggerType::Awx => TypedLogPayload::GenericAwx(AwxLog::from_residual(residual)),
            LoggerType::Unknown(_) => TypedLogPayload::Unknown(residual.clone()),
        }
    }
    /// This payload's fields as (parameter name, value) pairs.
    ///
    /// For the known loggers, that's one pair per declared field, named by the lowercased field
    /// name, in declaration order. For unknown loggers it's every residual field under its
    /// original key, in key order.
    pub fn params(&self) -> Vec<(String, String)> {
        match self {
            TypedLogPayload::ActivityStream(log) => log.params(),
            TypedLogPayload::JobEvent(log) => log.params(),
            TypedLogPayload::SystemTracking(log) => log.params(),
            TypedLogPayload::GenericAwx(log) => log.params(),
            TypedLogPayload::Unknown(residual) => {
                let mut params: Vec<(String, String)> = residual
                    .iter()
                    .map(|(key, value)| (key.clone(), value_param(value)))
                    .collect();
                params.sort_by(|a, b| a.0.cmp(&b.0));
                params
            }
        }
    }
}
