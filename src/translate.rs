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

//! The translation pipeline: AWX JSON in, RFC 5424 text out.
//!
//! [`Translator::translate`] strings together the stages implemented elsewhere in this crate:
//!
//! 1. [`parse_event`] splits the body into common fields & residual
//! 2. the event counter is bumped
//! 3. the AWX level becomes a syslog severity, and with the fixed facility, a PRI
//! 4. [`message::synthesize`] picks the MSGID & MSG
//! 5. the residual is decoded into a [`TypedLogPayload`] & [`sd::synthesize`] lays out the
//!    structured data
//! 6. the message is assembled & rendered by [`SyslogMessage::format`]
//!
//! Nothing here touches the network.
//!
//! [`SyslogMessage::format`]: crate::rfc5424::SyslogMessage::format

use crate::{
    error::Result,
    event::parse_event,
    facility::Level,
    logtype::{LoggerType, TypedLogPayload},
    message,
    metrics::EventCounter,
    rfc5424::Rfc5424,
    sd,
};

use tracing::{debug, info};

/// The outcome of translating one event
#[derive(Clone, Debug, PartialEq)]
pub struct Translation {
    pub logger_type: LoggerType,
    /// The message, as it should be written to the collector
    pub wire: String,
}

/// Turns AWX log events into RFC 5424 syslog messages.
///
/// Stateless apart from the per-process header fields it was built with, so it may be shared
/// freely between request handlers.
#[derive(Clone, Debug, Default)]
pub struct Translator {
    formatter: Rfc5424,
}

impl Translator {
    pub fn new(formatter: Rfc5424) -> Translator {
        Translator { formatter }
    }
    /// Translate one request body.
    ///
    /// `counter` is incremented once the body has been parsed, whether or not rendering then
    /// succeeds.
    pub fn translate(&self, body: &[u8], counter: &dyn EventCounter) -> Result<Translation> {
        debug!(body = %String::from_utf8_lossy(body), "translating");

        let event = parse_event(body)?;
        counter.increment();

        let logger_type = LoggerType::from_name(&event.common.logger_name);
        let level = Level::from_awx_level(&event.common.level);
        let (msgid, msg) = message::synthesize(&logger_type, &event.residual);
        let payload = TypedLogPayload::decode(&logger_type, &event.residual);
        info!(logger = %logger_type, level = %level, msgid, msg = %msg, "parsed AWX event");

        let mut syslog = self.formatter.message(level);
        syslog.timestamp = event.common.timestamp;
        syslog.appname = format!("awx-controller-{}", event.common.cluster_host_id);
        syslog.msgid = msgid.to_owned();
        syslog.structured_data = sd::synthesize(&event.common, &logger_type, &payload);
        syslog.msg = msg;

        let wire = syslog.format()?;
        Ok(Translation { logger_type, wire })
    }
}
