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

//! Structured data synthesis.
//!
//! Every message carries an `awx_common` element followed by one element holding the
//! logger-specific payload.

use crate::{
    event::CommonFields,
    logtype::{LoggerType, TypedLogPayload},
    rfc5424::{is_sd_name, SdElement},
};

use tracing::debug;

pub const COMMON_SD_ID: &str = "awx_common";

/// Build the structured data for one event.
///
/// Payload parameters whose names can't be SD-NAMEs (only possible for unrecognized loggers,
/// whose residual keys are passed through) are skipped.
pub fn synthesize(
    common: &CommonFields,
    logger: &LoggerType,
    payload: &TypedLogPayload,
) -> Vec<SdElement> {
    let common_element = SdElement::new(COMMON_SD_ID)
        .param("logger_name", common.logger_name.as_str())
        .param("cluster_host_id", common.cluster_host_id.as_str())
        .param("path", common.path.as_str());

    let mut payload_element = SdElement::new(logger.sd_id());
    for (name, value) in payload.params() {
        if is_sd_name(&name) {
            payload_element.params.push((name, value));
        } else {
            debug!(logger = %logger, key = %name, "skipping a field that is not a valid SD-NAME");
        }
    }

    vec![common_element, payload_element]
}
