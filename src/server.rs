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

//! The HTTP front-end.
//!
//! | route          | response                                          |
//! |----------------|---------------------------------------------------|
//! | `POST /`       | translate & forward one AWX event                 |
//! | `GET /health`  | always `200 OK`                                   |
//! | `GET /metrics` | Prometheus text exposition                        |
//!
//! Forwarding is best-effort: once an event has been translated, the sender gets `200 OK` whether
//! or not the collector could be reached.

use crate::{
    config::SyslogConfig,
    error::Error,
    metrics::EventCounter,
    transport::{forward, Protocol},
    translate::Translator,
};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{debug, error, info};

use std::sync::Arc;

/// Everything a request handler needs
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
    pub counter: Arc<dyn EventCounter>,
    pub syslog: Arc<SyslogConfig>,
    /// `None` if no recorder was installed, in which case `/metrics` is 404
    pub metrics: Option<PrometheusHandle>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(receive))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

fn error_response(err: &Error) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string()).into_response()
}

async fn receive(State(state): State<AppState>, body: Bytes) -> Response {
    let translation = match state.translator.translate(&body, state.counter.as_ref()) {
        Ok(translation) => translation,
        Err(err) => {
            error!(error = %err, "failed to translate AWX event");
            return error_response(&err);
        }
    };
    info!(wire = %translation.wire, "generated syslog message");

    let protocol: Protocol = match state.syslog.protocol.parse() {
        Ok(protocol) => protocol,
        Err(err) => {
            error!(protocol = %state.syslog.protocol, "invalid syslog protocol");
            return error_response(&err);
        }
    };

    let addr = state.syslog.server_addr.clone();
    let wire = translation.wire;
    match tokio::task::spawn_blocking(move || forward(protocol, &addr, &wire)).await {
        Ok(Ok(sent)) => debug!(sent, %protocol, "forwarded"),
        Ok(Err(err)) => error!(error = %err, "failed to forward to the syslog server"),
        Err(err) => error!(error = %err, "forwarding task failed"),
    }

    (StatusCode::OK, "OK").into_response()
}

async fn health() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics are not enabled").into_response(),
    }
}
