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

//! awx-syslog: receive AWX log events over HTTP & forward them to a syslog collector.

use awx_syslog::{
    config::{legacy_files, Config, Overrides},
    metrics::{install_recorder, PrometheusCounter},
    rfc5424::Rfc5424,
    server::{router, AppState},
    transport::Protocol,
    translate::Translator,
};

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

/// awx-syslog - A syslog forwarder for Ansible AWX logs
///
/// Receives JSON via HTTP and forwards it to a syslog server as RFC 5424 messages.
#[derive(Parser, Debug)]
#[command(name = "awx-syslog", version, about)]
struct Cli {
    /// Config file (default: the first of /etc/awx-syslog/config.toml,
    /// $HOME/.awx-syslog/config.toml or ./config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the AWX JSON->Syslog server (the default)
    #[command(visible_alias = "s")]
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address on which to accept HTTP
    #[arg(long, value_name = "ADDR")]
    listen_addr: Option<String>,
    /// debug, info, warn, error or critical
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
    /// HOSTNAME to write into each syslog message
    #[arg(long, value_name = "NAME")]
    hostname_field: Option<String>,
    /// Syslog collector, as host:port
    #[arg(long, value_name = "ADDR")]
    server_addr: Option<String>,
    /// tcp, udp or tls
    #[arg(long)]
    protocol: Option<String>,
}

impl From<ServeArgs> for Overrides {
    fn from(args: ServeArgs) -> Self {
        Overrides {
            listen_addr: args.listen_addr,
            log_level: args.log_level,
            hostname_field: args.hostname_field,
            server_addr: args.server_addr,
            protocol: args.protocol,
        }
    }
}

/// Map our level names onto an [`EnvFilter`] directive; `RUST_LOG`, if set, wins.
fn init_tracing(log_level: &str) {
    let directive = match log_level.to_ascii_lowercase().as_str() {
        "critical" => String::from("error"),
        "warning" => String::from("warn"),
        other => other.to_owned(),
    };
    let (filter, bad_level) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, false),
        Err(_) => match EnvFilter::try_new(&directive) {
            Ok(filter) => (filter, false),
            Err(_) => (EnvFilter::new("info"), true),
        },
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if bad_level {
        warn!(log_level, "unrecognized log level; using info");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install the Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install the SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let serve = match cli.command {
        Some(Command::Serve(args)) => args,
        None => ServeArgs::default(),
    };

    let overrides: Overrides = serve.into();
    let (config, file) = match Config::load(cli.config.as_deref(), &overrides) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("awx-syslog: {}", err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level);
    match &file {
        Some(path) => info!(path = %path.display(), "loaded configuration"),
        None => info!("no configuration file found; using defaults"),
    }
    for path in legacy_files() {
        warn!(
            path = %path.display(),
            "ignoring YAML configuration; convert it to TOML as config.toml"
        );
    }
    if config.syslog.protocol.parse::<Protocol>().is_err() {
        warn!(
            protocol = %config.syslog.protocol,
            "unrecognized syslog protocol; every event will be refused"
        );
    }

    let metrics = match install_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "metrics are disabled");
            None
        }
    };

    let formatter = if config.hostname_field.is_empty() {
        Rfc5424::default()
    } else {
        match Rfc5424::builder().hostname_as_string(config.hostname_field.clone()) {
            Ok(builder) => builder.build(),
            Err(err) => {
                error!(error = %err, "bad hostname_field");
                return ExitCode::FAILURE;
            }
        }
    };
    info!(
        hostname = formatter.hostname(),
        facility = ?formatter.facility(),
        collector = %config.syslog.server_addr,
        protocol = %config.syslog.protocol,
        "forwarding AWX events"
    );

    let state = AppState {
        translator: Arc::new(Translator::new(formatter)),
        counter: Arc::new(PrometheusCounter),
        syslog: Arc::new(config.syslog.clone()),
        metrics,
    };

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %config.listen_addr, error = %err, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.listen_addr, "listening");

    if let Err(err) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
