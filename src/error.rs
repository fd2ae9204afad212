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

//! [awx-syslog](crate) errors

use backtrace::Backtrace;

/// [awx-syslog](crate) error type
///
/// [awx-syslog](crate) eschews libraries like [thiserror] & [anyhow] in favor of a
/// straightforward enumeration whose match arms are chosen on the basis of what the caller will
/// need to respond. See [`Error::is_client_error`] for how the HTTP front-end sorts them.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
#[non_exhaustive]
pub enum Error {
    /// The request body was not well-formed JSON
    MalformedInput {
        source: serde_json::Error,
        back: Backtrace,
    },
    /// The request body was JSON, but not a JSON object
    NotAnObject { back: Backtrace },
    /// The configured or discovered hostname is not compliant with RFC 5424
    BadRfc5424Hostname { name: Vec<u8>, back: Backtrace },
    /// The synthesized MSGID is not compliant with RFC 5424
    BadRfc5424MsgId { name: Vec<u8>, back: Backtrace },
    /// A structured data identifier or parameter name is not compliant with RFC 5424
    BadRfc5424SdName { name: String, back: Backtrace },
    BadRfc5424IpAddress,
    /// PRI must fit in the range [0, 191]
    BadPriority { pri: u8, back: Backtrace },
    /// Failed to fetch hostname (via libc)
    NoHostname {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// The configured transport protocol is not one of tcp, udp or tls
    UnsupportedProtocol { name: String, back: Backtrace },
    /// Failed to install the Prometheus recorder
    Metrics {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// General transport layer error
    Transport {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
}

impl Error {
    /// True if this error is the sender's fault (or the operator's, in the case of a bad protocol)
    /// rather than ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedInput { .. } | Error::NotAnObject { .. } | Error::UnsupportedProtocol { .. }
        )
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedInput { source, .. } => write!(f, "Malformed JSON body: {}", source),
            Error::NotAnObject { .. } => write!(f, "Malformed JSON body: expected a JSON object"),
            Error::BadRfc5424Hostname { name, .. } => write!(
                f,
                "{:?} is not an RFC 5424-compliant hostname",
                String::from_utf8_lossy(name)
            ),
            Error::BadRfc5424MsgId { name, .. } => write!(
                f,
                "{:?} is not an RFC 5424-compliant MSGID",
                String::from_utf8_lossy(name)
            ),
            Error::BadRfc5424SdName { name, .. } => {
                write!(f, "{:?} is not an RFC 5424-compliant SD-NAME", name)
            }
            Error::BadRfc5424IpAddress => write!(
                f,
                "The discovered IP address is not compliant with RFC 5424"
            ),
            Error::BadPriority { pri, .. } => write!(f, "{} is not a valid syslog PRI", pri),
            Error::NoHostname { source, .. } => {
                write!(f, "Failed to discover this host's name: {}", source)
            }
            Error::UnsupportedProtocol { .. } => write!(f, "Invalid syslog protocol"),
            Error::Metrics { source, .. } => {
                write!(f, "Failed to install the metrics recorder: {}", source)
            }
            Error::Transport { source, .. } => write!(f, "Transport error: {}", source),
            _ => write!(f, "Other awx-syslog error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedInput { source: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::NotAnObject { back } => write!(f, "{}\n{:?}", self, back),
            Error::BadRfc5424Hostname { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::BadRfc5424MsgId { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::BadRfc5424SdName { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::BadPriority { pri: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::UnsupportedProtocol { name, back } => {
                write!(f, "{} ({:?})\n{:?}", self, name, back)
            }
            Error::Metrics { source: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::Transport { source: _, back } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "awx-syslog error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MalformedInput { source, .. } => Some(source),
            Error::NoHostname { source, .. } => Some(source.as_ref()),
            Error::Metrics { source, .. } => Some(source.as_ref()),
            Error::Transport { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
