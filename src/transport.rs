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

//! The syslog transport layer.
//!
//! This module defines the [`Transport`] trait along with UDP, TCP & TLS implementations. Each
//! forwarded message gets a transport of its own: [`forward`] connects, writes once, and drops the
//! connection.
//!
//! Over UDP the message is sent as a single datagram. Over TCP & TLS it is prefixed with its length
//! in octets & a space (the "octet-counting" framing of RFC [6587] & RFC [5425]), so messages
//! carrying newlines, such as Python tracebacks, arrive in one piece.
//!
//! # Examples
//!
//! ```rust,no_run
//! use awx_syslog::transport::{forward, Protocol};
//! let protocol: Protocol = "udp".parse().unwrap();
//! forward(protocol, "localhost:514", "<110>1 - - - - - -").unwrap();
//! ```
//!
//! [6587]: https://datatracker.ietf.org/doc/html/rfc6587#section-3.4.1
//! [5425]: https://datatracker.ietf.org/doc/html/rfc5425#section-4.3

use crate::error::{Error, Result};

use backtrace::Backtrace;
use rustls::{pki_types::ServerName, ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use tracing::{debug, warn};

use std::{
    io::Write,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket},
    sync::Arc,
};

fn transport_error<E>(err: E) -> Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    Error::Transport {
        source: err.into(),
        back: Backtrace::new(),
    }
}

/// The wire protocols over which we can reach a collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Tls,
}

impl std::str::FromStr for Protocol {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "tls" => Ok(Protocol::Tls),
            _ => Err(Error::UnsupportedProtocol {
                name: s.to_owned(),
                back: Backtrace::new(),
            }),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Protocol::Tcp => "tcp",
                Protocol::Udp => "udp",
                Protocol::Tls => "tls",
            }
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      transport mechanisms                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all transport layers must support.
pub trait Transport {
    /// Send one message on this transport mechanism, returning the number of bytes of `buf` sent.
    ///
    /// Takes `&mut self` since a TLS session mutates its state on every write.
    fn send(&mut self, buf: &[u8]) -> Result<usize>;
}

/// Sending syslog messages via UDP datagrams.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Construct a [`Transport`] implementation via UDP at `addr`.
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<UdpTransport> {
        let target = addr
            .to_socket_addrs()
            .map_err(transport_error)?
            .next()
            .ok_or_else(|| transport_error("address resolved to nothing"))?;
        // Bind to any available port, on the same address family as the collector...
        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).map_err(transport_error)?;
        // and connect to it:
        socket.connect(target).map_err(transport_error)?;
        Ok(UdpTransport { socket })
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(transport_error)
    }
}

/// Write `buf` as one octet-counted frame (`MSG-LEN SP SYSLOG-MSG`), then flush.
fn write_framed<W: Write>(writer: &mut W, buf: &[u8]) -> Result<usize> {
    write!(writer, "{} ", buf.len()).map_err(transport_error)?;
    writer.write_all(buf).map_err(transport_error)?;
    writer.flush().map_err(transport_error)?;
    Ok(buf.len())
}

/// Sending syslog message via TCP streams
pub struct TcpTransport {
    socket: TcpStream,
}

impl TcpTransport {
    /// Construct a [`Transport`] implementation via TCP at `addr`.
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<TcpTransport> {
        Ok(TcpTransport {
            socket: TcpStream::connect(addr).map_err(transport_error)?,
        })
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        write_framed(&mut self.socket, buf)
    }
}

/// The host portion of a "host:port" address, without the brackets around an IPv6 literal.
fn host_of(addr: &str) -> &str {
    let host = match addr.rsplit_once(':') {
        Some((host, port)) if !port.contains(']') => host,
        _ => addr,
    };
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

/// A client configuration trusting the platform's certificate store.
fn tls_config() -> Result<Arc<ClientConfig>> {
    let mut roots = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        warn!(error = %err, "while loading the platform trust store");
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    debug!(added, ignored, "loaded platform root certificates");

    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(transport_error)?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Sending syslog messages over TLS (RFC [5425]), verifying the collector's certificate.
///
/// [5425]: https://datatracker.ietf.org/doc/html/rfc5425
pub struct TlsTransport {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl TlsTransport {
    /// Connect to `addr` ("host:port") & complete the handshake; the host part is the name the
    /// collector's certificate must carry.
    pub fn new(addr: &str) -> Result<TlsTransport> {
        let name = ServerName::try_from(host_of(addr).to_owned()).map_err(transport_error)?;
        let conn = ClientConnection::new(tls_config()?, name).map_err(transport_error)?;
        let socket = TcpStream::connect(addr).map_err(transport_error)?;
        let mut stream = StreamOwned::new(conn, socket);
        stream
            .conn
            .complete_io(&mut stream.sock)
            .map_err(transport_error)?;
        Ok(TlsTransport { stream })
    }
}

impl Transport for TlsTransport {
    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        write_framed(&mut self.stream, buf)
    }
}

impl Drop for TlsTransport {
    fn drop(&mut self) {
        self.stream.conn.send_close_notify();
        let _ = self.stream.conn.complete_io(&mut self.stream.sock);
    }
}

/// Deliver one rendered message to the collector at `addr`.
///
/// Each call opens its own connection (or socket) & closes it on return. There is no retry.
pub fn forward(protocol: Protocol, addr: &str, wire: &str) -> Result<usize> {
    let mut transport: Box<dyn Transport> = match protocol {
        Protocol::Udp => Box::new(UdpTransport::new(addr)?),
        Protocol::Tcp => Box::new(TcpTransport::new(addr)?),
        Protocol::Tls => Box::new(TlsTransport::new(addr)?),
    };
    transport.send(wire.as_bytes())
}
