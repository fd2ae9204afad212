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

//! RFC [5424]-compliant syslog message formatting
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424
//!
//! [`SyslogMessage`] is the in-memory form of one message; [`SyslogMessage::format`] renders it
//! as
//!
//! ```text
//! <PRI>1 TIMESTAMP HOSTNAME APP-NAME - MSGID [SD-ID PARAM="VALUE" ...]... MSG
//! ```
//!
//! [`Rfc5424`] holds the fields that don't change from one message to the next (facility &
//! hostname) and stamps them onto each new [`SyslogMessage`].

use crate::{
    error::{Error, Result},
    facility::{priority, Facility, Level},
};

use backtrace::Backtrace;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use tracing::debug;

use std::{borrow::Cow, fmt::Write};

type StdResult<T, E> = std::result::Result<T, E>;

/// Largest legal PRI: LOG_LOCAL7 | LOG_DEBUG
const MAX_PRI: u8 = 191;

const MAX_HOSTNAME: usize = 255;
const MAX_APP_NAME: usize = 48;
const MAX_MSGID: usize = 32;
const MAX_SD_NAME: usize = 32;

/// PRINTUSASCII, in the RFC's terms: %d33-126
fn is_print_us_ascii(b: u8) -> bool {
    (33..=126).contains(&b)
}

/// True if `name` is a legal SD-NAME (and so may be used as an SD-ID or PARAM-NAME): one to
/// thirty-two printable US-ASCII characters, none of which is '=', ' ', ']' or '"'.
pub fn is_sd_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_SD_NAME
        && name
            .bytes()
            .all(|b| is_print_us_ascii(b) && b != b'=' && b != b']' && b != b'"')
}

/// Escape a PARAM-VALUE: '"', '\' & ']' MUST be escaped with a backslash.
pub fn escape_sd_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Check a header field (HOSTNAME, APP-NAME or MSGID); the empty string will be rendered as
/// the NILVALUE.
fn header_field(field: &str, max_len: usize) -> Option<&str> {
    if field.is_empty() {
        Some("-")
    } else if field.len() <= max_len && field.bytes().all(is_print_us_ascii) {
        Some(field)
    } else {
        None
    }
}

/// Coerce `name` into a legal APP-NAME: anything outside PRINTUSASCII becomes '_' & the result
/// is cut at 48 octets.
/// The empty string is returned as-is.
pub fn sanitize_app_name(name: &str) -> Cow<'_, str> {
    if header_field(name, MAX_APP_NAME).is_some() {
        return Cow::Borrowed(name);
    }
    let fixed: String = name
        .chars()
        .map(|c| if c.is_ascii() && is_print_us_ascii(c as u8) { c } else { '_' })
        .take(MAX_APP_NAME)
        .collect();
    debug!(original = name, sanitized = %fixed, "repaired APP-NAME");
    Cow::Owned(fixed)
}

/// A [`Vec<u8>`] instance with the additional constraint that it must be at most 255 bytes of
/// printable ASCII.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rfc5424Hostname(Vec<u8>);

impl Rfc5424Hostname {
    pub fn new(bytes: Vec<u8>) -> Result<Rfc5424Hostname> {
        if !bytes.is_empty()
            && bytes.len() <= MAX_HOSTNAME
            && bytes.iter().copied().all(is_print_us_ascii)
        {
            Ok(Rfc5424Hostname(bytes))
        } else {
            Err(Error::BadRfc5424Hostname {
                name: bytes,
                back: Backtrace::new(),
            })
        }
    }
    pub fn as_str(&self) -> &str {
        // Only ever constructed from printable ASCII
        std::str::from_utf8(&self.0).unwrap_or("-")
    }
}

impl std::default::Default for Rfc5424Hostname {
    /// Attempt to figure-out an RFC [5424]-compliant hostname.
    ///
    /// The RFC's order of preference for the contents of the HOSTNAME field is FQDN, static IP
    /// address, hostname, dynamic IP address, and finally the NILVALUE. We take a
    /// shortcut: try [gethostname()], then look for a local IP address, then give up &
    /// use "-".
    ///
    /// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
    /// [gethostname()]: https://man7.org/linux/man-pages/man2/gethostname.2.html
    fn default() -> Self {
        hostname::get()
            .map_err(|err| Error::NoHostname {
                source: Box::new(err),
                back: Backtrace::new(),
            })
            // vvv :=> StdResult<Rfc5424Hostname, Error>
            .and_then(|hn| Rfc5424Hostname::new(hn.to_string_lossy().into_owned().into_bytes()))
            .or_else(|_err| {
                let ip: StdResult<std::net::IpAddr, Error> =
                    local_ip_address::local_ip().map_err(|_| Error::BadRfc5424IpAddress);
                ip.and_then(|ip| Rfc5424Hostname::new(ip.to_string().into_bytes()))
            })
            .unwrap_or_else(|_| Rfc5424Hostname(b"-".to_vec()))
    }
}

impl std::convert::TryFrom<String> for Rfc5424Hostname {
    type Error = Error;
    fn try_from(x: String) -> StdResult<Self, Self::Error> {
        Rfc5424Hostname::new(x.into_bytes())
    }
}

/// One structured data element: an SD-ID and its parameters, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SdElement {
    pub id: String,
    pub params: Vec<(String, String)>,
}

impl SdElement {
    pub fn new(id: impl Into<String>) -> SdElement {
        SdElement {
            id: id.into(),
            params: Vec::new(),
        }
    }
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> SdElement {
        self.params.push((name.into(), value.into()));
        self
    }
}

/// One RFC 5424 syslog message.
///
/// The VERSION is always 1 & the PROCID always the NILVALUE, so neither is represented here.
/// Empty header fields (and a `None` timestamp) render as the NILVALUE.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyslogMessage {
    pub priority: u8,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub hostname: String,
    pub appname: String,
    pub msgid: String,
    pub structured_data: Vec<SdElement>,
    pub msg: String,
}

impl SyslogMessage {
    /// Render this message on the wire.
    ///
    /// Fails if the message can't be expressed in RFC 5424: a PRI over 191, a HOSTNAME or MSGID
    /// that is too long or contains something other than printable ASCII, or an SD-ID or
    /// PARAM-NAME that isn't a legal SD-NAME. The APP-NAME is repaired with
    /// [`sanitize_app_name`] & PARAM-VALUEs are escaped; neither is ever rejected.
    pub fn format(&self) -> Result<String> {
        if self.priority > MAX_PRI {
            return Err(Error::BadPriority {
                pri: self.priority,
                back: Backtrace::new(),
            });
        }
        let hostname =
            header_field(&self.hostname, MAX_HOSTNAME).ok_or_else(|| Error::BadRfc5424Hostname {
                name: self.hostname.clone().into_bytes(),
                back: Backtrace::new(),
            })?;
        let sanitized = sanitize_app_name(&self.appname);
        let appname = if sanitized.is_empty() {
            "-"
        } else {
            sanitized.as_ref()
        };
        let msgid = header_field(&self.msgid, MAX_MSGID).ok_or_else(|| Error::BadRfc5424MsgId {
            name: self.msgid.clone().into_bytes(),
            back: Backtrace::new(),
        })?;
        let timestamp = self
            .timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Micros, true))
            .unwrap_or_else(|| String::from("-"));

        let mut buf = String::with_capacity(256 + self.msg.len());
        // `write!` on a `String` cannot fail
        let _ = write!(
            buf,
            "<{}>1 {} {} {} - {} ",
            self.priority, timestamp, hostname, appname, msgid
        );

        if self.structured_data.is_empty() {
            buf.push('-');
        }
        for element in &self.structured_data {
            if !is_sd_name(&element.id) {
                return Err(Error::BadRfc5424SdName {
                    name: element.id.clone(),
                    back: Backtrace::new(),
                });
            }
            buf.push('[');
            buf.push_str(&element.id);
            for (name, value) in &element.params {
                if !is_sd_name(name) {
                    return Err(Error::BadRfc5424SdName {
                        name: name.clone(),
                        back: Backtrace::new(),
                    });
                }
                let _ = write!(buf, " {}=\"{}\"", name, escape_sd_value(value));
            }
            buf.push(']');
        }

        if !self.msg.is_empty() {
            buf.push(' ');
            buf.push_str(&self.msg);
        }

        Ok(buf)
    }
}

/// The per-process portion of an RFC [5424] message: facility & hostname.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
#[derive(Clone, Debug)]
pub struct Rfc5424 {
    facility: Facility,
    hostname: Rfc5424Hostname,
}

impl std::default::Default for Rfc5424 {
    fn default() -> Self {
        Rfc5424 {
            facility: Facility::default(),
            hostname: Rfc5424Hostname::default(),
        }
    }
}

pub struct Rfc5424Builder {
    imp: Rfc5424,
}

impl Rfc5424Builder {
    pub fn facility(mut self, facility: Facility) -> Self {
        self.imp.facility = facility;
        self
    }
    pub fn hostname(mut self, hostname: Rfc5424Hostname) -> Self {
        self.imp.hostname = hostname;
        self
    }
    pub fn hostname_as_string(mut self, hostname: String) -> Result<Self> {
        self.imp.hostname = Rfc5424Hostname::try_from(hostname)?;
        Ok(self)
    }
    pub fn build(self) -> Rfc5424 {
        self.imp
    }
}

impl Rfc5424 {
    pub fn builder() -> Rfc5424Builder {
        Rfc5424Builder {
            imp: Rfc5424::default(),
        }
    }
    pub fn facility(&self) -> Facility {
        self.facility
    }
    pub fn hostname(&self) -> &str {
        self.hostname.as_str()
    }
    /// Start a new message at severity `level`, with PRI & HOSTNAME filled-in.
    pub fn message(&self, level: Level) -> SyslogMessage {
        SyslogMessage {
            priority: priority(self.facility, level),
            hostname: self.hostname().to_owned(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use chrono::TimeZone;

    fn bree() -> Rfc5424 {
        Rfc5424::builder()
            .hostname_as_string("bree.local".to_string())
            .unwrap()
            .build()
    }

    #[test]
    fn hostname() {
        let _x = Rfc5424Hostname::default(); // At least _exercise_ `Default`

        assert!(Rfc5424Hostname::new(b"bree.local".to_vec()).is_ok());
        assert!(Rfc5424Hostname::new(b"has space".to_vec()).is_err());
        assert!(Rfc5424Hostname::new(Vec::new()).is_err());
        assert!(Rfc5424Hostname::new(vec![b'a'; 256]).is_err());
        assert!(Rfc5424Hostname::try_from("主机".to_string()).is_err());
    }

    #[test]
    fn sd_names() {
        assert!(is_sd_name("awx_common"));
        assert!(is_sd_name("Request_Time"));
        assert!(is_sd_name("tracing-meta@64700"));
        assert!(!is_sd_name(""));
        assert!(!is_sd_name("a=b"));
        assert!(!is_sd_name("a b"));
        assert!(!is_sd_name("a]"));
        assert!(!is_sd_name("\"a\""));
        assert!(!is_sd_name("ünïcode"));
        assert!(!is_sd_name(&"x".repeat(33)));
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_sd_value("simple"), "simple");
        assert_eq!(escape_sd_value(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_sd_value(r"C:\awx"), r"C:\\awx");
        assert_eq!(escape_sd_value("[list]"), r"[list\]");
        assert_eq!(escape_sd_value("你好"), "你好");
    }

    #[test]
    fn golden() {
        let mut msg = bree().message(Level::LOG_ERR);
        msg.timestamp = Some(
            FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(1970, 1, 1, 0, 0, 0)
                .unwrap(),
        );
        msg.appname = "awx-controller-awx-1".into();
        msg.msgid = "AWX_ERROR".into();
        msg.structured_data = vec![
            SdElement::new("awx_common")
                .param("logger_name", "awx")
                .param("cluster_host_id", "awx-1")
                .param("path", ""),
            SdElement::new("awx_log")
                .param("msg", "boom")
                .param("traceback", "x"),
        ];
        msg.msg = "AWX Error: boom".into();

        assert_eq!(
            msg.format().unwrap(),
            "<107>1 1970-01-01T00:00:00.000000Z bree.local awx-controller-awx-1 - AWX_ERROR \
             [awx_common logger_name=\"awx\" cluster_host_id=\"awx-1\" path=\"\"]\
             [awx_log msg=\"boom\" traceback=\"x\"] AWX Error: boom"
        );
    }

    #[test]
    fn timestamps_keep_their_offset() {
        let mut msg = bree().message(Level::LOG_INFO);
        msg.timestamp = Some(
            FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 5, 1, 14, 30, 45)
                .unwrap(),
        );
        let wire = msg.format().unwrap();
        assert!(
            wire.starts_with("<110>1 2024-05-01T14:30:45.000000+02:00 bree.local - - - -"),
            "{}",
            wire
        );
    }

    #[test]
    fn builder() {
        let formatter = Rfc5424::builder()
            .facility(Facility::LOG_LOCAL7)
            .hostname(Rfc5424Hostname::new(b"10.0.0.7".to_vec()).unwrap())
            .build();
        assert_eq!(formatter.facility(), Facility::LOG_LOCAL7);
        let msg = formatter.message(Level::LOG_DEBUG);
        assert_eq!(msg.priority, 191);
        assert_eq!(msg.hostname, "10.0.0.7");
        assert_eq!(Rfc5424::default().facility(), Facility::LOG_AUDIT);
    }

    #[test]
    fn app_names_are_repaired() {
        assert_eq!(sanitize_app_name("awx-controller-awx-1"), "awx-controller-awx-1");
        assert_eq!(sanitize_app_name("awx-controller-awx 1"), "awx-controller-awx_1");
        assert_eq!(sanitize_app_name("awx-controller-节点"), "awx-controller-__");
        let long = sanitize_app_name("awx-controller-awx-node01.prod.datacenter.example.com");
        assert_eq!(long, "awx-controller-awx-node01.prod.datacenter.exampl");
        assert_eq!(long.len(), 48);

        let mut msg = bree().message(Level::LOG_INFO);
        msg.appname = "awx-controller-has a space".into();
        let wire = msg.format().unwrap();
        let parsed = syslog_rfc5424::parse_message(&wire).unwrap();
        assert_eq!(parsed.appname.as_deref(), Some("awx-controller-has_a_space"));
    }

    #[test]
    fn nil_values() {
        let msg = SyslogMessage {
            priority: 110,
            ..Default::default()
        };
        assert_eq!(msg.format().unwrap(), "<110>1 - - - - - -");
    }

    #[test]
    fn structural_errors() {
        let msg = SyslogMessage {
            priority: 192,
            ..Default::default()
        };
        assert!(matches!(msg.format(), Err(Error::BadPriority { pri: 192, .. })));

        let msg = SyslogMessage {
            priority: 110,
            msgid: "NOT A MSGID".into(),
            ..Default::default()
        };
        assert!(matches!(msg.format(), Err(Error::BadRfc5424MsgId { .. })));

        let msg = SyslogMessage {
            priority: 110,
            structured_data: vec![SdElement::new("unknown_log").param("bad key", "v")],
            ..Default::default()
        };
        let err = msg.format().unwrap_err();
        assert!(matches!(err, Error::BadRfc5424SdName { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn escaped_values_round_trip() {
        let nasty = r#"a "quoted" \path\ with ] brackets [ and = signs"#;
        let mut msg = bree().message(Level::LOG_INFO);
        msg.appname = "awx-controller-h".into();
        msg.msgid = "UNKNOWN".into();
        msg.structured_data = vec![SdElement::new("unknown_log")
            .param("nasty", nasty)
            .param("plain", "ok")];
        msg.msg = "Unknown log type: custom".into();

        let wire = msg.format().unwrap();
        let parsed = syslog_rfc5424::parse_message(&wire).unwrap();
        assert_eq!(
            parsed.sd.find_tuple("unknown_log", "nasty").map(|s| s.as_str()),
            Some(nasty)
        );
        assert_eq!(
            parsed.sd.find_tuple("unknown_log", "plain").map(|s| s.as_str()),
            Some("ok")
        );
        assert_eq!(parsed.hostname.as_deref(), Some("bree.local"));
        assert_eq!(parsed.msgid.as_deref(), Some("UNKNOWN"));
        assert_eq!(parsed.msg, "Unknown log type: custom");
    }
}
