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

//! syslog facility & severity definitions, and the mapping from AWX level names onto the latter.
//!
//! [`Facility`] and [`Level`] replicate the names used in `<syslog.h>`. RFC [5424] defines the
//! PRI of a message as the facility times eight plus the severity; as in `<syslog.h>`, the
//! [`Facility`] discriminants are pre-multiplied so that the PRI is simply the bitwise OR of the
//! two.
//!
//! [5424]: https://datatracker.ietf.org/doc/html/rfc5424

type StdResult<T, E> = std::result::Result<T, E>;

/// The twenty-four syslog "facilities", pre-shifted by three bits.
///
/// AWX events are always forwarded as [`Facility::LOG_AUDIT`], but the remaining values are
/// retained so that a [`Rfc5424`](crate::rfc5424::Rfc5424) may be built for any of them.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0 << 3,
    /// random user-level messages
    LOG_USER = 1 << 3,
    /// mail system
    LOG_MAIL = 2 << 3,
    /// system daemons
    LOG_DAEMON = 3 << 3,
    /// security/authorization messages
    LOG_AUTH = 4 << 3,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5 << 3,
    /// line printer subsystem
    LOG_LPR = 6 << 3,
    /// network news subsystem
    LOG_NEWS = 7 << 3,
    /// UUCP subsystem
    LOG_UUCP = 8 << 3,
    /// clock daemon
    LOG_CRON = 9 << 3,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10 << 3,
    /// ftp daemon
    LOG_FTP = 11 << 3,
    /// NTP subsystem
    LOG_NTP = 12 << 3,
    /// log audit
    LOG_AUDIT = 13 << 3,
    /// log alert
    LOG_ALERT = 14 << 3,
    /// clock daemon (note 2)
    LOG_CLOCK = 15 << 3,
    LOG_LOCAL0 = 16 << 3,
    LOG_LOCAL1 = 17 << 3,
    LOG_LOCAL2 = 18 << 3,
    LOG_LOCAL3 = 19 << 3,
    LOG_LOCAL4 = 20 << 3,
    LOG_LOCAL5 = 21 << 3,
    LOG_LOCAL6 = 22 << 3,
    LOG_LOCAL7 = 23 << 3,
}

impl std::default::Default for Facility {
    /// AWX activity, job & tracking events are audit records, so that's our default.
    fn default() -> Self {
        Facility::LOG_AUDIT
    }
}

/// The eight RFC [5424] severity levels, with the same discriminants as `<syslog.h>`.
///
/// [5424]: https://datatracker.ietf.org/doc/html/rfc5424
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    /// system is unusable
    LOG_EMERG,
    /// action must be take immediately
    LOG_ALERT,
    /// critical conditions
    LOG_CRIT,
    /// error conditions
    LOG_ERR,
    /// warning conditions
    LOG_WARNING,
    /// normal, but significant condition
    LOG_NOTICE,
    /// informational message
    LOG_INFO,
    /// debug-level message
    LOG_DEBUG,
}

impl Level {
    /// Map an AWX (i.e. Python `logging`) level name to a syslog severity.
    ///
    /// The match is case-insensitive. Python's `CRITICAL` becomes `LOG_CRIT`, `ERROR` becomes
    /// `LOG_ERR`, both `WARNING` & `WARN` become `LOG_WARNING`, and `DEBUG` becomes `LOG_DEBUG`.
    /// Everything else, including `INFO`, the empty string and any name we don't recognize, is
    /// `LOG_INFO`. This cannot fail.
    pub fn from_awx_level(name: &str) -> Level {
        match name.to_ascii_uppercase().as_str() {
            "CRITICAL" => Level::LOG_CRIT,
            "ERROR" => Level::LOG_ERR,
            "WARNING" | "WARN" => Level::LOG_WARNING,
            "DEBUG" => Level::LOG_DEBUG,
            _ => Level::LOG_INFO,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Level::LOG_EMERG => "LOG_EMERG",
                Level::LOG_ALERT => "LOG_ALERT",
                Level::LOG_CRIT => "LOG_CRIT",
                Level::LOG_ERR => "LOG_ERR",
                Level::LOG_WARNING => "LOG_WARNING",
                Level::LOG_NOTICE => "LOG_NOTICE",
                Level::LOG_INFO => "LOG_INFO",
                Level::LOG_DEBUG => "LOG_DEBUG",
            }
        )
    }
}

/// Form an RFC 5424 PRI value from a facility & severity.
pub fn priority(facility: Facility, level: Level) -> u8 {
    facility as u8 | level as u8
}
