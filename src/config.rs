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

//! [awx-syslog](crate) configuration.
//!
//! Settings are layered, each layer overriding the one before:
//!
//! 1. built-in defaults
//! 2. a TOML file
//! 3. `AWX_SYSLOG_*` environment variables
//! 4. command-line flags (represented here as [`Overrides`])
//!
//! The file is the one named on the command line, else the one named by `AWX_SYSLOG_CONFIG`,
//! else the first of `/etc/awx-syslog/config.toml`, `$HOME/.awx-syslog/config.toml` &
//! `./config.toml` that exists. It is not an error for there to be none, but it is an error for
//! the chosen file to be unreadable or malformed.
//!
//! Earlier deployments kept a `config.yaml` in those same directories. It is never read: convert
//! it to TOML (the keys are unchanged) & rename it. [`legacy_files`] finds any left behind so that
//! the caller can say so.
//!
//! ```toml
//! listen_addr = "0.0.0.0:8080"
//! log_level = "info"
//! hostname_field = "awx-bridge.example.com"
//!
//! [syslog]
//! server_addr = "collector.example.com:6514"
//! protocol = "tls"
//! ```

use backtrace::Backtrace;
use serde::Deserialize;

use std::path::{Path, PathBuf};

/// Names the config file, overriding the search path
pub const CONFIG_ENV: &str = "AWX_SYSLOG_CONFIG";

const ENV_PREFIX: &str = "AWX_SYSLOG_";

#[non_exhaustive]
pub enum Error {
    /// Failed to read the config file
    Io {
        path: PathBuf,
        source: std::io::Error,
        back: Backtrace,
    },
    /// The config file is not valid TOML, or has keys we don't recognize
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
        back: Backtrace,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io { path, source, .. } => {
                write!(f, "Failed to read config file {}: {}", path.display(), source)
            }
            Error::Parse {
                path: Some(path),
                source,
                ..
            } => write!(f, "Failed to parse config file {}: {}", path.display(), source),
            Error::Parse {
                path: None, source, ..
            } => write!(f, "Failed to parse config: {}", source),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io { back, .. } => write!(f, "{}\n{:?}", self, back),
            Error::Parse { back, .. } => write!(f, "{}\n{:?}", self, back),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Parse { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Where & how to reach the syslog collector
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyslogConfig {
    /// "host:port"
    pub server_addr: String,
    /// One of "tcp", "udp" or "tls"; checked when a message is forwarded, not here
    pub protocol: String,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        SyslogConfig {
            server_addr: String::from("localhost:514"),
            protocol: String::from("udp"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address on which to accept HTTP
    pub listen_addr: String,
    /// debug, info, warn, error or critical
    pub log_level: String,
    /// HOSTNAME to write into each message; discovered when empty
    pub hostname_field: String,
    pub syslog: SyslogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: String::from("0.0.0.0:8080"),
            log_level: String::from("info"),
            hostname_field: String::new(),
            syslog: SyslogConfig::default(),
        }
    }
}

/// Settings given on the command line; `None` leaves the lower layers' value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub listen_addr: Option<String>,
    pub log_level: Option<String>,
    pub hostname_field: Option<String>,
    pub server_addr: Option<String>,
    pub protocol: Option<String>,
}

fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("/etc/awx-syslog")];
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".awx-syslog"));
    }
    dirs.push(PathBuf::from("."));
    dirs
}

/// Config files to try, in order, absent an explicit choice.
pub fn search_path() -> Vec<PathBuf> {
    search_dirs()
        .into_iter()
        .map(|dir| dir.join("config.toml"))
        .collect()
}

/// Any `config.yaml` files in the search directories; these are no longer read.
pub fn legacy_files() -> Vec<PathBuf> {
    search_dirs()
        .into_iter()
        .map(|dir| dir.join("config.yaml"))
        .filter(|path| path.is_file())
        .collect()
}

/// An environment variable, treating "set but empty" as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|err| Error::Parse {
            path: None,
            source: err,
            back: Backtrace::new(),
        })
    }
    pub fn from_file(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.to_path_buf(),
            source: err,
            back: Backtrace::new(),
        })?;
        toml::from_str(&text).map_err(|err| Error::Parse {
            path: Some(path.to_path_buf()),
            source: err,
            back: Backtrace::new(),
        })
    }
    /// Overlay any `AWX_SYSLOG_*` environment variables.
    pub fn apply_env(&mut self) {
        let var = |key: &str| env_var(&format!("{}{}", ENV_PREFIX, key));
        if let Some(value) = var("LISTEN_ADDR") {
            self.listen_addr = value;
        }
        if let Some(value) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = var("HOSTNAME_FIELD") {
            self.hostname_field = value;
        }
        if let Some(value) = var("SYSLOG_SERVER_ADDR") {
            self.syslog.server_addr = value;
        }
        if let Some(value) = var("SYSLOG_PROTOCOL") {
            self.syslog.protocol = value;
        }
    }
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        let set = |field: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                field.clone_from(value);
            }
        };
        set(&mut self.listen_addr, &overrides.listen_addr);
        set(&mut self.log_level, &overrides.log_level);
        set(&mut self.hostname_field, &overrides.hostname_field);
        set(&mut self.syslog.server_addr, &overrides.server_addr);
        set(&mut self.syslog.protocol, &overrides.protocol);
    }
    /// Assemble the configuration from all four layers.
    ///
    /// Returns the configuration along with the path of the file it was read from, if any.
    pub fn load(
        explicit: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<(Config, Option<PathBuf>)> {
        let file = explicit
            .map(Path::to_path_buf)
            .or_else(|| env_var(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| search_path().into_iter().find(|path| path.is_file()));

        let mut config = match &file {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env();
        config.apply_overrides(overrides);
        Ok((config, file))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use std::io::Write;

    const ALL_ENV: [&str; 6] = [
        CONFIG_ENV,
        "AWX_SYSLOG_LISTEN_ADDR",
        "AWX_SYSLOG_LOG_LEVEL",
        "AWX_SYSLOG_HOSTNAME_FIELD",
        "AWX_SYSLOG_SYSLOG_SERVER_ADDR",
        "AWX_SYSLOG_SYSLOG_PROTOCOL",
    ];

    fn config_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.hostname_field, "");
        assert_eq!(config.syslog.server_addr, "localhost:514");
        assert_eq!(config.syslog.protocol, "udp");
    }

    #[test]
    fn partial_file() {
        let config = Config::from_toml_str(
            r#"
log_level = "debug"

[syslog]
protocol = "tcp"
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.syslog.protocol, "tcp");
        assert_eq!(config.syslog.server_addr, "localhost:514");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("listen_address = \"x\"").is_err());
        let err = Config::from_toml_str("[syslog]\nport = 514").unwrap_err();
        assert!(matches!(err, Error::Parse { path: None, .. }));
    }

    #[test]
    fn layering() {
        let file = config_file(
            r#"
listen_addr = "127.0.0.1:9000"
hostname_field = "from-file"

[syslog]
server_addr = "file.example.com:514"
protocol = "tcp"
"#,
        );
        temp_env::with_vars(
            [
                (CONFIG_ENV, None),
                ("AWX_SYSLOG_LISTEN_ADDR", None),
                ("AWX_SYSLOG_LOG_LEVEL", Some("warn")),
                ("AWX_SYSLOG_HOSTNAME_FIELD", Some("from-env")),
                ("AWX_SYSLOG_SYSLOG_SERVER_ADDR", Some("")),
                ("AWX_SYSLOG_SYSLOG_PROTOCOL", Some("tls")),
            ],
            || {
                let overrides = Overrides {
                    hostname_field: Some("from-flag".into()),
                    ..Default::default()
                };
                let (config, path) = Config::load(Some(file.path()), &overrides).unwrap();
                assert_eq!(path.as_deref(), Some(file.path()));
                // file
                assert_eq!(config.listen_addr, "127.0.0.1:9000");
                assert_eq!(config.syslog.server_addr, "file.example.com:514");
                // env over file (empty values don't count)
                assert_eq!(config.log_level, "warn");
                assert_eq!(config.syslog.protocol, "tls");
                // flags over env
                assert_eq!(config.hostname_field, "from-flag");
            },
        );
    }

    #[test]
    fn config_file_from_env() {
        let file = config_file("log_level = \"error\"\n");
        let name = file.path().to_string_lossy().into_owned();
        temp_env::with_vars(
            ALL_ENV.map(|var| {
                if var == CONFIG_ENV {
                    (var, Some(name.as_str()))
                } else {
                    (var, None)
                }
            }),
            || {
                let (config, path) = Config::load(None, &Overrides::default()).unwrap();
                assert_eq!(path.as_deref(), Some(file.path()));
                assert_eq!(config.log_level, "error");
            },
        );
    }

    #[test]
    fn explicit_file_must_load() {
        temp_env::with_vars(ALL_ENV.map(|var| (var, None::<&str>)), || {
            let err = Config::load(
                Some(Path::new("/no/such/dir/awx-syslog.toml")),
                &Overrides::default(),
            )
            .unwrap_err();
            assert!(matches!(err, Error::Io { .. }));

            let bad = config_file("listen_addr = [");
            let err = Config::load(Some(bad.path()), &Overrides::default()).unwrap_err();
            assert!(matches!(err, Error::Parse { path: Some(_), .. }));
            assert!(format!("{}", err).starts_with("Failed to parse config file"));
        });
    }

    #[test]
    fn search_path_order() {
        let paths = search_path();
        assert_eq!(paths[0], PathBuf::from("/etc/awx-syslog/config.toml"));
        assert_eq!(paths.last(), Some(&PathBuf::from("./config.toml")));
    }

    #[test]
    fn yaml_files_are_reported_not_read() {
        let home = tempfile::tempdir().unwrap();
        let dir = home.path().join(".awx-syslog");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "log_level: debug\n").unwrap();

        let mut vars: Vec<(&str, Option<&str>)> = ALL_ENV.iter().map(|var| (*var, None)).collect();
        vars.push(("HOME", home.path().to_str()));
        temp_env::with_vars(vars, || {
            assert!(legacy_files().contains(&dir.join("config.yaml")));
            let (config, path) = Config::load(None, &Overrides::default()).unwrap();
            assert_ne!(path.as_deref(), Some(dir.join("config.yaml").as_path()));
            assert_eq!(config.log_level, Config::default().log_level);
        });
    }
}
