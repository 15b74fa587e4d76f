//! Service configuration loaded via OrthoConfig.
//!
//! Values layer as defaults, then a configuration file, then `AID_*`
//! environment variables, then command-line flags.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host '{value}': expected an IP address")]
    InvalidBindHost { value: String },
}

/// Top-level settings for the aid coordination service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AID")]
pub struct AppSettings {
    /// Interface to listen on. Defaults to all interfaces.
    pub bind_host: Option<String>,
    /// TCP port to listen on.
    pub bind_port: Option<u16>,
    /// PostgreSQL URL. When absent the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound for pooled database connections.
    pub db_max_connections: Option<u32>,
    /// File holding the session cookie key.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file cannot be read.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark session cookies `Secure`.
    pub cookie_secure: Option<bool>,
}

impl AppSettings {
    /// Socket address assembled from `bind_host` and `bind_port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = match self.bind_host.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| SettingsError::InvalidBindHost {
                    value: raw.to_owned(),
                })?,
            None => DEFAULT_BIND_HOST,
        };
        Ok(SocketAddr::new(
            host,
            self.bind_port.unwrap_or(DEFAULT_BIND_PORT),
        ))
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Off unless explicitly enabled.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// On unless explicitly disabled.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 7] = [
        "AID_BIND_HOST",
        "AID_BIND_PORT",
        "AID_DATABASE_URL",
        "AID_DB_MAX_CONNECTIONS",
        "AID_SESSION_KEY_FILE",
        "AID_SESSION_ALLOW_EPHEMERAL",
        "AID_COOKIE_SECURE",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("ayuda")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::new(DEFAULT_BIND_HOST, DEFAULT_BIND_PORT)
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(!settings.session_allow_ephemeral());
        assert!(settings.cookie_secure());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("AID_BIND_HOST", Some("127.0.0.1".to_owned())),
            ("AID_BIND_PORT", Some("9090".to_owned())),
            (
                "AID_DATABASE_URL",
                Some("postgres://aid@localhost/ayuda".to_owned()),
            ),
            ("AID_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("AID_SESSION_KEY_FILE", Some("/tmp/aid_key".to_owned())),
            ("AID_SESSION_ALLOW_EPHEMERAL", Some("true".to_owned())),
            ("AID_COOKIE_SECURE", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://aid@localhost/ayuda")
        );
        assert_eq!(settings.db_max_connections(), 4);
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/aid_key"));
        assert!(settings.session_allow_ephemeral());
        assert!(!settings.cookie_secure());
    }

    #[rstest]
    #[case(Some("   "), None)]
    #[case(Some(" postgres://db "), Some("postgres://db"))]
    #[case(None, None)]
    fn blank_database_url_means_in_memory(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = AppSettings {
            bind_host: None,
            bind_port: None,
            database_url: raw.map(str::to_owned),
            db_max_connections: None,
            session_key_file: None,
            session_allow_ephemeral: None,
            cookie_secure: None,
        };
        assert_eq!(settings.database_url(), expected);
    }

    #[rstest]
    fn invalid_bind_host_is_reported() {
        let settings = AppSettings {
            bind_host: Some("not a host".to_owned()),
            bind_port: None,
            database_url: None,
            db_max_connections: None,
            session_key_file: None,
            session_allow_ephemeral: None,
            cookie_secure: None,
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindHost { .. })
        ));
    }
}
