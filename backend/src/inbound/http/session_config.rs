//! Session cookie settings derived from [`AppSettings`].
//!
//! The key is shared with the outer auth layer that signs callers in, so
//! release builds refuse to run without a readable key of adequate length.

use std::path::PathBuf;

use actix_web::cookie::Key;
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this length.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a generated key with a warning.
    Debug,
    /// Release builds require a real key.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_allow_ephemeral must be false in release builds")]
    EphemeralNotAllowed,
}

/// Resolve the session key and cookie flags.
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if settings.session_allow_ephemeral() && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    if !settings.cookie_secure() {
        warn!("session cookies are not marked Secure");
    }
    let key = session_key(
        settings.session_key_file(),
        mode,
        settings.session_allow_ephemeral(),
    )?;
    Ok(SessionSettings {
        key,
        cookie_secure: settings.cookie_secure(),
    })
}

fn session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = match mode {
                BuildMode::Release => SESSION_KEY_MIN_LEN,
                BuildMode::Debug => SESSION_KEY_DERIVE_MIN_LEN,
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}
