//! Server configuration.
//!
//! Loaded once from `VPANEL_*` environment variables at startup and never
//! mutated afterwards. The admin password has no default: the process
//! refuses to start without one rather than shipping with a guessable
//! credential.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Record store backend.
    pub storage: StorageKind,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// The admin password, compared verbatim at login.
    pub admin_password: String,
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Trial length granted by the self-service flow, in days.
    pub trial_days: u64,
    /// When set, unauthenticated browser requests to the raw JSON export
    /// are rejected; programmatic clients are never gated.
    pub gate_browser_raw: bool,
}

/// Supported record store backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    /// In-memory; all data is lost on restart.
    Memory,
    /// Persistent redb database file.
    Redb { path: String },
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `VPANEL_ADMIN_PASSWORD` — required, no fallback
    /// - `VPANEL_BIND_ADDR` — full bind address (default `127.0.0.1:8080`)
    /// - `PORT` — port only, binds `0.0.0.0` (overridden by `VPANEL_BIND_ADDR`)
    /// - `VPANEL_STORAGE` — `memory` or `redb` (default `memory`)
    /// - `VPANEL_STORAGE_PATH` — redb file path (default `./data/vpanel.redb`)
    /// - `VPANEL_LOG_LEVEL` — log filter (default `info`)
    /// - `VPANEL_COOKIE_NAME` — session cookie name (default `admin_session`)
    /// - `VPANEL_TRIAL_DAYS` — trial length (default `3`)
    /// - `VPANEL_GATE_BROWSER_RAW` — gate unauthenticated browser access to
    ///   `/raw` (default `false`)
    ///
    /// # Errors
    ///
    /// Fails when `VPANEL_ADMIN_PASSWORD` is unset or empty.
    pub fn from_env() -> anyhow::Result<Self> {
        let admin_password = std::env::var("VPANEL_ADMIN_PASSWORD")
            .ok()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("VPANEL_ADMIN_PASSWORD must be set; refusing to start without an admin password")
            })?;

        let bind_addr = if let Ok(addr) = std::env::var("VPANEL_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)))
        } else if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port.parse().unwrap_or(8080);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8080))
        };

        let storage_path = std::env::var("VPANEL_STORAGE_PATH")
            .unwrap_or_else(|_| "./data/vpanel.redb".to_owned());

        let storage = match std::env::var("VPANEL_STORAGE")
            .unwrap_or_else(|_| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "redb" => StorageKind::Redb { path: storage_path },
            _ => StorageKind::Memory,
        };

        let log_level =
            std::env::var("VPANEL_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let cookie_name =
            std::env::var("VPANEL_COOKIE_NAME").unwrap_or_else(|_| "admin_session".to_owned());

        let trial_days = std::env::var("VPANEL_TRIAL_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let gate_browser_raw = std::env::var("VPANEL_GATE_BROWSER_RAW")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            storage,
            log_level,
            admin_password,
            cookie_name,
            trial_days,
            gate_browser_raw,
        })
    }
}
