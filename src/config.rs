use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::session::SESSION_DURATION;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DATABASE_DIR: &str = "database";
const SESSIONS_FILE: &str = "sessions.json";

/// Settings of the `website` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Directory that holds the session snapshot
    pub data_dir: PathBuf,

    /// Lifetime of an idle session
    pub session_duration: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DATABASE_DIR),
            session_duration: Duration::from_secs(SESSION_DURATION),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from positional arguments `[host] [port]`
    /// followed by the `NAVSTACK_*` environment variables.
    ///
    /// Values that cannot be parsed keep their defaults.
    pub fn load(args: &[String]) -> Self {
        let mut config = Self::from_args(args);
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    pub fn from_args(args: &[String]) -> Self {
        let mut config = ServerConfig::default();

        // args[0] is the program name
        if let Some(host) = args.get(1) {
            config.host = host.clone();
        }
        if let Some(port) = args.get(2) {
            config.port = port.parse().unwrap_or(DEFAULT_PORT);
        }

        config
    }

    /// Apply `NAVSTACK_HOST`, `NAVSTACK_PORT`, `NAVSTACK_DATA_DIR` and
    /// `NAVSTACK_SESSION_SECS` looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("NAVSTACK_HOST").filter(|h| !h.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("NAVSTACK_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(dir) = lookup("NAVSTACK_DATA_DIR").filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("NAVSTACK_SESSION_SECS").and_then(|s| s.parse::<u64>().ok()) {
            if secs > 0 {
                self.session_duration = Duration::from_secs(secs);
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn sessions_file(&self) -> PathBuf {
        self.data_dir.join(SESSIONS_FILE)
    }
}
