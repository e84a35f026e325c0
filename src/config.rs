use std::str::FromStr;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub const DEFAULT_SERVER_SOFTWARE: &str = "WSGIServer 0.2";
pub const DEFAULT_READ_BUFFER: usize = 1024;
pub const DEFAULT_MAX_WORKERS: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Value of the `Server` header injected into every response.
    pub server_software: String,
    /// Size of the single bounded read taken from each connection.
    pub read_buffer: usize,
    /// Live worker units allowed before new connections are turned away.
    pub max_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN.to_string(),
            server_software: DEFAULT_SERVER_SOFTWARE.to_string(),
            read_buffer: DEFAULT_READ_BUFFER,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            listen_addr: lookup("LISTEN").unwrap_or(defaults.listen_addr),
            server_software: lookup("SERVER_SOFTWARE").unwrap_or(defaults.server_software),
            read_buffer: positive(&lookup, "READ_BUFFER", defaults.read_buffer),
            max_workers: positive(&lookup, "MAX_WORKERS", defaults.max_workers),
        }
    }
}

fn positive<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match usize::from_str(raw.trim()) {
        Ok(n) if n > 0 => n,
        _ => {
            tracing::warn!(key, value = %raw, default, "Ignoring invalid setting");
            default
        }
    }
}
