//! Server configuration read from the process environment.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Everything the binary needs before it can serve.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Holds `world.toml` and `layout.ron`.
    pub data_dir: PathBuf,
    pub accounts_path: PathBuf,
    pub log_dir: PathBuf,
    pub command_buffer: usize,
    pub world_seed: Option<u64>,
    /// Variables that were set but could not be parsed. Logged once logging is up.
    pub warnings: Vec<String>,
}

impl ServerConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3000";
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const ACCOUNTS_FILE: &'static str = "accounts.json";
    pub const DEFAULT_COMMAND_BUFFER: usize = 256;

    /// Construct configuration from process environment variables.
    ///
    /// - `BIND_ADDR`
    /// - `DATA_DIR` / `ACCOUNTS_PATH`
    /// - `LOG_DIR`
    /// - `COMMAND_BUFFER`
    /// - `WORLD_SEED`
    pub fn from_env() -> Self {
        let mut warnings = Vec::new();

        let bind_addr = read_env::<SocketAddr>("BIND_ADDR", &mut warnings)
            .unwrap_or_else(default_bind_addr);
        let data_dir = env::var_os("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR));
        let accounts_path = env::var_os("ACCOUNTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(Self::ACCOUNTS_FILE));
        let log_dir = env::var_os("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);
        let command_buffer = read_env::<usize>("COMMAND_BUFFER", &mut warnings)
            .map(|capacity| capacity.max(1))
            .unwrap_or(Self::DEFAULT_COMMAND_BUFFER);
        let world_seed = read_env::<u64>("WORLD_SEED", &mut warnings);

        Self {
            bind_addr,
            data_dir,
            accounts_path,
            log_dir,
            command_buffer,
            world_seed,
            warnings,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

/// Platform cache directory, e.g. `~/.cache/orbfield/logs` on Linux.
fn default_log_dir() -> PathBuf {
    ProjectDirs::from("", "", "orbfield")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn read_env<T>(key: &str, warnings: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warnings.push(format!("ignoring unparsable {key}={raw:?}, using default"));
            None
        }
    }
}
