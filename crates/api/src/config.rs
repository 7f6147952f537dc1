use std::str::FromStr;

use vtrelay_core::types::DbTarget;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local VisTrails server.
/// In production, override via environment variables (or a `.env` file).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// XML-RPC server endpoint and client settings.
    pub rpc: RpcConfig,
    /// Database target used when a request does not name one.
    pub defaults: DbTarget,
}

/// Where the VisTrails XML-RPC server lives.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Full endpoint URL, e.g. `http://localhost:8080`.
    pub url: String,
    /// Timeout for a single outbound call in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `HOST`                 | `0.0.0.0`                      |
    /// | `PORT`                 | `3000`                         |
    /// | `CORS_ORIGINS`         | `http://localhost`             |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                           |
    /// | `VT_HOST`              | `localhost`                    |
    /// | `VT_PORT`              | `8080`                         |
    /// | `VT_RPC_URL`           | `http://{VT_HOST}:{VT_PORT}`   |
    /// | `RPC_TIMEOUT_SECS`     | `30`                           |
    /// | `DB_HOST`              | `vistrails.org`                |
    /// | `DB_PORT`              | `3306`                         |
    /// | `DB_NAME`              | `vistrails`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_env("PORT", "3000");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30");

        let rpc_url = std::env::var("VT_RPC_URL").unwrap_or_else(|_| {
            let vt_host = std::env::var("VT_HOST").unwrap_or_else(|_| "localhost".into());
            let vt_port: u16 = parse_env("VT_PORT", "8080");
            format!("http://{vt_host}:{vt_port}")
        });

        let rpc = RpcConfig {
            url: rpc_url,
            timeout_secs: parse_env("RPC_TIMEOUT_SECS", "30"),
        };

        let defaults = DbTarget {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "vistrails.org".into()),
            port: parse_env("DB_PORT", "3306"),
            db: std::env::var("DB_NAME").unwrap_or_else(|_| "vistrails".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            rpc,
            defaults,
        }
    }
}

/// Read and parse a numeric env var, panicking on an invalid value so
/// misconfiguration fails at startup.
fn parse_env<T: FromStr>(key: &str, default: &str) -> T {
    std::env::var(key)
        .unwrap_or_else(|_| default.into())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid {}", std::any::type_name::<T>()))
}
