//! Command-line and environment configuration
//!
//! Every option can be given as a flag or through its `KB_*` environment
//! variable.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Document knowledge-base server speaking MCP over HTTP and stdio
#[derive(Parser, Debug, Clone)]
#[command(name = "knowledge-base-mcp")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "KB_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port of the HTTP listener
    #[arg(short, long, env = "KB_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory holding the pre-supplied quarterly reports
    #[arg(long, env = "KB_RESOURCES_DIR", default_value = "resources")]
    pub resources_dir: PathBuf,

    /// Directory receiving generated documents
    #[arg(long, env = "KB_GENERATED_DIR", default_value = "generated")]
    pub generated_dir: PathBuf,

    /// Also serve one session over stdin/stdout
    #[arg(long, env = "KB_STDIO")]
    pub stdio: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl ServerConfig {
    /// Configuration rooted at `dir`, with `resources/` and `generated/`
    /// below it. Used by tests and embedding callers.
    pub fn rooted_at(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            resources_dir: dir.join("resources"),
            generated_dir: dir.join("generated"),
            stdio: false,
            log_json: false,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::parse_from(["knowledge-base-mcp"]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.resources_dir, PathBuf::from("resources"));
        assert!(!config.stdio);
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:8000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::parse_from([
            "knowledge-base-mcp",
            "--port",
            "9100",
            "--generated-dir",
            "/tmp/out",
            "--stdio",
        ]);
        assert_eq!(config.port, 9100);
        assert_eq!(config.generated_dir, PathBuf::from("/tmp/out"));
        assert!(config.stdio);
    }
}
