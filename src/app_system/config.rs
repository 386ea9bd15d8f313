use std::net::SocketAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::tracing::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(about, version, name = "order_lifecycle")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Register an admin account with this email at startup.
        #[arg(long)]
        seed_admin: Option<String>,
    },
    /// Print a signed bearer token for a user id.
    IssueToken {
        #[arg(long)]
        user_id: String,

        #[arg(long, default_value_t = 3600)]
        ttl_secs: u64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    #[arg(long, env = "ORDER_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// HS256 secret shared with the identity provider.
    #[arg(long, env = "ORDER_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "ORDER_JWT_ISSUER", default_value = "order-lifecycle")]
    pub jwt_issuer: String,

    #[arg(long, env = "ORDER_JWT_AUDIENCE", default_value = "order-lifecycle-api")]
    pub jwt_audience: String,

    /// Upper bound for a single store call.
    #[arg(long, env = "ORDER_STORE_TIMEOUT_MS", default_value_t = 10_000)]
    pub store_timeout_ms: u64,

    #[arg(long, env = "ORDER_REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    #[arg(long, env = "ORDER_CHANNEL_CAPACITY", default_value_t = 64)]
    pub channel_capacity: usize,

    #[arg(long, env = "ORDER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: "test-secret".into(),
            jwt_issuer: "order-lifecycle".into(),
            jwt_audience: "order-lifecycle-api".into(),
            store_timeout_ms: 1_000,
            request_timeout_ms: 5_000,
            channel_capacity: 16,
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_serve_with_defaults() {
        let cli = Cli::try_parse_from(["order_lifecycle", "--jwt-secret", "s3cret", "serve"]).unwrap();

        assert_eq!(cli.config.bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.config.store_timeout(), Duration::from_secs(10));
        assert_eq!(cli.config.log_format, LogFormat::Text);
        assert!(matches!(cli.command, Command::Serve { seed_admin: None }));
    }

    #[test]
    fn test_parses_issue_token() {
        let cli = Cli::try_parse_from([
            "order_lifecycle",
            "--jwt-secret",
            "s3cret",
            "--log-format",
            "json",
            "issue-token",
            "--user-id",
            "0123456789abcdef01234567",
        ])
        .unwrap();

        assert_eq!(cli.config.log_format, LogFormat::Json);
        match cli.command {
            Command::IssueToken { user_id, ttl_secs } => {
                assert_eq!(user_id, "0123456789abcdef01234567");
                assert_eq!(ttl_secs, 3600);
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }
}
