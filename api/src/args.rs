use std::time::Duration;

use clap::{Args as ClapArgs, Parser};
use foodlens_core::domain::common::{DEFAULT_GEMINI_BASE_URL, FoodlensConfig, LLMConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "foodlens-api", version, about = "Food recognition relay")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub rate_limit: RateLimitArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ServerArgs {
    #[arg(long = "host", env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "port", env = "PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long = "root-path", env = "ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Bearer token required on /recognize. Leave unset to disable auth.
    #[arg(long = "api-token", env = "API_TOKEN")]
    pub api_token: Option<String>,

    #[arg(long = "max-upload-bytes", env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", default_value = "")]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = "gemini-2.0-flash")]
    pub gemini_model: String,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long = "upstream-timeout-ms", env = "UPSTREAM_TIMEOUT_MS", default_value_t = 20_000)]
    pub upstream_timeout_ms: u64,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RateLimitArgs {
    #[arg(long = "rate-limit-per-minute", env = "RATE_LIMIT_PER_MINUTE", default_value_t = 30)]
    pub per_minute: u32,

    #[arg(long = "rate-limit-burst", env = "RATE_LIMIT_BURST", default_value_t = 10)]
    pub burst: u32,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "RUST_LOG", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            server: ServerArgs {
                host: "0.0.0.0".to_string(),
                port: 3333,
                root_path: String::new(),
                allowed_origins: vec!["http://localhost:5173".to_string()],
                api_token: None,
                max_upload_bytes: 10 * 1024 * 1024,
            },
            llm: LlmArgs {
                gemini_api_key: String::new(),
                gemini_model: "gemini-2.0-flash".to_string(),
                gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
                upstream_timeout_ms: 20_000,
            },
            rate_limit: RateLimitArgs {
                per_minute: 30,
                burst: 10,
            },
            log: LogArgs {
                filter: "info".to_string(),
                json: false,
            },
        }
    }
}

impl From<Args> for FoodlensConfig {
    fn from(args: Args) -> Self {
        Self {
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
                gemini_base_url: args.llm.gemini_base_url,
                upstream_timeout: Duration::from_millis(args.llm.upstream_timeout_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["foodlens-api"]).unwrap();
        assert_eq!(args.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(args.rate_limit.per_minute, 30);
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "foodlens-api",
            "--allowed-origins",
            "https://a.example,https://b.example",
            "--api-token",
            "s3cret",
            "--upstream-timeout-ms",
            "1500",
        ])
        .unwrap();

        assert_eq!(
            args.server.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(args.server.api_token.as_deref(), Some("s3cret"));

        let config = FoodlensConfig::from(args);
        assert_eq!(config.llm.upstream_timeout, Duration::from_millis(1500));
    }
}
