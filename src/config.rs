use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::payload::{Registration, ReviewPayload};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_FULL_NAME: &str = "Tester User";
pub const DEFAULT_EMAIL: &str = "test10@example.com";
pub const DEFAULT_PASSWORD: &str = "Password123!";
pub const DEFAULT_ROLE: &str = "ADMIN";
pub const DEFAULT_PRODUCT_ID: &str = "6110e93c-7064-43c3-b9df-cd136928cccd";
pub const DEFAULT_RATING: i32 = 5;
pub const DEFAULT_TITLE: &str = "test";
pub const DEFAULT_COMMENT: &str = "test";

#[derive(Parser, Debug)]
#[command(name = "api-smoke-driver")]
#[command(about = "Registers or logs in, posts a product review and fetches notifications")]
#[command(version)]
pub struct Cli {
    #[arg(long, env = "SMOKE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    #[arg(long, env = "SMOKE_FULL_NAME", default_value = DEFAULT_FULL_NAME)]
    pub full_name: String,

    #[arg(long, env = "SMOKE_EMAIL", default_value = DEFAULT_EMAIL)]
    pub email: String,

    #[arg(long, env = "SMOKE_PASSWORD", default_value = DEFAULT_PASSWORD)]
    pub password: String,

    #[arg(long, env = "SMOKE_ROLE", default_value = DEFAULT_ROLE)]
    pub role: String,

    #[arg(long, env = "SMOKE_PRODUCT_ID", default_value = DEFAULT_PRODUCT_ID)]
    pub product_id: String,

    /// Not range-checked, so out-of-range ratings reach the server
    #[arg(long, env = "SMOKE_RATING", default_value_t = DEFAULT_RATING, allow_negative_numbers = true)]
    pub rating: i32,

    #[arg(long, env = "SMOKE_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    #[arg(long, env = "SMOKE_COMMENT", default_value = DEFAULT_COMMENT)]
    pub comment: String,

    /// Per-request timeout in seconds; waits indefinitely when unset
    #[arg(long, env = "SMOKE_TIMEOUT", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    #[arg(
        long,
        env = "SMOKE_TLS_VERIFY",
        default_value_t = false,
        help = "Verify server certificates and hostnames on https targets"
    )]
    pub tls_verify: bool,

    /// PEM file with the roots trusted when --tls-verify is set
    #[arg(long, env = "SMOKE_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// Pre-issued bearer token; skips registration and login
    #[arg(long, env = "SMOKE_TOKEN", value_parser = parse_token)]
    pub token: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn into_settings(self) -> Settings {
        Settings {
            target: Target {
                base_url: self.base_url,
                timeout: self.timeout,
                tls_verify: self.tls_verify,
                ca_cert: self.ca_cert,
            },
            registration: Registration {
                full_name: self.full_name,
                email: self.email,
                password: self.password,
                role: self.role,
            },
            product_id: self.product_id,
            review: ReviewPayload {
                rating: self.rating,
                title: self.title,
                comment: self.comment,
            },
            token: self.token,
        }
    }
}

/// Where requests go and how the connection is made.
#[derive(Debug, Clone)]
pub struct Target {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub tls_verify: bool,
    pub ca_cert: Option<PathBuf>,
}

impl Target {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            tls_verify: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub target: Target,
    pub registration: Registration,
    pub product_id: String,
    pub review: ReviewPayload,
    pub token: Option<String>,
}

impl Settings {
    /// The default scenario pointed at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            target: Target::new(base_url),
            registration: Registration {
                full_name: DEFAULT_FULL_NAME.to_string(),
                email: DEFAULT_EMAIL.to_string(),
                password: DEFAULT_PASSWORD.to_string(),
                role: DEFAULT_ROLE.to_string(),
            },
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            review: ReviewPayload {
                rating: DEFAULT_RATING,
                title: DEFAULT_TITLE.to_string(),
                comment: DEFAULT_COMMENT.to_string(),
            },
            token: None,
        }
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a whole number of seconds"))?;
    if secs == 0 {
        return Err("timeout must be at least one second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

fn parse_token(s: &str) -> Result<String, String> {
    let token = s.trim();
    if token.is_empty() {
        return Err("token must not be empty".to_string());
    }
    Ok(token.to_string())
}
