use anyhow::Result;
use clap::Parser;
use log::error;
use meetload_core::{LoadConfigBuilder, ReqwestTransport, run_load};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    about = "Fire a bounded number of concurrent call.create requests",
    after_help = "Progress and per-request results are logged to stderr (RUST_LOG controls \
                  the level). Only the final report is written to stdout."
)]
struct Args {
    /// JSON-RPC endpoint receiving call.create
    #[arg(long, env = "MEETLOAD_RPC_URL")]
    rpc_url: String,

    #[arg(long, env = "MEETLOAD_AUTH_URL")]
    auth_url: Option<String>,

    #[arg(short, long, env = "MEETLOAD_USERNAME")]
    username: Option<String>,

    #[arg(short, long, env = "MEETLOAD_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Pre-fetched bearer token; skips the auth endpoint
    #[arg(long, env = "MEETLOAD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Number of requests to send
    #[arg(short = 'n', long, env = "MEETLOAD_TOTAL", default_value_t = 1)]
    total: usize,

    /// Requests allowed in flight at once
    #[arg(short, long, env = "MEETLOAD_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Requested call duration in seconds
    #[arg(short, long, env = "MEETLOAD_DURATION", default_value_t = 900)]
    duration: u64,

    /// Meeting group id
    #[arg(short, long, env = "MEETLOAD_GID", default_value = "")]
    gid: String,

    /// Auth request timeout in seconds
    #[arg(long, default_value_t = 20)]
    auth_timeout: u64,

    /// Per-request timeout in seconds for call.create
    #[arg(long)]
    request_timeout: Option<u64>,

    /// Verify TLS certificates (off by default)
    #[arg(long)]
    verify_tls: bool,
}

fn build_config(args: Args) -> meetload_core::Result<meetload_core::LoadConfig> {
    let mut builder = LoadConfigBuilder::new()
        .with_rpc_url(args.rpc_url)
        .with_total(args.total)
        .with_concurrency(args.concurrency)
        .with_duration_seconds(args.duration)
        .with_meeting_group_id(args.gid)
        .with_auth_timeout(Duration::from_secs(args.auth_timeout))
        .with_request_timeout(args.request_timeout.map(Duration::from_secs))
        .with_verify_tls(args.verify_tls);

    if let Some(url) = args.auth_url {
        builder = builder.with_auth_url(url);
    }
    if let Some(username) = args.username {
        builder = builder.with_username(username);
    }
    if let Some(password) = args.password {
        builder = builder.with_password(password);
    }
    if let Some(token) = args.token {
        builder = builder.with_static_token(token);
    }
    builder.build()
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = build_config(args)?;
    let transport = Arc::new(ReqwestTransport::new(config.verify_tls)?);

    let report = run_load(&config, transport).await?;
    println!("{report}");

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        error!("{} of {} requests failed", report.failures, report.total);
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetload_core::TokenSource;

    #[test]
    fn test_args_with_static_token() {
        let args = Args::try_parse_from([
            "meetload",
            "--rpc-url",
            "https://rpc.local/api",
            "--token",
            "abc123",
            "-n",
            "10",
            "-c",
            "4",
            "--gid",
            "g1",
        ])
        .unwrap();
        let cfg = build_config(args).unwrap();
        assert_eq!(cfg.total, 10);
        assert_eq!(cfg.concurrency.get(), 4);
        assert_eq!(cfg.meeting_group_id, "g1");
        assert_eq!(cfg.token_source, TokenSource::Static("abc123".into()));
    }

    #[test]
    fn test_args_with_credentials() {
        let args = Args::try_parse_from([
            "meetload",
            "--rpc-url",
            "https://rpc.local/api",
            "--auth-url",
            "https://auth.local/token",
            "-u",
            "alice",
            "-p",
            "secret",
            "--request-timeout",
            "5",
        ])
        .unwrap();
        let cfg = build_config(args).unwrap();
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(5)));
        match cfg.token_source {
            TokenSource::Fetch(auth) => {
                assert_eq!(auth.url, "https://auth.local/token");
                assert_eq!(auth.timeout, Duration::from_secs(20));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_help_says_report_goes_to_stdout() {
        use clap::CommandFactory;
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("Only the final report is written to stdout"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let args = Args::try_parse_from([
            "meetload",
            "--rpc-url",
            "https://rpc.local/api",
            "--token",
            "abc123",
            "-c",
            "0",
        ])
        .unwrap();
        assert!(build_config(args).is_err());
    }
}
