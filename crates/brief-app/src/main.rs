mod app;
mod brief;
mod cli;
mod render;

use std::process::ExitCode;

use brief_config::{BriefConfig, LogLevel};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Load environment variables from `.env.local` and `.env` (KEY=VALUE lines).
///
/// Variables already set in the environment win, and `.env.local` wins
/// over `.env`.
fn load_dotenv() {
    for path in [".env.local", ".env"] {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

/// `--log-level` accepts a bare level (`debug`) or a full filter directive.
fn log_directive(arg: Option<&str>, configured: LogLevel) -> Directive {
    let fallback = || configured.directive().parse().ok();
    arg.and_then(|arg| match LogLevel::parse(arg) {
        Some(level) => level.directive().parse().ok(),
        None => arg.parse().ok(),
    })
    .or_else(fallback)
    .unwrap_or_else(|| Directive::from(tracing::Level::INFO))
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let args = cli::parse();

    // Config first so its log level can seed the filter.
    let loaded = brief_config::load_config(args.config.as_deref());
    let configured_level = loaded
        .as_ref()
        .map(|config| config.logging.level)
        .unwrap_or_default();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_directive(args.log_level.as_deref(), configured_level)),
        )
        .init();

    tracing::info!("brief v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            tracing::error!("Config load failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            let mut config = BriefConfig::default();
            brief_config::apply_env_overrides(&mut config);
            config
        }
    };
    tracing::info!("Config loaded (server: {})", config.server.base_url);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match app::run(&args, config, &cancel).await {
        Ok(code) => {
            tracing::info!(code, "Shutdown complete");
            ExitCode::from(code)
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("brief: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_brief_crates() {
        let directive = log_directive(Some("debug"), LogLevel::Info);
        assert_eq!(directive.to_string(), "brief=debug");
    }

    #[test]
    fn full_directive_passes_through() {
        let directive = log_directive(Some("brief_stream=trace"), LogLevel::Info);
        assert_eq!(directive.to_string(), "brief_stream=trace");
    }

    #[test]
    fn configured_level_is_the_default() {
        let directive = log_directive(None, LogLevel::Warn);
        assert_eq!(directive.to_string(), "brief=warn");
    }
}
