//! One CLI invocation: overrides -> brief -> client -> rendered session.

use std::io::{self, Write};
use std::time::Duration;

use brief_common::BriefError;
use brief_config::BriefConfig;
use brief_stream::{
    ClientConfig, GenerationBackend, GenerationClient, PipelineOptions, SessionController,
    SessionState, SessionStatus, StreamError,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::brief::DesignBrief;
use crate::cli::Args;
use crate::render::Renderer;

/// Exit status for an interrupted run.
pub const EXIT_CANCELLED: u8 = 130;

/// Fold command-line overrides into the loaded config.
pub fn apply_cli_overrides(config: &mut BriefConfig, args: &Args) {
    if let Some(ref server) = args.server {
        config.server.base_url = server.clone();
    }
    if let Some(ref marker) = args.marker {
        config.stream.marker = marker.clone();
    }
}

pub fn client_config(config: &BriefConfig) -> ClientConfig {
    let request_timeout = match config.server.request_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs.into())),
    };
    ClientConfig::new(&config.server.base_url)
        .with_stream_url(config.server.stream_url())
        .with_sync_url(config.server.sync_url())
        .with_connect_timeout(Duration::from_secs(config.server.connect_timeout_secs.into()))
        .with_request_timeout(request_timeout)
}

pub fn pipeline_options(config: &BriefConfig) -> PipelineOptions {
    PipelineOptions::default()
        .with_marker(config.stream.marker.clone())
        .with_sse_event_fallback(config.stream.sse_event_fallback)
}

/// The brief file named on the command line, or the sample brief.
pub fn load_brief(args: &Args) -> Result<DesignBrief, BriefError> {
    let mut brief = match args.brief {
        Some(ref path) => {
            let brief = DesignBrief::load(path)?;
            info!("Loaded brief from {}", path.display());
            brief
        }
        None => {
            info!("No brief file given, using the sample brief");
            DesignBrief::default()
        }
    };
    if let Some(ref out_dir) = args.out_dir {
        brief.out_dir = out_dir.clone();
    }
    Ok(brief)
}

pub fn exit_code(status: SessionStatus, cancelled: bool) -> u8 {
    match status {
        SessionStatus::Completed => 0,
        _ if cancelled => EXIT_CANCELLED,
        _ => 1,
    }
}

/// Run the whole invocation and return the process exit code.
pub async fn run(
    args: &Args,
    mut config: BriefConfig,
    cancel: &CancellationToken,
) -> Result<u8, BriefError> {
    apply_cli_overrides(&mut config, args);
    brief_config::validation::validate(&config)?;

    let payload = load_brief(args)?.to_payload()?;
    let client =
        GenerationClient::new(client_config(&config)).map_err(|e| BriefError::Stream(e.to_string()))?;

    if args.sync {
        return run_sync(&client, &payload, cancel).await;
    }

    info!(url = %client.config().stream_url, "Starting generation");
    let mut renderer = Renderer::new(io::stdout(), args.timestamps);
    let status = stream_session(
        &client,
        pipeline_options(&config),
        &payload,
        cancel,
        &mut renderer,
    )
    .await;
    Ok(exit_code(status, cancel.is_cancelled()))
}

async fn run_sync(
    client: &GenerationClient,
    payload: &serde_json::Value,
    cancel: &CancellationToken,
) -> Result<u8, BriefError> {
    info!(url = %client.config().sync_url, "Starting synchronous generation");
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StreamError::Cancelled),
        result = client.generate(payload) => result,
    };

    match result {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value)
                .map_err(|e| BriefError::Other(e.to_string()))?;
            let mut out = io::stdout().lock();
            writeln!(out, "{pretty}")?;
            Ok(0)
        }
        Err(StreamError::Cancelled) => {
            info!("Generation cancelled");
            Ok(EXIT_CANCELLED)
        }
        Err(e) => Err(BriefError::Stream(e.to_string())),
    }
}

/// Submit `payload` and render every committed snapshot until the session settles.
pub async fn stream_session<W: Write>(
    backend: &dyn GenerationBackend,
    options: PipelineOptions,
    payload: &serde_json::Value,
    cancel: &CancellationToken,
    renderer: &mut Renderer<W>,
) -> SessionStatus {
    let mut controller = SessionController::new(options);
    let rx = controller.subscribe();

    let (status, rendered) = tokio::join!(
        controller.submit(backend, payload, cancel),
        follow(rx, renderer),
    );
    if let Err(e) = rendered {
        warn!("Rendering stopped: {e}");
    }
    status
}

async fn follow<W: Write>(
    mut rx: watch::Receiver<SessionState>,
    renderer: &mut Renderer<W>,
) -> io::Result<()> {
    loop {
        let settled = {
            let state = rx.borrow_and_update();
            renderer.render_new(&state)?;
            if state.status.is_terminal() {
                renderer.summary(&state)?;
                true
            } else {
                false
            }
        };
        if settled || rx.changed().await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[test]
    fn cli_overrides_replace_config_values() {
        let args = Args::try_parse_from(["brief", "--server", "https://gen.example", "--marker", "EVT "])
            .unwrap();
        let mut config = BriefConfig::default();
        apply_cli_overrides(&mut config, &args);
        assert_eq!(config.server.base_url, "https://gen.example");
        assert_eq!(config.stream.marker, "EVT ");
        assert_eq!(
            client_config(&config).stream_url,
            "https://gen.example/api/design/stream"
        );
    }

    #[test]
    fn zero_request_timeout_means_unbounded() {
        let mut config = BriefConfig::default();
        assert_eq!(client_config(&config).request_timeout, None);
        config.server.request_timeout_secs = 600;
        assert_eq!(
            client_config(&config).request_timeout,
            Some(Duration::from_secs(600))
        );
        assert_eq!(
            client_config(&config).connect_timeout,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn pipeline_options_follow_stream_section() {
        let mut config = BriefConfig::default();
        config.stream.marker = "EVT ".into();
        config.stream.sse_event_fallback = false;
        let options = pipeline_options(&config);
        assert_eq!(options.marker, "EVT ");
        assert!(!options.sse_event_fallback);
    }

    #[test]
    fn out_dir_flag_overrides_brief_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.json");
        fs::write(
            &path,
            r#"{"purpose":"p","audience":"a","tone":"t","subject":"s","out_dir":"from-file"}"#,
        )
        .unwrap();

        let path_arg = path.to_str().unwrap();
        let args = Args::try_parse_from(["brief", path_arg]).unwrap();
        assert_eq!(load_brief(&args).unwrap().out_dir, "from-file");

        let args = Args::try_parse_from(["brief", path_arg, "--out-dir", "elsewhere"]).unwrap();
        assert_eq!(load_brief(&args).unwrap().out_dir, "elsewhere");
    }

    #[test]
    fn sample_brief_when_no_file() {
        let args = Args::default();
        assert_eq!(load_brief(&args).unwrap(), DesignBrief::default());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(SessionStatus::Completed, false), 0);
        assert_eq!(exit_code(SessionStatus::Failed, false), 1);
        assert_eq!(exit_code(SessionStatus::Failed, true), EXIT_CANCELLED);
        assert_eq!(exit_code(SessionStatus::Completed, true), 0);
    }

    #[tokio::test]
    async fn invalid_server_override_is_rejected() {
        let args = Args::try_parse_from(["brief", "--server", "gen.example"]).unwrap();
        let err = run(&args, BriefConfig::default(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[tokio::test]
    async fn unreachable_service_fails_with_error_event() {
        let mut config = BriefConfig::default();
        config.server.base_url = "http://127.0.0.1:1".into();
        config.server.connect_timeout_secs = 2;
        let client = GenerationClient::new(client_config(&config)).unwrap();

        let mut renderer = Renderer::new(Vec::new(), false);
        let status = stream_session(
            &client,
            pipeline_options(&config),
            &DesignBrief::default().to_payload().unwrap(),
            &CancellationToken::new(),
            &mut renderer,
        )
        .await;
        assert_eq!(status, SessionStatus::Failed);
    }
}
