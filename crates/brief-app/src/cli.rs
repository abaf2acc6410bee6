use std::path::PathBuf;

use clap::Parser;

/// brief: submit a UI design brief and watch the generation stream in.
#[derive(Parser, Debug, Default)]
#[command(name = "brief", version, about)]
pub struct Args {
    /// Brief file (.toml, .json, .yaml). Uses the built-in sample brief when omitted.
    pub brief: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generation service base URL, e.g. http://localhost:8000.
    #[arg(long)]
    pub server: Option<String>,

    /// Output directory requested from the service.
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Line prefix that marks an event payload.
    #[arg(long)]
    pub marker: Option<String>,

    /// Use the synchronous endpoint and print the whole result at once.
    #[arg(long)]
    pub sync: bool,

    /// Prefix labelled event lines with the local time.
    #[arg(long)]
    pub timestamps: bool,

    /// Log level or filter directive (debug, info, brief_stream=trace, ...).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_brief_and_flags() {
        let args = Args::try_parse_from([
            "brief",
            "copilot.toml",
            "--server",
            "http://gen.local:9000",
            "--marker",
            "EVT ",
            "--sync",
        ])
        .unwrap();
        assert_eq!(args.brief, Some(PathBuf::from("copilot.toml")));
        assert_eq!(args.server.as_deref(), Some("http://gen.local:9000"));
        assert_eq!(args.marker.as_deref(), Some("EVT "));
        assert!(args.sync);
        assert!(!args.timestamps);
    }

    #[test]
    fn everything_is_optional() {
        let args = Args::try_parse_from(["brief"]).unwrap();
        assert!(args.brief.is_none());
        assert!(args.config.is_none());
        assert!(!args.sync);
    }
}
