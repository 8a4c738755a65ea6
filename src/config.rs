// src/config.rs
use clap::Parser;
use url::Url;

use crate::cloud_handler::DEFAULT_ENDPOINT;
use crate::data_types::{DisplayMode, DEFAULT_TAB_NAME};

/// Start-up options. Everything can also be changed from the window.
#[derive(Debug, Clone, Parser)]
#[command(name = "sheet_viewer", version, about)]
pub struct Config {
    /// Spreadsheet id, or the full link to the sheet
    #[arg(long, env = "SHEET_VIEWER_DOCUMENT_ID", default_value = "")]
    pub document_id: String,

    /// Tab to read
    #[arg(long, env = "SHEET_VIEWER_TAB", default_value = DEFAULT_TAB_NAME)]
    pub tab_name: String,

    #[arg(long, value_enum, default_value_t = DisplayMode::List)]
    pub mode: DisplayMode,

    /// Reload every five seconds from the start
    #[arg(long)]
    pub auto_refresh: bool,

    /// Base of the public query endpoint
    #[arg(
        long,
        env = "SHEET_VIEWER_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        value_parser = parse_endpoint
    )]
    pub endpoint: Url,

    /// Log filter, used when RUST_LOG is not set
    #[arg(long, env = "SHEET_VIEWER_LOG", default_value = "info")]
    pub log_filter: String,
}

/// The document id is appended as a path segment, so the endpoint needs a
/// hierarchical path.
fn parse_endpoint(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("{} has no path to extend", url));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    /// Parse `args` with every `SHEET_VIEWER_*` fallback switched off.
    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let matches = Config::command()
            .mut_args(|arg| arg.env(None::<&str>))
            .try_get_matches_from(args)?;
        Config::from_arg_matches(&matches)
    }

    #[test]
    fn defaults() {
        let config = parse(&["sheet_viewer"]).unwrap();
        assert_eq!(config.document_id, "");
        assert_eq!(config.tab_name, DEFAULT_TAB_NAME);
        assert_eq!(config.mode, DisplayMode::List);
        assert!(!config.auto_refresh);
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "sheet_viewer",
            "--document-id",
            "abc",
            "--tab-name",
            "Scores",
            "--mode",
            "table",
            "--auto-refresh",
            "--endpoint",
            "http://127.0.0.1:8080/d/",
        ])
        .unwrap();
        assert_eq!(config.document_id, "abc");
        assert_eq!(config.tab_name, "Scores");
        assert_eq!(config.mode, DisplayMode::Table);
        assert!(config.auto_refresh);
        assert_eq!(config.endpoint.host_str(), Some("127.0.0.1"));
    }

    #[test]
    fn malformed_endpoint_is_rejected() {
        assert!(parse(&["sheet_viewer", "--endpoint", "not a url"]).is_err());
    }

    #[test]
    fn endpoint_without_path_is_rejected() {
        let err = parse(&["sheet_viewer", "--endpoint", "mailto:sheets@example.com"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
