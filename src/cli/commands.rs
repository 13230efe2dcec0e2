//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Donor dashboard CLI
#[derive(Parser, Debug)]
#[command(name = "donor-dashboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dashboard configuration file (YAML); built-in screens when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend API root, overrides the config file
    #[arg(long, global = true, env = "DASHBOARD_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token, overrides the config file
    #[arg(long, global = true, env = "DASHBOARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the configured screens
    Screens,

    /// Fetch a screen, filter it and print one page
    Show {
        /// Screen name, e.g. "donors"
        screen: String,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Exact filter as field=value (repeatable)
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Page to print (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Validate the configuration
    Validate,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per command)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse `field=value`; the value may be empty to clear a filter
pub(crate) fn parse_filter(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected field=value, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from([
            "donor-dashboard",
            "show",
            "donors",
            "--search",
            "john",
            "--filter",
            "status=CONFIRMED",
            "--page",
            "2",
            "--format",
            "pretty",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Show {
                screen,
                search,
                filters,
                page,
                page_size,
            } => {
                assert_eq!(screen, "donors");
                assert_eq!(search.as_deref(), Some("john"));
                assert_eq!(filters, vec![("status".to_string(), "CONFIRMED".to_string())]);
                assert_eq!(page, 2);
                assert_eq!(page_size, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("role=ADMIN").unwrap(),
            ("role".to_string(), "ADMIN".to_string())
        );
        assert_eq!(
            parse_filter("role=").unwrap(),
            ("role".to_string(), String::new())
        );
        assert!(parse_filter("role").is_err());
        assert!(parse_filter("=ADMIN").is_err());
    }
}
