//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::{self, AppState};
use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::fetch::PagedCollectionFetcher;
use crate::http::HttpClient;
use crate::screen::{FilterChange, ListScreen, RefreshStatus};
use crate::types::{scalar_text, Record};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Screens => self.screens(),
            Commands::Show {
                screen,
                search,
                filters,
                page,
                page_size,
            } => {
                self.show(screen, search.as_deref(), filters, *page, *page_size)
                    .await
            }
            Commands::Validate => self.validate(),
            Commands::Serve { port } => self.serve(*port).await,
        }
    }

    /// Load the config file (or the built-in screens) and apply CLI overrides
    fn load_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.cli.config {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::builtin()?,
        };
        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(token) = &self.cli.token {
            config.token = Some(token.clone());
        }
        Ok(config)
    }

    fn client(config: &DashboardConfig) -> Result<HttpClient> {
        HttpClient::with_auth(config.http_client_config(), config.auth_config())
    }

    /// List screens
    fn screens(&self) -> Result<()> {
        let config = self.load_config()?;

        match self.cli.format {
            OutputFormat::Json => {
                let screens: Vec<Value> = config
                    .screens
                    .iter()
                    .map(|s| {
                        json!({
                            "name": s.name,
                            "title": s.title(),
                            "path": s.path,
                            "search_fields": s.search_fields,
                            "filters": s.filters.iter().map(|f| &f.field).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                self.output_message(&json!({ "type": "SCREENS", "screens": screens }));
            }
            OutputFormat::Pretty => {
                for s in &config.screens {
                    println!("{:<12} {:<24} {}", s.name, s.title(), s.path);
                }
            }
        }
        Ok(())
    }

    /// Fetch, filter and print one page of a screen
    async fn show(
        &self,
        name: &str,
        search: Option<&str>,
        filters: &[(String, String)],
        page: usize,
        page_size: Option<usize>,
    ) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        let mut screen = ListScreen::from_config(&config, name)?;
        if let Some(size) = page_size {
            if size == 0 {
                return Err(Error::invalid_value("page-size", "must be at least 1"));
            }
            screen = screen.with_page_size(size);
        }

        // Filters go in before the fetch so server-side ones reach the backend
        if let Some(text) = search {
            screen.set_search(text);
        }
        for (field, value) in filters {
            if screen.definition().filter(field).is_none() {
                return Err(Error::invalid_value(
                    "filter",
                    format!("screen '{name}' has no filter '{field}'"),
                ));
            }
            if screen.set_filter(field, value.as_str()) == FilterChange::Unchanged {
                warn!("Filter {}={} given twice", field, value);
            }
        }

        let fetcher = PagedCollectionFetcher::new(Self::client(&config)?);
        let start = Instant::now();
        let status = screen.refresh(&fetcher).await;
        info!(
            "Fetched {} in {:.2}s: {:?}",
            name,
            start.elapsed().as_secs_f64(),
            status
        );
        if let RefreshStatus::Partial { message, .. } = &status {
            warn!("Showing partial data for {}: {}", name, message);
        }

        let shown = screen.set_page(page);
        if shown != page {
            warn!("Page {} out of range, showing page {}", page, shown);
        }

        match self.cli.format {
            OutputFormat::Json => {
                let snapshot = serde_json::to_value(screen.snapshot())?;
                self.output_message(&snapshot);
            }
            OutputFormat::Pretty => print_pretty(&screen),
        }
        Ok(())
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Configuration for {} is valid with {} screens",
                    config.base_url,
                    config.screens.len()
                )
            }
        }));
        Ok(())
    }

    /// Start the HTTP server
    async fn serve(&self, port: u16) -> Result<()> {
        let config = self.load_config()?;
        config.validate()?;

        let client = Self::client(&config)?;
        let state = AppState::new(&config, Arc::new(client))?;
        server::serve(state, port).await
    }

    /// Output a message in the configured format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Print the visible page as a plain table
fn print_pretty(screen: &ListScreen) {
    let definition = screen.definition();
    let view = screen.view();

    println!("{}", definition.title());
    if !screen.filters().is_empty() {
        let mut active: Vec<String> = screen
            .filters()
            .active_filters()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        if !screen.filters().search_text.is_empty() {
            active.insert(0, format!("search={}", screen.filters().search_text));
        }
        println!("Filters: {}", active.join(", "));
    }
    println!();

    let mut columns: Vec<&str> = vec!["id"];
    let fields = definition
        .search_fields
        .iter()
        .chain(definition.filters.iter().map(|f| &f.field));
    for field in fields {
        if !columns.contains(&field.as_str()) {
            columns.push(field.as_str());
        }
    }

    if view.is_empty() {
        println!("No {} found.", definition.item_label());
    }
    for record in view.items {
        println!("{}", row(record, &columns));
    }

    println!();
    println!(
        "{}  (page {} of {})",
        view.describe(definition.item_label()),
        view.current_page,
        view.total_pages
    );
    if let Some(error) = screen.last_error() {
        println!("Warning: {error}");
    }
}

fn row(record: &Record, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| {
            record
                .get(*c)
                .and_then(scalar_text)
                .map_or_else(|| "-".to_string(), |v| v.into_owned())
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
