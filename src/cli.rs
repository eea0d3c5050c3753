use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use futures::{stream, StreamExt};
use log::{info, warn};
use serde::Serialize;

use crate::config::{validate, BoardConfig, WidgetConfig};
use crate::error::JuError;
use crate::providers::http::build_client;
use crate::registry::AdapterRegistry;
use crate::render::error_fragment;

const CONCURRENCY: usize = 10;

#[derive(Parser)]
#[command(name = "ju")]
#[command(author, version, about = "CI dashboard widgets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Timeout in seconds for each request to a CI server
    #[arg(short, long, global = true, env = "JU_HTTP_TIMEOUT", default_value_t = 5)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List the widget types that can be polled
    Types,

    /// Print the configuration form fields of a widget type
    Schema {
        /// Widget type, e.g. "jenkins_job"
        widget_type: String,
    },

    /// Print the stylesheet of a widget type
    Style {
        /// Widget type, e.g. "jenkins_job"
        widget_type: String,
    },

    /// Poll one widget of a board
    Check {
        /// Board config file
        #[arg(short, long, env = "JU_BOARD")]
        board: PathBuf,

        /// Widget id (its name with spaces replaced by dashes)
        #[arg(short, long)]
        widget: String,

        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },

    /// Poll every widget of a board concurrently
    CheckBoard {
        /// Board config file
        #[arg(short, long, env = "JU_BOARD")]
        board: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Rendered HTML fragment
    Html,
    /// Normalized builds as JSON
    Json,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let client = build_client(Duration::from_secs(self.timeout))?;
        let registry = AdapterRegistry::with_builtin(&client);

        match &self.command {
            Commands::Types => self.emit(&registry.types().join("\n")),
            Commands::Schema { widget_type } => {
                let schema = registry.schema(widget_type)?;
                self.emit(&self.to_json(&schema)?)
            }
            Commands::Style { widget_type } => {
                let css = registry.resolve(widget_type)?.style()?;
                self.emit(&css)
            }
            Commands::Check {
                board,
                widget,
                format,
            } => {
                let board = BoardConfig::load(board)?;
                let widget = board.widget(widget)?;
                info!("Checking widget '{}' of board '{}'", widget.name, board.board);

                ensure_valid(&registry, &widget)?;
                let adapter = registry.resolve(&widget.widget_type)?;
                let output = match format {
                    Format::Html => adapter.check(&widget).await?,
                    Format::Json => self.to_json(&adapter.poll(&widget).await?)?,
                };
                self.emit(&output)
            }
            Commands::CheckBoard { board } => {
                let board = BoardConfig::load(board)?;
                info!(
                    "Checking {} widgets of board '{}'",
                    board.widget_count(),
                    board.board
                );

                let fragments = check_board(&registry, &board).await?;
                self.emit(&fragments.join("\n"))
            }
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    fn emit(&self, text: &str) -> Result<()> {
        if let Some(output_path) = &self.output {
            std::fs::write(output_path, text)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{text}");
        }
        Ok(())
    }
}

/// Rejects a widget whose settings fail its adapter's form validation.
fn ensure_valid(registry: &AdapterRegistry, widget: &WidgetConfig) -> crate::error::Result<()> {
    let messages = validate(&registry.schema(&widget.widget_type)?, widget)?;
    if messages.is_empty() {
        Ok(())
    } else {
        Err(JuError::Configuration(messages.join(" ")))
    }
}

/// One fragment per widget, in board order. Widgets that fail to parse,
/// validate or poll become error boxes instead of failing the board.
async fn check_board(
    registry: &AdapterRegistry,
    board: &BoardConfig,
) -> crate::error::Result<Vec<String>> {
    stream::iter(board.widgets())
        .map(|(name, widget)| async move {
            match widget {
                Ok(widget) => check_or_error_fragment(registry, &widget).await,
                Err(e) => failed_fragment(&name, &e),
            }
        })
        .buffered(CONCURRENCY)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect()
}

/// A failed widget renders as an error box so the rest of the board still shows.
async fn check_or_error_fragment(
    registry: &AdapterRegistry,
    widget: &WidgetConfig,
) -> crate::error::Result<String> {
    let checked = match ensure_valid(registry, widget) {
        Ok(()) => registry.check(widget).await,
        Err(e) => Err(e),
    };

    match checked {
        Ok(html) => Ok(html),
        Err(e) => failed_fragment(&widget.name, &e),
    }
}

fn failed_fragment(widget_name: &str, error: &JuError) -> crate::error::Result<String> {
    warn!("Widget '{widget_name}' failed: {error}");
    error_fragment(widget_name, &error.to_string())
}
