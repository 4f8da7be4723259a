use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use spc_oxide::config::ChartConfig;
use spc_oxide::data::DataSource;
use spc_oxide::spc::load_limits;
use spc_oxide::summary::{SummaryRequest, summarize};
use spc_oxide::{ChartError, Result};

#[derive(Parser)]
#[command(name = "spc-oxide", version, about = "SPC chart geometry and statistics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print box-plot statistics and axis domains for a measurement file as JSON
    Summary {
        /// CSV or Parquet file with an `entity` column
        file: PathBuf,

        /// Column to group box plots by
        #[arg(long, default_value = "entity")]
        group: String,

        /// Numeric column to chart
        #[arg(long)]
        value: String,

        /// JSON file of control-limit records
        #[arg(long)]
        limits: Option<PathBuf>,

        /// Chart name used to pick control limits (defaults to the value column)
        #[arg(long)]
        chart: Option<String>,

        /// Chart config file (defaults to ./spc-oxide.json when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Convert a CSV measurement file to Parquet
    Convert { input: PathBuf, output: PathBuf },

    /// Write the default chart config to a file
    InitConfig {
        #[arg(default_value = "spc-oxide.json")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = start_puffin_server();

    let cli = Cli::parse();
    let result = run(cli.command);
    profiling::finish_frame!();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "{}", e.title());
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Summary {
            file,
            group,
            value,
            limits,
            chart,
            config,
            pretty,
        } => {
            let config = ChartConfig::load_or_default(config.as_deref())?;
            let source = DataSource::load(&file)?;
            if !source.has_column(&value) {
                tracing::error!(available = ?source.column_names(), "value column missing");
                return Err(ChartError::ColumnNotFound { column: value });
            }
            let records = source.records()?;
            let limit_records = match limits {
                Some(path) => load_limits(&path)?,
                None => Vec::new(),
            };

            let request = SummaryRequest {
                group: &group,
                value: &value,
                chart: chart.as_deref(),
            };
            let summary = summarize(&records, &limit_records, &request, &config)?;
            let json = if pretty {
                serde_json::to_string_pretty(&summary)?
            } else {
                serde_json::to_string(&summary)?
            };
            println!("{}", json);
        }
        Command::Convert { input, output } => {
            let source = DataSource::load(&input)?;
            source.write_parquet(&output)?;
            tracing::info!(rows = source.height(), columns = source.width(), output = %output.display(), "wrote parquet");
        }
        Command::InitConfig { path } => {
            ChartConfig::default().save(&path)?;
            tracing::info!(path = %path.display(), "wrote default config");
        }
    }
    Ok(())
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() -> Option<puffin_http::Server> {
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            puffin::set_scopes_on(true);
            tracing::info!(%addr, "puffin server listening");
            Some(server)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not start puffin server");
            None
        }
    }
}
