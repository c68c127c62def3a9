//! legistar-cli: query the Legistar legislative-records service

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use config::Settings;
use legistar::{Legistar, SearchCriteria};
use output::{OutputFormat, format_pairs, format_rows, to_rows};

#[derive(Parser)]
#[command(name = "legistar-cli", version, about = "Query the Legistar legislative-records service")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.config/legistar/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Government GUID to query
    #[arg(short, long, global = true)]
    government: Option<String>,

    /// SOAP endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// WSDL URL or file path ("none" to skip loading the schema)
    #[arg(long, global = true)]
    wsdl: Option<String>,

    #[arg(short, long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List governments available to the credential
    Governments,
    /// List legislative bodies
    Bodies {
        /// Only bodies that hold meetings
        #[arg(long)]
        meeting: bool,
    },
    /// Search meetings
    Meetings {
        /// Free-text query
        #[arg(short, long)]
        search: Option<String>,
        /// Only meetings of this body (GUID)
        #[arg(long)]
        body: Option<String>,
    },
    /// Agenda items of a meeting
    Agenda {
        /// Meeting GUID
        meeting: String,
        /// Include votes
        #[arg(long)]
        votes: bool,
    },
    /// Search items
    Items {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List action types
    Actions,
    /// List vote types
    VoteTypes,
    /// Years that have meetings
    Years,
    /// Service and partner information
    Info,
    /// Show effective settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(government) = &cli.government {
        settings.government = Some(government.clone());
    }
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = Some(endpoint.clone());
    }
    if let Some(wsdl) = &cli.wsdl {
        settings.wsdl = Some(wsdl.clone());
    }

    run(cli.command, cli.format, &settings)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn connect(settings: &Settings) -> Result<Legistar> {
    let api_key = settings.require_api_key()?;
    let client = Legistar::connect(api_key, settings.transport_config());
    match &settings.government {
        Some(government) => client
            .with_tenant(government)
            .context("Invalid government GUID"),
        None => Ok(client),
    }
}

fn run(command: Commands, format: OutputFormat, settings: &Settings) -> Result<()> {
    let client = || connect(settings);

    let output = match command {
        Commands::Config => settings.to_masked_toml()?,
        Commands::Governments => {
            let governments = client()?.governments().context("Failed to list governments")?;
            format_rows(&to_rows(&governments)?, &["guid", "name"], format)?
        }
        Commands::Bodies { meeting } => {
            let client = client()?;
            let bodies = if meeting {
                client.bodies_that_meet()
            } else {
                client.bodies()
            }
            .context("Failed to list bodies")?;
            format_rows(&to_rows(&bodies)?, &["id", "guid", "name"], format)?
        }
        Commands::Meetings { search, body } => {
            let mut criteria = SearchCriteria::new().text(search.unwrap_or_default());
            if let Some(body) = body {
                criteria = criteria.with("BodyGUID", body);
            }
            let meetings = client()?
                .meetings(&criteria)
                .context("Failed to search meetings")?;
            format_rows(
                &to_rows(&meetings)?,
                &["guid", "date", "time", "body_name", "location"],
                format,
            )?
        }
        Commands::Agenda { meeting, votes } => {
            let meeting = client()?
                .meeting(&meeting)
                .context("Failed to fetch meeting")?
                .ok_or_else(|| anyhow::anyhow!("Meeting not found: {}", meeting))?;
            let items = if votes {
                meeting.items_with_votes(false)
            } else {
                meeting.items()
            }
            .context("Failed to fetch agenda items")?;
            format_rows(
                &to_rows(&items)?,
                &["agenda_sequence", "item_file", "item_title", "action_name"],
                format,
            )?
        }
        Commands::Items { search } => {
            let criteria = match search {
                Some(text) => SearchCriteria::new().text(text),
                None => SearchCriteria::new(),
            };
            let items = client()?.items(&criteria).context("Failed to search items")?;
            format_rows(&to_rows(&items)?, &["id", "file", "title", "status_name"], format)?
        }
        Commands::Actions => {
            let actions = client()?.actions().context("Failed to list actions")?;
            format_rows(&to_rows(&actions)?, &["key", "name"], format)?
        }
        Commands::VoteTypes => {
            let vote_types = client()?.vote_types().context("Failed to list vote types")?;
            format_rows(&to_rows(&vote_types)?, &[], format)?
        }
        Commands::Years => {
            let years = client()?.meeting_years().context("Failed to list meeting years")?;
            let rows: Vec<_> = years
                .into_iter()
                .map(|year| serde_json::json!({ "year": year }))
                .collect();
            format_rows(&rows, &["year"], format)?
        }
        Commands::Info => {
            let client = client()?;
            let pairs = [
                ("partner", client.partner_name()?),
                ("server", client.server_name()?),
                ("version", client.version()?),
                ("server_time", client.server_date_time()?),
                ("culture", client.culture_name()?),
            ];
            format_pairs(&pairs, format)?
        }
    };

    if output.is_empty() {
        println!("{}", "No results".dimmed());
    } else {
        println!("{}", output);
    }
    Ok(())
}
