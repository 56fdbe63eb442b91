//! CLI for the HAL request form.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config;
use crate::transport::UreqTransport;
use commands::{run_compose, run_links, run_load_people, ComposeArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hal-form")]
#[command(about = "Compose requests against a HAL/JSON hypermedia API", long_about = None)]
pub struct Cli {
    /// TOML file with `base_url` and `timeout_secs`.
    #[arg(long, global = true, env = "HAL_FORM_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API root; overrides the config file.
    #[arg(long, global = true, env = "HAL_FORM_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds; overrides the config file.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Convert a W3C Link header into HAL `_links` JSON.
    Links {
        /// Header value, e.g. `<http://h/people>; rel="people"`.
        header: String,
    },

    /// Open a request form for a resource, fill it in, and submit it.
    Compose(ComposeArgs),

    /// POST one person per line of a names file to `/people`.
    LoadPeople {
        /// Newline-delimited names.
        file: PathBuf,
    },
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let cfg = config::load(cli.config.as_deref())?.with_overrides(cli.base_url, cli.timeout_secs);
    tracing::debug!("loaded config: {:?}", cfg);

    let transport = UreqTransport::new(Duration::from_secs(cfg.timeout_secs));

    match cli.command {
        CliCommand::Links { header } => run_links(&header),
        CliCommand::Compose(args) => run_compose(&cfg, &transport, args),
        CliCommand::LoadPeople { file } => run_load_people(&cfg, &transport, &file).map(|_| ()),
    }
}
