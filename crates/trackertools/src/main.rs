#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod error;
mod fields;
mod mcp;
mod prelude;
mod youtrack;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Command line and MCP tools for the YouTrack issue tracker"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "TRACKERTOOLS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// YouTrack issue tracker operations
    #[clap(name = "youtrack", alias = "yt")]
    YouTrack(crate::youtrack::App),

    /// Build and edit YouTrack field selectors offline
    Fields(crate::fields::App),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::YouTrack(sub_app) => crate::youtrack::run(sub_app, app.global).await,
        SubCommands::Fields(sub_app) => crate::fields::run(sub_app, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
