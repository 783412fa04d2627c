#[derive(Debug, clap::Parser)]
#[command(name = "mcp")]
#[command(about = "Model Context Protocol server exposing the YouTrack tools")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Serve MCP over stdin/stdout (for agents that spawn the server)
    #[clap(name = "stdio")]
    Stdio,

    /// Serve MCP over HTTP
    #[clap(name = "sse")]
    Sse(SseOptions),
}

#[derive(Debug, clap::Args)]
pub struct SseOptions {
    /// Port to listen on
    #[arg(short, long, env = "TRACKERTOOLS_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "TRACKERTOOLS_HOST", default_value = "127.0.0.1")]
    pub host: String,
}
