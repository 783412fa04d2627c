use crate::prelude::{eprintln, *};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Serve line-delimited JSON-RPC over stdin/stdout until EOF.
///
/// stdout carries protocol messages only; diagnostics go to stderr.
pub async fn run_stdio(global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Starting MCP server with stdio transport...");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        if global.verbose {
            eprintln!("Received: {message}");
        }

        let Some(response) = super::handle_request(message, &global).await else {
            continue;
        };
        let response_json = serde_json::to_string(&response)?;

        if global.verbose {
            eprintln!("Sending: {response_json}");
        }

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    log::debug!("stdin closed, stopping MCP server");
    Ok(())
}
