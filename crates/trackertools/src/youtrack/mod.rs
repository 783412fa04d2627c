pub mod get;
pub mod projects;
pub mod search;

use colored::Colorize;
use serde::Deserialize;
use trackertools_core::fields::{remove_field, FieldBuilder};
use trackertools_core::youtrack::IssueOutput;

use crate::prelude::{eprintln, *};

const BASE_URL_ENV: &str = "YOUTRACK_BASE_URL";
const TOKEN_ENV: &str = "YOUTRACK_TOKEN";

/// YouTrack module app - root command
#[derive(Debug, clap::Parser)]
#[command(name = "youtrack")]
#[command(about = "YouTrack issue tracker operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,

    #[clap(flatten)]
    pub connection: ConnectionArgs,
}

/// YouTrack commands
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Search issues using YouTrack query syntax
    #[clap(name = "search")]
    Search(search::SearchOptions),

    /// Get detailed information about an issue
    #[clap(name = "get")]
    Get(get::GetOptions),

    /// List projects
    #[clap(name = "projects")]
    Projects(projects::ProjectsOptions),
}

/// Connection flags; each falls back to its environment variable
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectionArgs {
    /// YouTrack base URL (e.g., https://example.youtrack.cloud)
    #[arg(long, env = "YOUTRACK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// YouTrack permanent token
    #[arg(long, env = "YOUTRACK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,
}

/// YouTrack connection configuration
#[derive(Debug, Clone)]
pub struct YouTrackConfig {
    pub base_url: String,
    pub token: String,
}

impl YouTrackConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::resolve(ConnectionArgs::default())
    }

    /// Use explicit values where given, environment variables otherwise
    pub fn resolve(args: ConnectionArgs) -> Result<Self> {
        let base_url = args
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .ok_or_else(|| Error::MissingConfig(format!("{BASE_URL_ENV} is not set")))?;
        let token = args
            .token
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .ok_or_else(|| Error::MissingConfig(format!("{TOKEN_ENV} is not set")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

/// Create an HTTP client that authenticates with a bearer token
pub fn create_client(config: &YouTrackConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// GET a YouTrack REST path and decode the JSON body
pub async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    config: &YouTrackConfig,
    path: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let url = format!("{}{}", config.base_url, path);
    log::debug!("GET {url} {query:?}");

    let response = client
        .get(&url)
        .query(query)
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let status = response.status();
    log::debug!("GET {url} -> {status}");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        }
        .into());
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| {
        log::warn!("Unexpected response from {url}: {e}");
        Error::Decode(e.to_string()).into()
    })
}

/// Caller adjustments to a resource's default field selector
#[derive(Debug, Clone, Default, clap::Args, Deserialize)]
pub struct FieldArgs {
    /// Extra field to request as a dot-path, e.g. project.leader.login (repeatable)
    #[arg(long = "field", value_name = "PATH")]
    #[serde(default)]
    pub fields: Vec<String>,

    /// Selector fragment to merge in, e.g. "votes,watchers(hasStar)"
    #[arg(long)]
    #[serde(default)]
    pub selector: Option<String>,

    /// Field to drop from the selector as a dot-path, e.g. customFields (repeatable)
    #[arg(long = "exclude", value_name = "PATH")]
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl FieldArgs {
    /// Build the `fields` query parameter on top of a preset
    pub fn resolve(&self, mut preset: FieldBuilder) -> String {
        preset.add_fields(&self.fields);
        if let Some(selector) = &self.selector {
            preset.add_field_string(selector);
        }

        self.exclude
            .iter()
            .fold(preset.build(), |selector, path| remove_field(&selector, path))
    }
}

/// Module entry point
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = YouTrackConfig::resolve(app.connection)?;

    if global.verbose {
        eprintln!("YouTrack: {}", config.base_url);
    }

    match app.command {
        Commands::Search(options) => search::handler(options, &config, &global).await,
        Commands::Get(options) => get::handler(options, &config, &global).await,
        Commands::Projects(options) => projects::handler(options, &config, &global).await,
    }
}

/// Display an issue's details as a formatted CLI table.
fn display_issue(issue: &IssueOutput) {
    std::println!(
        "\n{} - {}\n",
        issue.id.bold().cyan(),
        issue.summary.bright_white()
    );

    let mut table = new_table();

    if let Some(project) = &issue.project {
        table.add_row(prettytable::row![
            "Project".bold().cyan(),
            project.bright_blue().to_string()
        ]);
    }

    if let Some(state) = &issue.state {
        table.add_row(prettytable::row![
            "State".bold().cyan(),
            state.green().to_string()
        ]);
    }

    if let Some(priority) = &issue.priority {
        table.add_row(prettytable::row![
            "Priority".bold().cyan(),
            priority.bright_yellow().to_string()
        ]);
    }

    let assignee = match &issue.assignee {
        Some(assignee) => assignee.bright_magenta().to_string(),
        None => "Unassigned".bright_black().to_string(),
    };
    table.add_row(prettytable::row!["Assignee".bold().cyan(), assignee]);

    for (label, value) in [
        ("Reporter", &issue.reporter),
        ("Created", &issue.created),
        ("Updated", &issue.updated),
        ("Resolved", &issue.resolved),
    ] {
        if let Some(value) = value {
            table.add_row(prettytable::row![
                label.bold().cyan(),
                value.bright_black().to_string()
            ]);
        }
    }

    for field in &issue.custom_fields {
        if !matches!(field.name.as_str(), "State" | "Priority" | "Assignee") {
            table.add_row(prettytable::row![field.name.bold().cyan(), field.value]);
        }
    }

    table.printstd();

    if !issue.tags.is_empty() {
        std::println!(
            "\n{}: {}",
            "Tags".bold().cyan(),
            issue.tags.join(", ").bright_green()
        );
    }

    if let Some(description) = &issue.description {
        std::println!("\n{}:", "Description".bold().cyan());
        std::println!("{}\n", description);
    }

    if !issue.comments.is_empty() {
        std::println!("\n{}", "Comments:".bold().cyan());
        for (index, comment) in issue.comments.iter().enumerate() {
            std::println!(
                "{} {} {}",
                format!("{}.", index + 1).green(),
                format!("[{}]", comment.created.as_deref().unwrap_or("-")).blue(),
                comment.author.as_deref().unwrap_or("Unknown").magenta()
            );
            std::println!("{}\n", comment.text.trim());
        }
    }

    std::println!();
}

// Re-export public data functions for external use (e.g., MCP)
pub use get::get_issue_data;
pub use projects::list_projects_data;
pub use search::search_issues_data;
