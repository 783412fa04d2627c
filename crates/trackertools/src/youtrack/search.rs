use trackertools_core::fields::presets;
use trackertools_core::pagination::PageWindow;
use trackertools_core::youtrack::{transform_search_response, YouTrackIssue};

pub use trackertools_core::youtrack::SearchOutput;

use super::{create_client, get_json, FieldArgs, YouTrackConfig};
use crate::prelude::{eprintln, println, *};

/// Options for searching YouTrack issues
#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Unresolved issues assigned to you:
  trackertools youtrack search \"for: me #Unresolved\"

  # Issues in a project, second page of 20:
  trackertools youtrack search \"project: PLT\" --limit 20 --skip 20

  # Also fetch the project leader and drop custom fields:
  trackertools youtrack search \"project: PLT\" --field project.leader.login --exclude customFields

NOTES:
  - Queries use YouTrack search syntax, the same as the web UI search box
  - Results are limited to 10 per page by default (maximum 100)")]
pub struct SearchOptions {
    /// YouTrack search query (e.g., "project: PLT #Unresolved")
    #[clap(env = "YOUTRACK_QUERY")]
    pub query: String,

    /// Maximum number of results to return per page
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of results to skip
    #[arg(long)]
    pub skip: Option<usize>,

    #[clap(flatten)]
    pub fields: FieldArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public data function - used by both CLI and MCP
pub async fn search_issues_data(
    config: &YouTrackConfig,
    query: String,
    window: PageWindow,
    fields: &FieldArgs,
) -> Result<SearchOutput> {
    let client = create_client(config)?;

    let mut params = vec![
        ("query", query.clone()),
        ("fields", fields.resolve(presets::issue_summary())),
    ];
    params.extend(window.query_params());

    let issues: Vec<YouTrackIssue> = get_json(&client, config, "/api/issues", &params).await?;

    Ok(transform_search_response(issues, query, window))
}

/// Handle the search command
pub async fn handler(
    options: SearchOptions,
    config: &YouTrackConfig,
    global: &crate::Global,
) -> Result<()> {
    let window = PageWindow::new(options.limit, options.skip);

    if global.verbose {
        eprintln!("Searching: {} (top={}, skip={})", options.query, window.top, window.skip);
    }

    let data = search_issues_data(config, options.query.clone(), window, &options.fields).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("Found {} issue(s):\n", data.issues.len());

    if data.issues.is_empty() {
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "Summary", "State", "Assignee"]);

    for issue in &data.issues {
        table.add_row(prettytable::row![
            &issue.id,
            &issue.summary,
            issue.state.as_deref().unwrap_or("-"),
            issue.assignee.as_deref().unwrap_or("Unassigned")
        ]);
    }

    table.printstd();

    if let Some(next_skip) = data.pagination.next_skip {
        eprintln!(
            "\nTo fetch the next page, run:\n  trackertools youtrack search '{}' --limit {} --skip {}",
            options.query, window.top, next_skip
        );
    }

    Ok(())
}
