use trackertools_core::fields::presets;
use trackertools_core::youtrack::{transform_issue, IssueOutput, YouTrackIssue};

use super::{create_client, get_json, FieldArgs, YouTrackConfig};
use crate::prelude::{eprintln, println, *};

/// Options for getting a YouTrack issue
#[derive(Debug, clap::Args, Clone)]
pub struct GetOptions {
    /// Issue ID (e.g., "PLT-123")
    #[clap(env = "YOUTRACK_ISSUE_ID")]
    pub issue_id: String,

    #[clap(flatten)]
    pub fields: FieldArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Get detailed issue information, comments included
pub async fn get_issue_data(
    config: &YouTrackConfig,
    issue_id: &str,
    fields: &FieldArgs,
) -> Result<IssueOutput> {
    let client = create_client(config)?;

    let path = format!("/api/issues/{}", urlencoding::encode(issue_id));
    let params = [("fields", fields.resolve(presets::issue_detail()))];

    let issue: YouTrackIssue = get_json(&client, config, &path, &params)
        .await
        .map_err(|e| eyre!("Failed to fetch issue {}: {}", issue_id, e))?;

    Ok(transform_issue(issue))
}

/// Handle the get command
pub async fn handler(
    options: GetOptions,
    config: &YouTrackConfig,
    global: &crate::Global,
) -> Result<()> {
    if global.verbose {
        eprintln!("Fetching issue {}", options.issue_id);
    }

    let issue = get_issue_data(config, &options.issue_id, &options.fields).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        super::display_issue(&issue);
    }

    Ok(())
}
