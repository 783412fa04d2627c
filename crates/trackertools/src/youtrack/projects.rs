use colored::Colorize;
use trackertools_core::fields::presets;
use trackertools_core::pagination::PageWindow;
use trackertools_core::youtrack::{transform_projects, ProjectsOutput, YouTrackProject};

use super::{create_client, get_json, FieldArgs, YouTrackConfig};
use crate::prelude::{eprintln, println, *};

/// Options for listing YouTrack projects
#[derive(Debug, clap::Args, Clone)]
pub struct ProjectsOptions {
    /// Maximum number of projects to return per page
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of projects to skip
    #[arg(long)]
    pub skip: Option<usize>,

    #[clap(flatten)]
    pub fields: FieldArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn list_projects_data(
    config: &YouTrackConfig,
    window: PageWindow,
    fields: &FieldArgs,
) -> Result<ProjectsOutput> {
    let client = create_client(config)?;

    let mut params = vec![("fields", fields.resolve(presets::project()))];
    params.extend(window.query_params());

    let projects: Vec<YouTrackProject> =
        get_json(&client, config, "/api/admin/projects", &params).await?;

    Ok(transform_projects(projects, window))
}

/// Handle the projects command
pub async fn handler(
    options: ProjectsOptions,
    config: &YouTrackConfig,
    global: &crate::Global,
) -> Result<()> {
    let window = PageWindow::new(options.limit, options.skip);

    if global.verbose {
        eprintln!("Listing projects (top={}, skip={})", window.top, window.skip);
    }

    let data = list_projects_data(config, window, &options.fields).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if data.projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Key", "Name", "Leader", "Status"]);

    for project in &data.projects {
        let status = if project.archived {
            "archived".bright_black().to_string()
        } else {
            "active".green().to_string()
        };
        table.add_row(prettytable::row![
            project.short_name.as_deref().unwrap_or("-"),
            &project.name,
            project.leader.as_deref().unwrap_or("-"),
            status
        ]);
    }

    table.printstd();

    if let Some(next_skip) = data.pagination.next_skip {
        eprintln!(
            "\nTo fetch the next page, run:\n  trackertools youtrack projects --limit {} --skip {}",
            window.top, next_skip
        );
    }

    Ok(())
}
