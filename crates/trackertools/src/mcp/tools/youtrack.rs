use crate::prelude::{eprintln, *};
use crate::youtrack::{FieldArgs, YouTrackConfig};
use serde::Deserialize;
use trackertools_core::pagination::PageWindow;
use trackertools_core::youtrack::{render_issue_text, render_projects_text, render_search_text};

use super::{format_result, parse_arguments, JsonRpcError, OutputFormat};

fn tool_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError::new(
        JsonRpcError::INTERNAL_ERROR,
        format!("Tool execution error: {e}"),
    )
}

fn load_config() -> Result<YouTrackConfig, JsonRpcError> {
    YouTrackConfig::from_env().map_err(|e| {
        JsonRpcError::new(
            JsonRpcError::INTERNAL_ERROR,
            format!("Configuration error: {e}"),
        )
    })
}

pub async fn handle_search_issues(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct SearchIssuesArgs {
        query: String,
        limit: Option<usize>,
        skip: Option<usize>,
        #[serde(flatten)]
        fields: FieldArgs,
        #[serde(default)]
        format: OutputFormat,
    }

    let args: SearchIssuesArgs = parse_arguments(arguments)?;
    let window = PageWindow::new(args.limit, args.skip);

    if global.verbose {
        eprintln!(
            "Calling youtrack_search_issues: query={}, top={}, skip={}",
            args.query, window.top, window.skip
        );
    }

    let config = load_config()?;
    let data = crate::youtrack::search_issues_data(&config, args.query, window, &args.fields)
        .await
        .map_err(tool_error)?;

    format_result(&data, args.format, render_search_text)
}

pub async fn handle_get_issue(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GetIssueArgs {
        issue_id: String,
        #[serde(flatten)]
        fields: FieldArgs,
        #[serde(default)]
        format: OutputFormat,
    }

    let args: GetIssueArgs = parse_arguments(arguments)?;

    if global.verbose {
        eprintln!("Calling youtrack_get_issue: issue_id={}", args.issue_id);
    }

    let config = load_config()?;
    let data = crate::youtrack::get_issue_data(&config, &args.issue_id, &args.fields)
        .await
        .map_err(tool_error)?;

    format_result(&data, args.format, render_issue_text)
}

pub async fn handle_list_projects(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct ListProjectsArgs {
        limit: Option<usize>,
        skip: Option<usize>,
        #[serde(flatten)]
        fields: FieldArgs,
        #[serde(default)]
        format: OutputFormat,
    }

    let args: ListProjectsArgs = parse_arguments(arguments)?;
    let window = PageWindow::new(args.limit, args.skip);

    if global.verbose {
        eprintln!(
            "Calling youtrack_list_projects: top={}, skip={}",
            window.top, window.skip
        );
    }

    let config = load_config()?;
    let data = crate::youtrack::list_projects_data(&config, window, &args.fields)
        .await
        .map_err(tool_error)?;

    format_result(&data, args.format, render_projects_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_search_requires_query() {
        let error = handle_search_issues(Some(json!({ "limit": 5 })), &crate::Global { verbose: false })
            .await
            .unwrap_err();

        assert_eq!(error.code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_get_issue_requires_issue_id() {
        let error = handle_get_issue(None, &crate::Global { verbose: false })
            .await
            .unwrap_err();

        assert_eq!(error.code, JsonRpcError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_rejects_unknown_format() {
        let error = handle_list_projects(
            Some(json!({ "format": "yaml" })),
            &crate::Global { verbose: false },
        )
        .await
        .unwrap_err();

        assert_eq!(error.code, JsonRpcError::INVALID_PARAMS);
    }
}
