//! Transformation functions for YouTrack API responses
//!
//! YouTrack only returns the attributes named in the request's `fields`
//! selector, so every model field other than `id` is optional and defaults
//! when absent.

use serde::{Deserialize, Serialize};

use crate::pagination::PageWindow;

/// Custom fields lifted out of `customFields` into top-level output fields
const STATE_FIELD: &str = "State";
const PRIORITY_FIELD: &str = "Priority";
const ASSIGNEE_FIELD: &str = "Assignee";

/// Keys tried, in order, to find a readable label on a custom field value
const VALUE_LABEL_KEYS: [&str; 6] = [
    "presentation",
    "name",
    "fullName",
    "login",
    "text",
    "minutes",
];

/// YouTrack user reference
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Project as embedded in an issue or returned by `/api/admin/projects`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackProject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub leader: Option<YouTrackUser>,
}

/// Custom field whose value shape depends on the field type
/// (enum, user, period, text, multi-value...)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct YouTrackCustomField {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct YouTrackTag {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct YouTrackComment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub author: Option<YouTrackUser>,
}

/// Issue response from `/api/issues`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YouTrackIssue {
    pub id: String,
    #[serde(default)]
    pub id_readable: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub resolved: Option<i64>,
    #[serde(default)]
    pub project: Option<YouTrackProject>,
    #[serde(default)]
    pub reporter: Option<YouTrackUser>,
    #[serde(default)]
    pub custom_fields: Vec<YouTrackCustomField>,
    #[serde(default)]
    pub tags: Vec<YouTrackTag>,
    #[serde(default)]
    pub comments: Vec<YouTrackComment>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CustomFieldOutput {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentOutput {
    pub author: Option<String>,
    pub created: Option<String>,
    pub text: String,
}

/// Output structure for a single issue
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct IssueOutput {
    pub id: String,
    pub summary: String,
    pub project: Option<String>,
    pub state: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub custom_fields: Vec<CustomFieldOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<CommentOutput>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PaginationOutput {
    pub top: usize,
    pub skip: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_skip: Option<usize>,
}

impl PaginationOutput {
    fn new(window: PageWindow, returned: usize) -> Self {
        Self {
            top: window.top,
            skip: window.skip,
            next_skip: window.next(returned).map(|next| next.skip),
        }
    }
}

/// Output structure for issue search
#[derive(Debug, Serialize, PartialEq)]
pub struct SearchOutput {
    pub query: String,
    pub issues: Vec<IssueOutput>,
    pub pagination: PaginationOutput,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProjectOutput {
    pub id: Option<String>,
    pub name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub archived: bool,
    pub leader: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProjectsOutput {
    pub projects: Vec<ProjectOutput>,
    pub pagination: PaginationOutput,
}

/// Readable label for a custom field value.
///
/// Multi-value fields are joined with `", "`. Returns `None` for unset
/// values.
pub fn custom_field_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => VALUE_LABEL_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(custom_field_text),
        Value::Array(items) => {
            let labels: Vec<String> = items.iter().filter_map(custom_field_text).collect();
            if labels.is_empty() {
                None
            } else {
                Some(labels.join(", "))
            }
        }
    }
}

/// Format a YouTrack timestamp (milliseconds since the epoch) as UTC.
pub fn format_timestamp(millis: i64) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// Prefer the full name, fall back to the login
pub fn user_display(user: &YouTrackUser) -> Option<String> {
    user.full_name
        .clone()
        .filter(|name| !name.is_empty())
        .or_else(|| user.login.clone())
}

fn project_display(project: &YouTrackProject) -> Option<String> {
    project.short_name.clone().or_else(|| project.name.clone())
}

fn transform_comment(comment: YouTrackComment) -> CommentOutput {
    CommentOutput {
        author: comment.author.as_ref().and_then(user_display),
        created: comment.created.and_then(format_timestamp),
        text: comment.text.unwrap_or_default(),
    }
}

/// Convert a raw YouTrack issue into the output model.
///
/// `State`, `Priority` and `Assignee` are lifted to top-level fields; every
/// custom field with a value also stays in `custom_fields`, in API order.
pub fn transform_issue(issue: YouTrackIssue) -> IssueOutput {
    let custom_fields: Vec<CustomFieldOutput> = issue
        .custom_fields
        .iter()
        .filter_map(|field| {
            custom_field_text(&field.value).map(|value| CustomFieldOutput {
                name: field.name.clone(),
                value,
            })
        })
        .collect();

    let lifted = |name: &str| {
        custom_fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.clone())
    };

    IssueOutput {
        id: issue.id_readable.unwrap_or(issue.id),
        summary: issue.summary.unwrap_or_default(),
        project: issue.project.as_ref().and_then(project_display),
        state: lifted(STATE_FIELD),
        priority: lifted(PRIORITY_FIELD),
        assignee: lifted(ASSIGNEE_FIELD),
        reporter: issue.reporter.as_ref().and_then(user_display),
        created: issue.created.and_then(format_timestamp),
        updated: issue.updated.and_then(format_timestamp),
        resolved: issue.resolved.and_then(format_timestamp),
        description: issue.description.filter(|d| !d.trim().is_empty()),
        tags: issue.tags.into_iter().map(|tag| tag.name).collect(),
        comments: issue.comments.into_iter().map(transform_comment).collect(),
        custom_fields,
    }
}

pub fn transform_search_response(
    issues: Vec<YouTrackIssue>,
    query: String,
    window: PageWindow,
) -> SearchOutput {
    let pagination = PaginationOutput::new(window, issues.len());

    SearchOutput {
        query,
        issues: issues.into_iter().map(transform_issue).collect(),
        pagination,
    }
}

pub fn transform_projects(projects: Vec<YouTrackProject>, window: PageWindow) -> ProjectsOutput {
    let pagination = PaginationOutput::new(window, projects.len());

    let projects = projects
        .into_iter()
        .map(|project| ProjectOutput {
            leader: project.leader.as_ref().and_then(user_display),
            name: project.name.unwrap_or_default(),
            id: project.id,
            short_name: project.short_name,
            description: project.description.filter(|d| !d.trim().is_empty()),
            archived: project.archived.unwrap_or(false),
        })
        .collect();

    ProjectsOutput {
        projects,
        pagination,
    }
}

/// Plain-text rendering of a single issue, for MCP clients that ask for text.
pub fn render_issue_text(issue: &IssueOutput) -> String {
    let mut lines = vec![format!("{}: {}", issue.id, issue.summary)];

    let mut push = |label: &str, value: &Option<String>| {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    };
    push("Project", &issue.project);
    push("State", &issue.state);
    push("Priority", &issue.priority);
    push("Assignee", &issue.assignee);
    push("Reporter", &issue.reporter);
    push("Created", &issue.created);
    push("Updated", &issue.updated);
    push("Resolved", &issue.resolved);

    if !issue.tags.is_empty() {
        lines.push(format!("Tags: {}", issue.tags.join(", ")));
    }

    let other_fields: Vec<&CustomFieldOutput> = issue
        .custom_fields
        .iter()
        .filter(|field| ![STATE_FIELD, PRIORITY_FIELD, ASSIGNEE_FIELD].contains(&field.name.as_str()))
        .collect();
    if !other_fields.is_empty() {
        lines.push("Fields:".to_string());
        for field in other_fields {
            lines.push(format!("  {}: {}", field.name, field.value));
        }
    }

    if let Some(description) = &issue.description {
        lines.push(String::new());
        lines.push(description.trim_end().to_string());
    }

    if !issue.comments.is_empty() {
        lines.push(String::new());
        lines.push(format!("Comments ({}):", issue.comments.len()));
        for comment in &issue.comments {
            lines.push(format!(
                "- {} [{}]: {}",
                comment.author.as_deref().unwrap_or("Unknown"),
                comment.created.as_deref().unwrap_or("-"),
                comment.text.trim()
            ));
        }
    }

    lines.join("\n")
}

fn render_next_page(pagination: &PaginationOutput) -> Option<String> {
    pagination
        .next_skip
        .map(|skip| format!("More results may exist: use skip={skip} limit={}", pagination.top))
}

pub fn render_search_text(output: &SearchOutput) -> String {
    if output.issues.is_empty() {
        return format!("No issues found for query: {}", output.query);
    }

    let mut lines = vec![format!(
        "Found {} issue(s) for query: {}",
        output.issues.len(),
        output.query
    )];

    for issue in &output.issues {
        let mut line = format!("- {}", issue.id);
        if let Some(state) = &issue.state {
            line.push_str(&format!(" [{state}]"));
        }
        line.push_str(&format!(" {}", issue.summary));
        if let Some(assignee) = &issue.assignee {
            line.push_str(&format!(" ({assignee})"));
        }
        lines.push(line);
    }

    lines.extend(render_next_page(&output.pagination));
    lines.join("\n")
}

pub fn render_projects_text(output: &ProjectsOutput) -> String {
    if output.projects.is_empty() {
        return "No projects found.".to_string();
    }

    let mut lines = vec![format!("Found {} project(s):", output.projects.len())];

    for project in &output.projects {
        let mut line = match &project.short_name {
            Some(short_name) => format!("- {short_name}: {}", project.name),
            None => format!("- {}", project.name),
        };
        if let Some(leader) = &project.leader {
            line.push_str(&format!(" (lead: {leader})"));
        }
        if project.archived {
            line.push_str(" [archived]");
        }
        lines.push(line);
    }

    lines.extend(render_next_page(&output.pagination));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Helper to create an issue the way YouTrack returns it for the summary preset
    fn create_issue(id_readable: &str, summary: &str, state: &str) -> YouTrackIssue {
        serde_json::from_value(json!({
            "id": "2-15",
            "idReadable": id_readable,
            "summary": summary,
            "created": 1_700_000_000_000_i64,
            "updated": 1_700_003_600_000_i64,
            "resolved": null,
            "project": { "id": "0-1", "name": "Platform", "shortName": "PLT", "$type": "Project" },
            "reporter": { "login": "jdoe", "fullName": "John Doe" },
            "customFields": [
                { "name": "Priority", "value": { "name": "Major", "$type": "EnumBundleElement" } },
                { "name": "State", "value": { "name": state } },
                { "name": "Assignee", "value": null },
                { "name": "Estimation", "value": { "minutes": 90, "presentation": "1h 30m" } },
                { "name": "Subsystem", "value": [ { "name": "API" }, { "name": "UI" } ] }
            ],
            "$type": "Issue"
        }))
        .unwrap()
    }

    #[test]
    fn test_transform_issue_basic() {
        let output = transform_issue(create_issue("PLT-15", "Fix login", "Open"));

        assert_eq!(output.id, "PLT-15");
        assert_eq!(output.summary, "Fix login");
        assert_eq!(output.project, Some("PLT".to_string()));
        assert_eq!(output.state, Some("Open".to_string()));
        assert_eq!(output.priority, Some("Major".to_string()));
        assert_eq!(output.assignee, None);
        assert_eq!(output.reporter, Some("John Doe".to_string()));
        assert_eq!(output.created, Some("2023-11-14 22:13".to_string()));
        assert_eq!(output.resolved, None);
        assert!(output.comments.is_empty());
    }

    #[test]
    fn test_transform_issue_keeps_custom_fields_in_order() {
        let output = transform_issue(create_issue("PLT-15", "Fix login", "Open"));

        let names: Vec<&str> = output.custom_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Priority", "State", "Estimation", "Subsystem"]);
        assert_eq!(output.custom_fields[2].value, "1h 30m");
        assert_eq!(output.custom_fields[3].value, "API, UI");
    }

    #[test]
    fn test_transform_issue_minimal() {
        let issue: YouTrackIssue = serde_json::from_value(json!({ "id": "2-1" })).unwrap();

        let output = transform_issue(issue);

        assert_eq!(output.id, "2-1");
        assert_eq!(output.summary, "");
        assert_eq!(output.project, None);
        assert!(output.custom_fields.is_empty());
    }

    #[test]
    fn test_transform_issue_with_comments_and_tags() {
        let issue: YouTrackIssue = serde_json::from_value(json!({
            "id": "2-7",
            "idReadable": "PLT-7",
            "summary": "Crash on save",
            "description": "Steps:\n1. Save",
            "tags": [ { "name": "bug" }, { "name": "regression" } ],
            "customFields": [
                { "name": "Assignee", "value": { "login": "asmith", "fullName": "Ann Smith" } }
            ],
            "comments": [
                { "id": "4-1", "text": "Reproduced", "created": 1_700_000_000_000_i64,
                  "author": { "login": "asmith" } },
                { "id": "4-2", "text": null, "author": null }
            ]
        }))
        .unwrap();

        let output = transform_issue(issue);

        assert_eq!(output.assignee, Some("Ann Smith".to_string()));
        assert_eq!(output.description, Some("Steps:\n1. Save".to_string()));
        assert_eq!(output.tags, vec!["bug", "regression"]);
        assert_eq!(output.comments.len(), 2);
        assert_eq!(output.comments[0].author, Some("asmith".to_string()));
        assert_eq!(output.comments[1].text, "");
        assert_eq!(output.comments[1].created, None);
    }

    #[test]
    fn test_custom_field_text_shapes() {
        assert_eq!(custom_field_text(&json!(null)), None);
        assert_eq!(custom_field_text(&json!("")), None);
        assert_eq!(custom_field_text(&json!("plain")), Some("plain".to_string()));
        assert_eq!(custom_field_text(&json!(3.5)), Some("3.5".to_string()));
        assert_eq!(custom_field_text(&json!(true)), Some("true".to_string()));
        assert_eq!(
            custom_field_text(&json!({ "login": "jdoe", "fullName": "John Doe" })),
            Some("John Doe".to_string())
        );
        assert_eq!(custom_field_text(&json!({ "text": "Markdown body" })), Some("Markdown body".to_string()));
        assert_eq!(custom_field_text(&json!({ "minutes": 45 })), Some("45".to_string()));
        assert_eq!(custom_field_text(&json!({ "$type": "Unknown" })), None);
        assert_eq!(custom_field_text(&json!([])), None);
        assert_eq!(custom_field_text(&json!([null, { "name": "A" }])), Some("A".to_string()));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), Some("1970-01-01 00:00".to_string()));
        assert_eq!(format_timestamp(1_700_000_000_000), Some("2023-11-14 22:13".to_string()));
    }

    #[test]
    fn test_user_display_fallback() {
        let user = YouTrackUser {
            login: Some("jdoe".to_string()),
            full_name: Some(String::new()),
        };
        assert_eq!(user_display(&user), Some("jdoe".to_string()));
        assert_eq!(user_display(&YouTrackUser::default()), None);
    }

    #[test]
    fn test_transform_search_response_with_next_page() {
        let issues = vec![
            create_issue("PLT-1", "One", "Open"),
            create_issue("PLT-2", "Two", "Fixed"),
        ];

        let output = transform_search_response(
            issues,
            "project: PLT".to_string(),
            PageWindow::new(Some(2), Some(4)),
        );

        assert_eq!(output.issues.len(), 2);
        assert_eq!(output.query, "project: PLT");
        assert_eq!(output.pagination.skip, 4);
        assert_eq!(output.pagination.next_skip, Some(6));
    }

    #[test]
    fn test_transform_search_response_last_page() {
        let output = transform_search_response(
            vec![create_issue("PLT-1", "One", "Open")],
            "#Unresolved".to_string(),
            PageWindow::new(Some(10), None),
        );

        assert_eq!(output.pagination.next_skip, None);
    }

    #[test]
    fn test_transform_projects() {
        let projects: Vec<YouTrackProject> = serde_json::from_value(json!([
            { "id": "0-1", "name": "Platform", "shortName": "PLT",
              "leader": { "login": "lead", "fullName": "Lea Der" } },
            { "id": "0-2", "name": "Legacy", "shortName": "LEG", "archived": true, "description": " " }
        ]))
        .unwrap();

        let output = transform_projects(projects, PageWindow::default());

        assert_eq!(output.projects.len(), 2);
        assert_eq!(output.projects[0].leader, Some("Lea Der".to_string()));
        assert!(!output.projects[0].archived);
        assert!(output.projects[1].archived);
        assert_eq!(output.projects[1].description, None);
        assert_eq!(output.pagination.next_skip, None);
    }

    #[test]
    fn test_render_issue_text() {
        let output = transform_issue(create_issue("PLT-15", "Fix login", "Open"));

        let text = render_issue_text(&output);

        assert!(text.starts_with("PLT-15: Fix login\n"));
        assert!(text.contains("State: Open"));
        assert!(text.contains("Reporter: John Doe"));
        assert!(!text.contains("Assignee:"));
        assert!(text.contains("Fields:\n  Estimation: 1h 30m\n  Subsystem: API, UI"));
    }

    #[test]
    fn test_render_search_text() {
        let output = transform_search_response(
            vec![create_issue("PLT-1", "One", "Open")],
            "project: PLT".to_string(),
            PageWindow::new(Some(1), None),
        );

        let text = render_search_text(&output);

        assert_eq!(
            text,
            "Found 1 issue(s) for query: project: PLT\n\
             - PLT-1 [Open] One\n\
             More results may exist: use skip=1 limit=1"
        );
    }

    #[test]
    fn test_render_search_text_empty() {
        let output = transform_search_response(vec![], "foo".to_string(), PageWindow::default());

        assert_eq!(render_search_text(&output), "No issues found for query: foo");
    }

    #[test]
    fn test_render_projects_text() {
        let projects = vec![YouTrackProject {
            name: Some("Legacy".to_string()),
            short_name: Some("LEG".to_string()),
            archived: Some(true),
            ..Default::default()
        }];

        let text = render_projects_text(&transform_projects(projects, PageWindow::default()));

        assert_eq!(text, "Found 1 project(s):\n- LEG: Legacy [archived]");
    }
}
