//! Default selectors for each YouTrack resource the tools read.
//!
//! Presets are returned as builders so callers can keep extending them with
//! user-requested fields before building the final `fields` parameter.

use super::FieldBuilder;

const USER: &str = "login,fullName";

/// Fields needed to render an issue in a list.
pub fn issue_summary() -> FieldBuilder {
    let mut builder = FieldBuilder::new();
    builder
        .add_fields(["id", "idReadable", "summary", "created", "updated", "resolved"])
        .add_fields(["project.id", "project.name", "project.shortName"])
        .add_fields(USER.split(',').map(|field| format!("reporter.{field}")))
        .add_field_string("customFields(name,value(name,login,fullName,presentation,text))");
    builder
}

/// Fields needed to render a single issue with its discussion.
pub fn issue_detail() -> FieldBuilder {
    let mut builder = issue_summary();
    builder
        .add("description")
        .add("tags.name")
        .add_field_string(&format!("comments({})", comment()));
    builder
}

pub fn project() -> FieldBuilder {
    let mut builder = FieldBuilder::new();
    builder
        .add_fields(["id", "name", "shortName", "description", "archived"])
        .add_field_string(&format!("leader({USER})"));
    builder
}

pub fn comment() -> FieldBuilder {
    let mut builder = FieldBuilder::new();
    builder
        .add_fields(["id", "text", "created"])
        .add_field_string(&format!("author({USER})"));
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_summary_selector() {
        assert_eq!(
            issue_summary().build(),
            "id,idReadable,summary,created,updated,resolved,\
             project(id,name,shortName),reporter(login,fullName),\
             customFields(name,value(name,login,fullName,presentation,text))"
        );
    }

    #[test]
    fn test_issue_detail_extends_summary() {
        let detail = issue_detail().build();

        assert!(detail.starts_with(&issue_summary().build()));
        assert!(detail.ends_with(
            ",description,tags(name),comments(id,text,created,author(login,fullName))"
        ));
    }

    #[test]
    fn test_project_selector() {
        assert_eq!(
            project().build(),
            "id,name,shortName,description,archived,leader(login,fullName)"
        );
    }

    #[test]
    fn test_comment_selector() {
        assert_eq!(comment().build(), "id,text,created,author(login,fullName)");
    }

    #[test]
    fn test_presets_are_independent() {
        let mut extended = project();
        extended.add("team.name");

        assert!(!project().build().contains("team"));
        assert!(extended.build().ends_with(",team(name)"));
    }
}
