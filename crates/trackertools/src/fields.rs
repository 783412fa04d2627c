//! Offline field selector tools
//!
//! Build, patch and inspect YouTrack `fields` selectors without talking to a
//! server. Handy for composing `--selector`/`--field` arguments for the
//! `youtrack` commands.

use serde::Deserialize;
use trackertools_core::fields::{
    add_field, forest_depth, parse_field_string, presets, remove_field, FieldBuilder, FieldNode,
};

use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Parser)]
#[command(name = "fields")]
#[command(about = "Build and edit YouTrack field selectors")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Build a selector from a preset, a starting selector and dot-paths
    #[clap(name = "build")]
    Build(BuildOptions),

    /// Append a selector fragment under the field at a dot-path
    #[clap(name = "add")]
    Add(AddOptions),

    /// Remove the field at a dot-path
    #[clap(name = "remove")]
    Remove(RemoveOptions),

    /// Show the tree a selector parses into
    #[clap(name = "parse")]
    Parse(ParseOptions),
}

/// Default selector of a YouTrack resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Issue,
    IssueDetail,
    Project,
    Comment,
}

impl Preset {
    pub fn builder(self) -> FieldBuilder {
        match self {
            Preset::Issue => presets::issue_summary(),
            Preset::IssueDetail => presets::issue_detail(),
            Preset::Project => presets::project(),
            Preset::Comment => presets::comment(),
        }
    }
}

#[derive(Debug, clap::Args)]
#[command(after_help = "EXAMPLES:
  # Issue preset plus the project leader:
  trackertools fields build --preset issue --field project.leader.login

  # Start from an existing selector:
  trackertools fields build --from 'id,summary' --field project.name --selector 'tags(name)'")]
pub struct BuildOptions {
    /// Start from a resource's default selector
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Start from (or merge in) an existing selector
    #[arg(long)]
    pub from: Option<String>,

    /// Field to add as a name or dot-path (repeatable)
    #[arg(long = "field", value_name = "PATH")]
    pub fields: Vec<String>,

    /// Selector fragment to merge in (repeatable)
    #[arg(long = "selector", value_name = "SELECTOR")]
    pub selectors: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub struct AddOptions {
    /// Selector to patch
    pub selector: String,

    /// Dot-path of the field that receives the fragment (e.g., project.leader)
    pub path: String,

    /// Selector fragment to append (e.g., "login,fullName")
    pub field: String,
}

#[derive(Debug, clap::Args)]
pub struct RemoveOptions {
    /// Selector to patch
    pub selector: String,

    /// Dot-path of the field to remove (e.g., project.leader)
    pub path: String,
}

#[derive(Debug, clap::Args)]
pub struct ParseOptions {
    /// Selector to parse
    pub selector: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Combine a preset, a starting selector, dot-paths and fragments.
///
/// Without a preset the starting selector is taken as-is, duplicates
/// included; everything merged afterwards is deduplicated at the root.
pub fn build_selector(
    preset: Option<Preset>,
    from: Option<&str>,
    fields: &[String],
    selectors: &[String],
) -> String {
    let mut builder = match (preset, from) {
        (Some(preset), from) => {
            let mut builder = preset.builder();
            if let Some(from) = from {
                builder.add_field_string(from);
            }
            builder
        }
        (None, Some(from)) => FieldBuilder::from(from),
        (None, None) => FieldBuilder::new(),
    };

    builder.add_fields(fields);
    for selector in selectors {
        builder.add_field_string(selector);
    }

    builder.build()
}

/// Deepest selector the `parse` views will render.
pub const MAX_VIEW_DEPTH: usize = 128;

/// Parse a selector for display, refusing trees too deep to show.
pub fn parse_for_view(selector: &str) -> Result<Vec<FieldNode>> {
    let forest = parse_field_string(selector);

    let depth = forest_depth(&forest);
    if depth > MAX_VIEW_DEPTH {
        return Err(eyre!(
            "Selector nests {depth} levels deep; at most {MAX_VIEW_DEPTH} can be displayed"
        ));
    }

    Ok(forest)
}

/// Indented tree view, two spaces per level
pub fn render_tree(forest: &[FieldNode]) -> String {
    let mut lines = Vec::new();
    let mut pending: Vec<(&FieldNode, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = pending.pop() {
        lines.push(format!("{}{}", "  ".repeat(depth), node.name));
        if let Some(children) = &node.children {
            pending.extend(children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    lines.join("\n")
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Build(options) => {
            let selector = build_selector(
                options.preset,
                options.from.as_deref(),
                &options.fields,
                &options.selectors,
            );
            println!("{selector}");
        }
        Commands::Add(options) => {
            if global.verbose {
                eprintln!("Adding '{}' under '{}'", options.field, options.path);
            }
            println!("{}", add_field(&options.selector, &options.path, &options.field));
        }
        Commands::Remove(options) => {
            if global.verbose {
                eprintln!("Removing '{}'", options.path);
            }
            println!("{}", remove_field(&options.selector, &options.path));
        }
        Commands::Parse(options) => {
            let forest = parse_for_view(&options.selector)?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&forest)?);
            } else if forest.is_empty() {
                eprintln!("Empty selector.");
            } else {
                println!("{}", render_tree(&forest));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_build_selector_from_preset() {
        let selector = build_selector(
            Some(Preset::Comment),
            None,
            &strings(&["author.email"]),
            &[],
        );

        assert_eq!(selector, "id,text,created,author(login,fullName,email)");
    }

    #[test]
    fn test_build_selector_from_string_keeps_duplicates() {
        let selector = build_selector(None, Some("id,id,summary"), &strings(&["id", "tags.name"]), &[]);

        assert_eq!(selector, "id,id,summary,tags(name)");
    }

    #[test]
    fn test_build_selector_merges_fragments() {
        let selector = build_selector(
            Some(Preset::Comment),
            Some("id,visibility($type)"),
            &[],
            &strings(&["author(avatarUrl)", "reactions(reaction)"]),
        );

        assert_eq!(
            selector,
            "id,text,created,author(login,fullName),visibility($type),reactions(reaction)"
        );
    }

    #[test]
    fn test_build_selector_empty() {
        assert_eq!(build_selector(None, None, &[], &[]), "");
    }

    #[test]
    fn test_render_tree() {
        let forest = parse_field_string("id,project(name,leader(login)),summary");

        assert_eq!(
            render_tree(&forest),
            "id\nproject\n  name\n  leader\n    login\nsummary"
        );
    }

    #[test]
    fn test_preset_deserializes_kebab_case() {
        let preset: Preset = serde_json::from_value(serde_json::json!("issue-detail")).unwrap();

        assert_eq!(preset, Preset::IssueDetail);
    }

    #[test]
    fn test_parse_for_view_limits_depth() {
        let shallow = "a(".repeat(MAX_VIEW_DEPTH);
        let deep = "a(".repeat(MAX_VIEW_DEPTH + 1);

        assert_eq!(parse_for_view(&shallow).unwrap().len(), 1);
        assert!(parse_for_view(&deep).is_err());
    }

    #[test]
    fn test_render_tree_keeps_sibling_order() {
        let forest = parse_field_string("a(b(c),d),e");

        assert_eq!(render_tree(&forest), "a\n  b\n    c\n  d\ne");
    }
}
