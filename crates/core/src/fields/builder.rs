use super::node::{find_path_mut, position_of};
use super::{parse_field_string, serialize_field_structure, FieldNode};

/// Stateful editor over one selector forest.
///
/// Instance methods deduplicate by exact name, but only at the root level
/// they insert into. Dotted paths passed to [`FieldBuilder::add`] extend
/// existing subtrees instead of duplicating the prefix chain.
///
/// ```rust,ignore
/// let mut builder = FieldBuilder::from("id,project(id)");
/// builder.add("summary").add("project.name");
/// assert_eq!(builder.build(), "id,project(id,name),summary");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuilder {
    fields: Vec<FieldNode>,
}

impl FieldBuilder {
    /// Create a builder with an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current forest, in insertion order.
    pub fn fields(&self) -> &[FieldNode] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Add a field by name or by dot-path (`project.leader.login`).
    ///
    /// Empty input is a no-op. A plain name is appended only if the root
    /// does not already hold a node with that name.
    pub fn add(&mut self, field: &str) -> &mut Self {
        let field = field.trim();
        if field.is_empty() {
            return self;
        }

        if field.contains('.') {
            self.add_nested(field);
        } else if position_of(&self.fields, field).is_none() {
            self.fields.push(FieldNode::leaf(field));
        }

        self
    }

    /// Apply [`FieldBuilder::add`] to each field in order.
    pub fn add_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            self.add(field.as_ref());
        }
        self
    }

    /// Merge the top-level nodes of a selector string into the root.
    ///
    /// Nodes whose name is already present at the root are skipped whole;
    /// their children are not merged into the existing node.
    pub fn add_field_string(&mut self, field_string: &str) -> &mut Self {
        for node in parse_field_string(field_string) {
            if position_of(&self.fields, &node.name).is_none() {
                self.fields.push(node);
            }
        }
        self
    }

    /// Serialize the current forest.
    pub fn build(&self) -> String {
        serialize_field_structure(&self.fields)
    }

    fn add_nested(&mut self, path: &str) {
        let segments: Vec<&str> = path
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut level = &mut self.fields;
        for segment in parents {
            let index = match position_of(level, segment) {
                Some(index) => index,
                None => {
                    level.push(FieldNode::branch(*segment, Vec::new()));
                    level.len() - 1
                }
            };
            level = level[index].children_mut();
        }

        if position_of(level, last).is_none() {
            level.push(FieldNode::leaf(*last));
        }
    }
}

impl From<&str> for FieldBuilder {
    fn from(field_string: &str) -> Self {
        Self {
            fields: parse_field_string(field_string),
        }
    }
}

impl std::str::FromStr for FieldBuilder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for FieldBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

/// Append the selector fragment `new_field` under the node at `path`.
///
/// No deduplication happens here, so the same child can be added twice.
/// When `path` does not resolve, the input is returned reserialized.
pub fn add_field(field_string: &str, path: &str, new_field: &str) -> String {
    let mut forest = parse_field_string(field_string);

    if let Some(node) = find_path_mut(&mut forest, path) {
        node.children_mut().extend(parse_field_string(new_field));
    }

    serialize_field_structure(&forest)
}

/// Remove the first node named by the last segment of `path`.
///
/// The emptied parent stays in place and serializes as a leaf. When `path`
/// does not resolve, the input is returned reserialized.
pub fn remove_field(field_string: &str, path: &str) -> String {
    let mut forest = parse_field_string(field_string);

    let (siblings, last) = match path.rsplit_once('.') {
        Some((parent, last)) => (
            find_path_mut(&mut forest, parent).and_then(|node| node.children.as_mut()),
            last,
        ),
        None => (Some(&mut forest), path),
    };

    if let Some(siblings) = siblings {
        if let Some(index) = position_of(siblings, last) {
            siblings.remove(index);
        }
    }

    serialize_field_structure(&forest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builder_is_empty() {
        let builder = FieldBuilder::new();

        assert!(builder.is_empty());
        assert_eq!(builder.build(), "");
    }

    #[test]
    fn test_add_ignores_empty_input() {
        let mut builder = FieldBuilder::new();
        builder.add("").add("   ");

        assert!(builder.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut once = FieldBuilder::new();
        once.add("summary");

        let mut twice = FieldBuilder::new();
        twice.add("summary").add("summary");

        assert_eq!(once, twice);
    }

    #[test]
    fn test_add_fields_deduplicates_root_in_order() {
        let mut builder = FieldBuilder::new();
        builder.add_fields(["id", "name", "id", "description", "name"]);

        assert_eq!(builder.build(), "id,name,description");
    }

    #[test]
    fn test_add_fields_skips_empty_elements() {
        let mut builder = FieldBuilder::new();
        builder.add_fields(vec!["id".to_string(), String::new(), "name".to_string()]);

        assert_eq!(builder.build(), "id,name");
    }

    #[test]
    fn test_add_nested_builds_chain() {
        let mut builder = FieldBuilder::new();
        builder.add("project.leader.login");

        assert_eq!(builder.build(), "project(leader(login))");
    }

    #[test]
    fn test_add_nested_shares_prefix() {
        let mut builder = FieldBuilder::new();
        builder
            .add("project.id")
            .add("project.name")
            .add("project.leader.login")
            .add("project.leader.fullName")
            .add("project.id");

        assert_eq!(
            builder.build(),
            "project(id,name,leader(login,fullName))"
        );
    }

    #[test]
    fn test_add_nested_preserves_siblings() {
        let mut builder = FieldBuilder::from("project(id,name,custom(field1))");
        builder.add("project.custom.field2");

        assert_eq!(builder.build(), "project(id,name,custom(field1,field2))");
    }

    #[test]
    fn test_add_nested_under_existing_leaf() {
        let mut builder = FieldBuilder::from("id,project");
        builder.add("project.name");

        assert_eq!(builder.build(), "id,project(name)");
    }

    #[test]
    fn test_add_nested_skips_empty_segments() {
        let mut builder = FieldBuilder::new();
        builder.add("project..name").add(".").add("..id");

        assert_eq!(builder.build(), "project(name),id");
    }

    #[test]
    fn test_add_root_dedup_does_not_recurse() {
        let mut builder = FieldBuilder::from("project(id)");
        builder.add("id");

        assert_eq!(builder.build(), "project(id),id");
    }

    #[test]
    fn test_add_field_string_skips_existing_root_names() {
        let mut builder = FieldBuilder::from("id,project(id)");
        builder.add_field_string("project(name,leader(login)),summary,id");

        assert_eq!(builder.build(), "id,project(id),summary");
    }

    #[test]
    fn test_add_field_string_takes_children_as_is() {
        let mut builder = FieldBuilder::new();
        builder.add_field_string("customFields(name,name,value(name))");

        assert_eq!(builder.build(), "customFields(name,name,value(name))");
    }

    #[test]
    fn test_add_field_string_deduplicates_within_input() {
        let mut builder = FieldBuilder::new();
        builder.add_field_string("id,name,id");

        assert_eq!(builder.build(), "id,name");
    }

    #[test]
    fn test_from_and_parse_are_equivalent() {
        let from = FieldBuilder::from("id,project(name");
        let parsed: FieldBuilder = "id,project(name)".parse().unwrap();

        assert_eq!(from, parsed);
        assert_eq!(from.to_string(), "id,project(name)");
    }

    #[test]
    fn test_from_chain_fluently() {
        let selector = FieldBuilder::from("id").add("summary").add("project.name").build();

        assert_eq!(selector, "id,summary,project(name)");
    }

    #[test]
    fn test_builder_output_round_trips() {
        let mut builder = FieldBuilder::new();
        builder
            .add_fields(["id", "summary"])
            .add("project.leader.login")
            .add("project.name")
            .add("reporter.fullName");

        let reparsed = parse_field_string(&builder.build());
        assert_eq!(reparsed, builder.fields());
    }

    #[test]
    fn test_add_field_appends_under_path() {
        let result = add_field("id,project(id,name)", "project", "leader(login,fullName)");

        assert_eq!(result, "id,project(id,name,leader(login,fullName))");
    }

    #[test]
    fn test_add_field_nested_path() {
        let result = add_field(
            "id,project(id,name,custom(field1))",
            "project.custom",
            "field2,field3",
        );

        assert_eq!(result, "id,project(id,name,custom(field1,field2,field3))");
    }

    #[test]
    fn test_add_field_on_leaf_creates_group() {
        assert_eq!(add_field("id,project", "project", "name"), "id,project(name)");
    }

    #[test]
    fn test_add_field_does_not_deduplicate() {
        assert_eq!(add_field("project(id)", "project", "id"), "project(id,id)");
    }

    #[test]
    fn test_add_field_unresolved_path_is_noop() {
        assert_eq!(add_field("id,name", "", "field"), "id,name");
        assert_eq!(add_field("id,name", "project", "field"), "id,name");
        assert_eq!(add_field("id,project(id)", "project.leader", "login"), "id,project(id)");
    }

    #[test]
    fn test_add_field_noop_reserializes_input() {
        assert_eq!(add_field("id,,project(name", "missing", "x"), "id,project(name)");
    }

    #[test]
    fn test_remove_field_nested_group() {
        let result = remove_field("id,project(id,name,custom(field1,field2))", "project.custom");

        assert_eq!(result, "id,project(id,name)");
    }

    #[test]
    fn test_remove_field_root() {
        assert_eq!(remove_field("id,summary,project(id)", "summary"), "id,project(id)");
    }

    #[test]
    fn test_remove_field_only_first_match() {
        assert_eq!(remove_field("id,name,id", "id"), "name,id");
    }

    #[test]
    fn test_remove_field_keeps_empty_parent() {
        assert_eq!(remove_field("id,project(name)", "project.name"), "id,project");
    }

    #[test]
    fn test_remove_field_unresolved_path_is_noop() {
        assert_eq!(remove_field("id,name", ""), "id,name");
        assert_eq!(remove_field("id,name", "missing"), "id,name");
        assert_eq!(remove_field("id,project(name)", "project.missing"), "id,project(name)");
        assert_eq!(remove_field("id,project(name)", "other.name"), "id,project(name)");
        assert_eq!(remove_field("id,project", "project.name"), "id,project");
    }
}
